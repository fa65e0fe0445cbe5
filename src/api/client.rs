use std::marker::PhantomData;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::ApiError;
use super::page::{parse_total_count, Page, PageRequest, TOTAL_COUNT_HEADER};
use crate::entity::{clean_record, Entity, EntityId};

const MERGE_PATCH_JSON: &str = "application/merge-patch+json";

/// Remote operations on one entity resource.
///
/// Every call is a single request; failures are terminal for that call.
#[async_trait]
pub trait ResourceApi<E: Entity>: Send + Sync {
    /// `GET /api/<resource>?page&size&sort&cacheBuster`
    async fn list(&self, request: &PageRequest) -> Result<Page<E>, ApiError>;

    /// `GET /api/<resource>/{id}`
    async fn get(&self, id: EntityId) -> Result<E, ApiError>;

    /// `POST /api/<resource>` with the cleaned record.
    async fn create(&self, record: &E) -> Result<E, ApiError>;

    /// `PUT /api/<resource>/{id}` with the cleaned record.
    async fn update(&self, record: &E) -> Result<E, ApiError>;

    /// `PATCH /api/<resource>/{id}` with only the fields that are set.
    async fn partial_update(&self, record: &E) -> Result<E, ApiError>;

    /// `DELETE /api/<resource>/{id}`
    async fn delete(&self, id: EntityId) -> Result<(), ApiError>;
}

/// reqwest-backed [`ResourceApi`].
pub struct ResourceClient<E> {
    http: Client,
    resource_url: String,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> ResourceClient<E> {
    /// Create a client for `E`'s resource under `base_url`.
    pub fn new(http: Client, base_url: &str) -> Self {
        let resource_url = format!("{}/api/{}", base_url.trim_end_matches('/'), E::RESOURCE);
        Self {
            http,
            resource_url,
            _entity: PhantomData,
        }
    }

    /// Collection URL, e.g. `http://host/api/students`.
    pub fn resource_url(&self) -> &str {
        &self.resource_url
    }

    fn item_url(&self, id: EntityId) -> String {
        format!("{}/{}", self.resource_url, id)
    }

    fn persisted_id(record: &E) -> Result<EntityId, ApiError> {
        record
            .id()
            .ok_or_else(|| ApiError::Validation(format!("{} id is required", E::NAME)))
    }

    fn encode(record: &E) -> Result<Vec<u8>, ApiError> {
        let body = clean_record(record).map_err(ApiError::Encode)?;
        serde_json::to_vec(&body).map_err(ApiError::Encode)
    }

    async fn send(&self, url: &str, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await.map_err(|e| ApiError::Network {
            url: url.to_string(),
            source: e,
        })?;
        ensure_success(response).await
    }

    async fn write(&self, url: String, builder: RequestBuilder) -> Result<E, ApiError> {
        let response = self.send(&url, builder).await?;
        decode(&url, response).await
    }
}

impl<E> Clone for ResourceClient<E> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            resource_url: self.resource_url.clone(),
            _entity: PhantomData,
        }
    }
}

#[async_trait]
impl<E: Entity> ResourceApi<E> for ResourceClient<E> {
    async fn list(&self, request: &PageRequest) -> Result<Page<E>, ApiError> {
        let url = self.resource_url.clone();
        tracing::debug!(resource = E::RESOURCE, page = request.page, size = request.size, "GET list");

        let query = Url::parse_with_params(&url, request.query_pairs(cache_buster())).map_err(|e| {
            ApiError::Validation(format!("Invalid resource URL '{}': {}", url, e))
        })?;
        let response = self.send(&url, self.http.get(query)).await?;
        let total_items = parse_total_count(response.headers().get(TOTAL_COUNT_HEADER));
        let entities: Vec<E> = decode(&url, response).await?;

        Ok(Page {
            entities,
            total_items,
        })
    }

    async fn get(&self, id: EntityId) -> Result<E, ApiError> {
        let url = self.item_url(id);
        tracing::debug!(resource = E::RESOURCE, id, "GET");
        let response = self.send(&url, self.http.get(&url)).await?;
        decode(&url, response).await
    }

    async fn create(&self, record: &E) -> Result<E, ApiError> {
        let url = self.resource_url.clone();
        tracing::debug!(resource = E::RESOURCE, "POST");
        let builder = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(Self::encode(record)?);
        self.write(url, builder).await
    }

    async fn update(&self, record: &E) -> Result<E, ApiError> {
        let id = Self::persisted_id(record)?;
        let url = self.item_url(id);
        tracing::debug!(resource = E::RESOURCE, id, "PUT");
        let builder = self
            .http
            .put(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(Self::encode(record)?);
        self.write(url, builder).await
    }

    async fn partial_update(&self, record: &E) -> Result<E, ApiError> {
        let id = Self::persisted_id(record)?;
        let url = self.item_url(id);
        tracing::debug!(resource = E::RESOURCE, id, "PATCH");
        let builder = self
            .http
            .patch(&url)
            .header(CONTENT_TYPE, MERGE_PATCH_JSON)
            .body(Self::encode(record)?);
        self.write(url, builder).await
    }

    async fn delete(&self, id: EntityId) -> Result<(), ApiError> {
        let url = self.item_url(id);
        tracing::debug!(resource = E::RESOURCE, id, "DELETE");
        self.send(&url, self.http.delete(&url)).await?;
        Ok(())
    }
}

/// Milliseconds since the epoch, appended to list URLs to defeat caches.
fn cache_buster() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = server_message(&body)
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| "Unknown error".to_string());

    tracing::debug!(status = status.as_u16(), %message, "Request rejected by server");
    Err(ApiError::Http {
        status: status.as_u16(),
        message,
    })
}

/// Pull a human-readable message out of a JSON error body.
fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["title", "message", "detail", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

async fn decode<T: DeserializeOwned>(url: &str, response: Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await.map_err(|e| ApiError::Network {
        url: url.to_string(),
        source: e,
    })?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode {
        url: url.to_string(),
        source: e,
    })
}
