//! Generic REST handlers for one entity resource.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::header::{HeaderName, LINK, LOCATION};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use super::error::ResourceError;
use super::pagination::Pageable;
use super::repository::InMemoryRepository;
use crate::entity::{Entity, EntityId};

const ALERT_HEADER: HeaderName = HeaderName::from_static("x-classroll-alert");
const PARAMS_HEADER: HeaderName = HeaderName::from_static("x-classroll-params");
const TOTAL_COUNT_HEADER: HeaderName = HeaderName::from_static("x-total-count");

/// Shared state behind one resource's routes.
pub struct ResourceState<E> {
    repository: InMemoryRepository<E>,
    app_name: String,
}

impl<E: Entity> ResourceState<E> {
    pub fn new(app_name: &str) -> Self {
        Self {
            repository: InMemoryRepository::new(),
            app_name: app_name.to_string(),
        }
    }

    pub fn repository(&self) -> &InMemoryRepository<E> {
        &self.repository
    }

    /// `<app>.<entity>.<action>` alert plus the affected id.
    fn alert_headers(&self, action: &str, id: EntityId) -> Result<HeaderMap, ResourceError> {
        let alert = format!("{}.{}.{}", self.app_name, E::NAME, action);
        let mut headers = HeaderMap::new();
        headers.insert(ALERT_HEADER, header_value(&alert)?);
        headers.insert(PARAMS_HEADER, HeaderValue::from(id));
        Ok(headers)
    }
}

/// Routes for `E` under `/api/<resource>`.
pub fn resource_router<E: Entity>(state: Arc<ResourceState<E>>) -> Router {
    let collection = format!("/api/{}", E::RESOURCE);
    let item = format!("/api/{}/{{id}}", E::RESOURCE);
    Router::new()
        .route(&collection, get(list::<E>).post(create::<E>))
        .route(
            &item,
            get(fetch::<E>)
                .put(update::<E>)
                .patch(partial_update::<E>)
                .delete(delete::<E>),
        )
        .with_state(state)
}

async fn create<E: Entity>(
    State(state): State<Arc<ResourceState<E>>>,
    Json(record): Json<E>,
) -> Result<Response, ResourceError> {
    tracing::debug!(entity = E::NAME, "REST request to save");
    if record.id().is_some() {
        return Err(ResourceError::bad_request(
            &format!("A new {} cannot already have an ID", E::NAME),
            E::NAME,
            "idexists",
        ));
    }

    let saved = state.repository.insert(record);
    let id = saved.id().unwrap_or_default();
    let mut headers = state.alert_headers("created", id)?;
    headers.insert(LOCATION, header_value(&format!("/api/{}/{}", E::RESOURCE, id))?);

    Ok((StatusCode::CREATED, headers, Json(saved)).into_response())
}

/// Common PUT/PATCH checks: body id present, matching the path, and known.
fn check_target<E: Entity>(
    state: &ResourceState<E>,
    path_id: EntityId,
    record: &E,
) -> Result<(), ResourceError> {
    match record.id() {
        None => Err(ResourceError::bad_request("Invalid id", E::NAME, "idnull")),
        Some(id) if id != path_id => {
            Err(ResourceError::bad_request("Invalid ID", E::NAME, "idinvalid"))
        }
        Some(id) if !state.repository.exists(id) => Err(ResourceError::bad_request(
            "Entity not found",
            E::NAME,
            "idnotfound",
        )),
        Some(_) => Ok(()),
    }
}

async fn update<E: Entity>(
    State(state): State<Arc<ResourceState<E>>>,
    Path(id): Path<EntityId>,
    Json(record): Json<E>,
) -> Result<Response, ResourceError> {
    tracing::debug!(entity = E::NAME, id, "REST request to update");
    check_target(&state, id, &record)?;

    let saved = state
        .repository
        .replace(id, record)
        .ok_or(ResourceError::NotFound)?;
    let headers = state.alert_headers("updated", id)?;
    Ok((headers, Json(saved)).into_response())
}

async fn partial_update<E: Entity>(
    State(state): State<Arc<ResourceState<E>>>,
    Path(id): Path<EntityId>,
    Json(record): Json<E>,
) -> Result<Response, ResourceError> {
    tracing::debug!(entity = E::NAME, id, "REST request to partially update");
    check_target(&state, id, &record)?;

    let saved = state
        .repository
        .patch(id, record)
        .ok_or(ResourceError::NotFound)?;
    let headers = state.alert_headers("updated", id)?;
    Ok((headers, Json(saved)).into_response())
}

async fn list<E: Entity>(
    State(state): State<Arc<ResourceState<E>>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, ResourceError> {
    let pageable = Pageable::from_query(&params);
    tracing::debug!(entity = E::NAME, page = pageable.page, size = pageable.size, "REST request to get a page");

    let known = known_properties::<E>();
    if let Some(order) = pageable.sort.iter().find(|o| !known.contains(&o.property)) {
        return Err(ResourceError::bad_request(
            &format!("Unknown sort property '{}'", order.property),
            E::NAME,
            "sortinvalid",
        ));
    }

    let (entities, total) = state.repository.find_page(&pageable);
    let link = pageable.link_header(&format!("/api/{}", E::RESOURCE), total);

    let mut headers = HeaderMap::new();
    headers.insert(TOTAL_COUNT_HEADER, HeaderValue::from(total));
    headers.insert(LINK, header_value(&link)?);
    Ok((headers, Json(entities)).into_response())
}

async fn fetch<E: Entity>(
    State(state): State<Arc<ResourceState<E>>>,
    Path(id): Path<EntityId>,
) -> Result<Json<E>, ResourceError> {
    tracing::debug!(entity = E::NAME, id, "REST request to get");
    state.repository.find(id).map(Json).ok_or(ResourceError::NotFound)
}

async fn delete<E: Entity>(
    State(state): State<Arc<ResourceState<E>>>,
    Path(id): Path<EntityId>,
) -> Result<Response, ResourceError> {
    let existed = state.repository.delete(id);
    tracing::debug!(entity = E::NAME, id, existed, "REST request to delete");
    let headers = state.alert_headers("deleted", id)?;
    Ok((StatusCode::NO_CONTENT, headers).into_response())
}

/// Field names of `E` as they appear on the wire.
fn known_properties<E: Entity>() -> Vec<String> {
    match serde_json::to_value(E::default()) {
        Ok(serde_json::Value::Object(fields)) => fields.keys().cloned().collect(),
        _ => Vec::new(),
    }
}

fn header_value(value: &str) -> Result<HeaderValue, ResourceError> {
    HeaderValue::from_str(value)
        .map_err(|e| ResourceError::Internal(format!("invalid header value '{}': {}", value, e)))
}
