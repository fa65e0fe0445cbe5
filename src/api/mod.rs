//! REST client for entity resources.
//!
//! One [`ResourceClient`] talks to one `/api/<resource>` collection. The
//! [`ResourceApi`] trait is the seam the entity store is written against.

mod client;
mod error;
mod page;

use std::time::Duration;

use reqwest::Client;

use crate::config::ApiConfig;

pub use client::{ResourceApi, ResourceClient};
pub use error::ApiError;
pub use page::{parse_total_count, Page, PageRequest, TOTAL_COUNT_HEADER};

/// Build the shared HTTP client from configuration.
///
/// Timeouts are delegated entirely to the client; nothing above it retries.
pub fn build_http_client(config: &ApiConfig) -> Result<Client, ApiError> {
    Client::builder()
        .connect_timeout(Duration::from_secs(config.connect_timeout_seconds.into()))
        .timeout(Duration::from_secs(config.timeout_seconds.into()))
        .build()
        .map_err(|e| ApiError::Network {
            url: config.base_url.clone(),
            source: e,
        })
}
