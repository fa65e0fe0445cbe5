//! Reference REST resource server.
//!
//! Serves the class-entity and student resources from memory, with the
//! status codes, validation errors, pagination and alert headers the entity
//! store expects from a real backend.

mod error;
mod pagination;
mod repository;
mod resource;

use std::future::{Future, IntoFuture};
use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::entity::{ClassEntity, Student};

pub use error::{ResourceError, ServerError};
pub use pagination::{Pageable, SortOrder, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use repository::InMemoryRepository;
pub use resource::{resource_router, ResourceState};

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".to_string(),
        service: "classroll".to_string(),
    })
}

/// Router serving every entity resource plus `/health`.
pub fn build_router(app_name: &str) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(resource_router(Arc::new(ResourceState::<ClassEntity>::new(app_name))))
        .merge(resource_router(Arc::new(ResourceState::<Student>::new(app_name))))
}

pub struct ResourceServer {
    pub addr: SocketAddr,
    /// The bound listener, kept alive between try_bind() and run().
    listener: Option<TcpListener>,
    router: Router,
}

impl ResourceServer {
    pub fn new(config: &ServerConfig) -> Result<Self, ServerError> {
        let addr = config
            .bind_addr
            .parse()
            .map_err(|e| ServerError::InvalidAddress {
                addr: config.bind_addr.clone(),
                source: e,
            })?;
        Ok(Self {
            addr,
            listener: None,
            router: build_router(&config.app_name),
        })
    }

    /// Bind the configured address. Port 0 picks a free port.
    pub async fn try_bind(&mut self) -> Result<SocketAddr, ServerError> {
        let listener = TcpListener::bind(self.addr)
            .await
            .map_err(|e| ServerError::Bind {
                addr: self.addr,
                source: e,
            })?;
        let actual = listener.local_addr()?;
        self.addr = actual;
        self.listener = Some(listener);
        tracing::info!("Resource server bound to {}", actual);
        Ok(actual)
    }

    /// Serve until `shutdown` resolves.
    ///
    /// Call try_bind() before run().
    pub async fn run<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = self.listener.ok_or(ServerError::NotBound)?;

        tracing::info!("Starting resource server on {}", self.addr);
        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .into_future()
            .await?;
        tracing::info!("Shutting down gracefully");

        Ok(())
    }
}
