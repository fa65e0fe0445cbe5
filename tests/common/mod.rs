//! Shared test utilities.

#![allow(dead_code, unused_imports)]

pub mod mock_backend;

use std::net::{SocketAddr, TcpListener};

use classroll::api::ResourceClient;
use classroll::app::AppStores;
use classroll::config::{Config, ServerConfig, StoreConfig};
use classroll::entity::Entity;
use classroll::server::ResourceServer;
use classroll::store::EntityStore;
use tokio::sync::oneshot;

/// Find a port nothing is listening on.
pub fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind to free port");
    listener.local_addr().unwrap().port()
}

/// Config pointing the client at `base_url`.
pub fn client_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.api.base_url = base_url.to_string();
    config.api.timeout_seconds = 5;
    config.api.connect_timeout_seconds = 2;
    config
}

/// Store for `E` talking to `base_url` with default store settings.
pub fn store_for<E: Entity>(base_url: &str) -> EntityStore<E, ResourceClient<E>> {
    let config = client_config(base_url);
    let http = classroll::api::build_http_client(&config.api).unwrap();
    EntityStore::new(ResourceClient::new(http, base_url), StoreConfig::default())
}

/// A running reference server; stops when dropped.
pub struct TestServer {
    pub addr: SocketAddr,
    _shutdown: oneshot::Sender<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        let config = ServerConfig {
            bind_addr: "127.0.0.1:0".to_string(),
            app_name: "classroll".to_string(),
        };
        let mut server = ResourceServer::new(&config).unwrap();
        let addr = server.try_bind().await.unwrap();

        let (tx, rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let _ = server
                .run(async move {
                    let _ = rx.await;
                })
                .await;
        });

        Self {
            addr,
            _shutdown: tx,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn stores(&self) -> AppStores {
        AppStores::from_config(&client_config(&self.base_url())).unwrap()
    }
}
