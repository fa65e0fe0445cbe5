//! Composition root: one store per entity type, sharing one HTTP client.

use crate::api::{build_http_client, ApiError, ResourceClient};
use crate::config::Config;
use crate::entity::{ClassEntity, Student};
use crate::store::EntityStore;

pub type ClassEntityStore = EntityStore<ClassEntity, ResourceClient<ClassEntity>>;
pub type StudentStore = EntityStore<Student, ResourceClient<Student>>;

/// Every entity store the application owns.
///
/// Built once at startup and passed by reference to whatever needs it.
pub struct AppStores {
    pub class_entities: ClassEntityStore,
    pub students: StudentStore,
}

impl AppStores {
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let http = build_http_client(&config.api)?;
        let base_url = &config.api.base_url;
        Ok(Self {
            class_entities: EntityStore::new(
                ResourceClient::new(http.clone(), base_url),
                config.store.clone(),
            ),
            students: EntityStore::new(ResourceClient::new(http, base_url), config.store.clone()),
        })
    }
}
