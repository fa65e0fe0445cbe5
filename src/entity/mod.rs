//! REST-managed record types.
//!
//! Every record type exposed by the backend implements [`Entity`]. The trait
//! carries the resource naming used to build URLs and the small amount of
//! record behaviour both the client store and the reference server need.

mod class_entity;
mod clean;
mod student;

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::Serialize;

pub use class_entity::ClassEntity;
pub use clean::{clean_record, clean_value};
pub use student::Student;

/// Backend-assigned record identifier.
pub type EntityId = i64;

/// A record type managed through a REST resource.
///
/// `Default` must produce the empty record shown on a "new" form.
pub trait Entity:
    Serialize + DeserializeOwned + Clone + PartialEq + Default + Debug + Send + Sync + 'static
{
    /// Entity name used in logs and alert headers (e.g. `classEntity`).
    const NAME: &'static str;

    /// Plural kebab-case resource segment (e.g. `class-entities`).
    const RESOURCE: &'static str;

    /// The backend-assigned id, `None` for a record not yet persisted.
    fn id(&self) -> Option<EntityId>;

    /// Assign the id. Only the backend does this.
    fn set_id(&mut self, id: EntityId);

    /// Overwrite every field that is present in `patch`, leaving the rest.
    ///
    /// The id is never touched.
    fn merge_patch(&mut self, patch: Self);

    /// Whether this record has not been persisted yet.
    fn is_new(&self) -> bool {
        self.id().is_none()
    }
}

/// Overwrite `target` with `source` when `source` holds a value.
pub(crate) fn patch_field<T>(target: &mut Option<T>, source: Option<T>) {
    if source.is_some() {
        *target = source;
    }
}
