//! Per-entity-type view state.

use crate::entity::{Entity, EntityId};
use crate::mvi::UiState;

/// Everything a list, detail or edit view of one entity type renders from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EntityState<E> {
    /// Last successfully fetched page, in server order.
    pub entities: Vec<E>,
    /// Record being viewed or edited; the empty record for a "new" form.
    pub entity: E,
    /// Total reported by the backend for pagination.
    pub total_items: u64,
    /// A List or Get is in flight.
    pub loading: bool,
    /// A Create/Update/PartialUpdate/Delete is in flight.
    pub updating: bool,
    /// One-shot: the last write completed. Views navigate away on it.
    pub update_success: bool,
    /// Failure of the last operation, cleared when a new one starts.
    pub error_message: Option<String>,
}

impl<E: Entity> UiState for EntityState<E> {}

impl<E: Entity> EntityState<E> {
    /// Whether any request is in flight.
    pub fn is_busy(&self) -> bool {
        self.loading || self.updating
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Whether the current page holds a record with `id`.
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.iter().any(|e| e.id() == Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::ClassEntity;

    #[test]
    fn default_is_empty() {
        let state = EntityState::<ClassEntity>::default();
        assert!(state.entities.is_empty());
        assert_eq!(state.entity, ClassEntity::default());
        assert_eq!(state.total_items, 0);
        assert!(!state.is_busy());
        assert!(!state.update_success);
        assert_eq!(state.error_message(), None);
    }

    #[test]
    fn contains_matches_ids() {
        let state = EntityState {
            entities: vec![ClassEntity {
                id: Some(3),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert!(state.contains(3));
        assert!(!state.contains(4));
    }
}
