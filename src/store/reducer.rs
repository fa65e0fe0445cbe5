//! Reducer for entity state transitions.

use std::marker::PhantomData;

use crate::entity::Entity;
use crate::mvi::Reducer;

use super::intent::EntityIntent;
use super::state::EntityState;

/// Reducer shared by every entity type.
pub struct EntityReducer<E>(PhantomData<fn() -> E>);

impl<E: Entity> Reducer for EntityReducer<E> {
    type State = EntityState<E>;
    type Intent = EntityIntent<E>;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            EntityIntent::ListPending | EntityIntent::GetPending => EntityState {
                loading: true,
                update_success: false,
                error_message: None,
                ..state
            },

            EntityIntent::RefreshPending => EntityState {
                loading: true,
                ..state
            },

            EntityIntent::ListFulfilled {
                entities,
                total_items,
            } => EntityState {
                loading: false,
                entities,
                total_items,
                ..state
            },

            EntityIntent::GetFulfilled(entity) => EntityState {
                loading: false,
                entity,
                ..state
            },

            EntityIntent::WritePending => EntityState {
                updating: true,
                update_success: false,
                error_message: None,
                ..state
            },

            EntityIntent::WriteFulfilled(entity) => EntityState {
                updating: false,
                loading: false,
                update_success: true,
                entity,
                ..state
            },

            EntityIntent::DeleteFulfilled => EntityState {
                updating: false,
                update_success: true,
                entity: E::default(),
                ..state
            },

            // Entities and the current record are left as they were.
            EntityIntent::Rejected { message } => EntityState {
                loading: false,
                updating: false,
                update_success: false,
                error_message: Some(message),
                ..state
            },

            EntityIntent::Reset => EntityState::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::ClassEntity;

    type R = EntityReducer<ClassEntity>;

    fn record(id: i64, name: &str) -> ClassEntity {
        ClassEntity {
            id: Some(id),
            class_id: Some(id as i32 * 10),
            name: Some(name.to_string()),
        }
    }

    fn failed() -> EntityState<ClassEntity> {
        EntityState {
            error_message: Some("boom".into()),
            update_success: true,
            ..Default::default()
        }
    }

    #[test]
    fn list_pending_sets_loading_and_clears_flags() {
        let state = R::reduce(failed(), EntityIntent::ListPending);
        assert!(state.loading);
        assert!(!state.update_success);
        assert_eq!(state.error_message, None);
    }

    #[test]
    fn get_pending_matches_list_pending() {
        let state = R::reduce(failed(), EntityIntent::GetPending);
        assert_eq!(state, R::reduce(failed(), EntityIntent::ListPending));
    }

    #[test]
    fn refresh_pending_keeps_update_success() {
        let saved = R::reduce(
            EntityState::default(),
            EntityIntent::WriteFulfilled(record(1, "a")),
        );
        let state = R::reduce(saved, EntityIntent::RefreshPending);
        assert!(state.loading);
        assert!(state.update_success);
    }

    #[test]
    fn list_fulfilled_replaces_page() {
        let state = EntityState {
            loading: true,
            entities: vec![record(9, "old")],
            total_items: 1,
            ..Default::default()
        };
        let state = R::reduce(
            state,
            EntityIntent::ListFulfilled {
                entities: vec![record(1, "a"), record(2, "b")],
                total_items: 12,
            },
        );
        assert!(!state.loading);
        assert_eq!(state.entities, vec![record(1, "a"), record(2, "b")]);
        assert_eq!(state.total_items, 12);
    }

    #[test]
    fn get_fulfilled_replaces_entity() {
        let state = R::reduce(
            EntityState {
                loading: true,
                ..Default::default()
            },
            EntityIntent::GetFulfilled(record(4, "x")),
        );
        assert!(!state.loading);
        assert_eq!(state.entity, record(4, "x"));
    }

    #[test]
    fn write_pending_sets_updating_and_clears_flags() {
        let state = R::reduce(failed(), EntityIntent::WritePending);
        assert!(state.updating);
        assert!(!state.update_success);
        assert_eq!(state.error_message, None);
    }

    #[test]
    fn write_fulfilled_signals_success() {
        let state = EntityState {
            updating: true,
            loading: true,
            ..Default::default()
        };
        let state = R::reduce(state, EntityIntent::WriteFulfilled(record(5, "y")));
        assert!(!state.updating);
        assert!(!state.loading);
        assert!(state.update_success);
        assert_eq!(state.entity, record(5, "y"));
    }

    #[test]
    fn delete_fulfilled_clears_entity() {
        let state = EntityState {
            updating: true,
            entity: record(5, "y"),
            ..Default::default()
        };
        let state = R::reduce(state, EntityIntent::DeleteFulfilled);
        assert!(!state.updating);
        assert!(state.update_success);
        assert_eq!(state.entity, ClassEntity::default());
    }

    #[test]
    fn rejected_resets_spinners_and_keeps_data() {
        let state = EntityState {
            loading: true,
            updating: true,
            entity: record(1, "kept"),
            entities: vec![record(1, "kept")],
            ..Default::default()
        };
        let state = R::reduce(
            state,
            EntityIntent::Rejected {
                message: "HTTP 500: Internal Server Error".into(),
            },
        );
        assert!(!state.loading);
        assert!(!state.updating);
        assert!(!state.update_success);
        assert_eq!(state.error_message(), Some("HTTP 500: Internal Server Error"));
        assert_eq!(state.entity, record(1, "kept"));
        assert_eq!(state.entities.len(), 1);
    }

    #[test]
    fn reset_always_yields_empty_record() {
        let state = EntityState {
            entity: record(1, "stale"),
            update_success: true,
            ..Default::default()
        };
        let state = R::reduce(state, EntityIntent::Reset);
        assert_eq!(state.entity, ClassEntity::default());
        assert!(!state.update_success);

        let state = R::reduce(state, EntityIntent::Reset);
        assert_eq!(state.entity, ClassEntity::default());
    }
}
