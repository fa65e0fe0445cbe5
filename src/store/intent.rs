//! Lifecycle events applied to an [`EntityState`](super::EntityState).

use crate::entity::Entity;
use crate::mvi::Intent;

/// Intents dispatched by the entity store.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityIntent<E> {
    /// A List started.
    ListPending,

    /// The List that follows a successful write started.
    ///
    /// Unlike [`ListPending`](Self::ListPending) it leaves `update_success`
    /// alone so the navigation signal survives the refresh.
    RefreshPending,

    /// A List returned.
    ListFulfilled {
        entities: Vec<E>,
        total_items: u64,
    },

    /// A Get started.
    GetPending,

    /// A Get returned.
    GetFulfilled(E),

    /// A Create, Update, PartialUpdate or Delete started.
    WritePending,

    /// A Create, Update or PartialUpdate returned the saved record.
    WriteFulfilled(E),

    /// A Delete returned.
    DeleteFulfilled,

    /// Any operation failed.
    Rejected {
        message: String,
    },

    /// Clear the current record before showing a "new" form.
    Reset,
}

impl<E: Entity> Intent for EntityIntent<E> {}
