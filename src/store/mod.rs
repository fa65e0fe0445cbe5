//! Entity State Container.
//!
//! Tracks the lifecycle of list/detail/create/update/delete operations for
//! one entity type and exposes the flags a view renders from.
//!
//! # Architecture
//!
//! Uses MVI (Model-View-Intent):
//! - `state.rs` - [`EntityState`], the snapshot views read
//! - `intent.rs` - Pending/fulfilled/rejected lifecycle events
//! - `reducer.rs` - Pure state transitions
//! - `container.rs` - [`EntityStore`], which runs the remote calls and feeds the reducer

mod container;
mod intent;
mod reducer;
mod state;

pub use container::EntityStore;
pub use intent::EntityIntent;
pub use reducer::EntityReducer;
pub use state::EntityState;
