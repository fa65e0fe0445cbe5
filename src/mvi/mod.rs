//! Model-View-Intent (MVI) primitives.
//!
//! Every entity store is driven through these traits so that all state
//! transitions live in one pure function.
//!
//! # Architecture
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ View
//!    ↑                              │
//!    └──────────────────────────────┘
//! ```
//!
//! - **State**: Immutable snapshot a view renders from
//! - **Intent**: Operation lifecycle events (pending, fulfilled, rejected)
//! - **Reducer**: Pure function that transforms state based on intents

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::UiState;
