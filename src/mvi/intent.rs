//! Base trait for intents in MVI architecture.

/// Marker trait for intent objects.
///
/// Intents represent:
/// - A request starting (pending)
/// - A response arriving (fulfilled / rejected)
/// - Local user actions such as resetting a form
///
/// Intents are processed by reducers to produce new states.
pub trait Intent: Send + 'static {}
