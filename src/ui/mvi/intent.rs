//! Base trait for intents in MVI architecture.

/// Marker trait for intent objects.
///
/// Intents represent:
/// - User actions (pick a sort, apply a price range, change page)
/// - System events (server reported the page count)
pub trait Intent: Send + 'static {}
