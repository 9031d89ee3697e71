//! Reducer trait for MVI architecture.

use super::intent::Intent;
use super::state::UiState;

/// Reducer transforms state based on intents.
///
/// The reducer is the only place where state transitions happen. Invalid
/// intents are rejected with an error and the caller keeps the old state,
/// so a rejected input can never leave state half-applied.
pub trait Reducer {
    /// The state type this reducer operates on.
    type State: UiState;

    /// The intent type this reducer handles.
    type Intent: Intent;

    /// Why an intent was rejected.
    type Error: std::error::Error;

    /// Process an intent and return the new state.
    ///
    /// Must be pure: no I/O, same output for the same input.
    fn reduce(state: &Self::State, intent: Self::Intent) -> Result<Self::State, Self::Error>;
}
