//! Model-View-Intent (MVI) primitives for the browse state.
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ QueryKey / ViewModel
//!    ↑                                   │
//!    └───────────────────────────────────┘
//! ```
//!
//! - **State**: Immutable value, replaced wholesale on every accepted intent
//! - **Intent**: User actions or system events
//! - **Reducer**: Pure, fallible transition `(&State, Intent) -> State`

mod intent;
mod reducer;
mod state;

pub use intent::Intent;
pub use reducer::Reducer;
pub use state::UiState;
