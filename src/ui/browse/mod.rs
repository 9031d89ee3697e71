//! Browse feature module: the filter/sort/page state slice.
//!
//! - `state.rs` - Versioned state value and its invariants
//! - `intent.rs` - User actions and server-reported page counts
//! - `reducer.rs` - Validated transitions (pure, no side effects)

mod intent;
mod reducer;
mod state;

pub use intent::BrowseIntent;
pub use reducer::BrowseReducer;
pub use state::{BrowseState, FilterState, PageState, StateError};
