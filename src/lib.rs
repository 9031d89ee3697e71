//! Storefront catalog engine.
//!
//! Turns interactive filter/sort/page state into a single catalog query,
//! keeps at most one authoritative request in flight, and reconciles the
//! response into a view model that always matches the latest user intent.
//!
//! ```text
//! BrowseIntent ──→ BrowseReducer ──→ QueryKey ──→ FetchCoordinator
//!                                                      │
//!        Renderer ←── ViewModel ←── ResultReconciler ←─┘
//! ```

pub mod catalog;
pub mod config;
pub mod engine;
pub mod fetch;
pub mod logging;
pub mod repl;
pub mod session;
pub mod ui;

pub use catalog::{CatalogClient, CatalogError, HttpCatalogClient, Product, QueryKey, SortKey};
pub use engine::{CatalogEngine, EngineCommand, EngineHandle, Frame};
pub use ui::browse::{BrowseIntent, BrowseState, StateError};
pub use ui::view::{ErrorKind, ViewModel};
