//! TOML configuration for the catalog client.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{CatalogConfig, Config};
