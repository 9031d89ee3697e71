//! Catalog API surface: product records, query derivation, HTTP client,
//! and response reconciliation.

mod client;
mod error;
mod price;
mod product;
pub mod query;
pub mod reconcile;

pub use client::{CatalogClient, HttpCatalogClient};
pub use error::CatalogError;
pub use price::Price;
pub use product::{PageMeta, Product, ProductPage};
pub use query::{CatalogRequest, ParseSortKeyError, QueryBuilder, QueryKey, SortKey};
pub use reconcile::{ReconcileMode, ResultReconciler};
