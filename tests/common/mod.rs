//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_catalog;

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use storefront::catalog::{
    CatalogClient, CatalogError, CatalogRequest, PageMeta, Price, Product, ProductPage, QueryKey,
    SortKey,
};
use tempfile::TempDir;
use tokio::sync::oneshot;

type Reply = Result<ProductPage, CatalogError>;

/// Catalog client whose responses are released by the test, one query at a
/// time, so arrival order can be scripted.
#[derive(Clone, Default)]
pub struct ScriptedCatalog {
    inner: Arc<Mutex<ScriptState>>,
}

#[derive(Default)]
struct ScriptState {
    calls: Vec<String>,
    pending: HashMap<String, VecDeque<oneshot::Sender<Reply>>>,
}

impl ScriptedCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Query strings of every request received so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().calls.clone()
    }

    /// Wait until at least `count` requests were received.
    pub async fn wait_for_calls(&self, count: usize) -> Vec<String> {
        let start = std::time::Instant::now();
        loop {
            let calls = self.calls();
            if calls.len() >= count {
                return calls;
            }
            assert!(
                start.elapsed() < Duration::from_secs(2),
                "expected {} calls, got {:?}",
                count,
                calls
            );
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    /// Release the oldest pending request for `query`.
    pub fn resolve(&self, query: &str, reply: Reply) {
        let sender = self
            .inner
            .lock()
            .pending
            .get_mut(query)
            .and_then(|queue| queue.pop_front())
            .unwrap_or_else(|| panic!("no pending request for '{}'", query));
        let _ = sender.send(reply);
    }
}

#[async_trait]
impl CatalogClient for ScriptedCatalog {
    async fn fetch_page(&self, request: &CatalogRequest) -> Result<ProductPage, CatalogError> {
        let query = request.query_string();
        let (tx, rx) = oneshot::channel();
        {
            let mut state = self.inner.lock();
            state.calls.push(query.clone());
            state.pending.entry(query).or_default().push_back(tx);
        }
        rx.await
            .unwrap_or_else(|_| Err(CatalogError::Decode("scripted reply dropped".to_string())))
    }
}

// -- Fixtures -----------------------------------------------------------------

pub fn product(id: i64, price: f64, release_year: Option<i32>) -> Product {
    Product {
        id,
        name: format!("Product {}", id),
        price,
        release_year,
        cover_image_url: None,
    }
}

/// A page with complete server metadata.
pub fn page(products: Vec<Product>, current_page: u32, last_page: u32, total: u64) -> ProductPage {
    let count = products.len() as u32;
    let from = if count == 0 {
        None
    } else {
        Some((current_page - 1) * 10 + 1)
    };
    ProductPage {
        meta: Some(PageMeta {
            current_page: Some(current_page),
            last_page: Some(last_page),
            from,
            to: from.map(|f| f + count - 1),
            total: Some(total),
        }),
        data: products,
    }
}

pub fn key(page: u32, sort: SortKey, min: Option<f64>, max: Option<f64>) -> QueryKey {
    QueryKey {
        page,
        sort,
        min_price: min.and_then(Price::new),
        max_price: max.and_then(Price::new),
    }
}

/// Create a temporary config file with the given TOML content.
pub fn temp_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, content).expect("Failed to write config");
    (temp_dir, config_path)
}
