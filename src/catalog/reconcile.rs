//! Response reconciliation.
//!
//! A committed response normally passes through untouched: the server
//! already filtered and sorted it for exactly the current query. The
//! client-side re-filter/re-sort below is a fallback only, used when the
//! caller cannot trust server-side filtering or when the response was
//! issued for a different key than the one now current.

use std::cmp::Ordering;

use crate::catalog::product::{PageMeta, Product, ProductPage};
use crate::catalog::query::{QueryKey, SortKey};
use crate::ui::browse::{BrowseState, FilterState};
use crate::ui::view::{Meta, ViewModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReconcileMode {
    /// Server order and pagination are authoritative for matching keys.
    #[default]
    TrustServer,
    /// Always re-filter and re-sort on the client.
    ClientFallback,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResultReconciler {
    mode: ReconcileMode,
}

impl ResultReconciler {
    pub fn new(mode: ReconcileMode) -> Self {
        Self { mode }
    }

    /// Produce the view model for a response issued for `issued`, given the
    /// state as it is now.
    pub fn reconcile(&self, issued: &QueryKey, page: ProductPage, current: &BrowseState) -> ViewModel {
        let server_meta = page.meta.unwrap_or_default();
        let current_key = current.query_key();

        if self.mode == ReconcileMode::TrustServer && *issued == current_key {
            let meta = server_view_meta(&server_meta, issued.page, page.data.len());
            return ViewModel {
                products: page.data,
                meta,
                is_loading: false,
                error_kind: None,
            };
        }

        let received = page.data.len();
        let products = Self::fallback(page.data, current.filters(), current.sort());
        tracing::debug!(
            issued = %issued,
            current = %current_key,
            received,
            kept = products.len(),
            "applied client-side fallback"
        );

        let mut meta = server_view_meta(&server_meta, issued.page, received);
        if products.is_empty() {
            meta.from = 0;
            meta.to = 0;
        } else {
            let kept = u32::try_from(products.len()).unwrap_or(u32::MAX);
            meta.from = meta.from.max(1);
            meta.to = meta.from.saturating_add(kept - 1);
        }

        ViewModel {
            products,
            meta,
            is_loading: false,
            error_kind: None,
        }
    }

    /// Client-side filter by price bounds, then a deterministic sort.
    pub fn fallback(products: Vec<Product>, filters: &FilterState, sort: SortKey) -> Vec<Product> {
        let mut kept: Vec<Product> = products
            .into_iter()
            .filter(|p| filters.contains(p.price))
            .collect();
        Self::sort_products(&mut kept, sort);
        kept
    }

    pub fn sort_products(products: &mut [Product], sort: SortKey) {
        products.sort_by(|a, b| Self::compare(a, b, sort));
    }

    /// Total order: primary key, then `id` in the same direction.
    ///
    /// Date sorts use the release year (missing year sorts as 0) since the
    /// listing carries no creation timestamp.
    pub fn compare(a: &Product, b: &Product, sort: SortKey) -> Ordering {
        let primary = match sort {
            SortKey::Newest | SortKey::Oldest => {
                a.release_year.unwrap_or(0).cmp(&b.release_year.unwrap_or(0))
            }
            SortKey::PriceAsc | SortKey::PriceDesc => a.price.total_cmp(&b.price),
        };
        let ordering = primary.then_with(|| a.id.cmp(&b.id));
        if sort.is_descending() {
            ordering.reverse()
        } else {
            ordering
        }
    }
}

/// Fill gaps in server metadata. A missing `from`/`to` is derived from the
/// page number assuming full pages of `count` items.
fn server_view_meta(meta: &PageMeta, issued_page: u32, count: usize) -> Meta {
    let count = u32::try_from(count).unwrap_or(u32::MAX);
    let current_page = meta.current_page.unwrap_or(issued_page);
    // Server values are untrusted; saturate rather than overflow.
    let from = match meta.from {
        Some(from) => from,
        None if count > 0 => current_page
            .saturating_sub(1)
            .saturating_mul(count)
            .saturating_add(1),
        None => 0,
    };
    let to = match meta.to {
        Some(to) => to,
        None if count > 0 => from.saturating_add(count - 1),
        None => 0,
    };

    Meta {
        from,
        to,
        total: meta.total.unwrap_or(u64::from(count)),
        current_page,
        total_pages: meta.last_page.unwrap_or(0),
    }
}
