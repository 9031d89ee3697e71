//! Canonical query derivation.
//!
//! [`QueryBuilder`] maps browse state to a [`QueryKey`] (used for request
//! identity) and a [`CatalogRequest`] (what goes on the wire). Both are pure
//! functions of their input, which is what makes key-based de-duplication
//! and supersession sound.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::catalog::price::Price;
use crate::ui::browse::{FilterState, PageState};

/// Listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    PriceAsc,
    PriceDesc,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::Newest,
        SortKey::Oldest,
        SortKey::PriceAsc,
        SortKey::PriceDesc,
    ];

    /// Value of the `sort` query parameter.
    pub fn as_param(self) -> &'static str {
        match self {
            SortKey::Newest => "-created_at",
            SortKey::Oldest => "created_at",
            SortKey::PriceAsc => "price",
            SortKey::PriceDesc => "-price",
        }
    }

    /// Human-readable label for sort pickers.
    pub fn label(self) -> &'static str {
        match self {
            SortKey::Newest => "New products first",
            SortKey::Oldest => "Old products first",
            SortKey::PriceAsc => "Price, low to high",
            SortKey::PriceDesc => "Price, high to low",
        }
    }

    pub fn is_descending(self) -> bool {
        matches!(self, SortKey::Newest | SortKey::PriceDesc)
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort key '{0}' (expected newest, oldest, price-asc or price-desc)")]
pub struct ParseSortKeyError(pub String);

impl FromStr for SortKey {
    type Err = ParseSortKeyError;

    /// Accepts both the wire form (`-created_at`) and CLI names (`newest`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" | "-created_at" => Ok(SortKey::Newest),
            "oldest" | "created_at" => Ok(SortKey::Oldest),
            "price-asc" | "price_asc" | "price" => Ok(SortKey::PriceAsc),
            "price-desc" | "price_desc" | "-price" => Ok(SortKey::PriceDesc),
            _ => Err(ParseSortKeyError(s.to_string())),
        }
    }
}

/// Identity of one logical catalog request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub page: u32,
    pub sort: SortKey,
    pub min_price: Option<Price>,
    pub max_price: Option<Price>,
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&QueryBuilder::request(self).query_string())
    }
}

/// Wire-level request descriptor for `GET /products`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRequest {
    pub page: u32,
    pub sort: &'static str,
    pub price_from: Option<Price>,
    pub price_to: Option<Price>,
}

impl CatalogRequest {
    /// Query parameters in canonical order. Price bounds appear only when set.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string()), ("sort", self.sort.to_string())];
        if let Some(from) = self.price_from {
            pairs.push(("filter[price_from]", from.to_string()));
        }
        if let Some(to) = self.price_to {
            pairs.push(("filter[price_to]", to.to_string()));
        }
        pairs
    }

    /// Unencoded query string, e.g. `page=1&sort=-created_at`.
    pub fn query_string(&self) -> String {
        self.query_pairs()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }
}

pub struct QueryBuilder;

impl QueryBuilder {
    pub fn key(page: &PageState, sort: SortKey, filters: &FilterState) -> QueryKey {
        QueryKey {
            page: page.current_page(),
            sort,
            min_price: filters.min_price(),
            max_price: filters.max_price(),
        }
    }

    pub fn request(key: &QueryKey) -> CatalogRequest {
        CatalogRequest {
            page: key.page,
            sort: key.sort.as_param(),
            price_from: key.min_price,
            price_to: key.max_price,
        }
    }

    pub fn build(
        page: &PageState,
        sort: SortKey,
        filters: &FilterState,
    ) -> (QueryKey, CatalogRequest) {
        let key = Self::key(page, sort, filters);
        let request = Self::request(&key);
        (key, request)
    }
}
