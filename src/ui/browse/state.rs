//! Browse state: price filter, sort order and pagination.

use thiserror::Error;

use crate::catalog::{Price, QueryBuilder, QueryKey, SortKey};
use crate::ui::mvi::UiState;

/// Local rejections. Neither ever reaches the network and neither mutates
/// state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("Invalid price filter: {message}")]
    Validation { message: String },

    #[error("Page {page} is out of range{}", range_hint(.total_pages))]
    Range {
        page: u32,
        total_pages: Option<u32>,
    },
}

fn range_hint(total_pages: &Option<u32>) -> String {
    match total_pages {
        Some(total) => format!(" (1-{})", (*total).max(1)),
        None => " (pages start at 1)".to_string(),
    }
}

/// Optional price bounds. If both are set, `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterState {
    min_price: Option<Price>,
    max_price: Option<Price>,
}

impl FilterState {
    /// Validates raw bounds. Out-of-order bounds are rejected, never clamped.
    pub fn new(min_price: Option<f64>, max_price: Option<f64>) -> Result<Self, StateError> {
        let min_price = min_price.map(|v| parse_bound("minimum", v)).transpose()?;
        let max_price = max_price.map(|v| parse_bound("maximum", v)).transpose()?;

        if let (Some(min), Some(max)) = (min_price, max_price) {
            if min > max {
                return Err(StateError::Validation {
                    message: format!(
                        "minimum price {} cannot be greater than maximum price {}",
                        min, max
                    ),
                });
            }
        }

        Ok(Self {
            min_price,
            max_price,
        })
    }

    pub fn min_price(&self) -> Option<Price> {
        self.min_price
    }

    pub fn max_price(&self) -> Option<Price> {
        self.max_price
    }

    pub fn is_active(&self) -> bool {
        self.min_price.is_some() || self.max_price.is_some()
    }

    /// Inclusive range check used by the client-side fallback filter.
    pub fn contains(&self, price: f64) -> bool {
        let min_ok = self.min_price.map_or(true, |min| price >= min.value());
        let max_ok = self.max_price.map_or(true, |max| price <= max.value());
        min_ok && max_ok
    }

    /// Label for the active-filter chip, `None` when no bound is set.
    pub fn chip_label(&self) -> Option<String> {
        match (self.min_price, self.max_price) {
            (Some(min), Some(max)) => Some(format!("Price: ${} - ${}", min, max)),
            (Some(min), None) => Some(format!("Price: ${}", min)),
            (None, Some(max)) => Some(format!("Price: ${}", max)),
            (None, None) => None,
        }
    }
}

fn parse_bound(which: &str, value: f64) -> Result<Price, StateError> {
    Price::new(value).ok_or_else(|| StateError::Validation {
        message: format!("{} price must be a non-negative number, got {}", which, value),
    })
}

/// Current page plus the page count once the server has reported it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    current_page: u32,
    total_pages: Option<u32>,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: None,
        }
    }
}

impl PageState {
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> Option<u32> {
        self.total_pages
    }

    /// Same page count, back on page 1.
    pub(super) fn first(self) -> Self {
        Self {
            current_page: 1,
            ..self
        }
    }

    /// Back on page 1 with the page count unknown, for a query whose
    /// result set differs.
    pub(super) fn reset(self) -> Self {
        Self::default()
    }

    /// Page 1 is always reachable, even when the server reports zero pages.
    pub(super) fn goto(self, page: u32) -> Result<Self, StateError> {
        let out_of_range = page < 1
            || self
                .total_pages
                .is_some_and(|total| page > total.max(1));
        if out_of_range {
            return Err(StateError::Range {
                page,
                total_pages: self.total_pages,
            });
        }
        Ok(Self {
            current_page: page,
            ..self
        })
    }

    pub(super) fn with_total(self, total_pages: u32) -> Self {
        Self {
            total_pages: Some(total_pages),
            ..self
        }
    }
}

/// The single versioned state value driving the catalog query.
///
/// Every accepted intent produces a new value with a bumped `version`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BrowseState {
    pub(super) filters: FilterState,
    pub(super) sort: SortKey,
    pub(super) page: PageState,
    pub(super) version: u64,
}

impl UiState for BrowseState {}

impl BrowseState {
    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn page(&self) -> &PageState {
        &self.page
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn query_key(&self) -> QueryKey {
        QueryBuilder::key(&self.page, self.sort, &self.filters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_inverted_bounds() {
        let err = FilterState::new(Some(50.0), Some(20.0)).unwrap_err();
        assert!(matches!(err, StateError::Validation { .. }));
    }

    #[test]
    fn equal_bounds_allowed() {
        let filters = FilterState::new(Some(20.0), Some(20.0)).unwrap();
        assert!(filters.contains(20.0));
        assert!(!filters.contains(20.01));
    }

    #[test]
    fn rejects_negative_bound() {
        assert!(FilterState::new(Some(-1.0), None).is_err());
        assert!(FilterState::new(None, Some(f64::NAN)).is_err());
    }

    #[test]
    fn open_ended_ranges() {
        let only_min = FilterState::new(Some(10.0), None).unwrap();
        assert!(only_min.contains(10.0));
        assert!(only_min.contains(10_000.0));
        assert!(!only_min.contains(9.99));

        let none = FilterState::default();
        assert!(!none.is_active());
        assert!(none.contains(0.0));
    }

    #[test]
    fn chip_labels() {
        let both = FilterState::new(Some(10.0), Some(100.0)).unwrap();
        assert_eq!(both.chip_label().unwrap(), "Price: $10 - $100");
        let max = FilterState::new(None, Some(75.5)).unwrap();
        assert_eq!(max.chip_label().unwrap(), "Price: $75.5");
        assert!(FilterState::default().chip_label().is_none());
    }

    #[test]
    fn page_bounds() {
        let page = PageState::default();
        assert!(page.goto(0).is_err());
        assert_eq!(page.goto(40).unwrap().current_page(), 40);

        let known = page.with_total(3);
        assert!(known.goto(3).is_ok());
        assert_eq!(
            known.goto(4).unwrap_err(),
            StateError::Range {
                page: 4,
                total_pages: Some(3)
            }
        );
        assert!(page.with_total(0).goto(1).is_ok());
    }

    #[test]
    fn range_error_message() {
        let err = StateError::Range {
            page: 9,
            total_pages: Some(4),
        };
        assert_eq!(err.to_string(), "Page 9 is out of range (1-4)");
    }
}
