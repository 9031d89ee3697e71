use crate::catalog::SortKey;
use crate::ui::mvi::Intent;

#[derive(Debug, Clone, PartialEq)]
pub enum BrowseIntent {
    /// Apply a price range. Raw values are validated by the reducer.
    SetFilters {
        min_price: Option<f64>,
        max_price: Option<f64>,
    },
    ClearFilters,
    SetSort(SortKey),
    SetPage(u32),
    NextPage,
    PrevPage,
    /// Re-issue the current query without changing it.
    Refresh,
    /// Server reported `last_page`. Does not change the query.
    PagesKnown(u32),
}

impl BrowseIntent {
    /// Whether the intent comes from the user and should trigger a fetch.
    pub fn issues_query(&self) -> bool {
        !matches!(self, BrowseIntent::PagesKnown(_))
    }
}

impl Intent for BrowseIntent {}
