use crate::ui::browse::intent::BrowseIntent;
use crate::ui::browse::state::{BrowseState, FilterState, StateError};
use crate::ui::mvi::Reducer;

/// Transitions for the browse state.
///
/// Filter and sort changes always land back on page 1, so a new filter can
/// never be paired with a stale page number. A filter change also forgets
/// the page count, which belonged to the old result set.
pub struct BrowseReducer;

impl Reducer for BrowseReducer {
    type State = BrowseState;
    type Intent = BrowseIntent;
    type Error = StateError;

    fn reduce(state: &Self::State, intent: Self::Intent) -> Result<Self::State, Self::Error> {
        let next = match intent {
            BrowseIntent::SetFilters {
                min_price,
                max_price,
            } => BrowseState {
                filters: FilterState::new(min_price, max_price)?,
                page: state.page.reset(),
                ..state.clone()
            },
            BrowseIntent::ClearFilters => BrowseState {
                filters: FilterState::default(),
                page: state.page.reset(),
                ..state.clone()
            },
            BrowseIntent::SetSort(sort) => BrowseState {
                sort,
                page: state.page.first(),
                ..state.clone()
            },
            BrowseIntent::SetPage(page) => BrowseState {
                page: state.page.goto(page)?,
                ..state.clone()
            },
            BrowseIntent::NextPage => BrowseState {
                page: state.page.goto(state.page.current_page().saturating_add(1))?,
                ..state.clone()
            },
            BrowseIntent::PrevPage => BrowseState {
                page: state.page.goto(state.page.current_page().saturating_sub(1))?,
                ..state.clone()
            },
            BrowseIntent::Refresh => state.clone(),
            BrowseIntent::PagesKnown(total) => BrowseState {
                page: state.page.with_total(total),
                ..state.clone()
            },
        };

        Ok(BrowseState {
            version: state.version + 1,
            ..next
        })
    }
}
