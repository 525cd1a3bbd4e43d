//! Displayed-collection state owned by the synchronizer

use crate::api::{SortField, SortOrder};
use crate::models::Quote;

/// What the displayed list currently reflects
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewMode {
    /// Paginated listing of the whole collection
    Browsing,
    /// A query is typed but its debounce has not fired yet
    Preparing,
    /// Displaying a single-page search result
    Searching,
    /// A bulk operation is rewriting the collection
    Importing,
}

/// The synchronizer's owned state.
///
/// `cursor` and `has_more` are meaningful only while browsing; search
/// results are a single page and never paginate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewState {
    pub mode: ViewMode,
    /// Quotes currently displayed, in backend order
    pub quotes: Vec<Quote>,
    /// Continuation token for the next browse page
    pub cursor: Option<String>,
    pub has_more: bool,
    /// Collection-wide count when the backend supplies one
    pub total_count: Option<u64>,
    pub sort: SortField,
    pub ascending: bool,
    /// The search string currently authoritative for displayed results,
    /// distinct from the raw keystroke buffer
    pub active_query: String,
    /// A fetch is in flight
    pub loading: bool,
    /// Last fetch error, cleared by the next successful fetch
    pub error: Option<String>,
}

impl ViewState {
    /// Fresh state: browsing, newest first
    #[must_use]
    pub fn new() -> Self {
        Self {
            mode: ViewMode::Browsing,
            quotes: Vec::new(),
            cursor: None,
            has_more: false,
            total_count: None,
            sort: SortField::CreatedAt,
            ascending: false,
            active_query: String::new(),
            loading: false,
            error: None,
        }
    }

    /// Current sort direction as a wire value
    #[must_use]
    pub const fn order(&self) -> SortOrder {
        SortOrder::from_ascending(self.ascending)
    }

    /// Whether displayed quotes come from a search rather than browsing
    #[must_use]
    pub fn is_search_active(&self) -> bool {
        !self.active_query.is_empty()
    }

    /// Apply a tap on a sort field: tapping the active field flips the
    /// direction, choosing a new field resets to ascending.
    pub fn apply_sort_tap(&mut self, field: SortField) {
        if self.sort == field {
            self.ascending = !self.ascending;
        } else {
            self.sort = field;
            self.ascending = true;
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_browses_newest_first() {
        let state = ViewState::new();
        assert_eq!(state.mode, ViewMode::Browsing);
        assert_eq!(state.sort, SortField::CreatedAt);
        assert!(!state.ascending);
        assert_eq!(state.order(), SortOrder::Desc);
        assert!(!state.is_search_active());
    }

    #[test]
    fn test_sort_tap_same_field_flips_direction() {
        let mut state = ViewState::new();
        state.apply_sort_tap(SortField::CreatedAt);
        assert!(state.ascending);
        state.apply_sort_tap(SortField::CreatedAt);
        assert!(!state.ascending);
    }

    #[test]
    fn test_sort_tap_new_field_resets_ascending() {
        let mut state = ViewState::new();
        state.apply_sort_tap(SortField::Author);
        assert_eq!(state.sort, SortField::Author);
        assert!(state.ascending);
        state.apply_sort_tap(SortField::Author);
        assert!(!state.ascending);
        state.apply_sort_tap(SortField::Text);
        assert_eq!(state.sort, SortField::Text);
        assert!(state.ascending);
    }
}
