//! Generation-stamped fetch coordination
//!
//! Fetch issuance and response application are separate steps: every fetch
//! gets a [`FetchTicket`] stamped with the generation current at issue
//! time, and a response only mutates state when its ticket generation is
//! still current. A superseded response is discarded silently, which is a
//! correct outcome rather than an error.

use tracing::debug;

use crate::api::{QuoteApi, QuotePage, SortField};
use crate::error::ApiError;
use crate::models::Quote;

use super::state::{ViewMode, ViewState};

/// What kind of fetch a ticket was issued for
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FetchKind {
    /// Replace the list with a browse page
    Browse,
    /// Append a browse page
    LoadMore,
}

/// Stamp handed out when a fetch is issued; required to apply its response
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    kind: FetchKind,
}

impl FetchTicket {
    /// Generation this ticket was issued under
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

/// Outcome of applying a completed fetch or running a transition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    /// State now reflects the response
    Updated,
    /// Response was superseded by a newer fetch and discarded
    Stale,
    /// Error recorded in state; displayed quotes untouched
    Failed,
    /// Session-fatal failure; the embedder should re-authenticate
    Unauthenticated,
    /// Transition preconditions not met; nothing was issued
    Skipped,
}

/// Reaction required after a query edit
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryEdit {
    /// Non-empty query: arm the debounce timer
    Debounce,
    /// Query cleared: reload straight into browsing
    ReloadBrowse,
}

/// State machine combining search, sort, and pagination over one client.
///
/// Network calls issued through the async drivers are serialized; the
/// generation stamp still guards every application so an embedder driving
/// fetches concurrently gets last-request-wins semantics without
/// cancelling transport.
pub struct CollectionView<C> {
    client: C,
    state: ViewState,
    generation: u64,
    /// Raw keystroke buffer, authoritative only once the debounce fires
    pending_query: String,
    page_size: usize,
}

impl<C> CollectionView<C> {
    /// Wrap a client with fresh view state
    pub fn new(client: C, page_size: usize) -> Self {
        Self {
            client,
            state: ViewState::new(),
            generation: 0,
            pending_query: String::new(),
            page_size,
        }
    }

    /// Current view state
    #[must_use]
    pub const fn state(&self) -> &ViewState {
        &self.state
    }

    /// Generation of the most recently issued fetch
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Latest edited query, not yet committed by a debounce
    #[must_use]
    pub fn pending_query(&self) -> &str {
        &self.pending_query
    }

    /// Record a keystroke-level query edit.
    ///
    /// A non-empty trimmed query enters the preparing sub-state and asks
    /// the caller to (re)arm the 500 ms debounce. An empty query clears
    /// the search entirely; the caller should reload into browsing.
    pub fn note_query_edited(&mut self, raw: &str) -> QueryEdit {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            self.pending_query.clear();
            self.state.active_query.clear();
            QueryEdit::ReloadBrowse
        } else {
            self.pending_query = trimmed.to_string();
            self.state.mode = ViewMode::Preparing;
            QueryEdit::Debounce
        }
    }

    /// Flip or reset the sort; the caller must re-issue a fetch
    pub fn tap_sort(&mut self, field: SortField) {
        self.state.apply_sort_tap(field);
    }

    /// Set the sort outright, bypassing tap semantics
    pub fn set_sort(&mut self, field: SortField, ascending: bool) {
        self.state.sort = field;
        self.state.ascending = ascending;
    }

    /// Mark the view as owned by a running bulk operation
    pub fn mark_importing(&mut self) {
        self.state.mode = ViewMode::Importing;
    }

    /// Issue a first-page browse fetch, clearing any active search
    pub fn begin_browse(&mut self) -> FetchTicket {
        self.generation += 1;
        self.state.mode = ViewMode::Browsing;
        self.state.active_query.clear();
        self.state.cursor = None;
        self.state.loading = true;
        self.state.error = None;
        FetchTicket {
            generation: self.generation,
            kind: FetchKind::Browse,
        }
    }

    /// Issue a search fetch for the given query
    pub fn begin_search(&mut self, query: &str) -> FetchTicket {
        self.generation += 1;
        self.state.mode = ViewMode::Searching;
        self.state.active_query = query.trim().to_string();
        self.state.cursor = None;
        self.state.has_more = false;
        self.state.loading = true;
        self.state.error = None;
        FetchTicket {
            generation: self.generation,
            kind: FetchKind::Browse,
        }
    }

    /// Issue a next-page fetch, or `None` when the transition is not
    /// allowed: only while browsing without an active query, with a
    /// cursor, more pages reported, and no fetch already in flight.
    pub fn begin_load_more(&mut self) -> Option<FetchTicket> {
        if self.state.mode != ViewMode::Browsing
            || self.state.is_search_active()
            || !self.state.has_more
            || self.state.loading
            || self.state.cursor.is_none()
        {
            return None;
        }
        self.generation += 1;
        self.state.loading = true;
        self.state.error = None;
        Some(FetchTicket {
            generation: self.generation,
            kind: FetchKind::LoadMore,
        })
    }

    /// Apply a completed browse/load-more fetch
    pub fn apply_page(
        &mut self,
        ticket: &FetchTicket,
        result: Result<QuotePage, ApiError>,
    ) -> Applied {
        if ticket.generation != self.generation {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale page response"
            );
            return Applied::Stale;
        }
        match result {
            Ok(page) => {
                match ticket.kind {
                    FetchKind::Browse => self.state.quotes = page.quotes,
                    FetchKind::LoadMore => self.state.quotes.extend(page.quotes),
                }
                self.state.cursor = page.next_cursor;
                self.state.has_more = page.has_more;
                self.state.total_count = page.total_count;
                self.state.loading = false;
                self.state.error = None;
                Applied::Updated
            }
            Err(error) => self.record_error(&error),
        }
    }

    /// Apply a completed search fetch
    pub fn apply_search(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Vec<Quote>, ApiError>,
    ) -> Applied {
        if ticket.generation != self.generation {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale search response"
            );
            return Applied::Stale;
        }
        match result {
            Ok(quotes) => {
                self.state.quotes = quotes;
                self.state.cursor = None;
                self.state.has_more = false;
                self.state.loading = false;
                self.state.error = None;
                Applied::Updated
            }
            Err(error) => self.record_error(&error),
        }
    }

    fn record_error(&mut self, error: &ApiError) -> Applied {
        self.state.loading = false;
        self.state.error = Some(error.to_string());
        if error.is_session_fatal() {
            Applied::Unauthenticated
        } else {
            Applied::Failed
        }
    }
}

impl<C: QuoteApi> CollectionView<C> {
    /// Fetch the first browse page, replacing displayed quotes
    pub async fn browse_first_page(&mut self) -> Applied {
        let ticket = self.begin_browse();
        let sort = self.state.sort;
        let order = self.state.order();
        let result = self.client.list(sort, order, self.page_size, None).await;
        self.apply_page(&ticket, result)
    }

    /// Run a search immediately, bypassing the debounce
    pub async fn submit_query(&mut self, query: &str) -> Applied {
        let trimmed = query.trim().to_string();
        if trimmed.is_empty() {
            return self.browse_first_page().await;
        }
        let ticket = self.begin_search(&trimmed);
        let sort = self.state.sort;
        let order = self.state.order();
        let result = self
            .client
            .search(&trimmed, sort, order, self.page_size)
            .await;
        self.apply_search(&ticket, result)
    }

    /// Commit the latest pending edit once its debounce has elapsed
    pub async fn commit_pending_query(&mut self) -> Applied {
        if self.pending_query.is_empty() {
            return Applied::Skipped;
        }
        let query = self.pending_query.clone();
        self.submit_query(&query).await
    }

    /// Fetch the next browse page and append it
    pub async fn load_more(&mut self) -> Applied {
        let Some(ticket) = self.begin_load_more() else {
            return Applied::Skipped;
        };
        let sort = self.state.sort;
        let order = self.state.order();
        let cursor = self.state.cursor.clone();
        let result = self
            .client
            .list(sort, order, self.page_size, cursor.as_deref())
            .await;
        self.apply_page(&ticket, result)
    }

    /// Change the sort and re-issue the fetch for the current data source
    pub async fn change_sort(&mut self, field: SortField) -> Applied {
        self.tap_sort(field);
        self.reload().await
    }

    /// Full reload respecting the current mode: re-search when a query is
    /// active, first browse page otherwise. Also the refresh path after an
    /// external mutation settles.
    pub async fn reload(&mut self) -> Applied {
        if self.state.is_search_active() {
            let query = self.state.active_query.clone();
            self.submit_query(&query).await
        } else {
            self.browse_first_page().await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::SortOrder;
    use crate::test_util::{page, quote, quotes, FakeApi};
    use pretty_assertions::assert_eq;

    fn view_with(quotes: Vec<Quote>) -> CollectionView<FakeApi> {
        CollectionView::new(FakeApi::with_quotes(quotes), 2)
    }

    #[test]
    fn test_sort_tap_through_view() {
        let mut view = view_with(vec![]);
        view.tap_sort(SortField::Author);
        assert_eq!(view.state().sort, SortField::Author);
        assert!(view.state().ascending);
    }

    #[test]
    fn test_stale_page_response_is_discarded() {
        let mut view = view_with(vec![]);
        let first = view.begin_browse();
        let second = view.begin_browse();

        let outcome = view.apply_page(&first, Ok(page(quotes(&["old"]), None)));
        assert_eq!(outcome, Applied::Stale);
        assert!(view.state().quotes.is_empty());

        let outcome = view.apply_page(&second, Ok(page(quotes(&["new"]), None)));
        assert_eq!(outcome, Applied::Updated);
        assert_eq!(view.state().quotes[0].text, "new");
    }

    #[test]
    fn test_last_issued_fetch_wins_regardless_of_arrival_order() {
        // Three overlapping fetches completing newest-first: only the
        // newest may mutate state, the rest are stale.
        let mut view = view_with(vec![]);
        let a = view.begin_browse();
        let b = view.begin_search("stoic");
        let c = view.begin_browse();
        assert!(a.generation() < b.generation());
        assert!(b.generation() < c.generation());

        assert_eq!(
            view.apply_page(&c, Ok(page(quotes(&["winner"]), None))),
            Applied::Updated
        );
        assert_eq!(
            view.apply_search(&b, Ok(quotes(&["loser"]))),
            Applied::Stale
        );
        assert_eq!(
            view.apply_page(&a, Ok(page(quotes(&["also loser"]), None))),
            Applied::Stale
        );
        assert_eq!(view.state().quotes[0].text, "winner");
        assert_eq!(view.generation(), 3);
    }

    #[test]
    fn test_search_error_keeps_displayed_quotes() {
        let mut view = view_with(vec![]);
        let ticket = view.begin_browse();
        view.apply_page(&ticket, Ok(page(quotes(&["kept"]), None)));

        let ticket = view.begin_search("stoic");
        let outcome = view.apply_search(
            &ticket,
            Err(ApiError::Api {
                status: 500,
                message: "boom".to_string(),
            }),
        );
        assert_eq!(outcome, Applied::Failed);
        assert_eq!(view.state().quotes[0].text, "kept");
        assert!(view.state().error.is_some());
        assert!(!view.state().loading);
    }

    #[test]
    fn test_unauthenticated_response_is_surfaced_distinctly() {
        let mut view = view_with(vec![]);
        let ticket = view.begin_browse();
        let outcome = view.apply_page(
            &ticket,
            Err(ApiError::Unauthenticated("expired".to_string())),
        );
        assert_eq!(outcome, Applied::Unauthenticated);
    }

    #[test]
    fn test_load_more_requires_browse_mode_cursor_and_room() {
        let mut view = view_with(vec![]);
        assert!(view.begin_load_more().is_none());

        let ticket = view.begin_browse();
        view.apply_page(
            &ticket,
            Ok(page(quotes(&["a"]), Some("cursor-1".to_string()))),
        );
        assert!(view.begin_load_more().is_some());
    }

    #[test]
    fn test_load_more_is_noop_during_search() {
        let mut view = view_with(vec![]);
        let ticket = view.begin_search("stoic");
        view.apply_search(&ticket, Ok(quotes(&["hit"])));
        assert!(view.begin_load_more().is_none());
    }

    #[test]
    fn test_query_edit_transitions() {
        let mut view = view_with(vec![]);
        assert_eq!(view.note_query_edited("  stoic "), QueryEdit::Debounce);
        assert_eq!(view.state().mode, ViewMode::Preparing);
        assert_eq!(view.pending_query(), "stoic");

        assert_eq!(view.note_query_edited("   "), QueryEdit::ReloadBrowse);
        assert_eq!(view.pending_query(), "");
        assert!(!view.state().is_search_active());
    }

    #[tokio::test]
    async fn test_importing_mode_clears_on_reload() {
        let mut view = view_with(quotes(&["a"]));
        view.mark_importing();
        assert_eq!(view.state().mode, ViewMode::Importing);

        let applied = view.reload().await;
        assert_eq!(applied, Applied::Updated);
        assert_eq!(view.state().mode, ViewMode::Browsing);
    }

    #[tokio::test]
    async fn test_browse_first_page_fetches_with_current_sort() {
        let mut view = view_with(quotes(&["a", "b", "c"]));
        view.tap_sort(SortField::Author);

        let outcome = view.browse_first_page().await;
        assert_eq!(outcome, Applied::Updated);
        assert_eq!(view.state().quotes.len(), 2);
        assert!(view.state().has_more);

        let calls = view.client.calls();
        assert_eq!(calls, vec!["list sort=author order=asc cursor=-"]);
    }

    #[tokio::test]
    async fn test_load_more_appends_without_duplicating() {
        let mut view = view_with(quotes(&["a", "b", "c", "d", "e"]));

        view.browse_first_page().await;
        assert_eq!(view.state().quotes.len(), 2);

        view.load_more().await;
        assert_eq!(view.state().quotes.len(), 4);

        view.load_more().await;
        assert_eq!(view.state().quotes.len(), 5);
        assert!(!view.state().has_more);

        // Exhausted: further load-more calls are no-ops.
        assert_eq!(view.load_more().await, Applied::Skipped);

        let texts: Vec<&str> = view
            .state()
            .quotes
            .iter()
            .map(|q| q.text.as_str())
            .collect();
        assert_eq!(texts, vec!["a", "b", "c", "d", "e"]);
    }

    #[tokio::test]
    async fn test_has_more_falls_exactly_when_cursor_ends() {
        let mut view = view_with(quotes(&["a", "b", "c", "d"]));

        view.browse_first_page().await;
        assert!(view.state().has_more);
        view.load_more().await;
        assert!(!view.state().has_more);
        assert!(view.state().cursor.is_none());
    }

    #[tokio::test]
    async fn test_submit_query_replaces_quotes_with_search_results() {
        let mut view = view_with(vec![
            quote("1", "Be bold", "A"),
            quote("2", "Stay calm", "B"),
        ]);
        view.browse_first_page().await;

        let outcome = view.submit_query("bold").await;
        assert_eq!(outcome, Applied::Updated);
        assert_eq!(view.state().mode, ViewMode::Searching);
        assert_eq!(view.state().quotes.len(), 1);
        assert_eq!(view.state().active_query, "bold");
        assert!(!view.state().has_more);
    }

    #[tokio::test]
    async fn test_reload_respects_active_search() {
        let mut view = view_with(vec![quote("1", "Be bold", "A")]);
        view.submit_query("bold").await;
        view.client.clear_calls();

        view.reload().await;
        let calls = view.client.calls();
        assert_eq!(calls, vec!["search q=bold sort=created_at order=desc"]);
    }

    #[tokio::test]
    async fn test_change_sort_reissues_current_source() {
        let mut view = view_with(vec![quote("1", "Be bold", "A")]);
        view.browse_first_page().await;
        view.client.clear_calls();

        view.change_sort(SortField::Text).await;
        assert_eq!(view.state().sort, SortField::Text);
        assert_eq!(view.state().order(), SortOrder::Asc);
        let calls = view.client.calls();
        assert_eq!(calls, vec!["list sort=quote order=asc cursor=-"]);
    }
}
