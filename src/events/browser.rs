//! Client-side browsing over discovered events.
//!
//! [`BrowserState`] holds the user's filters and page. [`derive_view`] turns it,
//! the discovered list and the favorites into the page to render:
//! base list, outdated filter, accessibility filter, category filter, sort by
//! start, paginate. [`EventBrowser`] owns all of it plus the search lifecycle.

use super::api::{DiscoveredEvents, EventQueryService, DEFAULT_SEARCH_QUERY, INITIAL_QUERY};
use super::model::{Category, Event};
use crate::favorites::FavoritesStore;
use crate::gemini::model::GroundingSource;
use crate::loading::LoadingGuard;
use crate::share::{share_event, ShareOutcome, ShareTarget};
use crate::storage::KeyValueStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const EVENTS_PER_PAGE: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserState {
    pub query: String,
    pub category: Category,
    pub favorites_only: bool,
    pub hide_outdated: bool,
    pub accessible_only: bool,
    /// 1-based
    pub page: usize,
}

impl Default for BrowserState {
    fn default() -> Self {
        Self {
            query: String::new(),
            category: Category::All,
            favorites_only: false,
            hide_outdated: true,
            accessible_only: false,
            page: 1,
        }
    }
}

/// Every filter change sends the user back to the first page.
impl BrowserState {
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.page = 1;
    }

    pub fn set_category(&mut self, category: Category) {
        self.category = category;
        self.page = 1;
    }

    pub fn set_favorites_only(&mut self, favorites_only: bool) {
        self.favorites_only = favorites_only;
        self.page = 1;
    }

    pub fn set_accessible_only(&mut self, accessible_only: bool) {
        self.accessible_only = accessible_only;
        self.page = 1;
    }

    pub fn set_hide_outdated(&mut self, hide_outdated: bool) {
        self.hide_outdated = hide_outdated;
        self.page = 1;
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.page = page.max(1);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BrowserView {
    pub events: Vec<Event>,
    /// Events passing the filters, across all pages
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
}

impl BrowserView {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Filters and sorts without paginating.
pub fn filter_events<'a>(
    state: &BrowserState,
    discovered: &'a [Event],
    favorites: &'a [Event],
    now: DateTime<Utc>,
) -> Vec<&'a Event> {
    let base = if state.favorites_only {
        favorites
    } else {
        discovered
    };

    let mut list: Vec<&Event> = base
        .iter()
        .filter(|event| !state.hide_outdated || !event.is_past(now))
        .filter(|event| !state.accessible_only || event.is_accessible)
        .filter(|event| state.category.matches(&event.category))
        .collect();

    // Stable, unreadable dates go last
    list.sort_by_key(|event| (event.starts_at().is_none(), event.starts_at()));

    list
}

pub fn total_pages(total: usize) -> usize {
    total.div_ceil(EVENTS_PER_PAGE)
}

/// Pages past the end come back empty.
pub fn page_slice<T>(items: &[T], page: usize) -> &[T] {
    let start = (page.max(1) - 1).saturating_mul(EVENTS_PER_PAGE);

    if start >= items.len() {
        return &[];
    }

    let end = (start + EVENTS_PER_PAGE).min(items.len());
    &items[start..end]
}

pub fn derive_view(
    state: &BrowserState,
    discovered: &[Event],
    favorites: &[Event],
    now: DateTime<Utc>,
) -> BrowserView {
    let filtered = filter_events(state, discovered, favorites, now);
    let page = state.page.max(1);

    BrowserView {
        events: page_slice(&filtered, page)
            .iter()
            .map(|event| (*event).clone())
            .collect(),
        total: filtered.len(),
        page,
        total_pages: total_pages(filtered.len()),
    }
}

/// Handed out when a search starts, results are only applied if no newer
/// search began in the meantime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    generation: u64,
    pub query: String,
}

pub struct EventBrowser<S: KeyValueStore> {
    state: BrowserState,
    events: Vec<Event>,
    sources: Vec<GroundingSource>,
    favorites: FavoritesStore<S>,
    loading: bool,
    generation: u64,
    copied_id: Option<String>,
}

impl<S: KeyValueStore> EventBrowser<S> {
    pub fn new(favorites: FavoritesStore<S>) -> Self {
        Self {
            state: BrowserState::default(),
            events: Vec::new(),
            sources: Vec::new(),
            favorites,
            loading: false,
            generation: 0,
            copied_id: None,
        }
    }

    pub fn state(&self) -> &BrowserState {
        &self.state
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn sources(&self) -> &[GroundingSource] {
        &self.sources
    }

    pub fn favorites(&self) -> &FavoritesStore<S> {
        &self.favorites
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn copied_id(&self) -> Option<&str> {
        self.copied_id.as_deref()
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.state.set_query(query);
    }

    pub fn set_category(&mut self, category: Category) {
        self.state.set_category(category);
    }

    pub fn set_favorites_only(&mut self, favorites_only: bool) {
        self.state.set_favorites_only(favorites_only);
    }

    pub fn set_accessible_only(&mut self, accessible_only: bool) {
        self.state.set_accessible_only(accessible_only);
    }

    pub fn set_hide_outdated(&mut self, hide_outdated: bool) {
        self.state.set_hide_outdated(hide_outdated);
    }

    /// Navigation is only offered within the current page range.
    pub fn go_to_page(&mut self, page: usize, now: DateTime<Utc>) {
        let last = total_pages(self.filtered(now).len()).max(1);
        self.state.go_to_page(page.min(last));
    }

    pub fn view(&self, now: DateTime<Utc>) -> BrowserView {
        derive_view(&self.state, &self.events, self.favorites.events(), now)
    }

    pub fn filtered(&self, now: DateTime<Utc>) -> Vec<&Event> {
        filter_events(&self.state, &self.events, self.favorites.events(), now)
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains(id)
    }

    pub fn toggle_favorite(&mut self, event: &Event) -> bool {
        self.favorites.toggle(event)
    }

    pub fn share(&mut self, event: &Event, app_url: &str, target: &dyn ShareTarget) -> ShareOutcome {
        let outcome = share_event(event, app_url, target);

        if outcome == ShareOutcome::Copied {
            self.copied_id = Some(event.id.clone());
        }

        outcome
    }

    pub fn clear_copied(&mut self) {
        self.copied_id = None;
    }

    /// Starts the first load with the broad weekly query.
    pub fn begin_initial_load(&mut self) -> SearchTicket {
        self.begin(INITIAL_QUERY.to_string())
    }

    /// Starts a user search from the current query. Searching always goes
    /// back to the discovered list.
    pub fn begin_search(&mut self) -> SearchTicket {
        if self.state.favorites_only {
            self.state.set_favorites_only(false);
        }

        let query = match self.state.query.trim() {
            "" => DEFAULT_SEARCH_QUERY.to_string(),
            query => query.to_string(),
        };

        self.begin(query)
    }

    fn begin(&mut self, query: String) -> SearchTicket {
        self.generation += 1;
        self.loading = true;

        debug!("Search #{} started", self.generation);

        SearchTicket {
            generation: self.generation,
            query,
        }
    }

    /// Returns whether the results were applied.
    pub fn complete_search(&mut self, ticket: SearchTicket, results: DiscoveredEvents) -> bool {
        if ticket.generation != self.generation {
            info!(
                "Dropping results of stale search #{} (latest is #{})",
                ticket.generation, self.generation
            );
            return false;
        }

        self.events = results.events;
        self.sources = results.sources;
        self.loading = false;

        true
    }

    pub async fn load_initial(&mut self, service: &EventQueryService) {
        let ticket = self.begin_initial_load();
        self.run(service, ticket).await;
    }

    pub async fn search(&mut self, service: &EventQueryService) {
        let ticket = self.begin_search();
        self.run(service, ticket).await;
    }

    /// No newer search can start while `&mut self` is held.
    async fn run(&mut self, service: &EventQueryService, ticket: SearchTicket) {
        let results = {
            let _loading = LoadingGuard::new(&mut self.loading);
            service.discover_events(&ticket.query).await
        };

        self.complete_search(ticket, results);
    }
}
