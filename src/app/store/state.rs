//! Internal state management for the character store
//!
//! `StoreState` owns the entity cache, the display list, the page metadata,
//! the filters and the in-flight guards. Every method here is synchronous;
//! the store calls them inside a single write-lock scope so each transition
//! is observed as a whole.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::app::models::{Character, CharacterFilters, CharacterPage, PageInfo};
use crate::constants::api::INITIAL_PAGE;

/// A list request that passed its in-flight guard
///
/// Carries what the request needs plus the filter generation it was issued
/// under, so a response that arrives after the filters changed can be
/// recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub filters: CharacterFilters,
    pub generation: u64,
}

/// Internal state of the character store
#[derive(Debug)]
pub struct StoreState {
    /// Fetched characters by ID; entries are never replaced
    characters: HashMap<u32, Character>,
    /// Display order of character IDs for the active filters
    list: Vec<u32>,
    /// Last page appended to or loaded into the list
    current_page: u32,
    /// Metadata from the most recent list response, `None` until one arrives
    info: Option<PageInfo>,
    /// First-page fetch in flight
    loading: bool,
    /// Load-more or prefetch in flight
    loading_more: bool,
    /// User-visible message of the last failed list fetch
    error: Option<String>,
    filters: CharacterFilters,
    /// Bumped whenever the list is invalidated
    generation: u64,
}

impl StoreState {
    /// Create new empty store state
    pub fn new() -> Self {
        Self {
            characters: HashMap::new(),
            list: Vec::new(),
            current_page: INITIAL_PAGE,
            info: None,
            loading: false,
            loading_more: false,
            error: None,
            filters: CharacterFilters::default(),
            generation: 0,
        }
    }

    // ===== CACHE =====

    /// Add characters to the cache, keeping any entry already present
    pub fn cache_characters<I>(&mut self, characters: I)
    where
        I: IntoIterator<Item = Character>,
    {
        for character in characters {
            self.characters.entry(character.id).or_insert(character);
        }
    }

    pub fn cached_character(&self, id: u32) -> Option<&Character> {
        self.characters.get(&id)
    }

    pub fn is_cached(&self, id: u32) -> bool {
        self.characters.contains_key(&id)
    }

    /// Whether every ID of an unfiltered page is cached
    pub fn is_page_cached(&self, page: u32, page_size: u32) -> bool {
        if page == 0 {
            return false;
        }
        let start = (page - 1) * page_size + 1;
        let end = page * page_size;
        (start..=end).all(|id| self.characters.contains_key(&id))
    }

    pub fn cache_len(&self) -> usize {
        self.characters.len()
    }

    // ===== FILTERS AND RESET =====

    /// Drop the display list and pagination, keeping the cache
    fn reset_pagination(&mut self) {
        self.list.clear();
        self.current_page = INITIAL_PAGE;
        self.info = None;
        self.generation += 1;
    }

    pub fn set_filters(&mut self, filters: CharacterFilters) {
        debug!("Filters changed to {:?}", filters);
        self.filters = filters;
        self.reset_pagination();
    }

    pub fn clear_filters(&mut self) {
        self.set_filters(CharacterFilters::default());
    }

    /// Drop everything, cache included
    pub fn reset(&mut self) {
        self.characters.clear();
        self.filters = CharacterFilters::default();
        self.error = None;
        self.reset_pagination();
    }

    // ===== FIRST PAGE =====

    /// Claim the first-page guard
    ///
    /// Returns `None` without touching anything when a first-page fetch is
    /// already in flight.
    pub fn begin_first_page(&mut self) -> Option<PageRequest> {
        if self.loading {
            return None;
        }
        self.loading = true;
        self.error = None;
        Some(self.request_for(INITIAL_PAGE))
    }

    /// Replace the list with the first page of results
    ///
    /// Returns a follow-up request for the current filters when they changed
    /// while this one was in flight.
    pub fn complete_first_page(
        &mut self,
        request: &PageRequest,
        page: CharacterPage,
    ) -> Option<PageRequest> {
        let ids = page.ids();
        self.cache_characters(page.results);

        if let Some(follow_up) = self.finish_first_page(request) {
            debug!("Discarding first page fetched under outdated filters");
            return Some(follow_up);
        }

        info!(
            "Loaded first page: {} characters of {}",
            ids.len(),
            page.info.count
        );
        self.list = ids;
        self.info = Some(page.info);
        self.current_page = INITIAL_PAGE;
        None
    }

    /// Record that the filters match nothing
    pub fn complete_first_page_empty(&mut self, request: &PageRequest) -> Option<PageRequest> {
        if let Some(follow_up) = self.finish_first_page(request) {
            return Some(follow_up);
        }
        info!("No characters match the current filters");
        self.list.clear();
        self.info = Some(PageInfo::empty());
        self.current_page = INITIAL_PAGE;
        None
    }

    /// Record a failed first-page fetch, keeping the previous list
    pub fn fail_first_page(
        &mut self,
        request: &PageRequest,
        message: String,
    ) -> Option<PageRequest> {
        if let Some(follow_up) = self.finish_first_page(request) {
            debug!("Ignoring failure for outdated filters: {}", message);
            return Some(follow_up);
        }
        self.error = Some(message);
        None
    }

    /// Release the first-page guard, or hand it to a request for the
    /// current filters if `request` was issued under older ones
    ///
    /// The guard stays claimed across the hand-over, so callers skipped while
    /// the outdated fetch was in flight are covered by the follow-up.
    fn finish_first_page(&mut self, request: &PageRequest) -> Option<PageRequest> {
        if self.is_stale(request) {
            return Some(self.request_for(INITIAL_PAGE));
        }
        self.loading = false;
        None
    }

    // ===== LOAD MORE =====

    /// Claim the load-more guard
    ///
    /// Returns `None` when a load-more or first-page fetch is in flight, or
    /// when the server reported no further page.
    pub fn begin_next_page(&mut self) -> Option<PageRequest> {
        if self.loading_more || self.loading || !self.has_next_page() {
            return None;
        }
        self.loading_more = true;
        self.error = None;
        Some(self.request_for(self.current_page + 1))
    }

    /// Append a page of results to the list
    pub fn complete_next_page(&mut self, request: &PageRequest, page: CharacterPage) {
        self.loading_more = false;
        let ids = page.ids();
        self.cache_characters(page.results);

        if self.is_stale(request) {
            debug!("Discarding page {} fetched under outdated filters", request.page);
            return;
        }

        info!("Loaded page {}: {} more characters", request.page, ids.len());
        self.list.extend(ids);
        self.info = Some(page.info);
        self.current_page = request.page;
    }

    /// Record that the server has no page past the current one
    pub fn complete_no_more_pages(&mut self, request: &PageRequest) {
        self.loading_more = false;
        if self.is_stale(request) {
            return;
        }
        debug!("Page {} does not exist, clearing next cursor", request.page);
        if let Some(info) = self.info.as_mut() {
            info.next = None;
        }
    }

    /// Record a failed load-more, keeping the list loaded so far
    pub fn fail_next_page(&mut self, message: String) {
        self.loading_more = false;
        self.error = Some(message);
    }

    fn request_for(&self, page: u32) -> PageRequest {
        PageRequest {
            page,
            filters: self.filters.clone(),
            generation: self.generation,
        }
    }

    fn is_stale(&self, request: &PageRequest) -> bool {
        request.generation != self.generation
    }

    // ===== DERIVED VIEWS =====

    /// Display list resolved through the cache
    ///
    /// IDs missing from the cache are skipped.
    pub fn display_characters(&self) -> Vec<Character> {
        self.list
            .iter()
            .filter_map(|id| self.characters.get(id))
            .cloned()
            .collect()
    }

    pub fn list(&self) -> &[u32] {
        &self.list
    }

    pub fn info(&self) -> Option<&PageInfo> {
        self.info.as_ref()
    }

    pub fn has_next_page(&self) -> bool {
        self.info.as_ref().is_some_and(|info| info.next.is_some())
    }

    pub fn has_previous_page(&self) -> bool {
        self.info.as_ref().is_some_and(|info| info.prev.is_some())
    }

    pub fn total_count(&self) -> u32 {
        self.info.as_ref().map_or(0, |info| info.count)
    }

    pub fn total_pages(&self) -> u32 {
        self.info.as_ref().map_or(0, |info| info.pages)
    }

    /// A completed fetch found nothing and nothing is pending or failed
    pub fn has_no_results(&self) -> bool {
        !self.loading && self.error.is_none() && self.list.is_empty() && self.info.is_some()
    }

    pub fn has_active_filters(&self) -> bool {
        self.filters.is_active()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_loading_more(&self) -> bool {
        self.loading_more
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn filters(&self) -> &CharacterFilters {
        &self.filters
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }
}

impl Default for StoreState {
    fn default() -> Self {
        Self::new()
    }
}
