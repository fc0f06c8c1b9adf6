//! Core character store implementation
//!
//! `CharacterStore` is the context object consumers share (usually behind an
//! `Arc`). It owns the catalog client and the state, runs the fetch
//! operations, and publishes a revision number after every committed
//! transition so observers know when to re-read the derived views.

use parking_lot::RwLock;
use tokio::sync::watch;
use tracing::{debug, error};

use crate::app::client::CatalogClient;
use crate::app::models::{Character, CharacterFilters};
use crate::errors::{FetchError, FetchResult};

use super::navigation::page_for_id;
use super::state::StoreState;
use super::types::{StoreConfig, StoreSnapshot};

/// Caching, paginating store over the character catalog
///
/// The state lock is only held for synchronous reads and transitions, never
/// across a network call. Guarded operations invoked while their guard is
/// held return immediately without doing anything.
#[derive(Debug)]
pub struct CharacterStore {
    client: CatalogClient,
    config: StoreConfig,
    state: RwLock<StoreState>,
    revision: watch::Sender<u64>,
}

impl CharacterStore {
    /// Create a store with default configuration
    pub fn new(client: CatalogClient) -> Self {
        Self::with_config(client, StoreConfig::default())
    }

    /// Create a store with custom configuration
    pub fn with_config(client: CatalogClient, config: StoreConfig) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            client,
            config,
            state: RwLock::new(StoreState::new()),
            revision,
        }
    }

    /// Subscribe to state changes
    ///
    /// The receiver yields the store revision, which increases by one per
    /// committed transition.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Current revision
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn client(&self) -> &CatalogClient {
        &self.client
    }

    pub(super) fn read<R>(&self, f: impl FnOnce(&StoreState) -> R) -> R {
        f(&self.state.read())
    }

    /// Apply one transition and notify subscribers
    fn commit<R>(&self, f: impl FnOnce(&mut StoreState) -> R) -> R {
        let result = f(&mut self.state.write());
        self.revision.send_modify(|revision| *revision += 1);
        result
    }

    /// Apply a transition that may decline, notifying only when it ran
    fn try_commit<R>(&self, f: impl FnOnce(&mut StoreState) -> Option<R>) -> Option<R> {
        let result = f(&mut self.state.write())?;
        self.revision.send_modify(|revision| *revision += 1);
        Some(result)
    }

    // ===== LIST OPERATIONS =====

    /// Load page 1 for the current filters, replacing the display list
    ///
    /// Does nothing if a first-page fetch is already in flight. If the
    /// filters change before the response arrives, the response is only
    /// cached and page 1 is fetched again for the new filters, so the list
    /// always settles on the latest filters. A 404 from the API means nothing
    /// matches and leaves an empty list with zeroed metadata. Other failures
    /// are stored as the error message and keep the previously loaded list.
    pub async fn fetch_first_page(&self) {
        let Some(mut request) = self.try_commit(StoreState::begin_first_page) else {
            debug!("First page fetch already in flight, skipping");
            return;
        };

        loop {
            let result = self
                .client
                .fetch_characters_page(request.page, &request.filters)
                .await;

            let follow_up = self.commit(|state| match result {
                Ok(Some(page)) => state.complete_first_page(&request, page),
                Ok(None) => state.complete_first_page_empty(&request),
                Err(e) => {
                    error!("Failed to fetch first page: {}", e);
                    state.fail_first_page(
                        &request,
                        format!("Failed to fetch characters page {}: {}", request.page, e),
                    )
                }
            });

            match follow_up {
                Some(next) => {
                    debug!("Filters changed during fetch, reloading first page");
                    request = next;
                }
                None => break,
            }
        }
    }

    /// Append the next page to the display list
    ///
    /// Does nothing while another load-more or a first-page fetch is in
    /// flight, or when the server reported no next page. A 404 clears the
    /// next-page cursor instead of raising an error.
    pub async fn load_next_page(&self) {
        let Some(request) = self.try_commit(StoreState::begin_next_page) else {
            debug!("Load more skipped: already loading or no next page");
            return;
        };

        let result = self
            .client
            .fetch_characters_page(request.page, &request.filters)
            .await;

        self.commit(|state| match result {
            Ok(Some(page)) => state.complete_next_page(&request, page),
            Ok(None) => state.complete_no_more_pages(&request),
            Err(e) => {
                error!("Failed to load page {}: {}", request.page, e);
                state.fail_next_page(format!(
                    "Failed to load more characters (page {}): {}",
                    request.page, e
                ));
            }
        });
    }

    // ===== ENTITY LOOKUPS =====

    /// Resolve a character, fetching the unfiltered catalog page that holds it
    ///
    /// A cached character is returned without any request. Otherwise page
    /// `ceil(id / page_size)` of the catalog is fetched and cached; the
    /// display list is left alone. The active filters are not applied to this
    /// request: filtered pages are not addressable by ID, so only the
    /// unfiltered page is guaranteed to hold `id`. Errors go to the caller and
    /// do not touch the store's error message.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::NotFound` when the page does not contain `id`
    pub async fn load_page_containing(&self, id: u32) -> FetchResult<Character> {
        if let Some(character) = self.cached_character(id) {
            debug!("Character {} served from cache", id);
            return Ok(character);
        }

        let page = page_for_id(id, self.config.page_size).ok_or(FetchError::NotFound { id })?;
        debug!("Character {} not cached, fetching page {}", id, page);

        let data = self
            .client
            .fetch_characters_page(page, &CharacterFilters::default())
            .await?
            .ok_or(FetchError::NotFound { id })?;

        self.commit(|state| {
            state.cache_characters(data.results);
            state.cached_character(id).cloned()
        })
        .ok_or(FetchError::NotFound { id })
    }

    /// Resolve a character through the single-entity endpoint
    ///
    /// # Errors
    ///
    /// Returns `FetchError::NotFound` when the API has no such character
    pub async fn fetch_character_by_id(&self, id: u32) -> FetchResult<Character> {
        if let Some(character) = self.cached_character(id) {
            debug!("Character {} served from cache", id);
            return Ok(character);
        }

        let character = self.client.fetch_character(id).await?;
        self.commit(|state| {
            state.cache_characters(std::iter::once(character.clone()));
        });
        Ok(character)
    }

    /// Resolve several characters, fetching the uncached ones in one request
    ///
    /// Results follow the order of `ids`; IDs the API does not know are left
    /// out. Like the other lookups this never touches the display list.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` when the batch request fails
    pub async fn load_characters(&self, ids: &[u32]) -> FetchResult<Vec<Character>> {
        let mut missing: Vec<u32> = self.read(|state| {
            ids.iter()
                .copied()
                .filter(|&id| !state.is_cached(id))
                .collect()
        });
        missing.sort_unstable();
        missing.dedup();

        if !missing.is_empty() {
            debug!("Fetching {} uncached characters in one request", missing.len());
            let fetched = self.client.fetch_characters_by_ids(&missing).await?;
            self.commit(|state| state.cache_characters(fetched));
        }

        Ok(self.read(|state| {
            ids.iter()
                .filter_map(|&id| state.cached_character(id).cloned())
                .collect()
        }))
    }

    // ===== FILTERS =====

    /// Replace the filters and drop the display list and pagination
    ///
    /// Cached characters stay available by ID.
    pub fn set_filters(&self, filters: CharacterFilters) {
        self.commit(|state| state.set_filters(filters));
    }

    pub fn clear_filters(&self) {
        self.commit(StoreState::clear_filters);
    }

    /// Replace the filters and load page 1 for them
    pub async fn apply_filters(&self, filters: CharacterFilters) {
        self.set_filters(filters);
        self.fetch_first_page().await;
    }

    /// Search by name, keeping the other filters
    ///
    /// A blank name removes the name filter.
    pub async fn search_by_name(&self, name: &str) {
        let name = name.trim();
        let mut filters = self.filters();
        filters.name = (!name.is_empty()).then(|| name.to_string());
        self.apply_filters(filters).await;
    }

    /// Drop all state, cache included
    pub fn reset(&self) {
        self.commit(StoreState::reset);
    }

    // ===== DERIVED VIEWS =====

    pub fn display_characters(&self) -> Vec<Character> {
        self.read(StoreState::display_characters)
    }

    pub fn display_ids(&self) -> Vec<u32> {
        self.read(|state| state.list().to_vec())
    }

    pub fn has_next_page(&self) -> bool {
        self.read(StoreState::has_next_page)
    }

    pub fn has_previous_page(&self) -> bool {
        self.read(StoreState::has_previous_page)
    }

    pub fn total_count(&self) -> u32 {
        self.read(StoreState::total_count)
    }

    pub fn total_pages(&self) -> u32 {
        self.read(StoreState::total_pages)
    }

    pub fn has_no_results(&self) -> bool {
        self.read(StoreState::has_no_results)
    }

    pub fn has_active_filters(&self) -> bool {
        self.read(StoreState::has_active_filters)
    }

    pub fn is_loading(&self) -> bool {
        self.read(StoreState::is_loading)
    }

    pub fn is_loading_more(&self) -> bool {
        self.read(StoreState::is_loading_more)
    }

    pub fn error(&self) -> Option<String> {
        self.read(|state| state.error().map(str::to_string))
    }

    pub fn filters(&self) -> CharacterFilters {
        self.read(|state| state.filters().clone())
    }

    pub fn current_page(&self) -> u32 {
        self.read(StoreState::current_page)
    }

    pub fn cached_character(&self, id: u32) -> Option<Character> {
        self.read(|state| state.cached_character(id).cloned())
    }

    pub fn is_cached(&self, id: u32) -> bool {
        self.read(|state| state.is_cached(id))
    }

    /// Whether every ID of unfiltered page `page` is cached
    pub fn is_page_cached(&self, page: u32) -> bool {
        self.read(|state| state.is_page_cached(page, self.config.page_size))
    }

    pub fn cache_len(&self) -> usize {
        self.read(StoreState::cache_len)
    }

    /// Copy every derived view under one read lock
    pub fn snapshot(&self) -> StoreSnapshot {
        let state = self.state.read();
        StoreSnapshot {
            revision: *self.revision.borrow(),
            characters: state.display_characters(),
            total_count: state.total_count(),
            total_pages: state.total_pages(),
            current_page: state.current_page(),
            has_next_page: state.has_next_page(),
            has_previous_page: state.has_previous_page(),
            has_no_results: state.has_no_results(),
            has_active_filters: state.has_active_filters(),
            loading: state.is_loading(),
            loading_more: state.is_loading_more(),
            error: state.error().map(str::to_string),
            filters: state.filters().clone(),
        }
    }
}
