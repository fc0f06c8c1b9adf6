//! Debounced name search
//!
//! Typing into a search box produces one call per keystroke. The debouncer
//! holds each term for a quiet period and only runs the search for the last
//! one; earlier pending terms are superseded. A search that has already
//! started always runs to completion.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::app::store::CharacterStore;

/// Debounces free-text search input into store searches
#[derive(Debug)]
pub struct SearchDebouncer {
    store: Arc<CharacterStore>,
    quiet_period: Duration,
    shared: Arc<Pending>,
}

#[derive(Debug, Default)]
struct Pending {
    /// Bumped on every input; a timer only fires if it is still current
    generation: AtomicU64,
    pending: AtomicBool,
}

impl SearchDebouncer {
    /// Debouncer using the store's configured quiet period
    pub fn new(store: Arc<CharacterStore>) -> Self {
        let quiet_period = store.config().search_debounce;
        Self::with_quiet_period(store, quiet_period)
    }

    pub fn with_quiet_period(store: Arc<CharacterStore>, quiet_period: Duration) -> Self {
        Self {
            store,
            quiet_period,
            shared: Arc::new(Pending::default()),
        }
    }

    /// Record a new search term, superseding any pending one
    ///
    /// Blank input cancels the pending state indicator but still schedules a
    /// search, which clears the name filter when it fires. The returned handle
    /// resolves once this term's timer has either fired or been superseded.
    pub fn input(&self, term: &str) -> JoinHandle<()> {
        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.shared
            .pending
            .store(!term.trim().is_empty(), Ordering::SeqCst);

        let store = Arc::clone(&self.store);
        let shared = Arc::clone(&self.shared);
        let quiet_period = self.quiet_period;
        let term = term.trim().to_string();

        tokio::spawn(async move {
            tokio::time::sleep(quiet_period).await;

            if shared.generation.load(Ordering::SeqCst) != generation {
                debug!("Search for '{}' superseded", term);
                return;
            }

            shared.pending.store(false, Ordering::SeqCst);
            debug!("Running debounced search for '{}'", term);
            store.search_by_name(&term).await;
        })
    }

    /// Whether a search is waiting for its quiet period to end
    pub fn is_pending(&self) -> bool {
        self.shared.pending.load(Ordering::SeqCst)
    }

    /// Drop the pending search, if any
    pub fn cancel(&self) {
        self.shared.generation.fetch_add(1, Ordering::SeqCst);
        self.shared.pending.store(false, Ordering::SeqCst);
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }
}
