//! Previous/next navigation over the display list
//!
//! Detail views walk the display list in fetch order. Stepping past the last
//! loaded character pulls in the next page when the server has one.

use tracing::debug;

use super::core::CharacterStore;
use super::state::StoreState;

/// Page of the unfiltered catalog that holds `id`
///
/// IDs are 1-based and pages hold `page_size` consecutive IDs, so this is
/// `ceil(id / page_size)`. Returns `None` for ID 0 or a zero page size.
pub fn page_for_id(id: u32, page_size: u32) -> Option<u32> {
    if id == 0 || page_size == 0 {
        return None;
    }
    Some((id - 1) / page_size + 1)
}

impl StoreState {
    /// Position of `id` in the display list
    pub fn current_index(&self, id: u32) -> Option<usize> {
        self.list().iter().position(|&listed| listed == id)
    }

    pub fn previous_id(&self, id: u32) -> Option<u32> {
        let index = self.current_index(id)?;
        index.checked_sub(1).map(|prev| self.list()[prev])
    }

    pub fn next_id(&self, id: u32) -> Option<u32> {
        let index = self.current_index(id)?;
        self.list().get(index + 1).copied()
    }

    /// Whether a "next" step from `id` can succeed, counting unloaded pages
    ///
    /// Always false for an ID that is not in the display list.
    pub fn can_advance(&self, id: u32) -> bool {
        match self.current_index(id) {
            Some(index) => index + 1 < self.list().len() || self.has_next_page(),
            None => false,
        }
    }
}

impl CharacterStore {
    pub fn current_index(&self, id: u32) -> Option<usize> {
        self.read(|state| state.current_index(id))
    }

    pub fn previous_id(&self, id: u32) -> Option<u32> {
        self.read(|state| state.previous_id(id))
    }

    pub fn next_id(&self, id: u32) -> Option<u32> {
        self.read(|state| state.next_id(id))
    }

    pub fn can_advance(&self, id: u32) -> bool {
        self.read(|state| state.can_advance(id))
    }

    /// Next ID after `id`, loading the next page first if `id` is the last
    /// loaded entry
    ///
    /// Returns `None` when `id` is not in the list, when the server has no
    /// further page, or when a load-more is already in flight (the caller can
    /// retry once it settles).
    pub async fn next_id_with_prefetch(&self, id: u32) -> Option<u32> {
        let step = self.read(|state| {
            if state.current_index(id).is_none() {
                Step::Stop
            } else if let Some(next) = state.next_id(id) {
                Step::Loaded(next)
            } else if state.has_next_page() && !state.is_loading_more() {
                Step::Prefetch
            } else {
                Step::Stop
            }
        });

        match step {
            Step::Loaded(next) => Some(next),
            Step::Stop => None,
            Step::Prefetch => {
                debug!("Character {} is the last loaded, prefetching next page", id);
                self.load_next_page().await;
                self.next_id(id)
            }
        }
    }
}

enum Step {
    Loaded(u32),
    Prefetch,
    Stop,
}
