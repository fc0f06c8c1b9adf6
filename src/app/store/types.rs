//! Configuration and snapshot types for the character store

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::app::models::{Character, CharacterFilters};
use crate::constants::{api, store};
use crate::errors::{ConfigError, ConfigResult};

/// Store behaviour settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Characters per unfiltered API page, used to locate an ID's page
    pub page_size: u32,
    /// Quiet period before a typed search fires
    #[serde(with = "humantime_serde")]
    pub search_debounce: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            page_size: api::PAGE_SIZE,
            search_debounce: store::SEARCH_DEBOUNCE,
        }
    }
}

impl StoreConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "store.page_size".to_string(),
                value: self.page_size.to_string(),
                reason: "Page size must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// Point-in-time copy of every derived view
///
/// Consumers that render the whole catalog take one snapshot per revision
/// instead of calling the individual accessors, so they never mix values from
/// two different transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSnapshot {
    /// Revision this snapshot was taken at
    pub revision: u64,
    /// Display list resolved through the cache
    pub characters: Vec<Character>,
    pub total_count: u32,
    pub total_pages: u32,
    pub current_page: u32,
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub has_no_results: bool,
    pub has_active_filters: bool,
    pub loading: bool,
    pub loading_more: bool,
    pub error: Option<String>,
    pub filters: CharacterFilters,
}
