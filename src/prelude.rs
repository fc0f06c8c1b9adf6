//! Prelude module for Character Catalog Library
//!
//! Re-exports the items most integrations need, so a single
//! `use character_catalog::prelude::*;` is enough to build a store and drive it.
//!
//! # Usage
//!
//! ```rust,no_run
//! use character_catalog::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = AppConfig::load(None).await?;
//!     let client = CatalogClient::with_config(config.client)?;
//!     let store = Arc::new(CharacterStore::with_config(client, config.store));
//!
//!     store.apply_filters(CharacterFilters::new().with_status("Alive")).await;
//!     println!("{} living characters", store.total_count());
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, FetchError, FetchResult, Result};

// Essential app components
pub use crate::app::{
    CatalogClient, Character, CharacterFilters, CharacterStatus, CharacterStore, ClientConfig,
    PageInfo, RetryPolicy, SearchDebouncer, StoreConfig, StoreSnapshot,
};

// Configuration
pub use crate::config::AppConfig;

// Commonly used constants
pub use crate::constants::{API_BASE_URL, MAX_ATTEMPTS, PAGE_SIZE};

// Standard library re-exports that are commonly needed
pub use std::sync::Arc;

// Common external crate re-exports for convenience
pub use tokio;
