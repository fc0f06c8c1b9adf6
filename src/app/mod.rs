//! Core application logic for Character Catalog
//!
//! This module contains the catalog HTTP client, the data models, the
//! caching/paginating store and the debounced search front end.
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use character_catalog::app::{CatalogClient, CharacterStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(CharacterStore::new(CatalogClient::new()?));
//! store.fetch_first_page().await;
//!
//! if let Some(first) = store.display_ids().first().copied() {
//!     let next = store.next_id_with_prefetch(first).await;
//!     println!("after {} comes {:?}", first, next);
//! }
//!
//! // Detail view for an arbitrary ID, loading its page if needed
//! let character = store.load_page_containing(42).await?;
//! println!("{} ({})", character.name, character.status);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod models;
pub mod search;
pub mod store;

// Re-export main public API
pub use client::{CatalogClient, ClientConfig, RetryPolicy};
pub use models::{
    Character, CharacterFilters, CharacterPage, CharacterStatus, LocationRef, PageInfo,
};
pub use search::SearchDebouncer;
pub use store::{page_for_id, CharacterStore, StoreConfig, StoreSnapshot};
