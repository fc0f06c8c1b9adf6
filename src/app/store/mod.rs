//! Character store: entity cache, display list, pagination and navigation
//!
//! The store is the single source of truth consumers read from. It caches
//! every fetched character by ID, keeps the ordered display list for the
//! active filters, and derives totals and prev/next navigation from them.
//!
//! # Basic Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use character_catalog::app::{CatalogClient, CharacterFilters, CharacterStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(CharacterStore::new(CatalogClient::new()?));
//!
//! store
//!     .apply_filters(CharacterFilters::new().with_species("Human"))
//!     .await;
//! while store.has_next_page() && store.display_ids().len() < 60 {
//!     store.load_next_page().await;
//! }
//!
//! for character in store.display_characters() {
//!     println!("{} {}", character.id, character.name);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Observing changes
//!
//! Every committed transition bumps the store revision. Subscribers wait on
//! the `watch` receiver and re-read the views (or take a [`StoreSnapshot`]):
//!
//! ```rust,no_run
//! # use character_catalog::app::CharacterStore;
//! # async fn render_loop(store: &CharacterStore) {
//! let mut changes = store.subscribe();
//! while changes.changed().await.is_ok() {
//!     let snapshot = store.snapshot();
//!     println!("{} of {} loaded", snapshot.characters.len(), snapshot.total_count);
//! }
//! # }
//! ```
//!
//! State transitions are internal to the store; the state type is not part of
//! the public API:
//!
//! ```rust,compile_fail
//! use character_catalog::app::store::state::StoreState;
//! ```

pub mod core;
pub mod navigation;
mod state;
pub mod types;

pub use self::core::CharacterStore;
pub use navigation::page_for_id;
pub use types::{StoreConfig, StoreSnapshot};
