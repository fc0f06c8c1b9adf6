//! Character Catalog Library
//!
//! A caching, paginating client for the Rick and Morty character catalog API.
//! Requests that hit the API's rate limit are retried with exponential backoff;
//! fetched characters are cached by ID and exposed through a store that derives
//! display lists, totals and prev/next navigation.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, FetchError, Result};
