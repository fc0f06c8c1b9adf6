//! Application constants for Character Catalog
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain for maintainability and clarity.

use std::time::Duration;

/// Environment variable names
pub mod env {
    /// Overrides the API base URL from the configuration file
    pub const BASE_URL: &str = "CATALOG_API_BASE_URL";
}

/// Remote catalog API endpoints
pub mod api {
    /// Character collection endpoint of the public catalog API
    pub const BASE_URL: &str = "https://rickandmortyapi.com/api/character";

    /// Number of characters the API returns per unfiltered page
    pub const PAGE_SIZE: u32 = 20;

    /// First page number (pages are 1-based)
    pub const INITIAL_PAGE: u32 = 1;
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = "Character-Catalog/0.1.0";

    /// Default HTTP request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Connection pool idle timeout
    pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

    /// Maximum idle connections per host in pool
    pub const POOL_MAX_PER_HOST: usize = 4;

    /// Response header carrying a server-requested retry delay in seconds
    pub const RETRY_AFTER_HEADER: &str = "Retry-After";
}

/// Rate limiting and retry configuration
pub mod limits {
    use super::Duration;

    /// Default client-side rate limit (requests per second, 0 = unlimited)
    pub const DEFAULT_RATE_LIMIT_RPS: u32 = 0;

    /// Maximum attempts for a single request, including the first one
    pub const MAX_ATTEMPTS: u32 = 3;

    /// Delay before the second attempt
    pub const INITIAL_RETRY_DELAY: Duration = Duration::from_millis(1000);

    /// Growth factor applied per attempt (1s, 2s, 4s, ...)
    pub const BACKOFF_MULTIPLIER: u32 = 2;

    /// Upper bound for the computed backoff delay
    pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(10);
}

/// Store and search behaviour
pub mod store {
    use super::Duration;

    /// Quiet period after the last search keystroke before a search fires
    pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);
}

/// Configuration file locations
pub mod config {
    /// Project-local configuration file name
    pub const LOCAL_FILE_NAME: &str = "character-catalog.toml";

    /// Directory under the user config dir
    pub const APP_DIR_NAME: &str = "character-catalog";

    /// Configuration file name inside the app directory
    pub const FILE_NAME: &str = "config.toml";
}

// Re-export commonly used constants for convenience
pub use api::{BASE_URL as API_BASE_URL, PAGE_SIZE};
pub use http::USER_AGENT;
pub use limits::MAX_ATTEMPTS;
