//! HTTP client for the character catalog API
//!
//! The module is organized into specialized components:
//! - `config`: HTTP client configuration, building, and the retry schedule
//! - `http`: Core HTTP operations with rate limiting and retry
//! - `query`: List query and entity URL construction
//!
//! [`CatalogClient`] sits on top and turns responses into typed results.
//! Status interpretation that depends on context (a 404 on a list page may
//! mean "no matches" or "no more pages") is left to the caller.

use reqwest::Response;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::app::models::{Character, CharacterFilters, CharacterPage};
use crate::errors::{FetchError, FetchResult};

pub mod config;
pub mod http;
pub mod query;

pub use self::config::{ClientConfig, RetryPolicy};
pub use self::query::{
    build_characters_url, character_url, characters_by_ids_url, extract_page_from_url,
};

use self::http::HttpHandler;

/// Typed client for the character endpoints
#[derive(Debug)]
pub struct CatalogClient {
    http_handler: HttpHandler,
    base_url: Url,
}

impl CatalogClient {
    /// Creates a client for the public API with default settings
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the HTTP client cannot be built
    pub fn new() -> FetchResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a client with custom configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` for an unparsable base URL, or
    /// `FetchError::Network` if the HTTP client cannot be built
    pub fn with_config(config: ClientConfig) -> FetchResult<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| FetchError::InvalidUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        let client = config.build_http_client()?;
        let http_handler = HttpHandler::new(client, config.rate_limit_rps, config.retry);

        info!("Created catalog client for {}", base_url);

        Ok(Self {
            http_handler,
            base_url,
        })
    }

    /// Fetches one page of the filtered character list
    ///
    /// Returns `Ok(None)` when the API answers 404, which it does both for
    /// filters matching nothing and for pages past the end.
    ///
    /// # Errors
    ///
    /// Returns `FetchError` for exhausted retries, other non-success statuses,
    /// or a malformed body
    pub async fn fetch_characters_page(
        &self,
        page: u32,
        filters: &CharacterFilters,
    ) -> FetchResult<Option<CharacterPage>> {
        let url = build_characters_url(&self.base_url, page, filters);
        let response = self.http_handler.get_response(&url).await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            debug!("No results for page {} ({})", page, url);
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(FetchError::from_status(response.status()));
        }

        let data: CharacterPage = read_json(response).await?;
        debug!(
            "Fetched page {} with {} characters",
            page,
            data.results.len()
        );
        Ok(Some(data))
    }

    /// Fetches a single character by ID
    ///
    /// # Errors
    ///
    /// Returns `FetchError::NotFound` when the API answers 404
    pub async fn fetch_character(&self, id: u32) -> FetchResult<Character> {
        let url = character_url(&self.base_url, id)?;
        let response = self.http_handler.get_response(&url).await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound { id });
        }
        if !response.status().is_success() {
            return Err(FetchError::from_status(response.status()));
        }

        read_json(response).await
    }

    /// Fetches several characters in one request
    ///
    /// The API answers a single ID with a bare object and several IDs with an
    /// array; both shapes are accepted. An empty `ids` slice makes no request.
    pub async fn fetch_characters_by_ids(&self, ids: &[u32]) -> FetchResult<Vec<Character>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = characters_by_ids_url(&self.base_url, ids)?;
        let response = self.http_handler.get_response(&url).await?;

        if !response.status().is_success() {
            return Err(FetchError::from_status(response.status()));
        }

        let characters = match read_json::<OneOrMany>(response).await? {
            OneOrMany::Many(characters) => characters,
            OneOrMany::One(character) => vec![*character],
        };
        Ok(characters)
    }

    /// Get the character collection URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<Character>),
    One(Box<Character>),
}

async fn read_json<T: DeserializeOwned>(response: Response) -> FetchResult<T> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
