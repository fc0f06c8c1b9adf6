//! Data models for Character Catalog
//!
//! This module defines the wire types returned by the catalog API and the
//! filter criteria the store sends back to it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Life status of a character as reported by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterStatus {
    Alive,
    Dead,
    #[serde(rename = "unknown")]
    Unknown,
}

impl CharacterStatus {
    /// Wire representation, also used as the `status` filter value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alive => "Alive",
            Self::Dead => "Dead",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for CharacterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CharacterStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "alive" => Ok(Self::Alive),
            "dead" => Ok(Self::Dead),
            "unknown" => Ok(Self::Unknown),
            other => Err(format!(
                "unknown status '{}', expected one of: Alive, Dead, unknown",
                other
            )),
        }
    }
}

/// Named link to an origin or last-known location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRef {
    pub name: String,
    /// API URL of the location, empty when unknown
    pub url: String,
}

/// A character record
///
/// Records are immutable once fetched; the store caches them by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: u32,
    pub name: String,
    pub status: CharacterStatus,
    pub species: String,
    /// Sub-species or variant; the API calls this field `type`
    #[serde(rename = "type", default)]
    pub kind: String,
    pub gender: String,
    pub origin: LocationRef,
    pub location: LocationRef,
    /// Avatar image URL
    pub image: String,
    /// Episode URLs in air order
    pub episode: Vec<String>,
    /// Canonical API URL of this character
    pub url: String,
    pub created: DateTime<Utc>,
}

impl Character {
    /// Episode number parsed from the last path segment of each episode URL
    pub fn episode_numbers(&self) -> Vec<u32> {
        self.episode
            .iter()
            .filter_map(|url| url.rsplit('/').next())
            .filter_map(|segment| segment.parse().ok())
            .collect()
    }
}

/// Pagination metadata for a filtered result set
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageInfo {
    /// Total number of matching characters
    pub count: u32,
    /// Total number of pages
    pub pages: u32,
    /// Cursor URL of the next page
    pub next: Option<String>,
    /// Cursor URL of the previous page
    pub prev: Option<String>,
}

impl PageInfo {
    /// Metadata for a result set with no matches
    pub fn empty() -> Self {
        Self::default()
    }
}

/// One page of a list endpoint response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterPage {
    pub info: PageInfo,
    pub results: Vec<Character>,
}

impl CharacterPage {
    /// IDs of the page's results in response order
    pub fn ids(&self) -> Vec<u32> {
        self.results.iter().map(|character| character.id).collect()
    }
}

/// Filter criteria for list queries
///
/// Values are passed to the API verbatim. A field only counts as set when it
/// holds non-blank text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CharacterFilters {
    pub status: Option<String>,
    pub species: Option<String>,
    pub gender: Option<String>,
    pub name: Option<String>,
}

impl CharacterFilters {
    /// Create an empty filter set
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_species(mut self, species: impl Into<String>) -> Self {
        self.species = Some(species.into());
        self
    }

    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Query parameters for every set field, in `status`, `species`,
    /// `gender`, `name` order
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        [
            ("status", &self.status),
            ("species", &self.species),
            ("gender", &self.gender),
            ("name", &self.name),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .map(|v| (key, v))
        })
        .collect()
    }

    /// Whether any field is set
    pub fn is_active(&self) -> bool {
        !self.query_pairs().is_empty()
    }
}
