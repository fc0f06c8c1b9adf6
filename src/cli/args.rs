//! Command-line argument parsing for Character Catalog
//!
//! This module defines the CLI structure using clap derive macros: listing
//! with filters, detail view with navigation, debounced search, and
//! configuration management.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::app::{CharacterFilters, CharacterStatus};

/// Character Catalog - browse the Rick and Morty character catalog
#[derive(Parser, Debug)]
#[command(
    name = "character_catalog",
    version,
    about = "Browse the Rick and Morty character catalog from the command line",
    long_about = "A caching catalog client for the Rick and Morty API.
Supports filtered listing with infinite paging, detail views with previous/next navigation,
and rate-limit aware retries."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override the character endpoint URL
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List characters matching the given filters
    List(ListArgs),

    /// Show one character with previous/next navigation
    Show(ShowArgs),

    /// Search characters by name, one term per keystroke burst
    Search(SearchArgs),

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Filter flags shared by listing commands
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Life status (Alive, Dead, unknown)
    #[arg(long)]
    pub status: Option<CharacterStatus>,

    /// Species, e.g. "Human" or "Alien"
    #[arg(long)]
    pub species: Option<String>,

    /// Gender (Female, Male, Genderless, unknown)
    #[arg(long)]
    pub gender: Option<String>,

    /// Name or part of a name
    #[arg(long)]
    pub name: Option<String>,
}

impl FilterArgs {
    /// Convert to store filter criteria
    pub fn to_filters(&self) -> CharacterFilters {
        CharacterFilters {
            status: self.status.map(|status| status.as_str().to_string()),
            species: self.species.clone(),
            gender: self.gender.clone(),
            name: self.name.clone(),
        }
    }
}

/// Arguments for the list command
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Number of pages to load
    #[arg(short, long, default_value = "1")]
    pub pages: u32,
}

impl ListArgs {
    pub fn validate(&self) -> Result<(), String> {
        if self.pages == 0 {
            return Err("--pages must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Arguments for the show command
#[derive(Args, Debug, Clone)]
pub struct ShowArgs {
    /// Character ID
    pub id: u32,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// Step to the next character in the list, loading more pages as needed
    #[arg(long, conflicts_with = "prev")]
    pub next: bool,

    /// Step to the previous character in the list
    #[arg(long)]
    pub prev: bool,
}

/// Arguments for the search command
#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Search terms, fed to the debouncer in order as if typed
    #[arg(required = true)]
    pub terms: Vec<String>,

    /// Pause between terms in milliseconds (below the quiet period, terms
    /// supersede each other)
    #[arg(long, default_value = "0")]
    pub typing_delay_ms: u64,
}

/// Arguments for configuration management
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a default configuration file
    Init {
        /// Destination (defaults to the per-user config path)
        #[arg(long, value_name = "FILE")]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Logging level requested by verbosity flags, if any
    ///
    /// `None` means the configured `[logging] level` applies.
    pub fn log_level(&self) -> Option<tracing::Level> {
        if self.global.quiet {
            Some(tracing::Level::ERROR)
        } else if self.global.very_verbose {
            Some(tracing::Level::DEBUG)
        } else if self.global.verbose {
            Some(tracing::Level::INFO)
        } else {
            None
        }
    }
}
