//! Command-line interface components
//!
//! This module contains CLI-specific code for the Character Catalog
//! application: argument parsing and the command handlers that print the
//! store's derived views.

pub mod args;
pub mod commands;

pub use args::{
    Cli, Commands, ConfigAction, ConfigArgs, FilterArgs, GlobalArgs, ListArgs, SearchArgs,
    ShowArgs,
};
pub use commands::{
    build_store, handle_config, handle_list, handle_search, handle_show, load_config,
};
