//! Command handlers for Character Catalog CLI
//!
//! This module implements the command handlers that coordinate between CLI
//! arguments and the store. They only read derived views and call store
//! operations; all fetching and caching happens in the library.

use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::app::{CatalogClient, Character, CharacterStore, SearchDebouncer};
use crate::cli::{ConfigAction, ConfigArgs, GlobalArgs, ListArgs, SearchArgs, ShowArgs};
use crate::config::AppConfig;
use crate::errors::{AppError, Result};

/// Load the effective configuration for this invocation
///
/// Applies the `--base-url` flag on top of the file and environment.
pub async fn load_config(global: &GlobalArgs) -> Result<AppConfig> {
    let mut config = AppConfig::load(global.config.clone()).await?;
    if let Some(base_url) = &global.base_url {
        debug!("Using API base URL from command line");
        config.client.base_url = base_url.clone();
        config.validate()?;
    }
    Ok(config)
}

/// Build the shared store for one invocation
pub fn build_store(config: &AppConfig) -> Result<Arc<CharacterStore>> {
    let client = CatalogClient::with_config(config.client.clone())?;
    Ok(Arc::new(CharacterStore::with_config(
        client,
        config.store.clone(),
    )))
}

/// Handle the list command
///
/// Loads the first page for the filters, then keeps loading until the
/// requested page count is reached or the server runs out of pages.
pub async fn handle_list(args: ListArgs, store: Arc<CharacterStore>, quiet: bool) -> Result<()> {
    args.validate().map_err(AppError::generic)?;

    let spinner = spinner("Loading characters...", quiet);
    store.apply_filters(args.filters.to_filters()).await;

    for page in 2..=args.pages {
        if !store.has_next_page() || store.error().is_some() {
            break;
        }
        spinner.set_message(format!("Loading page {}...", page));
        store.load_next_page().await;
    }
    spinner.finish_and_clear();

    report_error(&store)?;
    print_list(&store);
    Ok(())
}

/// Handle the show command
///
/// Loads the filtered list until it contains the requested character (so
/// navigation has neighbours), then prints the character or the one the
/// `--next`/`--prev` flag steps to.
pub async fn handle_show(args: ShowArgs, store: Arc<CharacterStore>, quiet: bool) -> Result<()> {
    let spinner = spinner(&format!("Loading character {}...", args.id), quiet);

    store.apply_filters(args.filters.to_filters()).await;
    while store.current_index(args.id).is_none()
        && store.has_next_page()
        && store.error().is_none()
    {
        spinner.set_message(format!("Loading page {}...", store.current_page() + 1));
        store.load_next_page().await;
    }

    let mut current = args.id;
    if store.current_index(current).is_none() {
        info!("Character {} is not in the filtered list", current);
    } else if args.next {
        match store.next_id_with_prefetch(current).await {
            Some(next) => current = next,
            None => println!("Character {} is the last one in this list.", current),
        }
    } else if args.prev {
        match store.previous_id(current) {
            Some(prev) => current = prev,
            None => println!("Character {} is the first one in this list.", current),
        }
    }

    let character = store.load_page_containing(current).await;
    spinner.finish_and_clear();

    let character = character?;
    print_detail(&character);
    print_neighbours(&store, current).await;
    Ok(())
}

/// Handle the search command
///
/// Feeds each term through the debouncer as if typed, then waits for the
/// last one to fire.
pub async fn handle_search(
    args: SearchArgs,
    store: Arc<CharacterStore>,
    quiet: bool,
) -> Result<()> {
    let debouncer = SearchDebouncer::new(Arc::clone(&store));
    let spinner = spinner("Searching...", quiet);

    let mut handles = Vec::with_capacity(args.terms.len());
    for term in &args.terms {
        debug!("Search input: '{}'", term);
        handles.push(debouncer.input(term));
        if args.typing_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(args.typing_delay_ms)).await;
        }
    }
    for handle in handles {
        handle
            .await
            .map_err(|e| AppError::generic(format!("Search task failed: {}", e)))?;
    }
    spinner.finish_and_clear();

    report_error(&store)?;
    print_list(&store);
    Ok(())
}

/// Handle configuration commands
///
/// `config` is the outcome of loading the effective configuration; `init`
/// ignores it so a broken file can still be replaced with `--force`.
pub async fn handle_config(args: ConfigArgs, config: Result<AppConfig>) -> Result<()> {
    match args.action {
        ConfigAction::Init { path, force } => {
            let path = match path {
                Some(path) => path,
                None => AppConfig::default_config_path()?,
            };
            AppConfig::default().write_to(&path, force).await?;
            println!("Created configuration file: {}", path.display());
        }
        ConfigAction::Show => {
            print!("{}", config?.to_toml()?);
        }
    }
    Ok(())
}

fn spinner(message: &str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style.tick_strings(&["◐", "◓", "◑", "◒"]));
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

/// Fail when nothing could be loaded; warn when stale data is still shown
fn report_error(store: &CharacterStore) -> Result<()> {
    if let Some(message) = store.error() {
        if store.display_ids().is_empty() {
            return Err(AppError::generic(message));
        }
        warn!("{}", message);
        eprintln!("Warning: {} (showing previously loaded results)", message);
    }
    Ok(())
}

fn print_list(store: &CharacterStore) {
    let snapshot = store.snapshot();

    if snapshot.has_no_results {
        if snapshot.has_active_filters {
            println!("No characters match the current filters.");
        } else {
            println!("No characters found.");
        }
        return;
    }

    println!(
        "{:>5}  {:<32} {:<8} {:<16} {}",
        "ID", "NAME", "STATUS", "SPECIES", "GENDER"
    );
    for character in &snapshot.characters {
        println!(
            "{:>5}  {:<32} {:<8} {:<16} {}",
            character.id,
            truncate(&character.name, 32),
            character.status,
            truncate(&character.species, 16),
            character.gender
        );
    }

    println!();
    println!(
        "Showing {} of {} characters (page {} of {})",
        snapshot.characters.len(),
        snapshot.total_count,
        snapshot.current_page,
        snapshot.total_pages
    );
    if snapshot.has_next_page {
        println!("More characters available; raise --pages to load them.");
    }
}

fn print_detail(character: &Character) {
    println!("#{} {}", character.id, character.name);
    println!("  Status:    {}", character.status);
    println!("  Species:   {}", character.species);
    if !character.kind.is_empty() {
        println!("  Type:      {}", character.kind);
    }
    println!("  Gender:    {}", character.gender);
    println!("  Origin:    {}", character.origin.name);
    println!("  Location:  {}", character.location.name);
    println!("  Image:     {}", character.image);

    let episodes = character.episode_numbers();
    if episodes.is_empty() {
        println!("  Episodes:  none");
    } else {
        let list = episodes
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        println!("  Episodes:  {} ({})", episodes.len(), list);
    }
    println!("  Created:   {}", character.created.format("%Y-%m-%d"));
}

/// Print the list position and the resolved previous/next characters
async fn print_neighbours(store: &CharacterStore, id: u32) {
    let Some(index) = store.current_index(id) else {
        return;
    };

    println!();
    println!(
        "Position {} of {} loaded ({} total)",
        index + 1,
        store.display_ids().len(),
        store.total_count()
    );

    let prev_id = store.previous_id(id);
    let next_id = store.next_id(id);
    let wanted: Vec<u32> = prev_id.into_iter().chain(next_id).collect();
    let neighbours = match store.load_characters(&wanted).await {
        Ok(characters) => characters,
        Err(e) => {
            warn!("Could not resolve neighbours of {}: {}", id, e);
            Vec::new()
        }
    };
    let find = |target: Option<u32>| {
        target.and_then(|target| neighbours.iter().find(|c| c.id == target))
    };

    if let Some(prev) = find(prev_id) {
        println!("  Previous:  #{} {}", prev.id, prev.name);
    }
    match find(next_id) {
        Some(next) => println!("  Next:      #{} {}", next.id, next.name),
        None if next_id.is_none() && store.can_advance(id) => {
            println!("  Next:      (on the next page)")
        }
        None => {}
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(width.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}
