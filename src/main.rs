//! Character Catalog CLI application
//!
//! Command-line front end for browsing the Rick and Morty character catalog:
//! filtered listing, detail view with navigation, and debounced search.

use std::process;

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use character_catalog::cli::{
    build_store, handle_config, handle_list, handle_search, handle_show, load_config, Cli,
    Commands,
};
use character_catalog::errors::Result;

#[tokio::main]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    let cli = Cli::parse_args();
    let config = load_config(&cli.global).await;

    let configured_level = config
        .as_ref()
        .map(|config| config.logging.level.clone())
        .unwrap_or_else(|_| "warn".to_string());
    init_logging(&cli, &configured_level);

    info!("Character Catalog v{} starting", env!("CARGO_PKG_VERSION"));

    let quiet = cli.global.quiet;
    match cli.command {
        Commands::Config(args) => handle_config(args, config).await,
        Commands::List(args) => handle_list(args, build_store(&config?)?, quiet).await,
        Commands::Show(args) => handle_show(args, build_store(&config?)?, quiet).await,
        Commands::Search(args) => handle_search(args, build_store(&config?)?, quiet).await,
    }
}

/// Initialize logging from the verbosity flags, falling back to the
/// configured level
fn init_logging(cli: &Cli, configured_level: &str) {
    let level = cli
        .log_level()
        .map(|level| level.to_string())
        .unwrap_or_else(|| configured_level.to_string())
        .to_lowercase();

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = format!("character_catalog={}", level).parse() {
        filter = filter.add_directive(directive);
    }

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_level(cli.global.very_verbose)
        .init();

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
}
