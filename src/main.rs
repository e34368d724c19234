//! Character Finder - MTG characters and the cards that name them
//!
//! Queries Scryfall for planeswalkers and legendary creatures and lists the
//! cards referencing each character. Results are cached for a week.

use character_finder::cache::DEFAULT_MAX_AGE_DAYS;
use character_finder::finder::DEFAULT_MIN_REFERENCES;
use character_finder::names::DEFAULT_MIN_NAME_LEN;
use character_finder::scryfall::DEFAULT_BASE_URL;
use character_finder::{report, CharacterFinder, FileCache, ScryfallClient, Settings};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Find MTG characters referenced by multiple cards
#[derive(Parser, Debug)]
#[command(name = "character_finder")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory holding cached Scryfall results
    #[arg(long, global = true, default_value_t = default_cache_dir())]
    cache_dir: String,

    /// Days before a cached result is fetched again
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_AGE_DAYS)]
    max_age_days: i64,

    /// Scryfall API base URL
    #[arg(long, global = true, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Pause between paginated requests in milliseconds
    #[arg(long, global = true, default_value_t = 200)]
    request_delay_ms: u64,

    /// Ignore cached results and fetch everything again
    #[arg(long, global = true, default_value_t = false)]
    refresh: bool,

    /// Also append log output to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List characters with their referencing cards (default)
    Find(FindArgs),
    /// List the cards referencing a single base name
    References {
        /// Character base name, e.g. "Teferi"
        name: String,
    },
    /// List planeswalker names without titles
    Planeswalkers,
    /// Inspect or clear the cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Args, Debug)]
struct FindArgs {
    /// Minimum number of referencing cards for a character to be listed
    #[arg(long, default_value_t = DEFAULT_MIN_REFERENCES)]
    min_references: usize,

    /// Skip base names shorter than this
    #[arg(long, default_value_t = DEFAULT_MIN_NAME_LEN)]
    min_name_len: usize,

    /// Print results as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

impl Default for FindArgs {
    fn default() -> Self {
        Self {
            min_references: DEFAULT_MIN_REFERENCES,
            min_name_len: DEFAULT_MIN_NAME_LEN,
            json: false,
        }
    }
}

#[derive(Subcommand, Debug)]
enum CacheAction {
    /// Show cached documents and their age
    Status,
    /// Delete all cached documents
    Clear,
}

/// Returns the default cache path: ~/.cache/character_finder
fn default_cache_dir() -> String {
    FileCache::default_dir().to_string_lossy().to_string()
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = character_finder::logging::init_logging(cli.log_file.as_deref()) {
        eprintln!("Failed to open log file: {}", e);
        std::process::exit(1);
    }

    let Some(max_age) = FileCache::max_age_from_days(cli.max_age_days) else {
        log::error!("Cache max age out of range: {} days", cli.max_age_days);
        std::process::exit(1);
    };

    let cache = match FileCache::new(&cli.cache_dir, max_age) {
        Ok(cache) => cache,
        Err(e) => {
            log::error!("Failed to open cache directory {}: {}", cli.cache_dir, e);
            std::process::exit(1);
        }
    };

    let client = ScryfallClient::with_delay(
        &cli.base_url,
        Duration::from_millis(cli.request_delay_ms),
    );

    let command = cli.command.unwrap_or(Command::Find(FindArgs::default()));
    let settings = match &command {
        Command::Find(args) => Settings {
            min_references: args.min_references,
            min_name_len: args.min_name_len,
            refresh: cli.refresh,
        },
        _ => Settings {
            refresh: cli.refresh,
            ..Settings::default()
        },
    };

    match command {
        Command::Cache { action } => run_cache(&cache, action),
        Command::Find(args) => {
            let finder = CharacterFinder::new(client, cache, settings);
            run_find(&finder, args.json).await
        }
        Command::References { name } => {
            let finder = CharacterFinder::new(client, cache, settings);
            run_references(&finder, &name).await
        }
        Command::Planeswalkers => {
            let finder = CharacterFinder::new(client, cache, settings);
            run_planeswalkers(&finder).await
        }
    }
}

async fn run_find(finder: &CharacterFinder, json: bool) {
    let characters = match finder.find_characters().await {
        Ok(characters) => characters,
        Err(e) => {
            log::error!("Failed to find characters: {}", e);
            std::process::exit(1);
        }
    };

    if json {
        match report::render_json(&characters) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                log::error!("Failed to render results: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        print!("\n{}", report::render_text(&characters));
    }
}

async fn run_references(finder: &CharacterFinder, name: &str) {
    match finder.character_references(name).await {
        Ok(references) => {
            println!("{} ({} cards):", name, references.len());
            for card in references {
                println!("  - {}", card);
            }
        }
        Err(e) => {
            log::error!("Error searching for {}: {}", name, e);
            std::process::exit(1);
        }
    }
}

async fn run_planeswalkers(finder: &CharacterFinder) {
    match finder.planeswalker_names().await {
        Ok(names) => {
            for name in names {
                println!("{}", name);
            }
        }
        Err(e) => {
            log::error!("Error fetching planeswalker names: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_cache(cache: &FileCache, action: CacheAction) {
    match action {
        CacheAction::Status => match cache.status() {
            Ok(statuses) => {
                println!("Cache directory: {}", cache.dir().display());
                for status in statuses {
                    let age = status
                        .age
                        .map(|a| format!("{}h", a.num_hours()))
                        .unwrap_or_else(|| "unreadable".to_string());
                    let state = if status.fresh { "fresh" } else { "stale" };
                    println!("  {:<40} {:>10}  {}", status.key, age, state);
                }
            }
            Err(e) => {
                log::error!("Failed to read cache directory: {}", e);
                std::process::exit(1);
            }
        },
        CacheAction::Clear => match cache.clear() {
            Ok(count) => println!("Removed {} cached documents", count),
            Err(e) => {
                log::error!("Failed to clear cache: {}", e);
                std::process::exit(1);
            }
        },
    }
}
