//! Content Indexer Main Entry Point
//!
//! Runs one operator action against the configured OpenSearch indices and
//! prints its JSON response.
//!
//! ```bash
//! content-indexer --content ./snapshot.json --options ./options.json create-mappings
//! content-indexer --content ./snapshot.json --options ./options.json index-posts --fresh
//! content-indexer --content ./snapshot.json --options ./options.json index-posts
//! ```

use std::env;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use content_indexer::{ActionResponse, ContentEvent, Dependencies, IndexingError};
use dotenv::dotenv;
use tokio::fs;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "content-indexer", version)]
struct Cli {
    /// JSON export of the host's sites, posts, terms and registered kinds
    #[arg(long, env = "CONTENT_SNAPSHOT", default_value = "./snapshot.json")]
    content: PathBuf,

    /// JSON options file holding settings and bulk-indexing progress
    #[arg(long, env = "OPTIONS_FILE", default_value = "./options.json")]
    options: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Recreate every configured index and install the mappings.
    CreateMappings,
    /// Index the next page of content.
    IndexPosts {
        /// Discard the stored progress and start over.
        #[arg(long)]
        fresh: bool,
    },
    /// Index every taxonomy term.
    IndexTaxonomies,
    /// Delete every configured index.
    ClearIndex,
    /// Apply a JSON array of lifecycle events to the live generation.
    ApplyEvents {
        /// File holding the events.
        events: PathBuf,
    },
}

/// Initialize tracing/logging.
///
/// Logs go to stderr so that stdout only carries the action response.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("content_indexer=info,content_index_repository=info")
    });

    let json_logs = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    info!(
        service_name = "content-indexer",
        service_version = env!("CARGO_PKG_VERSION"),
        json = json_logs,
        "Tracing initialized"
    );
}

async fn read_events(path: &Path) -> Result<Vec<ContentEvent>, IndexingError> {
    let raw = fs::read(path).await.map_err(|e| {
        IndexingError::config(format!("Failed to read events {}: {}", path.display(), e))
    })?;
    serde_json::from_slice(&raw).map_err(|e| {
        IndexingError::config(format!("Failed to parse events {}: {}", path.display(), e))
    })
}

async fn run(cli: Cli) -> Result<ActionResponse, IndexingError> {
    let deps = Dependencies::new(&cli.content, &cli.options).await?;
    info!("Dependencies initialized successfully");

    let response = match cli.command {
        Command::CreateMappings => deps.actions.create_mappings().await,
        Command::IndexPosts { fresh } => deps.actions.index_posts(fresh).await,
        Command::IndexTaxonomies => deps.actions.index_taxonomies().await,
        Command::ClearIndex => deps.actions.clear_index().await,
        Command::ApplyEvents { events } => {
            let events = read_events(&events).await?;
            deps.actions.apply_events(events).await
        }
    };
    Ok(response)
}

#[tokio::main]
async fn main() -> Result<(), IndexingError> {
    // Load environment variables from .env file
    dotenv().ok();

    init_tracing();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(response) => {
            let output = serde_json::to_string_pretty(&response)
                .map_err(|e| IndexingError::config(e.to_string()))?;
            println!("{}", output);

            if !response.is_success() {
                std::process::exit(1);
            }
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Content indexer failed");
            Err(e)
        }
    }
}
