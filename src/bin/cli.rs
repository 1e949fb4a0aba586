//! Harvester CLI
//!
//! Local execution entry point.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use harvester::{
    error::Result,
    models::{Config, UrlCategory},
    pipeline,
    storage::{DOCUMENT_EXTENSION, DocumentStore},
};

/// Harvester - storefront order history export
#[derive(Parser, Debug)]
#[command(
    name = "harvester",
    version,
    about = "Harvests storefront order history into order and item tables"
)]

struct Cli {
    /// Path to storage directory containing config.toml and account data
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Discover order document URLs from the order history
    Crawl,

    /// Download documents from a discovered URL list
    Fetch {
        /// URL list to download (invoices, order-details, digital-invoices)
        #[arg(long)]
        list: Option<String>,
    },

    /// Extract stored documents into orders and items tables
    Extract,

    /// Run full pipeline: Crawl → Fetch → Extract
    Pipeline {
        /// Skip crawl and fetch, parse documents already stored
        #[arg(long)]
        parse_only: bool,
    },

    /// Validate configuration file
    Validate,

    /// Show stored lists and documents for the account
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("Harvester starting...");

    let config_path = cli.storage_dir.join("config.toml");
    let mut config = Config::load_or_default(&config_path);

    log::info!("Loaded configuration from {}", cli.storage_dir.display());

    let storage = pipeline::open_storage(&config, &cli.storage_dir);

    match cli.command {
        Command::Crawl => {
            config.validate()?;
            pipeline::run_crawl(&config, &storage).await?;
        }

        Command::Fetch { list } => {
            if let Some(list) = list {
                config.fetch.list = list;
            }
            config.validate()?;
            pipeline::run_fetch(&config, &storage).await?;
        }

        Command::Extract => {
            pipeline::run_extract(&config, &storage).await?;
        }

        Command::Pipeline { parse_only } => {
            if !parse_only {
                config.validate()?;
            }
            pipeline::run_pipeline(&config, &cli.storage_dir, parse_only).await?;
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");

            log::info!("All validations passed!");
        }

        Command::Info => {
            log::info!("Storage directory: {}", cli.storage_dir.display());
            log::info!("Account directory: {}", storage.root_dir().display());

            for category in UrlCategory::ALL {
                match storage.read_url_list(category.list_name()).await? {
                    Some(urls) => log::info!("{}: {} URLs", category.list_name(), urls.len()),
                    None => log::info!("{}: not crawled yet", category.list_name()),
                }
            }

            let documents = storage.list_documents().await?;
            log::info!(
                "Documents: {} .{} files in {}",
                documents.len(),
                DOCUMENT_EXTENSION,
                storage.documents_path().display()
            );

            for table in [&config.paths.orders_table, &config.paths.items_table] {
                let path = storage.root_dir().join(table);
                log::info!(
                    "{}: {}",
                    table,
                    if path.exists() { "exists" } else { "not found" }
                );
            }
        }
    }

    log::info!("Done!");

    Ok(())
}
