mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "partfinder")]
#[command(about = "Find auto parts across OEM and aftermarket US retailers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search for a part and print the ranked listings as JSON
    Search {
        /// Free-text part description, e.g. "brake pads 2018 ford f-150"
        query: Option<String>,
        /// Force the vehicle brand instead of detecting it from the query
        #[arg(long)]
        brand: Option<String>,
        /// Photo of the part; its description is appended to the query
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// List registry brands with their OEM sites and compatible brands
    Brands,
    /// Check whether a query is accepted and which brand/model it resolves to
    Validate {
        query: String,
        #[arg(long)]
        brand: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = partfinder_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let registry = commands::load_registry(&config)?;

    match cli.command {
        Commands::Search {
            query,
            brand,
            image,
        } => {
            commands::run_search(
                &config,
                registry,
                query.as_deref(),
                brand.as_deref(),
                image.as_deref(),
            )
            .await
        }
        Commands::Brands => commands::run_brands(&registry),
        Commands::Validate { query, brand } => {
            commands::run_validate(&registry, &query, brand.as_deref())
        }
    }
}
