mod highlights;
mod ingest;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "newsdesk-cli")]
#[command(about = "newsdesk pipeline command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch the latest articles, enrich them, and persist to the store
    Ingest {
        /// Minimum number of articles to request per source
        #[arg(long)]
        min_results: Option<usize>,

        /// Fetch and normalize only; skip model calls and database writes
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the current ranked highlights
    Highlights {
        /// Maximum highlights to print (per category when partitioned)
        #[arg(long)]
        top_k: Option<usize>,

        /// Rank independently within each category
        #[arg(long)]
        per_category: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut config = newsdesk_core::load_app_config()?;

    match cli.command {
        Commands::Ingest {
            min_results,
            dry_run,
        } => {
            if let Some(n) = min_results {
                config.ingest_min_results = n;
            }
            ingest::run(&config, dry_run).await
        }
        Commands::Highlights {
            top_k,
            per_category,
        } => {
            if let Some(k) = top_k {
                config.highlight_top_k = k;
            }
            highlights::run(&config, per_category).await
        }
    }
}
