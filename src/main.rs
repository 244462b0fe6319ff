//! CLI entry point for folio

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio::commands::new::NewDocument;
use folio::listing::ListingQuery;
use folio::Folio;

#[derive(Parser)]
#[command(name = "folio")]
#[command(version = "0.1.0")]
#[command(about = "List, filter and paginate front-matter content for a portfolio site", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print one page of a section, newest first
    #[command(alias = "ls")]
    List {
        /// Section to list (post, portfolio, ...)
        #[arg(default_value = "post")]
        section: String,

        /// Only show records in this category
        #[arg(short, long)]
        tag: Option<String>,

        /// Page number, starting at 1
        #[arg(short, long)]
        page: Option<String>,
    },

    /// Show the tags of a section with record counts
    Tags {
        #[arg(default_value = "post")]
        section: String,
    },

    /// Create a new document in a section
    New {
        /// Section to write into
        #[arg(short, long, default_value = "post")]
        section: String,

        /// Title of the new document
        title: String,

        #[arg(short, long)]
        category: Option<String>,

        #[arg(long)]
        summary: Option<String>,
    },

    /// Report documents that fail to load
    Check,

    /// Start the JSON preview server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio=debug,info"
    } else {
        "folio=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("failed to read current directory")?,
    };

    match cli.command {
        Commands::List { section, tag, page } => {
            let folio = Folio::new(&base_dir)?;
            let query = ListingQuery::new(tag.as_deref(), page.as_deref());
            folio::commands::list::run(&folio, &section, &query)?;
        }

        Commands::Tags { section } => {
            let folio = Folio::new(&base_dir)?;
            folio::commands::list::tags(&folio, &section)?;
        }

        Commands::New {
            section,
            title,
            category,
            summary,
        } => {
            let folio = Folio::new(&base_dir)?;
            tracing::info!("Creating new {} with title: {}", section, title);
            let doc = NewDocument {
                title: &title,
                category: category.as_deref(),
                summary: summary.as_deref(),
            };
            folio::commands::new::run(&folio, &section, &doc)?;
        }

        Commands::Check => {
            let folio = Folio::new(&base_dir)?;
            folio::commands::check::run(&folio)?;
        }

        Commands::Serve { port, ip } => {
            let folio = Folio::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            folio::server::start(&folio, &ip, port).await?;
        }

        Commands::Version => {
            println!("folio version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
