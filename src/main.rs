//! CLI entry point for notes-rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use notes_rs::commands::list::Listing;

#[derive(Parser)]
#[command(name = "notes-rs")]
#[command(version)]
#[command(about = "Query the notes and blog posts of a Markdown/MDX site", long_about = None)]
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
    /// List items of a collection, newest first
    #[command(alias = "ls")]
    List {
        /// Collection name
        #[arg(default_value = "notes")]
        collection: String,

        /// Only items in this category (case-insensitive)
        #[arg(short = 'C', long)]
        category: Option<String>,
    },

    /// Print one item as JSON
    Show {
        /// Collection name
        collection: String,

        /// Item slug
        slug: String,
    },

    /// Search titles, descriptions and content
    Search {
        /// Collection name
        collection: String,

        /// Case-insensitive search text
        query: String,
    },

    /// List the categories of a collection
    Categories {
        /// Collection name
        #[arg(default_value = "notes")]
        collection: String,
    },

    /// List items grouped by year
    Archive {
        /// Collection name
        #[arg(default_value = "blog")]
        collection: String,
    },

    /// Serve the collections as a JSON API
    #[command(alias = "s")]
    Serve {
        /// Port to listen on (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to (defaults to the configured address)
        #[arg(short, long)]
        ip: Option<String>,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "notes_rs=debug,info"
    } else {
        "notes_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::List {
            collection,
            category,
        } => {
            let site = notes_rs::Site::new(&base_dir)?;
            notes_rs::commands::list::run(&site, &collection, &Listing::Items { category })?;
        }

        Commands::Show { collection, slug } => {
            let site = notes_rs::Site::new(&base_dir)?;
            notes_rs::commands::show::run(&site, &collection, &slug)?;
        }

        Commands::Search { collection, query } => {
            let site = notes_rs::Site::new(&base_dir)?;
            notes_rs::commands::search::run(&site, &collection, &query)?;
        }

        Commands::Categories { collection } => {
            let site = notes_rs::Site::new(&base_dir)?;
            notes_rs::commands::list::run(&site, &collection, &Listing::Categories)?;
        }

        Commands::Archive { collection } => {
            let site = notes_rs::Site::new(&base_dir)?;
            notes_rs::commands::list::run(&site, &collection, &Listing::Archive)?;
        }

        Commands::Serve { port, ip } => {
            let site = notes_rs::Site::new(&base_dir)?;
            let ip = ip.unwrap_or_else(|| site.config.server.ip.clone());
            let port = port.unwrap_or(site.config.server.port);

            tracing::info!("Starting server at http://{}:{}", ip, port);
            notes_rs::server::start(site, &ip, port).await?;
        }

        Commands::Version => {
            println!("notes-rs version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
