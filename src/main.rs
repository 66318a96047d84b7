//! CLI entry point for pressroom

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pressroom")]
#[command(version)]
#[command(about = "A static blog listing generator for headless WordPress sites", long_about = None)]
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
    /// Generate the static posts listing
    #[command(alias = "g")]
    Generate,

    /// Start a local preview server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,
    },

    /// Clean the public folder
    Clean,

    /// List CMS content
    List {
        /// Type of content to list (post, author, tag, category)
        #[arg(default_value = "post")]
        r#type: String,

        /// Only list items matching this search
        #[arg(short, long)]
        search: Option<String>,

        /// Page of posts to list
        #[arg(short, long, default_value = "1")]
        page: usize,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "pressroom=debug,info"
    } else {
        "pressroom=info"
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
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Generate => {
            let site = pressroom::Site::new(&base_dir)?;
            tracing::info!("Generating posts listing...");
            site.generate().await?;
            println!("Generated successfully!");
        }

        Commands::Server { port, ip, open } => {
            let site = pressroom::Site::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            pressroom::server::start(&site, &ip, port, open).await?;
        }

        Commands::Clean => {
            let site = pressroom::Site::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List {
            r#type,
            search,
            page,
        } => {
            let site = pressroom::Site::new(&base_dir)?;
            pressroom::commands::list::run(&site, &r#type, search.as_deref(), page).await?;
        }

        Commands::Version => {
            println!("pressroom version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
