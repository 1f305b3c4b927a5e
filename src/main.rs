//! CLI entry point for tinyblog

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tinyblog")]
#[command(version)]
#[command(about = "A small blog backed by an embedded key-value store", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Database file (overrides db_path in _config.yml)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the blog server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to
        #[arg(short, long)]
        ip: Option<String>,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Author name
        #[arg(short, long, default_value = "")]
        author: String,

        /// Post body as markdown
        #[arg(short, long)]
        body: Option<String>,

        /// Read the post body from a file
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// List all posts
    List,

    /// Print a post
    Show {
        /// Slug of the post
        slug: String,

        /// Print the raw markdown instead of rendered HTML
        #[arg(long)]
        raw: bool,
    },

    /// Delete a post
    Delete {
        /// Slug of the post
        slug: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "tinyblog=debug,info"
    } else {
        "tinyblog=info"
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

    let mut blog = tinyblog::Blog::new(&base_dir)?;
    if let Some(db) = cli.db {
        blog = blog.with_db_path(db);
    }

    match cli.command {
        Commands::Serve { port, ip } => {
            let port = port.unwrap_or(blog.config.server.port);
            let ip = ip.unwrap_or_else(|| blog.config.server.ip.clone());

            tracing::info!("Starting server at http://{}:{}", ip, port);
            tinyblog::server::start(&blog, &ip, port).await?;
        }

        Commands::New {
            title,
            author,
            body,
            file,
        } => {
            tracing::info!("Creating new post with title: {}", title);
            tinyblog::commands::new::create_post(
                &blog,
                &title,
                &author,
                body.as_deref(),
                file.as_deref(),
            )?;
        }

        Commands::List => {
            tinyblog::commands::list::run(&blog)?;
        }

        Commands::Show { slug, raw } => {
            tinyblog::commands::show::run(&blog, &slug, raw)?;
        }

        Commands::Delete { slug } => {
            tinyblog::commands::delete::run(&blog, &slug)?;
            println!("Deleted: {}", slug);
        }

        Commands::Version => {
            println!("tinyblog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
