//! GitAx - file version history for an external client
//!
//! # Usage
//! ```bash
//! gitax serve --port 3001                     # Start the HTTP API
//! gitax history --repo /path/to/repo a.xpo    # Versions of one file
//! gitax sync --repo /path/to/repo src --force # Check a folder out at HEAD
//! gitax index --repo /path/to/repo            # Dirty files with copies
//! ```

use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gitax::{routes, version, GitRepository, Settings};

/// GitAx - file-level history, versions and status over a git repository
#[derive(Parser)]
#[command(name = "gitax")]
#[command(about = "File version history over a git working tree", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    settings: Settings,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        /// Address to bind to
        #[arg(long, env = "GITAX_HOST", default_value = "127.0.0.1")]
        host: IpAddr,

        /// Port to run the server on
        #[arg(short, long, env = "GITAX_PORT", default_value = "3001")]
        port: u16,
    },
    /// Create an empty repository
    Init {
        #[arg(value_name = "REPO_PATH")]
        repo: PathBuf,
    },
    /// Print tool and libgit2 versions
    Version,
    /// List the commits that changed a file, materializing each version
    History {
        #[command(flatten)]
        target: FileTarget,
    },
    /// Check a file out at a commit, or write a commit/blob version elsewhere
    GetVersion {
        #[command(flatten)]
        target: FileTarget,

        /// Commit id, or blob id when writing to a destination
        #[arg(long)]
        id: String,

        /// Write the version here instead of into the working tree
        #[arg(long)]
        destination: Option<PathBuf>,
    },
    /// Restore a file to its latest committed version
    Undo {
        #[command(flatten)]
        target: FileTarget,

        /// Overwrite local changes
        #[arg(short, long)]
        force: bool,
    },
    /// Check whether a file exists in any commit reachable from HEAD
    Exists {
        #[command(flatten)]
        target: FileTarget,
    },
    /// Check a folder out at the HEAD tip and list its files of interest
    Sync {
        #[arg(long, default_value = ".")]
        repo: PathBuf,

        /// Folder to synchronise
        #[arg(value_name = "FOLDER")]
        folder: PathBuf,

        /// Overwrite local changes
        #[arg(short, long)]
        force: bool,
    },
    /// Working tree status of a file
    Status {
        #[command(flatten)]
        target: FileTarget,
    },
    /// List staged, modified and untracked files with materialized copies
    Index {
        #[arg(long, default_value = ".")]
        repo: PathBuf,
    },
    /// Check whether a path is the repository's working directory
    IsRoot {
        #[command(flatten)]
        target: FileTarget,
    },
}

#[derive(clap::Args)]
struct FileTarget {
    /// Repository working directory
    #[arg(long, default_value = ".")]
    repo: PathBuf,

    /// File path, absolute or relative to the working directory
    #[arg(value_name = "PATH")]
    path: PathBuf,
}

impl FileTarget {
    fn open(&self, settings: &Settings) -> GitRepository {
        GitRepository::with_settings(&self.repo, settings)
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings = cli.settings;

    match cli.command {
        Commands::Serve { host, port } => serve(settings, host, port).await?,
        Commands::Init { repo } => {
            let repo = GitRepository::init(&repo)?;
            println!("Initialized empty repository in {}", repo.path.display());
        }
        Commands::Version => println!("{}", version()),
        Commands::History { target } => {
            print_json(&target.open(&settings).file_history(&target.path)?)?
        }
        Commands::GetVersion {
            target,
            id,
            destination,
        } => {
            let repo = target.open(&settings);
            let written = match destination {
                Some(destination) => repo.file_get_version_to(&target.path, &id, destination)?,
                None => repo.file_get_version(&target.path, &id)?,
            };
            println!("{}", written.display());
        }
        Commands::Undo { target, force } => {
            let success = target.open(&settings).file_undo_checkout(&target.path, force)?;
            println!("{}", success);
        }
        Commands::Exists { target } => {
            println!("{}", target.open(&settings).file_exists(&target.path)?)
        }
        Commands::Sync {
            repo,
            folder,
            force,
        } => {
            let repo = GitRepository::with_settings(&repo, &settings);
            print_json(&repo.folder_sync(&folder, force)?)?
        }
        Commands::Status { target } => {
            print_json(&target.open(&settings).get_file_status(&target.path)?)?
        }
        Commands::Index { repo } => {
            let repo = GitRepository::with_settings(&repo, &settings);
            print_json(&repo.get_files_in_index()?)?
        }
        Commands::IsRoot { target } => {
            println!("{}", target.open(&settings).is_root_folder(&target.path)?)
        }
    }

    Ok(())
}

async fn serve(settings: Settings, host: IpAddr, port: u16) -> anyhow::Result<()> {
    let artifact_dir = settings.artifact_dir();
    let extension = settings.extension().to_string();

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(routes::create_router(Arc::new(settings)))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = std::net::SocketAddr::new(host, port);
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("✗ Failed to bind to {}: {}", addr, e);
            eprintln!("  Try a different port with --port <PORT>");
            std::process::exit(1);
        }
    };

    println!();
    println!("  {}", version());
    println!();
    println!("  Server:     http://{}", addr);
    println!("  Artifacts:  {}", artifact_dir.display());
    println!("  Sync files: *.{}", extension);
    println!();
    println!("  Press Ctrl+C to stop");
    println!();

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
        }
        println!("\n  Shutting down...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
