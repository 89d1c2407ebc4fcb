//! huginn: model repository mirror CLI
//!
//! Mirrors the files a consumer needs from a remote hub into the local cache.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{debug, warn};

use huginn::{Huginn, HuginnConfig, RemoteRepository, RequiredFileSet};

/// Huginn model repository mirror
#[derive(Parser)]
#[command(name = "huginn")]
#[command(version = huginn::PKG_VERSION)]
#[command(about = "Resumable mirror for HuggingFace-style model repositories")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Cache base directory (overrides config and HUGINN_CACHE_DIR).
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download the required files of a repository
    Sync {
        /// Remote namespace, e.g. owner/name
        namespace: String,
        /// Local folder name (default: last namespace segment)
        #[arg(long)]
        folder: Option<String>,
        /// Variant folder; bare --require bundles are placed under it
        #[arg(long)]
        variant: Option<String>,
        /// Revision to mirror
        #[arg(long, default_value = "main")]
        revision: String,
        /// Required file or bundle path (repeatable)
        #[arg(short, long = "require")]
        require: Vec<String>,
    },

    /// Delete a mirrored repository
    Clear {
        /// Local folder name
        folder: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: info; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    debug!(version = %huginn::version::version_string(), "starting");
    let config = HuginnConfig::load(args.config.as_deref())?;

    let mut builder = Huginn::builder().config(&config);
    if let Some(dir) = args.base_dir {
        builder = builder.base_dir(dir);
    }
    let mirror = builder.build()?;

    let cancel = mirror.cancellation();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling (press Ctrl-C again to exit immediately)");
            cancel.cancel();
        }
        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(130);
        }
    });

    match args.command {
        Command::Sync {
            namespace,
            folder,
            variant,
            revision,
            require,
        } => {
            let mut repo = RemoteRepository::new(namespace).revision(revision);
            if let Some(folder) = folder {
                repo = repo.folder_name(folder);
            }
            let required = required_files(&require, variant.as_deref());
            if let Some(variant) = variant {
                repo = repo.variant(variant);
            }

            let report = mirror.sync(&repo, &required).await?;
            println!(
                "{}: {} downloaded ({} bytes), {} already present, {} skipped",
                report.root.display(),
                report.downloaded.len(),
                report.bytes,
                report.already_present,
                report.skipped.len()
            );
        }
        Command::Clear { folder } => {
            let repo = RemoteRepository::new(folder.clone()).folder_name(folder);
            let root = mirror.repository_dir(&repo)?;
            if mirror.clear(&repo).await? {
                println!("removed {}", root.display());
            } else {
                println!("nothing to remove at {}", root.display());
            }
        }
    }

    Ok(())
}

/// Place bare bundle paths under the variant folder, if one was given.
fn required_files(require: &[String], variant: Option<&str>) -> RequiredFileSet {
    require
        .iter()
        .map(|path| match variant {
            Some(variant) if !path.contains('/') => format!("{variant}/{path}"),
            _ => path.clone(),
        })
        .collect()
}
