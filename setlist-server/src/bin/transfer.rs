//! setlist-transfer - seed or dump the setlist database from the command line
//!
//! ```text
//! setlist-transfer import songs.json
//! setlist-transfer export backup.json [--legacy]
//! ```
//!
//! `import` replaces both stores. A legacy file (`{"title": "lyrics"}`)
//! gets a fresh order with every song visible; a bundle file keeps its order.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use setlist_common::config::{ConfigOverrides, ServerConfig};
use setlist_common::{ExportFormat, Repository, SqliteStore, TransferDocument};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "setlist-transfer")]
#[command(about = "Import or export the setlist database")]
#[command(version)]
struct Args {
    /// Root folder holding the database
    #[arg(short, long, env = "SETLIST_ROOT_FOLDER", global = true)]
    root_folder: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Replace the stored songs and order with the contents of a file
    Import {
        file: PathBuf,
    },
    /// Write the stored songs and order to a file
    Export {
        file: PathBuf,
        /// Write the legacy `{"title": "lyrics"}` shape without the order
        #[arg(long)]
        legacy: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "setlist_common=info,setlist_transfer=info".into()),
        )
        .init();

    let args = Args::parse();

    let config = ServerConfig::resolve(ConfigOverrides {
        config_file: args.config,
        root_folder: args.root_folder,
        ..Default::default()
    })
    .context("Failed to load configuration")?;

    let store = SqliteStore::open(&config.database_path)
        .await
        .with_context(|| format!("Failed to open {}", config.database_path.display()))?;
    let repo = Repository::new(Arc::new(store));

    match args.action {
        Action::Import { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let document = TransferDocument::parse(&text)
                .with_context(|| format!("{} is not a setlist file", file.display()))?;
            let library = repo.import(document).await.context("Import failed")?;
            info!(
                "Imported {} songs from {}",
                library.songs.len(),
                file.display()
            );
        }
        Action::Export { file, legacy } => {
            let format = if legacy {
                ExportFormat::Legacy
            } else {
                ExportFormat::Bundle
            };
            let document = repo.export(format).await.context("Export failed")?;
            std::fs::write(&file, document.to_json_pretty()?)
                .with_context(|| format!("Failed to write {}", file.display()))?;
            info!("Exported to {}", file.display());
        }
    }

    Ok(())
}
