mod add;
mod auth;
mod export;
mod show;

use crate::config::Config;
use crate::drive::DriveClient;
use crate::error::{AppError, Result};
use crate::models::StoredDocument;
use crate::persistence::PersistenceService;
use crate::store::FileStore;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::warn;

pub use auth::AuthAction;
pub use show::ShowResource;

#[derive(Parser, Debug)]
#[command(name = "finance-tracker")]
#[command(about = "Track assets, liabilities, income and expenses, stored locally or in Google Drive", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub async fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Auth { action } => action.execute().await,
            Commands::Add(args) => add::execute(args).await,
            Commands::Show { resource } => resource.execute().await,
            Commands::Export { path } => export::export(path).await,
            Commands::Import { path } => export::import(path).await,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage Google Drive authorization
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Record a new transaction
    Add(add::AddArgs),
    /// Show tracker data
    Show {
        #[command(subcommand)]
        resource: ShowResource,
    },
    /// Export all transactions to a CSV file
    Export { path: PathBuf },
    /// Import transactions from a CSV file, replacing entries with the same id
    Import { path: PathBuf },
}

pub(crate) type Service = PersistenceService<FileStore, DriveClient>;

pub(crate) fn service() -> Result<Service> {
    let config = Config::load()?;
    PersistenceService::from_config(&config)
}

/// Save, presenting remote failures as "saved locally, will sync later" and
/// auth failures as "please reconnect".
pub(crate) async fn save_with_notice(service: &mut Service, document: &StoredDocument) -> Result<()> {
    match service.save(document).await {
        Ok(()) => Ok(()),
        Err(e @ (AppError::RemoteWriteFailed { .. } | AppError::RemoteUnavailable)) => {
            warn!("{e}");
            warn!("Saved locally; changes will sync to Google Drive once it is reachable again");
            Ok(())
        }
        Err(e @ AppError::AuthRefreshFailed(_)) => {
            warn!("Google Drive session expired; run `finance-tracker auth connect` to reconnect");
            Err(e)
        }
        Err(e) => Err(e),
    }
}
