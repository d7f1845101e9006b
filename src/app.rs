//! Opened application: database connection plus the per-user file stores.

use sea_orm::DatabaseConnection;
use tracing::{error, info};

use crate::config::{AppConfig, DatabaseConfig};
use crate::db;
use crate::error::Result;
use crate::grid_state::EntryGridStateService;
use crate::settings::AppSettingsService;

pub struct App {
    pub config: AppConfig,
    pub db: DatabaseConnection,
    pub settings: AppSettingsService,
    pub grid_state: EntryGridStateService,
}

impl App {
    /// Connect to the database (creating the file and schema when missing)
    /// and set up the settings and grid state stores.
    pub async fn open(config: AppConfig) -> Result<Self> {
        let db_path = config.database_path();
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .inspect_err(|e| error!(path = %parent.display(), "Failed to create database folder: {e}"))?;
        }

        let db = db::connect(&DatabaseConfig::connection_string(&db_path))
            .await
            .inspect_err(|e| error!(path = %db_path.display(), "Failed to open database: {e}"))?;
        db::test_connection(&db)
            .await
            .inspect_err(|e| error!(path = %db_path.display(), "Database is not responding: {e}"))?;
        db::ensure_created(&db).await?;

        let counts = db::get_table_counts(&db).await?;
        info!(
            "Database {}: {} entries, {} appointments, {} dismissals",
            db_path.display(),
            counts.entries,
            counts.appointments,
            counts.dismissals
        );

        let data_dir = config.data_dir();
        Ok(Self {
            settings: AppSettingsService::new(&data_dir),
            grid_state: EntryGridStateService::new(&data_dir),
            config,
            db,
        })
    }
}
