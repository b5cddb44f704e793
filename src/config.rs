use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use serde::Deserialize;
use tracing::{debug, info};

use crate::schemas::AppState;
use crate::session::SessionStore;

/// Runtime configuration.
///
/// Sources, lowest priority first: built-in defaults, an optional
/// `warbler.toml` next to the binary, a `.env` file, process environment
/// (`DATABASE_URL`, `BIND_ADDRESS`, `SESSION_TTL_SECS`, `FEED_LIMIT`).
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_address: String,
    /// Idle lifetime of a login session.
    pub session_ttl_secs: u64,
    /// Maximum number of messages on the home feed.
    pub feed_limit: u64,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config::builder()
            .set_default("database_url", "sqlite://warbler.db?mode=rwc")?
            .set_default("bind_address", "0.0.0.0:3000")?
            .set_default("session_ttl_secs", 60 * 60 * 24)?
            .set_default("feed_limit", 100)?
            .add_source(File::with_name("warbler").required(false))
            .add_source(Environment::default().try_parsing(true))
            .build()
            .context("Failed to read configuration")?;

        let config: AppConfig = config
            .try_deserialize()
            .context("Invalid configuration")?;
        debug!(?config, "Configuration loaded");
        Ok(config)
    }

    /// Apply command line overrides on top of the loaded configuration.
    pub fn with_overrides(mut self, database_url: Option<String>, bind_address: Option<String>) -> Self {
        if let Some(database_url) = database_url {
            self.database_url = database_url;
        }
        if let Some(bind_address) = bind_address {
            self.bind_address = bind_address;
        }
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://warbler.db?mode=rwc".to_string(),
            bind_address: "0.0.0.0:3000".to_string(),
            session_ttl_secs: 60 * 60 * 24,
            feed_limit: 100,
        }
    }
}

/// Connect to the database and build the shared application state.
pub async fn initialize_app_state(config: &AppConfig, run_migrations: bool) -> Result<AppState> {
    info!("Connecting to database: {}", config.database_url);
    let db = Database::connect(&config.database_url)
        .await
        .with_context(|| format!("Failed to connect to {}", config.database_url))?;

    if run_migrations {
        info!("Running database migrations");
        Migrator::up(&db, None).await?;
    }

    let sessions = SessionStore::new(Duration::from_secs(config.session_ttl_secs));

    Ok(AppState {
        db,
        sessions,
        feed_limit: config.feed_limit,
    })
}
