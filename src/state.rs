//! Application wiring: connection pool, repository, and service.

use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::SqlitePool;

use crate::application::services::LinkService;
use crate::config::Config;
use crate::infrastructure::browser::SystemBrowser;
use crate::infrastructure::persistence::SqliteLinkRepository;

/// Shared application state for the console front end.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<SqliteLinkRepository, SystemBrowser>>,
}

impl AppState {
    /// Connects to the database, applies migrations, and wires the service.
    ///
    /// The pool is opened once here and lives for the rest of the process.
    pub async fn connect(config: &Config) -> Result<Self> {
        let pool = SqlitePool::connect(&config.database_url)
            .await
            .context("Failed to connect to database")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        tracing::info!(database_url = %config.database_url, "connected to database");

        let repository = Arc::new(SqliteLinkRepository::new(Arc::new(pool)));
        let link_service = Arc::new(LinkService::new(
            repository,
            Arc::new(SystemBrowser),
            config.clone(),
        ));

        Ok(Self { link_service })
    }
}
