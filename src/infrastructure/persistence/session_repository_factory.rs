use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::application::ports::{RepositoryError, SessionRepository};
use crate::presentation::config::{DatabaseProviderSetting, DatabaseSettings};

use super::repositories::{InMemorySessionRepository, PgSessionRepository};

pub struct SessionRepositoryFactory;

impl SessionRepositoryFactory {
    pub async fn create(
        settings: &DatabaseSettings,
    ) -> Result<Arc<dyn SessionRepository>, RepositoryError> {
        match settings.provider {
            DatabaseProviderSetting::Memory => {
                tracing::warn!("Using in-memory session repository; sessions are lost on restart");
                Ok(Arc::new(InMemorySessionRepository::new()))
            }
            DatabaseProviderSetting::Postgres => {
                let pool = connect(settings).await?;
                if settings.run_migrations {
                    sqlx::migrate!("./migrations")
                        .run(&pool)
                        .await
                        .map_err(|e| RepositoryError::ConnectionFailed(format!("migrations: {}", e)))?;
                    tracing::info!("Database migrations applied");
                }
                Ok(Arc::new(PgSessionRepository::new(pool)))
            }
        }
    }
}

/// Opens the session pool, retrying while the database comes up.
#[tracing::instrument(skip(settings), fields(max_connections = settings.max_connections))]
async fn connect(settings: &DatabaseSettings) -> Result<PgPool, RepositoryError> {
    let url = settings
        .url
        .as_deref()
        .ok_or_else(|| RepositoryError::ConnectionFailed("database.url required".to_string()))?;
    let options = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs));

    let mut backoff = settings.connect_backoff().into_iter();
    loop {
        match options.clone().connect(url).await {
            Ok(pool) => {
                tracing::info!("Session database pool established");
                return Ok(pool);
            }
            Err(e) => {
                let Some(delay) = backoff.next() else {
                    return Err(RepositoryError::ConnectionFailed(e.to_string()));
                };
                tracing::warn!(
                    error = %e,
                    retries_left = backoff.len(),
                    delay_ms = delay.as_millis() as u64,
                    "Session database unreachable, retrying"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
