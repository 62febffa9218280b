use sqlx::AnyPool;
use sqlx::migrate::Migrator;
use tracing::info;

use crate::config::Config;
use crate::error::CustomError;

static POSTGRES_MIGRATIONS: Migrator = sqlx::migrate!("./migrations/postgres");
static SQLITE_MIGRATIONS: Migrator = sqlx::migrate!("./migrations/sqlite");

pub struct Database;

impl Database {
    pub async fn new_pool(config: &Config) -> Result<AnyPool, CustomError> {
        sqlx::any::install_default_drivers();
        let pool = sqlx::any::AnyPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(1)
            .idle_timeout(std::time::Duration::from_secs(30))
            .connect(&config.database_url)
            .await
            .map_err(CustomError::DBError)?;
        info!(max_connections = config.max_connections, "database pool ready");
        Ok(pool)
    }

    /// Applies the schema for whichever backend the pool is connected to.
    pub async fn migrate(pool: &AnyPool) -> Result<(), CustomError> {
        let backend = {
            let conn = pool.acquire().await.map_err(CustomError::DBError)?;
            conn.backend_name().to_string()
        };
        let migrator = migrator_for(&backend)
            .ok_or_else(|| CustomError::UnsupportedBackend(backend.clone()))?;
        migrator.run(pool).await.map_err(CustomError::MigrateError)?;
        info!(%backend, "database schema up to date");
        Ok(())
    }

    pub fn log_pool_stats(pool: &AnyPool) {
        let idle = pool.num_idle() as u32;
        tracing::debug!(
            total = pool.size(),
            idle,
            active = pool.size().saturating_sub(idle),
            "db pool stats"
        );
    }
}

fn migrator_for(backend: &str) -> Option<&'static Migrator> {
    match backend {
        "PostgreSQL" => Some(&POSTGRES_MIGRATIONS),
        "SQLite" => Some(&SQLITE_MIGRATIONS),
        _ => None,
    }
}
