//! SQLite connection factory, migration runner and the `db` core module.

use std::str::FromStr;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use shelf_kernel::settings::DatabaseSettings;
use shelf_kernel::{InitCtx, Migration, Module};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

const LEDGER_DDL: &str = r#"
    CREATE TABLE IF NOT EXISTS _migrations (
        module     TEXT NOT NULL,
        id         TEXT NOT NULL,
        applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        PRIMARY KEY (module, id)
    )
"#;

/// Handle to the record store database. Cheap to clone.
#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open a pool for `settings.url`, creating the database file if needed.
    ///
    /// In-memory databases live as long as their connection, so they are
    /// pinned to a single connection that is never reaped.
    pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(&settings.url)
            .with_context(|| format!("invalid database url '{}'", settings.url))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool_options = if settings.is_in_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(settings.max_connections.max(1))
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .with_context(|| format!("failed to connect to database '{}'", settings.url))?;

        tracing::info!(target: "shelf-db", url = %settings.url, "database pool ready");

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Round-trip a trivial query to prove the store is reachable.
    pub async fn ping(&self) -> anyhow::Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("database ping failed")?;
        Ok(())
    }

    /// Apply every migration not yet recorded in the `_migrations` ledger.
    ///
    /// Each migration runs in its own transaction together with its ledger
    /// row. Returns how many migrations were applied.
    pub async fn run_migrations(
        &self,
        migrations: &[(String, Migration)],
    ) -> anyhow::Result<usize> {
        sqlx::raw_sql(LEDGER_DDL)
            .execute(&self.pool)
            .await
            .context("failed to create migration ledger")?;

        let mut applied = 0;
        for (module, migration) in migrations {
            let already: Option<i64> =
                sqlx::query_scalar("SELECT 1 FROM _migrations WHERE module = ? AND id = ?")
                    .bind(module)
                    .bind(migration.id)
                    .fetch_optional(&self.pool)
                    .await
                    .context("failed to read migration ledger")?;

            if already.is_some() {
                tracing::debug!(
                    target: "shelf-db",
                    %module,
                    id = migration.id,
                    "migration already applied"
                );
                continue;
            }

            let mut tx = self.pool.begin().await.context("failed to open transaction")?;
            sqlx::raw_sql(migration.up)
                .execute(&mut *tx)
                .await
                .with_context(|| format!("migration {}/{} failed", module, migration.id))?;
            sqlx::query("INSERT INTO _migrations (module, id) VALUES (?, ?)")
                .bind(module)
                .bind(migration.id)
                .execute(&mut *tx)
                .await
                .context("failed to record migration")?;
            tx.commit().await.context("failed to commit migration")?;

            tracing::info!(target: "shelf-db", %module, id = migration.id, "migration applied");
            applied += 1;
        }

        Ok(applied)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Core module owning the database lifecycle
pub struct DbModule {
    database: Database,
}

impl DbModule {
    pub fn new(database: Database) -> Self {
        Self { database }
    }
}

#[async_trait]
impl Module for DbModule {
    fn name(&self) -> &'static str {
        "db"
    }

    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        self.database.ping().await?;
        tracing::info!(module = self.name(), "database reachable");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        self.database.close().await;
        tracing::info!(module = self.name(), "database pool closed");
        Ok(())
    }
}

/// Create the `db` core module for registration
pub fn create_module(database: Database) -> Arc<dyn Module> {
    Arc::new(DbModule::new(database))
}
