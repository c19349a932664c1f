//! Bootstrap sequence: connect, migrate, run the module lifecycle, serve.

use anyhow::Context;
use shelf_db::Database;
use shelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use crate::modules;

/// Register the `db` core module and every project module.
pub fn build_registry(database: &Database) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    registry.register_core(shelf_db::create_module(database.clone()));
    modules::register_all(&mut registry, database);
    registry
}

/// Apply pending migrations and exit.
pub async fn migrate(settings: &Settings) -> anyhow::Result<usize> {
    let database = Database::connect(&settings.database).await?;
    let registry = build_registry(&database);

    let applied = database
        .run_migrations(&registry.collect_migrations())
        .await
        .context("failed to apply migrations")?;

    tracing::info!(applied, "migrations complete");
    database.close().await;
    Ok(applied)
}

/// Run the full server lifecycle until a shutdown signal arrives.
pub async fn serve(settings: Settings) -> anyhow::Result<()> {
    let database = Database::connect(&settings.database).await?;
    let registry = build_registry(&database);
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_core_modules(&ctx).await?;

    let applied = database
        .run_migrations(&registry.collect_migrations())
        .await
        .context("failed to apply migrations")?;
    tracing::info!(applied, "migrations complete");

    registry.init_custom_modules(&ctx).await?;
    registry.start_core_modules(&ctx).await?;
    registry.start_custom_modules(&ctx).await?;

    let served = shelf_http::start_server(&registry, &settings).await;

    registry.stop_custom_modules().await?;
    registry.stop_core_modules().await?;

    served
}
