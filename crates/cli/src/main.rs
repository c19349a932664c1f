use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use shelf_kernel::settings::Settings;

/// Library book catalog service
#[derive(Debug, Parser)]
#[command(name = "shelf", version, about)]
struct Cli {
    /// Directory holding base.toml and <env>.toml (overrides SHELF_CONFIG_DIR)
    #[arg(long, global = true, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP API (default)
    Serve,
    /// Apply pending schema migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load_from(cli.config_dir.as_deref())
        .context("failed to load shelf settings")?;
    shelf_telemetry::init(&settings.telemetry)?;

    tracing::info!(env = ?settings.environment, command = ?cli.command, "shelf CLI starting");

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => shelf_app::serve(settings).await,
        Command::Migrate => {
            let applied = shelf_app::migrate(&settings).await?;
            println!("applied {} migration(s)", applied);
            Ok(())
        }
    }
}
