//! Home Library - personal book catalog
//!
//! Interactive console over a MySQL catalog of books, categories and loans.

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use home_library::{
    config::AppConfig,
    console::{render, Console},
    AppState,
};

#[derive(Parser, Debug)]
#[command(name = "home-library", version, about = "Manage a home book collection stored in MySQL")]
struct Cli {
    /// Log at debug level (RUST_LOG still takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Interactive menu (default)
    Menu,
    /// Create missing tables and seed default categories
    Init,
    /// Check the database connection and print the server version
    Check,
    /// Print catalog statistics
    Stats,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Failed to load configuration")?;

    let level = if cli.debug { "debug" } else { config.logging.level.as_str() };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("home_library={},sqlx=warn", level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::debug!(
        "Home Library v{} using {}",
        env!("CARGO_PKG_VERSION"),
        config.database.display_target()
    );

    let state = AppState::new(config);
    let services = &state.services;

    match cli.command.unwrap_or(Command::Menu) {
        Command::Check => {
            let version = services.setup.check_connection().await?;
            println!(
                "Connected to {} (MySQL {})",
                state.config.database.display_target(),
                version
            );
        }
        Command::Init => {
            services.setup.bootstrap().await?;
            println!("Library schema ready");
        }
        Command::Stats => {
            let stats = services.stats.get_stats().await?;
            println!("{}", render::stats(&stats));
        }
        Command::Menu => {
            match services.setup.check_connection().await {
                Ok(version) => println!("Connected to MySQL {}", version),
                Err(e) => e.report("Connection check"),
            }
            services.setup.bootstrap_or_report().await;

            Console::new(state.services.clone()).run().await?;
        }
    }

    Ok(())
}
