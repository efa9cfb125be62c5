//! Tienda admin CLI
//!
//! Runs record store and order operations against the configured backend.
//!
//! # Usage
//!
//! ```bash
//! # List products from an in-memory store
//! TIENDA_ENV=test TIENDA_CREDENTIALS="$(cat creds.json)" cargo run -p tienda -- list productos
//!
//! # Place an order against PostgreSQL
//! cargo run -p tienda --features postgres -- checkout order.json
//! ```
//!
//! # Environment Variables
//!
//! - `TIENDA_CREDENTIALS`: Service-account JSON (required)
//! - `TIENDA_ENV`: Environment (test, development, production)
//! - `TIENDA_BACKEND`: Storage backend (memory, postgres)
//! - `DATABASE_URL`: PostgreSQL URL (default: from credentials)
//! - `TIENDA_DB_MAX_CONNECTIONS`: Pool size (default: 5)

use clap::Parser;
use serde_json::Value;
use tienda::{connect, execute, Cli, Command, Config, DbCommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (stdout carries command output)
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("tienda=info".parse()?))
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        backend = %config.database.backend,
        "Tienda"
    );

    let output = match cli.command {
        Command::Db(command) => run_db(&config, command).await?,
        command => {
            let records = connect(&config).await?;
            execute(&records, command).await?
        },
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[cfg(feature = "postgres")]
async fn run_db(config: &Config, command: DbCommand) -> anyhow::Result<Value> {
    use tienda_domain::CollectionName;

    let pool = tienda::connect_pool(&config.database).await?;

    match command {
        DbCommand::Migrate => {
            tienda_db::migrate(&pool).await?;
            Ok(serde_json::json!({ "migrated": true }))
        },
        DbCommand::Status => Ok(serde_json::to_value(tienda_db::status(&pool).await?)?),
        DbCommand::Import { collection, file } => {
            let collection = CollectionName::new(collection)?;
            let documents: Vec<Value> = serde_json::from_str(&tienda::cli::read_file(&file).await?)?;
            let summary = tienda_db::import_documents(&pool, &collection, documents).await?;
            Ok(serde_json::to_value(summary)?)
        },
    }
}

#[cfg(not(feature = "postgres"))]
async fn run_db(_config: &Config, _command: DbCommand) -> anyhow::Result<Value> {
    anyhow::bail!("database commands require building with the `postgres` feature")
}
