//! Command-line interface.
//!
//! Record commands run against the [`Records`] facade and render their
//! result as JSON. Database lifecycle commands are handled by the binary.

use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

use tienda_domain::Fields;
use tienda_orders::{CheckoutRequest, OrderWorkflow};
use tienda_store::{Records, StoreError};

use crate::error::{AppError, AppResult};

/// Shop record store and order workflow.
#[derive(Debug, Parser)]
#[command(name = "tienda", version, about)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Record store and workflow commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List every document in a collection
    List {
        /// Collection name
        collection: String,
        /// Print an empty list instead of failing when the store errors
        #[arg(long)]
        or_empty: bool,
    },
    /// Show one document
    Get {
        /// Collection name
        collection: String,
        /// Document identifier
        id: String,
    },
    /// Create a document from a JSON object
    Add {
        /// Collection name
        collection: String,
        /// Document fields as a JSON object
        data: String,
    },
    /// Merge a JSON object into an existing document
    Update {
        /// Collection name
        collection: String,
        /// Document identifier
        id: String,
        /// Fields to merge as a JSON object; dotted keys address nested fields
        data: String,
    },
    /// Delete a document
    Delete {
        /// Collection name
        collection: String,
        /// Document identifier
        id: String,
    },
    /// Save an order and decrement stock from a JSON request file
    Checkout {
        /// Path to the checkout request
        file: PathBuf,
    },
    /// Database lifecycle
    #[command(subcommand)]
    Db(DbCommand),
}

/// Database lifecycle commands.
#[derive(Debug, Subcommand)]
pub enum DbCommand {
    /// Run pending migrations
    Migrate,
    /// Show connectivity and migration status
    Status,
    /// Load a JSON array of documents into a collection
    Import {
        /// Collection name
        collection: String,
        /// Path to a JSON array of documents
        file: PathBuf,
    },
}

/// Run a record command and return its JSON output.
pub async fn execute(records: &Records, command: Command) -> AppResult<Value> {
    match command {
        Command::List { collection, or_empty } => {
            let docs = if or_empty {
                records.get_all_or_empty(&collection).await
            } else {
                records.get_all(&collection).await?
            };
            Ok(Value::Array(docs.into_iter().map(|doc| doc.into_json()).collect()))
        },
        Command::Get { collection, id } => match records.get_doc(&collection, &id).await? {
            Some(doc) => Ok(doc.into_json()),
            None => Err(StoreError::not_found(collection, id).into()),
        },
        Command::Add { collection, data } => {
            let id = records.add(&collection, parse_fields(&data)?).await?;
            Ok(json!({ "id": id }))
        },
        Command::Update { collection, id, data } => {
            records.update(&collection, &id, parse_fields(&data)?).await?;
            Ok(json!({ "id": id, "updated": true }))
        },
        Command::Delete { collection, id } => {
            records.delete(&collection, &id).await?;
            Ok(json!({ "id": id, "deleted": true }))
        },
        Command::Checkout { file } => {
            let request: CheckoutRequest = serde_json::from_str(&read_file(&file).await?)?;
            let receipt = OrderWorkflow::new(records.clone()).checkout(request).await?;
            Ok(serde_json::to_value(receipt)?)
        },
        Command::Db(_) => Err(AppError::Input(
            "database commands do not run against the record store".to_string(),
        )),
    }
}

/// Parse a JSON object argument into document fields.
pub fn parse_fields(raw: &str) -> AppResult<Fields> {
    match serde_json::from_str(raw)? {
        Value::Object(fields) => Ok(fields),
        other => Err(AppError::Input(format!("expected a JSON object, got {}", other))),
    }
}

/// Read a UTF-8 file.
pub async fn read_file(path: &Path) -> AppResult<String> {
    Ok(tokio::fs::read_to_string(path).await?)
}
