//! Tienda Application Library
//!
//! Configuration, client construction and the command-line surface over the
//! record store and order workflow.
//!
//! # Architecture
//!
//! ```text
//! CLI → OrderWorkflow → Records → DocumentStore → MemoryStore | PostgreSQL
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use tienda::{connect, Config};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::from_env().expect("Failed to load config");
//!     let records = connect(&config).await.expect("Failed to connect");
//!     let products = records.get_all("productos").await.expect("Read failed");
//! }
//! ```

#![warn(clippy::all)]

pub mod cli;
pub mod client;
pub mod config;
pub mod error;

pub use cli::{execute, Cli, Command, DbCommand};
pub use client::connect;
#[cfg(feature = "postgres")]
pub use client::connect_pool;
pub use config::{Backend, Config, DatabaseConfig, Environment};
pub use error::{AppError, AppResult};
