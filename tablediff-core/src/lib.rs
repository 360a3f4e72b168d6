//! MySQL table-schema comparison and DDL generation library.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tablediff_core::config::{CliOverrides, TablediffConfig};
//! use tablediff_core::Tablediff;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TablediffConfig::load(None, &CliOverrides::default())?;
//! let mut td = Tablediff::new(config).await?;
//! let report = td.diff(&["users".to_string()]).await?;
//! for result in &report.results {
//!     println!("{}: {}", result.selected_table, result.message);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - [`config`] — Configuration loading (TOML, env vars, CLI overrides)
//! - [`db`] — Database connections, retries, identifier quoting
//! - [`metadata`] — information_schema queries (columns, statistics, SHOW CREATE TABLE)
//! - [`snapshot`] — Typed per-table schema snapshots
//! - [`diff`] — Column and index comparison
//! - [`render`] — DDL clause rendering and CREATE TABLE canonicalization
//! - [`commands`] — High-level diff orchestration
//! - [`error`] — Error types

pub mod commands;
pub mod config;
pub mod db;
pub mod diff;
pub mod error;
pub mod metadata;
pub mod render;
pub mod snapshot;

use config::TablediffConfig;
use error::Result;
use mysql_async::Conn;

pub use commands::diff::{DiffReport, TableDiffResult};
pub use config::CliOverrides;
pub use diff::{ChangeSummary, TableChanges};
pub use snapshot::{ColumnInfo, IndexInfo, TableSchema, TableSnapshot};

/// Main entry point for the tablediff library.
///
/// Holds one connection per side and runs diff commands against them.
pub struct Tablediff {
    pub config: TablediffConfig,
    source: Conn,
    target: Conn,
}

impl Tablediff {
    /// Create a new Tablediff instance, connecting to both databases.
    ///
    /// If `connect_retries` is configured, retries with exponential backoff.
    pub async fn new(config: TablediffConfig) -> Result<Self> {
        let source_url = config.source.connection_string("source")?;
        let target_url = config.target.connection_string("target")?;
        let source = db::connect_with_config(
            &source_url,
            config.connection.connect_retries,
            config.connection.connect_timeout_secs,
        )
        .await?;
        let target = db::connect_with_config(
            &target_url,
            config.connection.connect_retries,
            config.connection.connect_timeout_secs,
        )
        .await?;
        Ok(Self {
            config,
            source,
            target,
        })
    }

    /// Create a Tablediff instance from existing connections.
    pub fn with_connections(config: TablediffConfig, source: Conn, target: Conn) -> Self {
        Self {
            config,
            source,
            target,
        }
    }

    /// Compare the named tables and generate reconciling DDL.
    pub async fn diff(&mut self, tables: &[String]) -> Result<DiffReport> {
        let source_db = self.config.source.database_name("source")?;
        let target_db = self.config.target.database_name("target")?;
        commands::diff::execute(
            &mut self.source,
            &mut self.target,
            &source_db,
            &target_db,
            tables,
        )
        .await
    }

    /// Verify both database connections with a round-trip each.
    pub async fn check_connections(&mut self) -> Result<()> {
        db::check_connection(&mut self.source).await?;
        db::check_connection(&mut self.target).await?;
        Ok(())
    }

    /// Cleanly close both connections.
    pub async fn close(self) -> Result<()> {
        self.source.disconnect().await?;
        self.target.disconnect().await?;
        Ok(())
    }
}
