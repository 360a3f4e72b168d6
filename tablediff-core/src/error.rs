//! Error types for tablediff operations.

use thiserror::Error;

/// Extract the full error message from a mysql_async::Error,
/// including the server error code and SQL state that Display may hide.
pub fn format_db_error(e: &mysql_async::Error) -> String {
    if let mysql_async::Error::Server(server_err) = e {
        return format!(
            "{} (code {}, state {})",
            server_err.message, server_err.code, server_err.state
        );
    }
    // Fallback: walk the source chain
    let mut msg = e.to_string();
    let mut source = std::error::Error::source(e);
    while let Some(s) = source {
        msg.push_str(&format!(": {}", s));
        source = s.source();
    }
    msg
}

/// All error types that tablediff operations can produce.
#[derive(Error, Debug)]
pub enum TablediffError {
    /// Invalid or missing configuration (TOML parse errors, bad identifiers, etc.).
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A database query or connection operation failed.
    #[error("Database error: {}", format_db_error(.0))]
    DatabaseError(#[from] mysql_async::Error),

    /// A connection attempt did not complete within the configured timeout.
    #[error("Connection attempt timed out after {0}s")]
    ConnectTimeout(u32),

    /// SHOW CREATE TABLE returned no row for a requested table.
    #[error("Table '{table}' does not exist on the source database")]
    TableNotFound { table: String },

    /// A filesystem I/O operation failed (writing generated SQL, reading config).
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Convenience type alias for `Result<T, TablediffError>`.
pub type Result<T> = std::result::Result<T, TablediffError>;
