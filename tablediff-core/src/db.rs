//! Database connection handling, identifier quoting, and retry policy.

use mysql_async::prelude::Queryable;
use mysql_async::{Conn, Opts};

use crate::error::{Result, TablediffError};

/// Quote a SQL identifier with backticks to prevent SQL injection.
///
/// Doubles any embedded backticks and wraps in backticks.
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Validate that a SQL identifier contains only safe characters.
///
/// Returns an error for names with characters outside `[a-zA-Z0-9_$]`.
/// Requested table names end up inside backtick-quoted SHOW CREATE TABLE
/// statements, so suspicious identifiers are rejected early.
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(TablediffError::ConfigError(
            "Identifier cannot be empty".to_string(),
        ));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
    {
        return Err(TablediffError::ConfigError(format!(
            "Identifier '{}' contains invalid characters. Only [a-zA-Z0-9_$] are allowed.",
            name
        )));
    }
    Ok(())
}

/// Check if an error is a permanent authentication failure that should not be retried.
fn is_permanent_error(e: &TablediffError) -> bool {
    if let TablediffError::DatabaseError(mysql_async::Error::Server(server_err)) = e {
        // 1044 = ER_DBACCESS_DENIED_ERROR, 1045 = ER_ACCESS_DENIED_ERROR,
        // 1698 = ER_ACCESS_DENIED_NO_PASSWORD_ERROR
        return matches!(server_err.code, 1044 | 1045 | 1698);
    }
    false
}

/// Connect once, honoring the connect timeout.
async fn connect_once(conn_string: &str, connect_timeout_secs: u32) -> Result<Conn> {
    let opts = Opts::from_url(conn_string)
        .map_err(|e| TablediffError::ConfigError(format!("Invalid connection URL: {}", e)))?;
    let connect_fut = Conn::new(opts);

    if connect_timeout_secs > 0 {
        match tokio::time::timeout(
            std::time::Duration::from_secs(connect_timeout_secs as u64),
            connect_fut,
        )
        .await
        {
            Ok(result) => Ok(result?),
            Err(_) => Err(TablediffError::ConnectTimeout(connect_timeout_secs)),
        }
    } else {
        Ok(connect_fut.await?)
    }
}

/// Connect to the database using the provided connection URL.
pub async fn connect(conn_string: &str) -> Result<Conn> {
    connect_with_config(conn_string, 0, 30).await
}

/// Connect to the database, retrying up to `retries` times with exponential backoff + jitter.
///
/// Each retry waits `min(2^attempt, 30) + rand(0..1000ms)` before the next attempt.
/// Permanent errors (authentication failures) are not retried.
pub async fn connect_with_config(
    conn_string: &str,
    retries: u32,
    connect_timeout_secs: u32,
) -> Result<Conn> {
    let mut last_err = None;

    for attempt in 0..=retries {
        if attempt > 0 {
            let base_delay = std::cmp::min(1u64 << attempt, 30);
            let jitter_ms = fastrand::u64(0..1000);
            let delay = std::time::Duration::from_secs(base_delay)
                + std::time::Duration::from_millis(jitter_ms);
            log::info!(
                "Connection attempt failed, retrying; attempt={}, max_attempts={}, delay_ms={}",
                attempt + 1,
                retries + 1,
                delay.as_millis() as u64
            );
            tokio::time::sleep(delay).await;
        }

        match connect_once(conn_string, connect_timeout_secs).await {
            Ok(conn) => {
                if attempt > 0 {
                    log::info!(
                        "Connected successfully after retry; attempt={}, max_attempts={}",
                        attempt + 1,
                        retries + 1
                    );
                }
                return Ok(conn);
            }
            Err(e) => {
                if is_permanent_error(&e) {
                    log::error!("Permanent connection error, not retrying: {}", e);
                    return Err(e);
                }
                last_err = Some(e);
            }
        }
    }

    Err(last_err.unwrap_or_else(|| {
        TablediffError::ConfigError("No connection attempt was made".to_string())
    }))
}

/// Verify the database connection is still alive with a minimal round-trip.
pub async fn check_connection(conn: &mut Conn) -> Result<()> {
    conn.ping().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident_simple() {
        assert_eq!(quote_ident("users"), "`users`");
    }

    #[test]
    fn test_quote_ident_embedded_backticks() {
        assert_eq!(quote_ident("my`table"), "`my``table`");
    }

    #[test]
    fn test_quote_ident_empty() {
        assert_eq!(quote_ident(""), "``");
    }

    #[test]
    fn test_validate_identifier_valid() {
        assert!(validate_identifier("users").is_ok());
        assert!(validate_identifier("my_table").is_ok());
        assert!(validate_identifier("Table123").is_ok());
        assert!(validate_identifier("t$audit").is_ok());
        assert!(validate_identifier("t").is_ok());
    }

    #[test]
    fn test_validate_identifier_invalid() {
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("my-table").is_err());
        assert!(validate_identifier("my table").is_err());
        assert!(validate_identifier("table.name").is_err());
        assert!(validate_identifier("table;drop").is_err());
        assert!(validate_identifier("t`").is_err());
    }
}
