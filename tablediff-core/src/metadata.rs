//! information_schema queries for column and index metadata.

use mysql_async::prelude::Queryable;
use mysql_async::{Conn, Params, Value};

use crate::db::quote_ident;
use crate::error::{Result, TablediffError};

/// One row from `information_schema.columns`:
/// (table_name, column_name, ordinal_position, column_default, is_nullable,
///  data_type, column_type, extra, column_comment, column_key)
pub type ColumnRow = (
    String,
    String,
    u64,
    Option<String>,
    String,
    String,
    String,
    String,
    String,
    String,
);

/// One row from `information_schema.statistics`:
/// (table_name, non_unique, index_name, column_name, nullable,
///  index_type, sub_part)
pub type IndexRow = (String, i64, String, String, String, String, Option<u32>);

/// Build the `IN (...)` placeholder list and positional params for a
/// schema + table-name membership filter.
fn membership_params(schema: &str, tables: &[String]) -> (String, Params) {
    let placeholders = vec!["?"; tables.len()].join(", ");
    let mut values: Vec<Value> = Vec::with_capacity(tables.len() + 1);
    values.push(Value::from(schema));
    for table in tables {
        values.push(Value::from(table.as_str()));
    }
    (placeholders, Params::Positional(values))
}

/// Fetch column metadata for the named tables within a schema.
///
/// Rows are ordered by table name then ordinal position so snapshots
/// preserve the column layout of each table.
pub async fn fetch_columns(
    conn: &mut Conn,
    schema: &str,
    tables: &[String],
) -> Result<Vec<ColumnRow>> {
    if tables.is_empty() {
        return Ok(Vec::new());
    }
    let (placeholders, params) = membership_params(schema, tables);
    let query = format!(
        "SELECT TABLE_NAME, COLUMN_NAME, ORDINAL_POSITION, COLUMN_DEFAULT, \
         IS_NULLABLE, DATA_TYPE, COLUMN_TYPE, EXTRA, COLUMN_COMMENT, COLUMN_KEY \
         FROM information_schema.columns \
         WHERE TABLE_SCHEMA = ? AND TABLE_NAME IN ({}) \
         ORDER BY TABLE_NAME, ORDINAL_POSITION",
        placeholders
    );
    let rows: Vec<ColumnRow> = conn.exec(query, params).await?;
    Ok(rows)
}

/// Fetch index metadata for the named tables within a schema.
///
/// Ordering by SEQ_IN_INDEX is load-bearing: composite index rows must
/// arrive in column-sequence order so the snapshot can merge them into a
/// single comma-joined column list.
pub async fn fetch_index_stats(
    conn: &mut Conn,
    schema: &str,
    tables: &[String],
) -> Result<Vec<IndexRow>> {
    if tables.is_empty() {
        return Ok(Vec::new());
    }
    let (placeholders, params) = membership_params(schema, tables);
    let query = format!(
        "SELECT TABLE_NAME, NON_UNIQUE, INDEX_NAME, COLUMN_NAME, NULLABLE, \
         INDEX_TYPE, SUB_PART \
         FROM information_schema.statistics \
         WHERE TABLE_SCHEMA = ? AND TABLE_NAME IN ({}) \
         ORDER BY TABLE_NAME, INDEX_NAME, SEQ_IN_INDEX",
        placeholders
    );
    let rows: Vec<IndexRow> = conn.exec(query, params).await?;
    Ok(rows)
}

/// Fetch the CREATE TABLE statement for a table via SHOW CREATE TABLE.
///
/// The table name must already be validated; it is spliced into the
/// statement backtick-quoted because SHOW CREATE TABLE does not accept
/// parameters.
pub async fn fetch_create_table(conn: &mut Conn, table: &str) -> Result<String> {
    let query = format!("SHOW CREATE TABLE {}", quote_ident(table));
    let row: Option<(String, String)> = conn.query_first(query).await?;
    match row {
        Some((_, create_sql)) => Ok(create_sql),
        None => Err(TablediffError::TableNotFound {
            table: table.to_string(),
        }),
    }
}
