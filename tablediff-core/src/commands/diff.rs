//! The diff command: compare requested tables between two databases and
//! produce per-table DDL plus a change summary.

use mysql_async::Conn;
use serde::Serialize;

use crate::db::validate_identifier;
use crate::diff::diff_table;
use crate::error::{Result, TablediffError};
use crate::metadata::{fetch_columns, fetch_create_table, fetch_index_stats};
use crate::render::{canonicalize_create_table, render_alter_table};
use crate::snapshot::{TableSchema, TableSnapshot};

pub const MSG_TARGET_LACKS_TABLE: &str =
    "target lacks this table; generated create-table statement.";
pub const MSG_IDENTICAL: &str = "columns and indexes are identical";

/// Outcome for one requested table.
#[derive(Debug, Clone, Serialize)]
pub struct TableDiffResult {
    /// The requested table name.
    pub selected_table: String,
    /// Same as `selected_table` when the target has the table, empty otherwise.
    pub remote_table: String,
    /// DDL to reconcile the target, empty when nothing is needed.
    pub diff_sql: String,
    /// Human-readable summary, newline-separated category lines.
    pub message: String,
}

/// All per-table outcomes of one diff run, in request order.
#[derive(Debug, Clone, Serialize)]
pub struct DiffReport {
    pub results: Vec<TableDiffResult>,
    /// True when at least one table needs DDL.
    pub has_changes: bool,
}

/// Compare the named tables between the source and target databases.
///
/// Tables absent from the target yield a canonicalized CREATE TABLE
/// statement fetched from the source; tables present on both sides yield
/// an ALTER TABLE statement when their columns or indexes differ.
pub async fn execute(
    source: &mut Conn,
    target: &mut Conn,
    source_db: &str,
    target_db: &str,
    tables: &[String],
) -> Result<DiffReport> {
    if tables.is_empty() {
        return Err(TablediffError::ConfigError(
            "No tables requested; supply at least one table name".to_string(),
        ));
    }
    for table in tables {
        validate_identifier(table)?;
    }

    log::debug!(
        "Fetching schema metadata; source_db={}, target_db={}, tables={}",
        source_db,
        target_db,
        tables.len()
    );

    let source_columns = fetch_columns(source, source_db, tables).await?;
    let source_indexes = fetch_index_stats(source, source_db, tables).await?;
    let target_columns = fetch_columns(target, target_db, tables).await?;
    let target_indexes = fetch_index_stats(target, target_db, tables).await?;

    let source_snapshot = TableSnapshot::from_rows(source_columns, source_indexes);
    let target_snapshot = TableSnapshot::from_rows(target_columns, target_indexes);

    let empty_schema = TableSchema::default();
    let mut results = Vec::with_capacity(tables.len());
    let mut has_changes = false;

    for table in tables {
        let result = match target_snapshot.table(table) {
            None => {
                let ddl = fetch_create_table(source, table).await?;
                TableDiffResult {
                    selected_table: table.clone(),
                    remote_table: String::new(),
                    diff_sql: canonicalize_create_table(&ddl),
                    message: MSG_TARGET_LACKS_TABLE.to_string(),
                }
            }
            Some(target_schema) => {
                let source_schema = source_snapshot.table(table).unwrap_or(&empty_schema);
                let changes = diff_table(source_schema, target_schema);
                if changes.is_empty() {
                    TableDiffResult {
                        selected_table: table.clone(),
                        remote_table: table.clone(),
                        diff_sql: String::new(),
                        message: MSG_IDENTICAL.to_string(),
                    }
                } else {
                    TableDiffResult {
                        selected_table: table.clone(),
                        remote_table: table.clone(),
                        diff_sql: render_alter_table(table, &changes.clauses),
                        message: changes.summary.render(),
                    }
                }
            }
        };
        if !result.diff_sql.is_empty() {
            has_changes = true;
        }
        results.push(result);
    }

    log::info!(
        "Diff complete; tables={}, with_changes={}",
        results.len(),
        results.iter().filter(|r| !r.diff_sql.is_empty()).count()
    );

    Ok(DiffReport {
        results,
        has_changes,
    })
}
