//! Column and index comparison between two table definitions.
//!
//! Produces an ordered [`AlterClause`] list plus a [`ChangeSummary`]
//! describing what changed, per category. The differs are total: every
//! classified case yields either clauses or nothing, never an error.

use serde::Serialize;

use crate::render::AlterClause;
use crate::snapshot::{IndexInfo, TableSchema};

/// Per-category record of what a table diff changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeSummary {
    pub modified_columns: Vec<String>,
    pub added_columns: Vec<String>,
    pub dropped_columns: Vec<String>,
    /// Column list of the replaced primary key, when it was replaced.
    pub dropped_primary_key: Option<String>,
    pub dropped_indexes: Vec<String>,
    pub added_indexes: Vec<String>,
}

impl ChangeSummary {
    pub fn is_empty(&self) -> bool {
        self.modified_columns.is_empty()
            && self.added_columns.is_empty()
            && self.dropped_columns.is_empty()
            && self.dropped_primary_key.is_none()
            && self.dropped_indexes.is_empty()
            && self.added_indexes.is_empty()
    }

    /// Render the summary as one line per non-empty category.
    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        if !self.modified_columns.is_empty() {
            lines.push(format!(
                "modified columns: {}",
                self.modified_columns.join(", ")
            ));
        }
        if !self.added_columns.is_empty() {
            lines.push(format!("added columns: {}", self.added_columns.join(", ")));
        }
        if !self.dropped_columns.is_empty() {
            lines.push(format!(
                "dropped columns: {}",
                self.dropped_columns.join(", ")
            ));
        }
        if let Some(ref columns) = self.dropped_primary_key {
            lines.push(format!("dropped primary key: {}", columns));
        }
        if !self.dropped_indexes.is_empty() {
            lines.push(format!(
                "dropped indexes: {}",
                self.dropped_indexes.join(", ")
            ));
        }
        if !self.added_indexes.is_empty() {
            lines.push(format!("added indexes: {}", self.added_indexes.join(", ")));
        }
        lines.join("\n")
    }
}

/// The full outcome of diffing one table: clauses plus summary.
#[derive(Debug, Clone, Default)]
pub struct TableChanges {
    pub clauses: Vec<AlterClause>,
    pub summary: ChangeSummary,
}

impl TableChanges {
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

/// Diff one table present on both sides: columns first, then indexes.
pub fn diff_table(source: &TableSchema, target: &TableSchema) -> TableChanges {
    let mut changes = TableChanges::default();
    diff_columns(source, target, &mut changes);
    diff_indexes(source, target, &mut changes);
    changes
}

fn diff_columns(source: &TableSchema, target: &TableSchema, changes: &mut TableChanges) {
    for col in source.columns() {
        match target.column(&col.column_name) {
            Some(remote) => {
                if col == remote {
                    continue;
                }
                // A position-only move never triggers DDL; repositioning
                // is not modeled, so any ordinal change voids the diff.
                if col.ordinal_position != remote.ordinal_position {
                    continue;
                }
                changes.clauses.push(AlterClause::ModifyColumn(col.clone()));
                changes.summary.modified_columns.push(col.column_name.clone());
            }
            None => {
                changes.clauses.push(AlterClause::AddColumn(col.clone()));
                changes.summary.added_columns.push(col.column_name.clone());
            }
        }
    }

    for col in target.columns() {
        if source.column(&col.column_name).is_none() {
            changes
                .clauses
                .push(AlterClause::DropColumn(col.column_name.clone()));
            changes.summary.dropped_columns.push(col.column_name.clone());
        }
    }
}

/// Some environments report NULLABLE as "" where others report "YES".
/// Two index definitions differing only in that pair are identical.
fn nullable_artifact_only(a: &IndexInfo, b: &IndexInfo) -> bool {
    let artifact_pair = (a.nullable.is_empty() && b.nullable == "YES")
        || (a.nullable == "YES" && b.nullable.is_empty());
    if !artifact_pair {
        return false;
    }
    let mut normalized = b.clone();
    normalized.nullable = a.nullable.clone();
    *a == normalized
}

fn diff_indexes(source: &TableSchema, target: &TableSchema, changes: &mut TableChanges) {
    for idx in source.indexes() {
        if idx.index_name == "PRIMARY" {
            if let Some(remote) = target.index("PRIMARY") {
                // A primary key is always unique, so only the column
                // list matters.
                if idx.column_name != remote.column_name {
                    changes
                        .clauses
                        .push(AlterClause::ReplacePrimaryKey(idx.column_name.clone()));
                    changes.summary.dropped_primary_key = Some(idx.column_name.clone());
                }
                continue;
            }
        }
        match target.index(&idx.index_name) {
            Some(remote) => {
                if idx == remote || nullable_artifact_only(idx, remote) {
                    continue;
                }
                changes
                    .clauses
                    .push(AlterClause::DropIndex(idx.index_name.clone()));
                changes.summary.dropped_indexes.push(idx.index_name.clone());
                changes.clauses.push(AlterClause::AddIndex(idx.clone()));
            }
            None => {
                changes.clauses.push(AlterClause::AddIndex(idx.clone()));
                changes.summary.added_indexes.push(idx.index_name.clone());
            }
        }
    }

    for idx in target.indexes() {
        if source.index(&idx.index_name).is_none() {
            changes
                .clauses
                .push(AlterClause::DropIndex(idx.index_name.clone()));
            changes.summary.dropped_indexes.push(idx.index_name.clone());
        }
    }
}
