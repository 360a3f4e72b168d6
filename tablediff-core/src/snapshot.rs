//! Typed schema snapshots built from information_schema rows.
//!
//! A [`TableSnapshot`] holds one side's view of the requested tables:
//! per table, its columns keyed by name and its indexes keyed by name.
//! Composite index rows are merged into a single [`IndexInfo`] whose
//! column list preserves the row order the metadata queries return.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::metadata::{ColumnRow, IndexRow};

/// One column of one table, as reported by `information_schema.columns`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub table_name: String,
    pub column_name: String,
    /// 1-based position of the column within the table.
    pub ordinal_position: u64,
    /// Raw default literal, `None` when no default is recorded.
    pub column_default: Option<String>,
    /// "YES" or "NO".
    pub is_nullable: String,
    /// Base type keyword, e.g. `varchar`.
    pub data_type: String,
    /// Full type including length and modifiers, e.g. `int(11) unsigned`.
    pub column_type: String,
    /// Free text, may contain `auto_increment` or `on update CURRENT_TIMESTAMP`.
    pub extra: String,
    pub column_comment: String,
    /// `PRI` for primary-key columns, empty otherwise.
    pub column_key: String,
}

/// One index of one table, possibly composite.
///
/// For a composite index, `column_name` is the comma-joined list of
/// participating columns in sequence order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexInfo {
    pub table_name: String,
    /// 0 for a unique index, nonzero otherwise.
    pub non_unique: i64,
    /// `PRIMARY` is reserved for the primary key.
    pub index_name: String,
    pub column_name: String,
    pub nullable: String,
    /// e.g. `BTREE`.
    pub index_type: String,
    /// Prefix length for a prefix index, `None` otherwise.
    pub sub_part: Option<u32>,
}

impl From<ColumnRow> for ColumnInfo {
    fn from(row: ColumnRow) -> Self {
        let (
            table_name,
            column_name,
            ordinal_position,
            column_default,
            is_nullable,
            data_type,
            column_type,
            extra,
            column_comment,
            column_key,
        ) = row;
        Self {
            table_name,
            column_name,
            ordinal_position,
            column_default,
            is_nullable,
            data_type,
            column_type,
            extra,
            column_comment,
            column_key,
        }
    }
}

impl From<IndexRow> for IndexInfo {
    fn from(row: IndexRow) -> Self {
        let (table_name, non_unique, index_name, column_name, nullable, index_type, sub_part) = row;
        Self {
            table_name,
            non_unique,
            index_name,
            column_name,
            nullable,
            index_type,
            sub_part,
        }
    }
}

/// Columns and indexes of one table, in metadata-row order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TableSchema {
    columns: Vec<ColumnInfo>,
    indexes: Vec<IndexInfo>,
}

impl TableSchema {
    /// Columns in ordinal order.
    pub fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    /// Indexes in metadata-row order.
    pub fn indexes(&self) -> &[IndexInfo] {
        &self.indexes
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.column_name == name)
    }

    /// Look up an index by name.
    pub fn index(&self, name: &str) -> Option<&IndexInfo> {
        self.indexes.iter().find(|i| i.index_name == name)
    }
}

/// One database's view of the requested tables.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TableSnapshot {
    tables: BTreeMap<String, TableSchema>,
}

impl TableSnapshot {
    /// Build a snapshot from flat column and index row sets.
    ///
    /// Duplicate `(table, column)` pairs overwrite in place. Repeated
    /// `(table, index)` rows merge into one index entry by appending the
    /// later row's column name to the column list; all other attributes
    /// come from the first row.
    pub fn from_rows(column_rows: Vec<ColumnRow>, index_rows: Vec<IndexRow>) -> Self {
        let mut tables: BTreeMap<String, TableSchema> = BTreeMap::new();

        for row in column_rows {
            let info = ColumnInfo::from(row);
            let schema = tables.entry(info.table_name.clone()).or_default();
            match schema
                .columns
                .iter_mut()
                .find(|c| c.column_name == info.column_name)
            {
                Some(existing) => *existing = info,
                None => schema.columns.push(info),
            }
        }

        for row in index_rows {
            let info = IndexInfo::from(row);
            let schema = tables.entry(info.table_name.clone()).or_default();
            match schema
                .indexes
                .iter_mut()
                .find(|i| i.index_name == info.index_name)
            {
                Some(existing) => {
                    existing.column_name.push(',');
                    existing.column_name.push_str(&info.column_name);
                }
                None => schema.indexes.push(info),
            }
        }

        Self { tables }
    }

    /// Look up a table by name.
    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }
}
