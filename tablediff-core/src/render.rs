//! DDL rendering: column-definition suffixes, ALTER TABLE assembly, and
//! CREATE TABLE canonicalization.
//!
//! All SQL text construction lives here so quoting stays in one place
//! and the diff logic can be tested against structured clauses.

use std::sync::LazyLock;

use regex_lite::Regex;

use crate::db::quote_ident;
use crate::snapshot::{ColumnInfo, IndexInfo};

/// The current auto-increment counter is row-count driven, not schema.
static AUTO_INCREMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"AUTO_INCREMENT=[0-9]*").unwrap());

static COLLATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"COLLATE\s[A-Za-z0-9_]*").unwrap());

/// Types whose default literals are quoted when rendered.
const QUOTED_DEFAULT_TYPES: [&str; 7] = [
    "char",
    "varchar",
    "datetime",
    "date",
    "timestamp",
    "text",
    "longtext",
];

/// One clause of an ALTER TABLE statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterClause {
    /// Redefine an existing column from its source-side definition.
    ModifyColumn(ColumnInfo),
    /// Add a column from its source-side definition.
    AddColumn(ColumnInfo),
    /// Drop a column present only on the target.
    DropColumn(String),
    /// Replace the primary key with the given column list.
    ReplacePrimaryKey(String),
    /// Drop a named index.
    DropIndex(String),
    /// Add an index from its source-side definition.
    AddIndex(IndexInfo),
}

impl AlterClause {
    fn render(&self) -> String {
        match self {
            AlterClause::ModifyColumn(col) => format!(
                " modify {} {}{}",
                quote_ident(&col.column_name),
                col.column_type,
                column_suffix(col)
            ),
            AlterClause::AddColumn(col) => format!(
                " add column {} {}{}",
                quote_ident(&col.column_name),
                col.column_type,
                column_suffix(col)
            ),
            AlterClause::DropColumn(name) => format!(" drop column {},", quote_ident(name)),
            AlterClause::ReplacePrimaryKey(columns) => {
                format!(" drop primary key,add primary key(`{}`),", columns)
            }
            AlterClause::DropIndex(name) => format!(" drop index {},", quote_ident(name)),
            AlterClause::AddIndex(index) => {
                let kind = if index.non_unique == 0 {
                    "unique"
                } else {
                    "index"
                };
                match index.sub_part {
                    // Prefix index: only a positive length is meaningful
                    Some(n) if n > 0 => format!(
                        "add {} {} ({}({})),",
                        kind,
                        quote_ident(&index.index_name),
                        index.column_name,
                        n
                    ),
                    _ => format!(
                        "add {} {} ({}),",
                        kind,
                        quote_ident(&index.index_name),
                        index.column_name
                    ),
                }
            }
        }
    }
}

/// Is this default literal an explicit empty string or absent?
fn is_empty_literal(default: Option<&str>) -> bool {
    matches!(default, None | Some("") | Some("''") | Some("\"\""))
}

/// Render the trailing column-definition fragment shared by modify and
/// add-column clauses: type modifiers, nullability, default,
/// auto-increment, comment, and the clause-terminating comma.
pub fn column_suffix(col: &ColumnInfo) -> String {
    let mut sql = String::new();

    if col.column_type.contains("unsigned") {
        sql.push_str(" unsigned");
    }
    if col.column_type.contains("zerofill") {
        sql.push_str(" zerofill");
    }
    if col.is_nullable == "NO" {
        sql.push_str(" not null");
    }

    let quoted_family = QUOTED_DEFAULT_TYPES.contains(&col.data_type.as_str());
    if !is_empty_literal(col.column_default.as_deref()) {
        // Safe: is_empty_literal rules out None
        let default = col.column_default.as_deref().unwrap_or_default();
        if quoted_family {
            if default.contains("CURRENT_TIMESTAMP") && col.extra == "on update CURRENT_TIMESTAMP"
            {
                sql.push_str(" default CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP ");
            } else if default.contains("CURRENT_TIMESTAMP") {
                sql.push_str(&format!(" default {}", default));
            } else {
                sql.push_str(&format!(" default '{}'", default));
            }
        } else {
            sql.push_str(&format!(" default {}", default));
        }
    } else if quoted_family {
        if col.column_default.is_some() {
            sql.push_str(" default '' ");
        } else if col.data_type == "timestamp" {
            // timestamp rejects a bare NULL default without explicit NULL first
            sql.push_str(" NULL default NULL ");
        } else {
            // Metadata cannot distinguish "no default" from "default NULL",
            // so assume an explicit default NULL
            sql.push_str(" default NULL ");
        }
    } else if col.column_key == "PRI" || col.extra.contains("auto_increment") {
        // primary keys and auto-increment columns take no default clause
    } else {
        sql.push_str(" default NULL ");
    }

    if col.extra.contains("auto_increment") {
        sql.push_str(" auto_increment");
    }
    if !col.column_comment.is_empty() {
        sql.push_str(&format!(" comment '{}'", col.column_comment));
    }
    sql.push(',');
    sql
}

/// Assemble the clause list into one ALTER TABLE statement.
/// Returns an empty string for an empty clause list.
pub fn render_alter_table(table: &str, clauses: &[AlterClause]) -> String {
    if clauses.is_empty() {
        return String::new();
    }
    let mut sql = format!("ALTER TABLE {}", quote_ident(table));
    for clause in clauses {
        sql.push_str(&clause.render());
    }
    sql.trim_end_matches(',').to_string()
}

/// Normalize a CREATE TABLE statement for comparison and emission.
///
/// Strips newlines, the `AUTO_INCREMENT=<n>` counter, and `COLLATE <name>`
/// clauses so two structurally identical definitions compare equal.
pub fn canonicalize_create_table(ddl: &str) -> String {
    let flat = ddl.replace('\n', "");
    let without_counter = AUTO_INCREMENT_RE.replace_all(&flat, "");
    COLLATE_RE.replace_all(&without_counter, "").into_owned()
}
