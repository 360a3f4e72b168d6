//! Terminal output formatting for tablediff commands.
//! Uses comfy-table for tabular output and colored for
//! status-aware terminal styling.

use colored::Colorize;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};

use tablediff_core::DiffReport;

/// Print the per-table diff results as a colored table, followed by the
/// generated SQL for tables that need changes.
pub fn print_diff_report(report: &DiffReport) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Table"),
            Cell::new("Status"),
            Cell::new("Summary"),
        ]);

    for result in &report.results {
        let status = if result.remote_table.is_empty() {
            "missing on target".red().to_string()
        } else if result.diff_sql.is_empty() {
            "identical".green().to_string()
        } else {
            "differs".yellow().to_string()
        };
        table.add_row(vec![
            Cell::new(&result.selected_table),
            Cell::new(&status),
            Cell::new(result.message.replace('\n', "; ")),
        ]);
    }

    println!("{table}");

    if !report.has_changes {
        println!();
        println!(
            "{}",
            "All requested tables are in sync. No DDL necessary."
                .green()
                .bold()
        );
        return;
    }

    println!();
    println!("{}", "Generated SQL:".bold());
    for result in &report.results {
        if result.diff_sql.is_empty() {
            continue;
        }
        println!("{} {}", format!("{} →", result.selected_table).yellow(), result.diff_sql);
    }
}
