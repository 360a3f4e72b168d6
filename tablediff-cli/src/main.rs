//! CLI entry point for the tablediff schema comparison tool.
//! Provides clap-based command routing, exit code mapping based on error
//! type, and JSON or colored-table output.

mod output;

use std::process;

use clap::{Parser, Subcommand};
use colored::Colorize;

use tablediff_core::config::{CliOverrides, TablediffConfig};
use tablediff_core::error::TablediffError;
use tablediff_core::Tablediff;

/// Top-level CLI definition with global flags and subcommand dispatch.
#[derive(Parser)]
#[command(
    name = "tablediff",
    about = "Compare MySQL table schemas and generate reconciling DDL",
    version,
    propagate_version = true
)]
struct Cli {
    /// Config file path
    #[arg(short, long, value_name = "PATH")]
    config: Option<String>,

    /// Source database URL (overrides config)
    #[arg(long, value_name = "URL")]
    source_url: Option<String>,

    /// Target database URL (overrides config)
    #[arg(long, value_name = "URL")]
    target_url: Option<String>,

    /// Number of retries when connecting to a database
    #[arg(long, value_name = "N")]
    connect_retries: Option<u32>,

    /// Connection timeout in seconds (default: 30, 0 = no timeout)
    #[arg(long, value_name = "SECS")]
    connect_timeout: Option<u32>,

    /// Output results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Enable verbose/debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// All available tablediff subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Compare tables between source and target, generating DDL
    Diff {
        /// Table names to compare
        #[arg(value_name = "TABLE", required = true)]
        tables: Vec<String>,

        /// Write generated SQL to a file
        #[arg(long, value_name = "PATH")]
        output: Option<String>,
    },

    /// Verify connectivity to both databases
    Ping,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Set up logging (suppress when JSON output is requested)
    let filter = if cli.json {
        "error"
    } else if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    env_logger::Builder::new()
        .parse_env(env_logger::Env::default().default_filter_or(filter))
        .format_target(false)
        .format_timestamp(None)
        .init();

    if let Err(e) = run(cli).await {
        print_error(&e);
        process::exit(exit_code(&e));
    }
}

/// Map error types to differentiated exit codes.
fn exit_code(error: &TablediffError) -> i32 {
    match error {
        TablediffError::ConfigError(_) => 2,
        TablediffError::DatabaseError(_) => 4,
        TablediffError::ConnectTimeout(_) => 4,
        TablediffError::TableNotFound { .. } => 5,
        _ => 1,
    }
}

/// Build configuration, connect to both databases, and dispatch the
/// chosen subcommand.
async fn run(cli: Cli) -> Result<(), TablediffError> {
    let json_output = cli.json;

    let overrides = CliOverrides {
        source_url: cli.source_url,
        target_url: cli.target_url,
        connect_retries: cli.connect_retries,
        connect_timeout: cli.connect_timeout,
    };

    let config = TablediffConfig::load(cli.config.as_deref(), &overrides)?;
    let mut td = Tablediff::new(config).await?;

    let result = dispatch(&cli.command, &mut td, json_output).await;

    if let Err(e) = td.close().await {
        log::warn!("Failed to close connections cleanly: {}", e);
    }

    result
}

/// Execute a subcommand against the connected instance.
async fn dispatch(
    command: &Commands,
    td: &mut Tablediff,
    json_output: bool,
) -> Result<(), TablediffError> {
    match command {
        Commands::Diff { tables, output } => {
            let report = td.diff(tables).await?;
            if json_output {
                println!("{}", serde_json::to_string_pretty(&report).unwrap());
            } else {
                output::print_diff_report(&report);
            }
            if let Some(path) = output {
                if report.has_changes {
                    let sql: Vec<&str> = report
                        .results
                        .iter()
                        .filter(|r| !r.diff_sql.is_empty())
                        .map(|r| r.diff_sql.as_str())
                        .collect();
                    std::fs::write(path, format!("{}\n", sql.join("\n")))?;
                    if !json_output {
                        println!("{}", format!("Generated SQL written to {}", path).green());
                    }
                } else if !json_output {
                    println!("{}", "No changes; output file not written.".dimmed());
                }
            }
        }
        Commands::Ping => {
            td.check_connections().await?;
            if json_output {
                println!("{}", serde_json::json!({"success": true}));
            } else {
                println!("{}", "Both databases are reachable.".green().bold());
            }
        }
    }

    Ok(())
}

/// Print a formatted error message with actionable hints to stderr.
fn print_error(error: &TablediffError) {
    eprintln!("{} {}", "ERROR:".red().bold(), error);

    match error {
        TablediffError::ConfigError(_) => {
            eprintln!(
                "{}",
                "Hint: Check your tablediff.toml or set TABLEDIFF_SOURCE_URL and TABLEDIFF_TARGET_URL environment variables."
                    .dimmed()
            );
        }
        TablediffError::DatabaseError(_) | TablediffError::ConnectTimeout(_) => {
            eprintln!(
                "{}",
                "Hint: Verify both databases are running and connection details are correct."
                    .dimmed()
            );
        }
        TablediffError::TableNotFound { .. } => {
            eprintln!(
                "{}",
                "Hint: The table must exist on the source database to generate DDL for it."
                    .dimmed()
            );
        }
        _ => {}
    }
}
