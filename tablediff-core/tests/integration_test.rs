//! Integration tests for tablediff-core.
//!
//! Requires two running MySQL databases (they may live on the same server).
//! Set TEST_SOURCE_URL and TEST_TARGET_URL env vars, e.g.:
//!   TEST_SOURCE_URL="mysql://root:pw@127.0.0.1:3306/tablediff_src"
//!   TEST_TARGET_URL="mysql://root:pw@127.0.0.1:3306/tablediff_tgt"
//!
//! Tests are skipped when the env vars are unset.
//!
//! Run with: cargo test --test integration_test

use mysql_async::prelude::Queryable;
use mysql_async::Conn;

use tablediff_core::commands::diff::{MSG_IDENTICAL, MSG_TARGET_LACKS_TABLE};
use tablediff_core::config::{EndpointConfig, TablediffConfig};
use tablediff_core::db;
use tablediff_core::Tablediff;

fn test_urls() -> Option<(String, String)> {
    match (
        std::env::var("TEST_SOURCE_URL"),
        std::env::var("TEST_TARGET_URL"),
    ) {
        (Ok(source), Ok(target)) => Some((source, target)),
        _ => {
            eprintln!("Skipping integration test: TEST_SOURCE_URL / TEST_TARGET_URL not set");
            None
        }
    }
}

fn test_config(source_url: &str, target_url: &str) -> TablediffConfig {
    TablediffConfig {
        source: EndpointConfig {
            url: Some(source_url.to_string()),
            ..Default::default()
        },
        target: EndpointConfig {
            url: Some(target_url.to_string()),
            ..Default::default()
        },
        ..Default::default()
    }
}

async fn setup(url: &str, statements: &[&str]) -> Conn {
    let mut conn = db::connect(url).await.expect("Failed to connect to DB");
    for statement in statements {
        conn.query_drop(*statement)
            .await
            .expect("Failed to run setup statement");
    }
    conn
}

#[tokio::test]
async fn test_identical_tables_need_no_ddl() {
    let Some((source_url, target_url)) = test_urls() else {
        return;
    };
    let ddl = "CREATE TABLE it_same (id INT NOT NULL AUTO_INCREMENT, name VARCHAR(64), PRIMARY KEY (id))";
    let source = setup(&source_url, &["DROP TABLE IF EXISTS it_same", ddl]).await;
    let target = setup(&target_url, &["DROP TABLE IF EXISTS it_same", ddl]).await;

    let config = test_config(&source_url, &target_url);
    let mut td = Tablediff::with_connections(config, source, target);
    let report = td.diff(&["it_same".to_string()]).await.unwrap();

    assert!(!report.has_changes);
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].diff_sql, "");
    assert_eq!(report.results[0].message, MSG_IDENTICAL);
    assert_eq!(report.results[0].remote_table, "it_same");
    td.close().await.unwrap();
}

#[tokio::test]
async fn test_missing_target_table_generates_create() {
    let Some((source_url, target_url)) = test_urls() else {
        return;
    };
    let source = setup(
        &source_url,
        &[
            "DROP TABLE IF EXISTS it_missing",
            "CREATE TABLE it_missing (id INT NOT NULL, PRIMARY KEY (id)) AUTO_INCREMENT=5",
        ],
    )
    .await;
    let target = setup(&target_url, &["DROP TABLE IF EXISTS it_missing"]).await;

    let config = test_config(&source_url, &target_url);
    let mut td = Tablediff::with_connections(config, source, target);
    let report = td.diff(&["it_missing".to_string()]).await.unwrap();

    assert!(report.has_changes);
    let result = &report.results[0];
    assert_eq!(result.remote_table, "");
    assert_eq!(result.message, MSG_TARGET_LACKS_TABLE);
    assert!(result.diff_sql.starts_with("CREATE TABLE"));
    assert!(!result.diff_sql.contains('\n'));
    assert!(!result.diff_sql.contains("AUTO_INCREMENT="));
    td.close().await.unwrap();
}

#[tokio::test]
async fn test_column_drift_generates_alter() {
    let Some((source_url, target_url)) = test_urls() else {
        return;
    };
    let source = setup(
        &source_url,
        &[
            "DROP TABLE IF EXISTS it_drift",
            "CREATE TABLE it_drift (id INT NOT NULL, name VARCHAR(128), extra_col INT, PRIMARY KEY (id))",
        ],
    )
    .await;
    let target = setup(
        &target_url,
        &[
            "DROP TABLE IF EXISTS it_drift",
            "CREATE TABLE it_drift (id INT NOT NULL, name VARCHAR(64), stale_col INT, PRIMARY KEY (id))",
        ],
    )
    .await;

    let config = test_config(&source_url, &target_url);
    let mut td = Tablediff::with_connections(config, source, target);
    let report = td.diff(&["it_drift".to_string()]).await.unwrap();

    assert!(report.has_changes);
    let result = &report.results[0];
    assert!(result.diff_sql.starts_with("ALTER TABLE `it_drift`"));
    assert!(result.diff_sql.contains("modify `name` varchar(128)"));
    assert!(result.diff_sql.contains("add column `extra_col`"));
    assert!(result.diff_sql.contains("drop column `stale_col`"));
    assert!(result.message.contains("modified columns: name"));
    assert!(result.message.contains("added columns: extra_col"));
    assert!(result.message.contains("dropped columns: stale_col"));
    td.close().await.unwrap();
}

#[tokio::test]
async fn test_index_drift_generates_alter() {
    let Some((source_url, target_url)) = test_urls() else {
        return;
    };
    let source = setup(
        &source_url,
        &[
            "DROP TABLE IF EXISTS it_idx",
            "CREATE TABLE it_idx (id INT NOT NULL, a INT, b INT, PRIMARY KEY (id), KEY idx_ab (a, b))",
        ],
    )
    .await;
    let target = setup(
        &target_url,
        &[
            "DROP TABLE IF EXISTS it_idx",
            "CREATE TABLE it_idx (id INT NOT NULL, a INT, b INT, PRIMARY KEY (id), KEY idx_stale (a))",
        ],
    )
    .await;

    let config = test_config(&source_url, &target_url);
    let mut td = Tablediff::with_connections(config, source, target);
    let report = td.diff(&["it_idx".to_string()]).await.unwrap();

    assert!(report.has_changes);
    let result = &report.results[0];
    assert!(result.diff_sql.contains("add index `idx_ab` (a,b)"));
    assert!(result.diff_sql.contains("drop index `idx_stale`"));
    assert!(result.message.contains("added indexes: idx_ab"));
    assert!(result.message.contains("dropped indexes: idx_stale"));
    td.close().await.unwrap();
}

#[tokio::test]
async fn test_results_follow_request_order() {
    let Some((source_url, target_url)) = test_urls() else {
        return;
    };
    let source = setup(
        &source_url,
        &[
            "DROP TABLE IF EXISTS it_ord_a",
            "DROP TABLE IF EXISTS it_ord_b",
            "CREATE TABLE it_ord_a (id INT NOT NULL, PRIMARY KEY (id))",
            "CREATE TABLE it_ord_b (id INT NOT NULL, PRIMARY KEY (id))",
        ],
    )
    .await;
    let target = setup(
        &target_url,
        &[
            "DROP TABLE IF EXISTS it_ord_a",
            "DROP TABLE IF EXISTS it_ord_b",
            "CREATE TABLE it_ord_a (id INT NOT NULL, PRIMARY KEY (id))",
        ],
    )
    .await;

    let config = test_config(&source_url, &target_url);
    let mut td = Tablediff::with_connections(config, source, target);
    let tables = vec!["it_ord_b".to_string(), "it_ord_a".to_string()];
    let report = td.diff(&tables).await.unwrap();

    assert_eq!(report.results.len(), 2);
    assert_eq!(report.results[0].selected_table, "it_ord_b");
    assert_eq!(report.results[0].remote_table, "");
    assert_eq!(report.results[1].selected_table, "it_ord_a");
    assert_eq!(report.results[1].message, MSG_IDENTICAL);
    td.close().await.unwrap();
}

#[tokio::test]
async fn test_check_connections() {
    let Some((source_url, target_url)) = test_urls() else {
        return;
    };
    let config = test_config(&source_url, &target_url);
    let mut td = Tablediff::new(config).await.unwrap();
    td.check_connections().await.unwrap();
    td.close().await.unwrap();
}

#[tokio::test]
async fn test_invalid_table_name_rejected() {
    let Some((source_url, target_url)) = test_urls() else {
        return;
    };
    let source = db::connect(&source_url).await.unwrap();
    let target = db::connect(&target_url).await.unwrap();

    let config = test_config(&source_url, &target_url);
    let mut td = Tablediff::with_connections(config, source, target);
    let err = td.diff(&["bad;name".to_string()]).await.unwrap_err();
    assert!(err.to_string().contains("invalid characters"));
    td.close().await.unwrap();
}
