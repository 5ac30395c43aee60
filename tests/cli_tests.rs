//! Tests for the offline `migrate` and `guide` subcommands.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const SOURCE: &str = "\
const orders = await client.getOrders({ CreatedAfter: since });
for (const order of orders) {
  console.log(order.OrderStatus, order.IsPrime);
}
";

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sp-orders-mcp"))
        .args(args)
        .current_dir(dir)
        .env_remove("SP_API_TOKEN_ENDPOINT")
        .env("SP_ORDERS_MCP_LOG", "off")
        .output()
        .unwrap()
}

fn fixture() -> (TempDir, String) {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("orders.ts");
    fs::write(&file, SOURCE).unwrap();
    (dir, file.display().to_string())
}

#[test]
fn test_migrate_prints_report() {
    let (dir, file) = fixture();
    let output = run(dir.path(), &["migrate", &file, "--language", "typescript"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("# Migration Analysis Report"));
    assert!(stdout.contains("```typescript"));
    assert!(stdout.contains("client.searchOrders("));
}

#[test]
fn test_migrate_analysis_only() {
    let (dir, file) = fixture();
    let output = run(dir.path(), &["migrate", &file, "--analysis-only"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("## Migration Checklist"));
    assert!(!stdout.contains("## Refactored Code"));
}

#[test]
fn test_migrate_diff() {
    let (dir, file) = fixture();
    let output = run(dir.path(), &["migrate", &file, "--diff"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("-const orders = await client.getOrders("));
    assert!(stdout.contains("+const orders = await client.searchOrders("));

    // The input file is never touched.
    assert_eq!(fs::read_to_string(&file).unwrap(), SOURCE);
}

#[test]
fn test_migrate_rejects_unknown_versions() {
    let (dir, file) = fixture();
    let output = run(
        dir.path(),
        &["migrate", &file, "--source-version", "orders-v1"],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unsupported migration path: orders-v1 → orders-2026-01-01"));
}

#[test]
fn test_migrate_diff_rejects_unknown_versions() {
    let (dir, file) = fixture();
    let output = run(
        dir.path(),
        &["migrate", &file, "--diff", "--target-version", "orders-v9"],
    );

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unsupported migration path: orders-v0 → orders-v9"));
    assert!(stderr.contains("- orders-v0 → orders-2026-01-01"));
}

#[test]
fn test_migrate_missing_file() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["migrate", "does-not-exist.js"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read"));
}

#[test]
fn test_guide() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &["guide"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("## API Method Mapping"));
    assert!(stdout.contains("getOrderBuyerInfo"));
}
