//! Smoke tests -- verify the binary runs and the CLI surface is wired up.

use assert_cmd::Command;
use std::io::Write;

#[test]
fn test_cli_help() {
    Command::cargo_bin("leakhound")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicates::str::contains("Multi-cloud cost-leak detection"));
}

#[test]
fn test_cli_version() {
    Command::cargo_bin("leakhound")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicates::str::contains("leakhound"));
}

#[test]
fn test_analyze_subcommand_exists() {
    Command::cargo_bin("leakhound")
        .unwrap()
        .args(["analyze", "--help"])
        .assert()
        .success();
}

#[test]
fn test_validate_accepts_cost_usage_export() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "UsageStartDate,Service,UnblendedCost").unwrap();
    writeln!(file, "2026-01-01,EC2,1.50").unwrap();

    Command::cargo_bin("leakhound")
        .unwrap()
        .args(["validate", "--input"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicates::str::contains("CSV is valid for analysis"))
        .stdout(predicates::str::contains("COST_USAGE"));
}

#[test]
fn test_validate_rejects_table_without_cost_columns() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "colA,colB").unwrap();
    writeln!(file, "1,2").unwrap();

    Command::cargo_bin("leakhound")
        .unwrap()
        .args(["validate", "--input"])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicates::str::contains("cost or usage"));
}

#[test]
fn test_analyze_clean_dataset_reports_no_leaks() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "UsageStartDate,Service,UnblendedCost,ResourceId").unwrap();
    writeln!(file, "2026-01-01,CloudWatch,0.50,alarm-1").unwrap();

    // CloudWatch is uncategorized, so only the untagged detector can
    // fire; the resource carries no tags, so we expect exactly that.
    Command::cargo_bin("leakhound")
        .unwrap()
        .args(["analyze", "--provider", "aws", "--input"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicates::str::contains("UNTAGGED_RESOURCE"));
}

#[test]
fn test_analyze_rejects_invoice_export() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "InvoiceId,Amount Due").unwrap();
    writeln!(file, "INV-1,100.00").unwrap();

    Command::cargo_bin("leakhound")
        .unwrap()
        .args(["analyze", "--provider", "aws", "--input"])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicates::str::contains("invoice"));
}

#[test]
fn test_analyze_json_output_parses() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "UsageStartDate,Service,UnblendedCost").unwrap();
    writeln!(file, "2026-01-01,EC2,1.50").unwrap();

    let output = Command::cargo_bin("leakhound")
        .unwrap()
        .args(["analyze", "--json", "--provider", "aws", "--input"])
        .arg(file.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(report.get("leaks").is_some());
    assert!(report.get("summary").is_some());
}
