//! Integration tests for the CLI interface

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("payroll-report").unwrap();
    // Keep the host environment from leaking into configuration
    for var in [
        "PAYROLL_LOG_LEVEL",
        "PAYROLL_USE_MOCK_DATA",
        "PAYROLL_BIND_ADDR",
        "PAYROLL_DATABASE_URL",
        "PAYROLL_HR_BASE_URL",
        "PAYROLL_SALARY_BASE_URL",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_cli_help_flag() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("serve"));
}

#[test]
fn test_generate_help() {
    cli()
        .args(["generate", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--year"))
        .stdout(predicate::str::contains("--month"));
}

#[test]
fn test_invalid_command() {
    cli()
        .arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn test_generate_with_demo_data() {
    let temp_dir = TempDir::new().unwrap();

    let output = cli()
        .env("PAYROLL_USE_MOCK_DATA", "true")
        .args(["generate", "--year", "2017", "--month", "1", "--output-dir"])
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("report_2017_1_"))
        .get_output()
        .stdout
        .clone();

    let path = String::from_utf8(output).unwrap().trim().to_string();
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("January 2017\n"));
    assert!(content.contains("### Finance Department"));
    assert!(content.contains("### Accounting"));
    assert!(content.contains("### IT"));
    assert!(content.contains("Departments processed: 3 successful, 0 failed, 3 total"));
}

#[test]
fn test_generate_rejects_invalid_month() {
    let temp_dir = TempDir::new().unwrap();

    cli()
        .env("PAYROLL_USE_MOCK_DATA", "true")
        .args(["generate", "--year", "2017", "--month", "13", "--output-dir"])
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Month must be between 1 and 12"));

    assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[test]
fn test_missing_config_file_exits_with_config_error() {
    let temp_dir = TempDir::new().unwrap();

    cli()
        .arg("--config")
        .arg(temp_dir.path().join("absent.toml"))
        .args(["generate", "--year", "2017", "--month", "1"])
        .assert()
        .code(2);
}

#[test]
fn test_config_file_enables_demo_data() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("payroll-report.toml");
    fs::write(&config_path, "use_mock_data = true\n").unwrap();
    let out_dir = temp_dir.path().join("reports");

    cli()
        .arg("--config")
        .arg(&config_path)
        .args(["generate", "--year", "2020", "--month", "12", "--output-dir"])
        .arg(&out_dir)
        .assert()
        .success();

    let files: Vec<_> = fs::read_dir(&out_dir).unwrap().collect();
    assert_eq!(files.len(), 1);
}
