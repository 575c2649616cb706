// Integration tests for the namerecon binary: exit codes, the --json stdout
// contract and the CSV files `run` leaves next to the config.
//
// Run with: cargo test -p namerecon-cli --test cli_tests -- --nocapture

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn namerecon() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_namerecon"));
    cmd.current_dir(env!("CARGO_MANIFEST_DIR"));
    cmd.env_remove("RUST_LOG");
    cmd
}

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../recon/tests/fixtures")
}

/// Copies the fixture CSVs into a fresh temp dir so `run` can write its
/// output next to the config.
fn workspace() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for name in ["tb_customer_names.csv", "fb_customer_names.csv", "qb_customer_names.csv"] {
        std::fs::copy(fixtures_dir().join(name), dir.path().join(name)).unwrap();
    }
    dir
}

fn write_config(dir: &Path, name: &str, toml: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, toml).unwrap();
    path
}

fn copy_fixture_config(dir: &Path, name: &str) -> PathBuf {
    let toml = std::fs::read_to_string(fixtures_dir().join(name)).unwrap();
    write_config(dir, name, &toml)
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn assert_exit(output: &Output, code: i32) {
    assert_eq!(
        output.status.code(),
        Some(code),
        "stdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        stderr(output)
    );
}

/// Assert stdout is a single, parseable JSON value with no extra lines.
fn assert_single_json(stdout: &[u8]) -> serde_json::Value {
    let text = String::from_utf8_lossy(stdout);
    let trimmed = text.trim();
    assert!(!trimmed.is_empty(), "stdout should not be empty");
    serde_json::from_str(trimmed).unwrap_or_else(|e| {
        panic!("stdout must be valid JSON.\nParse error: {}\nstdout:\n{}", e, trimmed)
    })
}

// ===========================================================================
// namerecon run
// ===========================================================================

#[test]
fn run_writes_csv_next_to_config() {
    let dir = workspace();
    let config = copy_fixture_config(dir.path(), "two-way.recon.toml");

    let output = namerecon().arg("run").arg(&config).output().unwrap();
    assert_exit(&output, 0);
    assert!(output.stdout.is_empty(), "no --json, stdout stays empty");
    assert!(stderr(&output).contains("7 customers from 2 sources"), "{}", stderr(&output));

    let csv = std::fs::read_to_string(dir.path().join("customer_reconciliation.csv")).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 8);
    assert_eq!(lines[0], r#""standardized_name","tb_names","fb_names""#);
    assert!(
        lines.contains(&r#""A&a Express Llc","A&A EXPRESS LLC","A A Express Llc""#),
        "{csv}"
    );
    assert!(
        lines.contains(
            &r#""Abbott's Garage & Wrecker Service","Abbott's Garage & Wrecker Service; ABBOTTS GARAGE AND WRECKER SERVICE","ABBOTT'S GARAGE & WRECKER SERVICE, INC.""#
        ),
        "{csv}"
    );
}

#[test]
fn run_json_contract() {
    let dir = workspace();
    let config = copy_fixture_config(dir.path(), "three-way.recon.toml");

    let output = namerecon().arg("run").arg(&config).args(["--json", "--no-csv"]).output().unwrap();
    assert_exit(&output, 0);
    let val = assert_single_json(&output.stdout);

    assert_eq!(val["meta"]["config_name"], "TB vs FB vs QB");
    assert_eq!(val["meta"]["sources"], serde_json::json!(["tb", "fb", "qb"]));
    assert!(val["meta"]["run_at"].is_string());

    let summary = &val["summary"];
    assert_eq!(summary["total_rows"], 8);
    assert_eq!(summary["in_all_sources"], 1);
    assert_eq!(summary["in_some_sources"], 3);
    assert_eq!(summary["in_one_source"], 4);
    assert_eq!(summary["names_per_source"]["qb"], 4);

    let rows = val["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 8);
    assert_eq!(rows[0]["standardized_name"], "3 Arrows Trucking");
    assert_eq!(rows[0]["members"][0], serde_json::json!(["3 Arrows Trucking"]));
    assert!(rows[0]["members"][1].is_null());

    assert!(!dir.path().join("customer_reconciliation.csv").exists(), "--no-csv writes nothing");
}

#[test]
fn run_output_file_and_csv_override() {
    let dir = workspace();
    let config = copy_fixture_config(dir.path(), "two-way.recon.toml");
    let json_path = dir.path().join("result.json");
    let csv_path = dir.path().join("out").join("customers.csv");

    let output = namerecon()
        .arg("run")
        .arg(&config)
        .arg("--output")
        .arg(&json_path)
        .arg("--csv")
        .arg(&csv_path)
        .output()
        .unwrap();
    assert_exit(&output, 0);

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(saved["summary"]["total_rows"], 7);
    assert!(csv_path.is_file());
    assert!(!dir.path().join("customer_reconciliation.csv").exists());
}

#[test]
fn run_splits_large_output_into_parts() {
    let dir = workspace();
    let config = write_config(
        dir.path(),
        "split.recon.toml",
        r#"
name = "split"

[[sources]]
label = "tb"
file = "tb_customer_names.csv"
column = "account_name"

[[sources]]
label = "fb"
file = "fb_customer_names.csv"
column = "customer"

[output]
file = "recon.csv"
max_rows_per_file = 3
"#,
    );

    let output = namerecon().arg("run").arg(&config).output().unwrap();
    assert_exit(&output, 0);

    assert!(!dir.path().join("recon.csv").exists());
    let mut total = 0;
    for part in 1..=3 {
        let path = dir.path().join(format!("recon_part_{part}_of_3.csv"));
        let text = std::fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("missing {}: {e}", path.display()));
        assert!(text.starts_with(r#""standardized_name","tb_names","fb_names""#));
        total += text.lines().count() - 1;
    }
    assert_eq!(total, 7);
}

#[test]
fn run_missing_csv_is_runtime_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = copy_fixture_config(dir.path(), "two-way.recon.toml");

    let output = namerecon().arg("run").arg(&config).output().unwrap();
    assert_exit(&output, 4);
    assert!(stderr(&output).contains("tb_customer_names.csv"), "{}", stderr(&output));
}

#[test]
fn run_missing_column_is_runtime_error() {
    let dir = workspace();
    let config = write_config(
        dir.path(),
        "bad-column.recon.toml",
        r#"
name = "bad column"

[[sources]]
label = "tb"
file = "tb_customer_names.csv"
column = "customer_name"

[[sources]]
label = "fb"
file = "fb_customer_names.csv"
column = "customer"
"#,
    );

    let output = namerecon().arg("run").arg(&config).output().unwrap();
    assert_exit(&output, 4);
    assert!(stderr(&output).contains("customer_name"), "{}", stderr(&output));
}

// ===========================================================================
// namerecon validate
// ===========================================================================

#[test]
fn validate_ok() {
    let dir = workspace();
    let config = copy_fixture_config(dir.path(), "three-way.recon.toml");

    let output = namerecon().arg("validate").arg(&config).output().unwrap();
    assert_exit(&output, 0);
    assert!(stderr(&output).contains("ok (3 sources: tb, fb, qb)"), "{}", stderr(&output));
}

#[test]
fn validate_rejects_single_source() {
    let dir = workspace();
    let config = write_config(
        dir.path(),
        "one.recon.toml",
        r#"
name = "one"

[[sources]]
label = "tb"
file = "tb_customer_names.csv"
column = "account_name"
"#,
    );

    let output = namerecon().arg("validate").arg(&config).output().unwrap();
    assert_exit(&output, 3);
    assert!(stderr(&output).contains("hint:"), "{}", stderr(&output));
}

#[test]
fn validate_rejects_bad_threshold() {
    let dir = workspace();
    let config = write_config(
        dir.path(),
        "ratio.recon.toml",
        r#"
name = "ratio"

[matcher]
min_match_ratio = 1.5

[[sources]]
label = "tb"
file = "tb_customer_names.csv"
column = "account_name"

[[sources]]
label = "fb"
file = "fb_customer_names.csv"
column = "customer"
"#,
    );

    let output = namerecon().arg("validate").arg(&config).output().unwrap();
    assert_exit(&output, 3);
    assert!(stderr(&output).contains("min_match_ratio"), "{}", stderr(&output));
}

#[test]
fn validate_unreadable_config() {
    let output = namerecon().args(["validate", "does-not-exist.recon.toml"]).output().unwrap();
    assert_exit(&output, 4);
}

// ===========================================================================
// namerecon match
// ===========================================================================

#[test]
fn match_exit_codes() {
    let same = namerecon().args(["match", "A&A EXPRESS LLC", "A A Express Llc"]).output().unwrap();
    assert_exit(&same, 0);
    assert!(String::from_utf8_lossy(&same.stdout).starts_with("match: "));

    let different = namerecon().args(["match", "United Rentals", "Sunrise Diner"]).output().unwrap();
    assert_exit(&different, 1);
    assert!(String::from_utf8_lossy(&different.stdout).starts_with("no match: "));
    assert!(!stderr(&different).contains("error:"), "no match is not an error");
}

#[test]
fn match_json_contract() {
    let output = namerecon()
        .args(["match", "ABBOTTS GARAGE AND WRECKER SERVICE", "Abbott's Garage & Wrecker Service", "--json"])
        .output()
        .unwrap();
    assert_exit(&output, 0);
    let val = assert_single_json(&output.stdout);

    assert_eq!(val["name1"], "ABBOTTS GARAGE AND WRECKER SERVICE");
    assert_eq!(val["name2"], "Abbott's Garage & Wrecker Service");
    assert_eq!(val["match"], true);
    assert!(val["reason"].is_string());
    assert!(val["pairs"].is_array());
    assert!(val["matched_meaningful"].is_number());
}

#[test]
fn match_json_no_match_still_prints_json() {
    let output = namerecon()
        .args(["match", "United Rentals", "Sunrise Diner", "--json"])
        .output()
        .unwrap();
    assert_exit(&output, 1);
    let val = assert_single_json(&output.stdout);
    assert_eq!(val["match"], false);
}

#[test]
fn match_with_invalid_config_exits_3() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(
        dir.path(),
        "loose.toml",
        "[matcher]\nmin_token_similarity = 0.0\n",
    );

    let output = namerecon()
        .args(["match", "A", "B", "--config"])
        .arg(&config)
        .output()
        .unwrap();
    assert_exit(&output, 3);
}

// ===========================================================================
// namerecon tokens
// ===========================================================================

#[test]
fn tokens_json_contract() {
    let output = namerecon()
        .args(["tokens", "Abbott's Garage & Wrecker Service, Inc.", "--json"])
        .output()
        .unwrap();
    assert_exit(&output, 0);
    let val = assert_single_json(&output.stdout);

    assert_eq!(val["name"], "Abbott's Garage & Wrecker Service, Inc.");
    for field in ["cleaned", "normalized", "stripped"] {
        assert!(val[field].is_string(), "{field}");
    }
    for field in ["tokens", "meaningful", "signatures"] {
        assert!(val[field].is_array(), "{field}");
    }
    assert!(!val["tokens"].as_array().unwrap().is_empty());
}

// ===========================================================================
// namerecon group
// ===========================================================================

#[test]
fn group_json_contract() {
    let file = fixtures_dir().join("tb_customer_names.csv");
    let output = namerecon()
        .arg("group")
        .arg(&file)
        .args(["--column", "account_name", "--json"])
        .output()
        .unwrap();
    assert_exit(&output, 0);
    let val = assert_single_json(&output.stdout);

    let groups = val.as_array().unwrap();
    assert_eq!(groups.len(), 5);
    let abbott = groups
        .iter()
        .find(|g| g["key"] == "Abbott's Garage & Wrecker Service")
        .unwrap();
    assert_eq!(abbott["members"].as_array().unwrap().len(), 2);
    assert!(stderr(&output).contains("6 names in 5 groups"), "{}", stderr(&output));
}

#[test]
fn group_missing_column_exits_4() {
    let file = fixtures_dir().join("fb_customer_names.csv");
    let output = namerecon()
        .arg("group")
        .arg(&file)
        .args(["-c", "account_name"])
        .output()
        .unwrap();
    assert_exit(&output, 4);
}

#[test]
fn group_requires_column() {
    let file = fixtures_dir().join("fb_customer_names.csv");
    let output = namerecon().arg("group").arg(&file).output().unwrap();
    assert_exit(&output, 2);
}

#[test]
fn positional_names_are_documented_in_help() {
    let output = namerecon().args(["match", "--help"]).output().unwrap();
    assert_exit(&output, 0);
    let help = String::from_utf8_lossy(&output.stdout);
    assert!(help.contains("First customer name"), "{help}");
    assert!(help.contains("Second customer name"), "{help}");

    let output = namerecon().args(["tokens", "--help"]).output().unwrap();
    assert_exit(&output, 0);
    assert!(String::from_utf8_lossy(&output.stdout).contains("Customer name to inspect"));
}
