use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn mktdash() -> Command {
    let mut cmd = Command::cargo_bin("mktdash").unwrap();
    cmd.env_remove("MKTDASH_CONFIG")
        .env_remove("MKTDASH_SNAPSHOT")
        .env("RUST_LOG", "warn");
    cmd
}

fn run_markets(markets: &[&str]) -> Command {
    let mut cmd = mktdash();
    cmd.arg("--snapshot")
        .arg(fixture("snapshot.yaml"))
        .args(["--as-of", "2025-10-31", "--markets"])
        .args(markets);
    cmd
}

#[test]
fn test_flagged_money_market_exits_one() {
    run_markets(&["Money"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[Money Markets]  Status: FLAGS"))
        .stdout(predicate::str::contains("SOFR–EFFR basis |abs| > 5 bp (7.0 bp)"));
}

#[test]
fn test_clean_markets_exit_zero() {
    run_markets(&["FX", "Bonds"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("[Foreign Exchange (FX)]  Status: OK"))
        .stdout(predicate::str::contains("[Bond Markets]  Status: OK"));
}

#[test]
fn test_quiet_on_success_hides_clean_reports() {
    run_markets(&["Bonds"])
        .arg("--quiet-on-success")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Status: OK"))
        .stdout(predicate::str::contains("--- Report ---").not());
}

#[test]
fn test_json_output() {
    let output = run_markets(&["Money", "FX"])
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(doc["timestamp_utc"].as_str().unwrap().ends_with('Z'));
    let money = &doc["results"]["Money"];
    assert_eq!(money["title"], "Money Markets");
    assert_eq!(money["error"], "");
    assert_eq!(money["flags"][0], "SOFR–EFFR basis |abs| > 5 bp (7.0 bp)");
    assert!(doc["results"]["FX"]["flags"].as_array().unwrap().is_empty());
}

#[test]
fn test_json_output_for_clean_markets() {
    let output = run_markets(&["FX", "Bonds"])
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));

    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    for market in ["FX", "Bonds"] {
        let entry = &doc["results"][market];
        assert!(entry["flags"].as_array().unwrap().is_empty(), "{market} flags");
        assert_eq!(entry["error"], "", "{market} error");
    }
}

#[test]
fn test_disabled_market_is_a_load_failure() {
    mktdash()
        .arg("--config")
        .arg(fixture("money_disabled.yaml"))
        .args(["--markets", "Money", "Bonds"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("[Money Markets]  Status: ERROR"))
        .stderr(predicate::str::contains("One or more modules could not be loaded"));
}

#[test]
fn test_all_skips_disabled_markets() {
    mktdash()
        .arg("--config")
        .arg(fixture("money_disabled.yaml"))
        .arg("--all")
        .assert()
        .stdout(predicate::str::contains("[Money Markets]").not())
        .stdout(predicate::str::contains("[Futures & Options]"));
}

#[test]
fn test_missing_snapshot_reports_error_status() {
    let dir = tempfile::tempdir().unwrap();
    mktdash()
        .arg("--snapshot")
        .arg(dir.path().join("absent.yaml"))
        .args(["--as-of", "2025-10-31", "--markets", "Bonds"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("[Bond Markets]  Status: ERROR"));
}

#[test]
fn test_validate_config() {
    mktdash()
        .arg("--config")
        .arg(fixture("money_disabled.yaml"))
        .arg("--validate-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("[ok] Configuration is valid!"));
}

#[test]
fn test_init_config_writes_valid_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("health_config.yaml");

    mktdash()
        .arg("--init-config")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file created successfully"));
    assert!(path.exists());

    mktdash()
        .arg("--config")
        .arg(&path)
        .arg("--validate-config")
        .assert()
        .success();
}

#[test]
fn test_malformed_config_exits_two() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.yaml");
    std::fs::write(&path, "fx: [this is not a mapping\n").unwrap();

    mktdash()
        .arg("--config")
        .arg(&path)
        .arg("--all")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_no_action_is_a_usage_error() {
    mktdash().assert().code(2);
}
