use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

fn repo_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("expected crates/<name> layout")
        .to_path_buf()
}

fn fixture(name: &str) -> PathBuf {
    let path = repo_root().join("fixtures").join(name);
    assert!(path.exists(), "fixture missing: {}", path.display());
    path
}

fn cli() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo_bin!("txnflow-cli"));
    cmd.env_remove("TXNFLOW_LOG");
    cmd
}

fn stdout_json(cmd: &mut Command) -> Value {
    let assert = cmd.assert().success();
    serde_json::from_slice(&assert.get_output().stdout).expect("stdout is JSON")
}

#[test]
fn cli_lays_out_nested_fixture() {
    let path = fixture("nested_app_call.json");
    let graph = stdout_json(cli().arg(path.to_string_lossy().as_ref()));

    let lanes = graph["lanes"].as_array().expect("lanes");
    let types: Vec<&str> = lanes.iter().map(|l| l["type"].as_str().unwrap()).collect();
    assert_eq!(
        types,
        vec!["Account", "Account", "Application", "Account", "Account"]
    );
    assert_eq!(lanes[2]["applicationId"], 1284326447u64);
    assert_eq!(lanes[2]["rekeyedAccounts"][0]["address"], "BOB");
    assert_eq!(lanes[2]["clawbackFromAccounts"][0]["address"], "DAVE");

    let rows = graph["rows"].as_array().expect("rows");
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[1]["hasChildren"], true);
    assert_eq!(rows[1]["transaction"]["id"], "CALL");
    assert_eq!(rows[1]["transaction"]["innerTransactionCount"], 2);
    assert!(rows[1]["transaction"].get("innerTransactions").is_none());
    assert_eq!(rows[2]["ancestors"], serde_json::json!([1]));
    assert_eq!(rows[3]["visualization"]["description"]["type"], "Clawback");
    assert_eq!(rows[4]["isContinuation"], true);
    assert_eq!(rows[3]["visualization"]["toLaneId"], 4);
    assert_eq!(rows[4]["visualization"]["fromLaneId"], 2);
    assert_eq!(rows[4]["visualization"]["fromAccountNumber"], 4);
    assert_eq!(rows[4]["visualization"]["toLaneId"], 3);
    assert_eq!(rows[5]["visualization"]["type"], "point");
}

#[test]
fn cli_reads_stdin_and_honours_placeholder_mode() {
    let text = fs::read_to_string(fixture("self_payment.json")).expect("read fixture");

    let graph = stdout_json(cli().arg("-").write_stdin(text.clone()));
    let lanes = graph["lanes"].as_array().expect("lanes");
    assert_eq!(lanes.len(), 2);
    assert_eq!(lanes[1]["type"], "Placeholder");
    assert_eq!(graph["rows"][0]["visualization"]["type"], "selfLoop");

    let graph = stdout_json(cli().args(["--placeholder", "never"]).write_stdin(text));
    assert_eq!(graph["lanes"].as_array().map(Vec::len), Some(1));
}

#[test]
fn cli_lanes_command_prints_pretty_lane_list() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = tmp.path().join("txns.json");
    fs::copy(fixture("nested_app_call.json"), &input).expect("copy fixture");

    let assert = cli()
        .args(["lanes", "--pretty", input.to_string_lossy().as_ref()])
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.contains("\n  {"), "expected pretty output: {stdout}");

    let lanes: Value = serde_json::from_str(&stdout).expect("stdout is JSON");
    let ids: Vec<u64> = lanes
        .as_array()
        .expect("lane list")
        .iter()
        .map(|l| l["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![0, 1, 2, 3, 4]);
}

#[test]
fn cli_reports_invalid_transactions_with_their_path() {
    let assert = cli()
        .arg(fixture("empty_receiver.json").to_string_lossy().as_ref())
        .assert()
        .failure()
        .code(1);
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr);
    assert!(
        stderr.contains("Invalid transaction at [0].innerTransactions[0].receiver"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn cli_reports_malformed_json() {
    let assert = cli().write_stdin("[{\"type\": \"Teleport\"}]").assert().failure().code(1);
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr);
    assert!(stderr.contains("Transaction JSON error"), "unexpected stderr: {stderr}");
}

#[test]
fn cli_derives_application_addresses() {
    let assert = cli().args(["app-address", "1284326447"]).assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    let address = stdout.trim();
    assert_eq!(address.len(), 58);
    assert!(address.chars().all(|c| c.is_ascii_uppercase() || ('2'..='7').contains(&c)));
}

#[test]
fn cli_usage_errors_exit_with_code_2() {
    cli().arg("--bogus").assert().failure().code(2);
    cli().args(["--placeholder", "sometimes"]).assert().failure().code(2);
}
