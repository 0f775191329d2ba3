//! CLI integration tests for strk-cli
//!
//! Every run gets its own HOME so no user config leaks in.

use std::io::Write;
use std::path::Path;
use std::process::Command;

use serde_json::Value;
use tempfile::{NamedTempFile, TempDir};

const CLASS_HASH: &str = "0x2b31e19e45c06f29234e06e2ee98a9966479ba3067f8785ed972794fdb0065c";

/// Helper to run the CLI with arguments
fn run_strk_in(home: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_strk"))
        .args(args)
        .env("HOME", home)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command")
}

fn run_strk(args: &[&str]) -> std::process::Output {
    let home = TempDir::new().unwrap();
    run_strk_in(home.path(), args)
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

fn abi_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    let abi = r#"[
        {"type": "struct", "name": "Nested", "size": 1,
         "members": [{"name": "value", "type": "felt", "offset": 0}]},
        {"type": "struct", "name": "Top", "size": 2,
         "members": [{"name": "value", "type": "felt", "offset": 0},
                     {"name": "nested_struct", "type": "Nested", "offset": 1}]},
        {"type": "constructor", "name": "constructor",
         "inputs": [{"name": "owner", "type": "felt"}], "outputs": []}
    ]"#;
    file.write_all(abi.as_bytes()).unwrap();
    file
}

// ==================== Help & Version Tests ====================

#[test]
fn test_cli_help() {
    let output = run_strk(&["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("strk"));
    assert!(stdout.contains("encode"));
    assert!(stdout.contains("address"));
    assert!(stdout.contains("wait"));
}

#[test]
fn test_cli_version() {
    let output = run_strk(&["--version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("strk"));
}

// ==================== Encode Command Tests ====================

#[test]
fn test_encode_schema_less_array() {
    let output = run_strk(&["encode", "--args", "[1, 2, 3]"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "0x3 0x1 0x2 0x3");
}

#[test]
fn test_encode_struct_json() {
    let abi = abi_file();
    let output = run_strk(&[
        "--json",
        "encode",
        "--abi",
        abi.path().to_str().unwrap(),
        "--struct",
        "Top",
        "--args",
        r#"{"nested_struct": {"value": 99}, "value": 12}"#,
    ]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["calldata"], serde_json::json!(["0xc", "0x63"]));
    assert_eq!(json["length"], 2);
}

#[test]
fn test_encode_constructor_arguments() {
    let abi = abi_file();
    let output = run_strk(&[
        "encode",
        "--abi",
        abi.path().to_str().unwrap(),
        "--args",
        r#"{"owner": "0xabc"}"#,
    ]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "0xabc");
}

#[test]
fn test_encode_missing_field_fails() {
    let abi = abi_file();
    let output = run_strk(&[
        "--json",
        "encode",
        "--abi",
        abi.path().to_str().unwrap(),
        "--struct",
        "Top",
        "--args",
        r#"{"value": 12}"#,
    ]);
    assert!(!output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("nested_struct"));
}

#[test]
fn test_encode_rejects_floats() {
    let output = run_strk(&["encode", "--args", "[1.5]"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error"));
}

// ==================== Address Command Tests ====================

fn predicted(args: &[&str]) -> String {
    let mut full = vec!["--json", "address", "--class-hash", CLASS_HASH];
    full.extend_from_slice(args);
    let output = run_strk(&full);
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
    stdout_json(&output)["address"].as_str().unwrap().to_string()
}

#[test]
fn test_address_is_deterministic() {
    let a = predicted(&["--salt", "0x1", "--calldata", "0x10,0x20"]);
    let b = predicted(&["--salt", "0x1", "--calldata", "0x10,0x20"]);
    assert_eq!(a, b);
    assert!(a.starts_with("0x"));
}

#[test]
fn test_address_depends_on_salt() {
    let a = predicted(&["--salt", "1"]);
    let b = predicted(&["--salt", "2"]);
    assert_ne!(a, b);
}

#[test]
fn test_address_abi_matches_raw_calldata() {
    let abi = abi_file();
    let via_abi = predicted(&[
        "--salt",
        "0x5",
        "--abi",
        abi.path().to_str().unwrap(),
        "--args",
        r#"{"owner": "0xabc"}"#,
    ]);
    let via_raw = predicted(&["--salt", "0x5", "--calldata", "0xabc"]);
    assert_eq!(via_abi, via_raw);
}

#[test]
fn test_address_unique_differs() {
    let plain = predicted(&["--salt", "0x5"]);
    let unique = predicted(&["--salt", "0x5", "--account", "0xacc0"]);
    assert_ne!(plain, unique);
}

#[test]
fn test_address_call_layout() {
    let output = run_strk(&[
        "--json",
        "address",
        "--class-hash",
        CLASS_HASH,
        "--salt",
        "0x7",
        "--calldata",
        "0xa",
    ]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["unique"], false);
    assert_eq!(
        json["call"]["to"],
        "0x41a78e741e5af2fec34b695679bc6891742439f7afb8484ecd7766661ad02bf"
    );
    let calldata = json["call"]["calldata"].as_array().unwrap();
    assert_eq!(calldata.len(), 5);
    assert_eq!(calldata[1], "0x7");
    assert_eq!(calldata[2], "0x0");
    assert_eq!(calldata[3], "0x1");
    assert_eq!(calldata[4], "0xa");
}

#[test]
fn test_address_args_without_abi_fails() {
    let output = run_strk(&["address", "--class-hash", CLASS_HASH, "--args", "[1]"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("without an abi"));
}

#[test]
fn test_address_missing_constructor_arguments_fails() {
    let abi = abi_file();
    let output = run_strk(&[
        "address",
        "--class-hash",
        CLASS_HASH,
        "--abi",
        abi.path().to_str().unwrap(),
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no arguments were provided"));
}

#[test]
fn test_address_invalid_class_hash() {
    let output = run_strk(&["address", "--class-hash", "0xnothex"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid field element"));
}

// ==================== Wait Command Tests ====================

#[test]
fn test_wait_unreachable_node_reports_transport_error() {
    let output = run_strk(&[
        "--json",
        "--rpc-url",
        "http://127.0.0.1:1",
        "wait",
        "0x1",
        "--interval",
        "1",
        "--timeout",
        "30",
    ]);
    assert!(!output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("Transport error"));
}

#[test]
fn test_wait_invalid_hash() {
    let output = run_strk(&["wait", "not-a-hash"]);
    assert!(!output.status.success());
}

// ==================== Config Command Tests ====================

#[test]
fn test_config_set_and_show() {
    let home = TempDir::new().unwrap();

    let output = run_strk_in(home.path(), &["config", "--set-rpc", "http://node.example:9545"]);
    assert!(output.status.success());
    assert!(home.path().join(".strk").join("config.toml").exists());

    let output = run_strk_in(home.path(), &["--json", "config", "--show"]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["rpc_url"], "http://node.example:9545");
    assert_eq!(json["poll_interval_secs"], 5);
}

#[test]
fn test_config_account_used_for_address() {
    let home = TempDir::new().unwrap();
    let output = run_strk_in(home.path(), &["config", "--set-account", "0xacc0"]);
    assert!(output.status.success());

    let output = run_strk_in(
        home.path(),
        &["--json", "address", "--class-hash", CLASS_HASH, "--salt", "0x5"],
    );
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["unique"], true);
}

#[test]
fn test_config_default_hint() {
    let output = run_strk(&["config"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--show"));
}
