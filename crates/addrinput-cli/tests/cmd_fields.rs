//! Integration tests for `addrinput fields`.
#![allow(clippy::expect_used)]

use std::path::PathBuf;
use std::process::Command;

/// Path to the compiled `addrinput` binary.
fn addrinput_bin() -> PathBuf {
    let mut path = std::env::current_exe().expect("current exe");
    path.pop();
    if path.ends_with("deps") {
        path.pop();
    }
    path.push("addrinput");
    path
}

fn fields(args: &[&str]) -> std::process::Output {
    Command::new(addrinput_bin())
        .arg("fields")
        .args(args)
        .output()
        .expect("run addrinput fields")
}

fn field_names(stdout: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(stdout)
        .lines()
        .filter_map(|line| line.split([' ', '\t']).next())
        .map(str::to_owned)
        .collect()
}

#[test]
fn fields_follow_country_format() {
    let out = fields(&["--region", "us"]);
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(
        field_names(&out.stdout),
        [
            "RECIPIENT",
            "ORGANIZATION",
            "ADDRESS_LINE_1",
            "ADDRESS_LINE_2",
            "LOCALITY",
            "ADMIN_AREA",
            "POSTAL_CODE",
        ]
    );
}

#[test]
fn fields_mark_required_and_width() {
    let out = fields(&["--region", "US"]);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("POSTAL_CODE *\tSHORT"), "stdout: {stdout}");
    assert!(stdout.contains("ADDRESS_LINE_1 *\tLONG"), "stdout: {stdout}");
    assert!(stdout.contains("RECIPIENT\tLONG"), "stdout: {stdout}");
}

#[test]
fn custom_order_swaps_named_fields() {
    let out = fields(&["--region", "US", "--order", "postal_code,recipient"]);
    assert_eq!(out.status.code(), Some(0));
    let names = field_names(&out.stdout);
    assert_eq!(names.first().map(String::as_str), Some("POSTAL_CODE"));
    assert_eq!(names.last().map(String::as_str), Some("RECIPIENT"));
}

#[test]
fn duplicate_order_field_exits_2() {
    let out = fields(&["--region", "US", "--order", "Z,postal_code"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("invalid field order"));
}

#[test]
fn fields_json_lists_objects() {
    let out = fields(&["--region", "DE", "-f", "json"]);
    assert_eq!(out.status.code(), Some(0));
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).expect("valid JSON");
    assert_eq!(value["region"], "DE");
    let fields = value["fields"].as_array().expect("fields array");
    let postal = fields
        .iter()
        .find(|f| f["field"] == "POSTAL_CODE")
        .expect("DE uses postal codes");
    assert_eq!(postal["required"], true);
}
