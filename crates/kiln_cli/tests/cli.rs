use std::io::Write;
use std::process::{Command, Output};

use assert_cmd::prelude::*;
use tempfile::NamedTempFile;

fn kiln() -> Command {
    Command::new(env!("CARGO_BIN_EXE_kiln"))
}

fn run_kiln(args: &[&str]) -> Output {
    kiln().args(args).output().unwrap()
}

fn stdout_of(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn usage_without_args() {
    let out = run_kiln(&[]);
    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Usage: kiln"));
}

#[test]
fn unknown_command_and_dashed_options_are_usage_errors() {
    kiln().arg("frobnicate").assert().code(2);
    kiln().args(["config", "--verbose"]).assert().code(2);
    kiln().arg("ancestors").assert().code(2);
}

#[test]
fn config_single_key() {
    kiln().args(["config", "AR"]).assert().success().stdout("ar\n");
}

#[test]
fn config_missing_key_fails() {
    let out = run_kiln(&["config", "NO_SUCH_KEY"]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("key not found: NO_SUCH_KEY"), "{stderr}");
}

#[test]
fn config_json_is_all_strings() {
    let out = run_kiln(&["config", "json"]);
    assert!(out.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let obj = parsed.as_object().unwrap();
    assert!(obj.contains_key("prefix"));
    assert!(obj.values().all(|v| v.is_string()));
}

#[test]
fn config_listing_is_sorted() {
    let out = run_kiln(&["config"]);
    assert!(out.status.success());
    let keys: Vec<String> = stdout_of(&out)
        .lines()
        .map(|l| l.split_once('=').unwrap().0.to_string())
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[test]
fn config_from_source_file() {
    let file = write_config("# local build\nCC = \"clang\"\nAR = 'llvm-ar'\nprefix = /opt/kiln\n");
    let source = format!("source={}", file.path().display());
    let out = run_kiln(&["config", &source]);
    assert!(out.status.success());
    assert_eq!(stdout_of(&out), "AR=llvm-ar\nCC=clang\nprefix=/opt/kiln\n");
}

#[test]
fn config_source_with_non_string_value_fails() {
    let file = write_config("MAJOR = 3\n");
    let source = format!("source={}", file.path().display());
    let out = run_kiln(&["config", &source]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("must be a String, not Integer"), "{stderr}");
}

#[test]
fn config_flags_reports_archiver() {
    let out = run_kiln(&["config-flags", "json"]);
    assert!(out.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(parsed["archiver"], "ar");
    assert_eq!(parsed["installed"], false);
}

#[test]
fn encoding_defaults() {
    kiln()
        .arg("encoding")
        .assert()
        .success()
        .stdout("default_external=UTF-8\ndefault_internal=nil\n");
}

#[test]
fn encoding_assignment_is_case_insensitive() {
    kiln()
        .args(["encoding", "internal=shift_jis", "external=binary"])
        .assert()
        .success()
        .stdout("default_external=ASCII-8BIT\ndefault_internal=Shift_JIS\n");
}

#[test]
fn encoding_unknown_name_fails() {
    let out = run_kiln(&["encoding", "internal=klingon"]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("ArgumentError"), "{stderr}");
}

#[test]
fn encoding_external_nil_fails() {
    let out = run_kiln(&["encoding", "external=nil"]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn basic_object_own_constants() {
    kiln()
        .args(["constants", "BasicObject"])
        .assert()
        .success()
        .stdout("BasicObject\n");
}

#[test]
fn object_constants_with_inheritance() {
    let out = run_kiln(&["constants", "Object", "all"]);
    assert!(out.status.success());
    let out = stdout_of(&out);
    let names: Vec<&str> = out.lines().collect();
    assert!(names.contains(&"BasicObject"));
    assert!(names.contains(&"Encoding"));
}

#[test]
fn unknown_class_is_a_runtime_error() {
    let out = run_kiln(&["ancestors", "Nope"]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("NameError"), "{stderr}");
}

#[test]
fn ancestors_of_string() {
    let out = run_kiln(&["ancestors", "String", "json"]);
    assert!(out.status.success());
    let parsed: Vec<String> = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(parsed.first().map(String::as_str), Some("String"));
    assert_eq!(parsed.last().map(String::as_str), Some("BasicObject"));
    assert!(parsed.iter().any(|n| n == "Kernel"));
}

#[test]
fn methods_of_encoding_include_name() {
    let out = run_kiln(&["methods", "Encoding"]);
    assert!(out.status.success());
    let out = stdout_of(&out);
    assert!(out.lines().any(|l| l == "name"));
    assert!(out.lines().any(|l| l == "respond_to?"));
}

#[test]
fn scenario_outcomes() {
    for (name, expected) in [
        ("basic_object_metaclass", "Class"),
        ("metaclass_of_metaclass", "#<Class:#<Class:Widget>>"),
        ("singleton_isolation", "false"),
        ("remove_method_missing", "NoMethodError"),
        ("undef_method", "NoMethodError"),
        ("basic_object_constants", "BasicObject"),
        ("encoding_to_str", "Shift_JIS"),
        ("config_strings", "true"),
    ] {
        let out = run_kiln(&["scenario", name]);
        assert!(out.status.success(), "{name}: {}", String::from_utf8_lossy(&out.stderr));
        assert_eq!(stdout_of(&out).trim_end(), expected, "{name}");
    }
}

#[test]
fn scenario_list_and_unknown() {
    let out = run_kiln(&["scenario", "list"]);
    assert!(out.status.success());
    assert!(stdout_of(&out).contains("remove_method_missing"));
    kiln().args(["scenario", "nope"]).assert().code(2);
}
