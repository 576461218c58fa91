//! CLI integration tests

mod common;

use predicates::prelude::*;
use serde_json::Value;

fn json_stdout(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn test_dispense_json_success() {
    let root = common::TestRoot::new();
    root.add_devkit_dir("kitA-NVIDIA-v2", &[("a.txt", "A")]);
    root.add_license("NVIDIA", "lic1.txt", "KEY");

    let output = root
        .cmd()
        .args(["dispense", "kitA-NVIDIA-v2", "--format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let value = json_stdout(&output);
    assert_eq!(value["success"], true);
    assert_eq!(value["license"], "lic1.txt");
    let zip_name = value["zip_name"].as_str().unwrap();
    assert!(root.build_path(zip_name).is_file());
    assert_eq!(
        common::zip_entries(&root.build_path(zip_name)),
        common::set(&["dev-kit/a.txt", "license/lic1.txt"])
    );
}

#[test]
fn test_dispense_text_output() {
    let root = common::TestRoot::new();
    root.add_devkit_dir("kitA-NVIDIA", &[("a.txt", "A")]);
    root.add_license("NVIDIA", "lic1.txt", "KEY");

    root.cmd()
        .args(["dispense", "kitA-NVIDIA"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Built"))
        .stdout(predicate::str::contains("lic1.txt"));
}

#[test]
fn test_dispense_creates_output_dirs() {
    let root = common::TestRoot::new();
    std::fs::remove_dir(root.path.join("used")).unwrap();
    std::fs::remove_dir(root.path.join("builds")).unwrap();
    root.add_devkit_dir("kitA-NVIDIA", &[("a.txt", "A")]);
    root.add_license("NVIDIA", "lic1.txt", "KEY");

    root.cmd().args(["dispense", "kitA-NVIDIA"]).assert().success();

    assert_eq!(root.names_in("used"), common::set(&["lic1.txt"]));
    assert_eq!(root.names_in("builds").len(), 1);
}

#[test]
fn test_dispense_missing_identifier_json() {
    let root = common::TestRoot::new();

    let output = root
        .cmd()
        .args(["dispense", "--format", "json"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let value = json_stdout(&output);
    assert_eq!(value["success"], false);
    assert_eq!(value["code"], "invalid_input");
    assert_eq!(value["status"], 400);
    assert_eq!(value["error"], "Missing identifier.");
}

#[test]
fn test_dispense_malformed_identifier_json() {
    let root = common::TestRoot::new();

    let output = root
        .cmd()
        .args(["dispense", "../secret", "--format", "json"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let value = json_stdout(&output);
    assert_eq!(value["code"], "invalid_input");
    assert!(
        value["error"]
            .as_str()
            .unwrap()
            .contains("Invalid identifier format")
    );
}

#[test]
fn test_dispense_not_found_json() {
    let root = common::TestRoot::new();
    root.add_license("NVIDIA", "lic1.txt", "KEY");

    let output = root
        .cmd()
        .args(["dispense", "nokit-NVIDIA", "--format", "json"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let value = json_stdout(&output);
    assert_eq!(value["code"], "not_found");
    assert_eq!(value["status"], 404);
    assert_eq!(root.names_in("available/NVIDIA").len(), 1);
}

#[test]
fn test_dispense_exhausted_json() {
    let root = common::TestRoot::new();
    root.add_devkit_dir("kitA-NVIDIA", &[("a.txt", "A")]);

    let output = root
        .cmd()
        .args(["dispense", "kitA-NVIDIA", "--format", "json"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let value = json_stdout(&output);
    assert_eq!(value["code"], "pool_exhausted");
    assert_eq!(value["status"], 500);
}

#[test]
fn test_dispense_text_error_goes_to_stderr() {
    let root = common::TestRoot::new();

    root.cmd()
        .args(["dispense", "kit A"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid identifier format"))
        .stderr(predicate::str::contains("help:"));
}

#[test]
fn test_root_from_env() {
    let root = common::TestRoot::new();
    root.add_devkit_dir("kitA-NVIDIA", &[("a.txt", "A")]);
    root.add_license("NVIDIA", "lic1.txt", "KEY");

    common::dispenser_cmd()
        .env("DISPENSER_ROOT", &root.path)
        .args(["dispense", "kitA-NVIDIA"])
        .assert()
        .success();

    assert_eq!(root.names_in("used"), common::set(&["lic1.txt"]));
}

#[test]
fn test_invalid_config_fails() {
    let root = common::TestRoot::new();
    root.write_file("dispenser.yaml", "builds_dir: ../elsewhere\n");

    root.cmd()
        .args(["inventory"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn test_inventory_json() {
    let root = common::TestRoot::new();
    root.add_licenses("NVIDIA", 3);
    root.add_licenses("AMD", 1);
    root.write_file("used/old.txt", "O");

    let output = root
        .cmd()
        .args(["inventory", "--format", "json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let value = json_stdout(&output);
    assert_eq!(value["available"]["NVIDIA"], 3);
    assert_eq!(value["available"]["AMD"], 1);
    assert_eq!(value["used"], 1);
}

#[test]
fn test_inventory_text() {
    let root = common::TestRoot::new();
    root.add_licenses("NVIDIA", 2);

    root.cmd()
        .args(["inventory"])
        .assert()
        .success()
        .stdout(predicate::str::contains("NVIDIA"))
        .stdout(predicate::str::contains("Used:"));
}

#[test]
fn test_release_round_trip() {
    let root = common::TestRoot::new();
    root.add_devkit_dir("kitA-NVIDIA", &[("a.txt", "A")]);
    root.add_license("NVIDIA", "lic1.txt", "KEY");

    root.cmd().args(["dispense", "kitA-NVIDIA"]).assert().success();
    root.cmd()
        .args(["release", "lic1.txt", "--platform", "NVIDIA"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Released lic1.txt"));

    assert_eq!(
        root.names_in("available/NVIDIA"),
        common::set(&["lic1.txt"])
    );
    assert!(root.names_in("used").is_empty());
}

#[test]
fn test_release_rejects_bad_platform() {
    let root = common::TestRoot::new();

    root.cmd()
        .args(["release", "lic1.txt", "--platform", "../x"])
        .assert()
        .failure();
}

#[test]
fn test_completions() {
    common::dispenser_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dispenser"));
}

#[test]
fn test_completions_unknown_shell() {
    common::dispenser_cmd()
        .args(["completions", "tcsh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("tcsh"));
}
