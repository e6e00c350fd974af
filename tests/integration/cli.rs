//! Tests for the `cfgdeps` binary.

use crate::common::{ConfigTree, download_tree, run_cfgdeps};
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;

fn cfgdeps(tree: &ConfigTree) -> Command {
    let mut cmd = Command::cargo_bin("cfgdeps").unwrap();
    cmd.current_dir(tree.base())
        .env("NO_COLOR", "1")
        .env("HOME", tree.base())
        .env("XDG_CONFIG_HOME", tree.base().join(".config"))
        .env_remove("CFGDEPS_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_process_reports_summary() {
    let tree = download_tree(ConfigTree::new());

    cfgdeps(&tree)
        .arg("process")
        .arg(tree.root())
        .assert()
        .success()
        .stdout(predicate::str::contains("6 indexed"))
        .stdout(predicate::str::contains("3 manifests updated (5 parameters)"));

    assert_eq!(tree.read_json("auto-tag", "tagA")["mzId"], "{{.mzId}}");
}

#[test]
fn test_process_missing_root_fails_with_suggestion() {
    let tree = ConfigTree::new();

    cfgdeps(&tree)
        .args(["process", "no-such-download"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not a valid path"))
        .stderr(predicate::str::contains("suggestion"));
}

#[test]
fn test_process_unresolved_reference_fails() {
    let tree = ConfigTree::new()
        .document("alerting-profile", "profileA", json!({"id": "P1", "mzId": "Z404"}))
        .manifest("alerting-profile", "alerting-profile.yaml", "profileA:\n- name: A\n");

    cfgdeps(&tree)
        .arg("process")
        .arg(tree.root())
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Configuration alerting-profile has a dependency for the field mzId, but the Id Z404 is not found",
        ));

    assert_eq!(tree.read_json("alerting-profile", "profileA")["mzId"], "Z404");
}

#[test]
fn test_process_rerun_is_clean() {
    let tree = download_tree(ConfigTree::new());
    cfgdeps(&tree).arg("process").arg(tree.root()).assert().success();
    let snapshot = tree.snapshot();

    cfgdeps(&tree).arg("process").arg(tree.root()).assert().failure();
    cfgdeps(&tree)
        .arg("process")
        .arg(tree.root())
        .arg("--rerun")
        .assert()
        .success()
        .stdout(predicate::str::contains("0 indexed"));

    assert_eq!(tree.snapshot(), snapshot);
}

#[test]
fn test_process_environments_independently() {
    let base = ConfigTree::new();
    let prod = download_tree(base.environment("prod"));
    let dev = base
        .environment("dev")
        .document("dashboard", "board", json!({"id": "D1", "mzId": "MISSING"}));

    let output =
        run_cfgdeps(base.base(), &["process", ".", "--environment", "prod", "-e", "dev"]).unwrap();

    assert!(!output.success);
    assert_eq!(output.code, Some(1));
    assert!(output.stdout.contains("prod"), "{}", output.stdout);
    assert!(output.stderr.contains("failed for 1 of 2"), "{}", output.stderr);
    // prod was processed even though dev failed
    assert_eq!(prod.read_json("auto-tag", "tagA")["mzId"], "{{.mzId}}");
    assert_eq!(dev.read_json("dashboard", "board")["mzId"], "MISSING");
}

#[test]
fn test_index_json_is_read_only() {
    let tree = download_tree(ConfigTree::new());
    let before = tree.snapshot();

    let output = cfgdeps(&tree)
        .args(["--quiet", "index", "--format", "json"])
        .arg(tree.root())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let listing: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let ids: Vec<_> =
        listing["identifiers"].as_array().unwrap().iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids.len(), 6);
    assert!(ids.contains(&"9001"));
    assert!(ids.contains(&"APPLICATION-1"));
    assert_eq!(listing["collisions"], json!([]));
    assert_eq!(tree.snapshot(), before);
}

#[test]
fn test_index_text_lists_paths() {
    let tree = ConfigTree::new().document("management-zone", "zoneA", json!({"id": "Z1"}));

    cfgdeps(&tree)
        .arg("index")
        .arg(tree.root())
        .assert()
        .success()
        .stdout(predicate::str::contains("Z1"))
        .stdout(predicate::str::contains("management-zone/zoneA.json"));
}

#[test]
fn test_config_show_defaults_and_file() {
    let tree = ConfigTree::new();

    cfgdeps(&tree)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("identifier-field = \"id\""))
        .stdout(predicate::str::contains("mzId"))
        .stdout(predicate::str::contains("#   auto-tag"));

    std::fs::write(
        tree.base().join("cfgdeps.toml"),
        "reference-fields = [\"locationId\"]\napi-types = [\"my-monitor\"]\nnon-api-types = [\"auto-tag\"]\n",
    )
    .unwrap();
    cfgdeps(&tree)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("locationId"))
        .stdout(predicate::str::contains("mzId").not())
        .stdout(predicate::str::contains("#   my-monitor"))
        .stdout(predicate::str::contains("#   auto-tag").not());
}

#[test]
fn test_invalid_settings_file_is_reported() {
    let tree = ConfigTree::new();
    let settings = tree.base().join("bad.toml");
    std::fs::write(&settings, "no-such-key = 1\n").unwrap();

    cfgdeps(&tree)
        .arg("--config")
        .arg(&settings)
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}
