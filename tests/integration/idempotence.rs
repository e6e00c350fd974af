//! Re-running the pipeline on its own output.

use crate::common::{ConfigTree, download_tree};
use cfgdeps_cli::api::KnownApis;
use cfgdeps_cli::config::Settings;
use cfgdeps_cli::solver::{Pass, process_downloaded_files};

fn rerun_settings() -> Settings {
    Settings {
        allow_stripped_identifiers: true,
        ..Settings::default()
    }
}

#[test]
fn test_second_run_changes_nothing() {
    let tree = download_tree(ConfigTree::new());
    process_downloaded_files(tree.root(), &Settings::default(), &KnownApis::default()).unwrap();
    let after_first = tree.snapshot();

    let report = process_downloaded_files(tree.root(), &rerun_settings(), &KnownApis::default()).unwrap();

    assert_eq!(report.files_indexed, 0);
    assert_eq!(report.files_rewritten, 0);
    assert_eq!(report.manifests_updated, 0);
    assert_eq!(report.parameters_injected, 0);
    assert_eq!(tree.snapshot(), after_first);
}

#[test]
fn test_second_run_without_rerun_reports_missing_identifiers() {
    let tree = download_tree(ConfigTree::new());
    process_downloaded_files(tree.root(), &Settings::default(), &KnownApis::default()).unwrap();
    let after_first = tree.snapshot();

    let err =
        process_downloaded_files(tree.root(), &Settings::default(), &KnownApis::default()).unwrap_err();

    assert_eq!(err.errors_in(Pass::Identity).count(), 6);
    assert_eq!(err.count_kind("missing-identifier"), 6);
    // placeholders are recognized, so nothing else fails or changes
    assert_eq!(err.errors.len(), 6);
    assert_eq!(tree.snapshot(), after_first);
}

#[test]
fn test_new_download_merged_into_processed_tree() {
    let tree = download_tree(ConfigTree::new());
    process_downloaded_files(tree.root(), &Settings::default(), &KnownApis::default()).unwrap();

    // a freshly downloaded zone and a profile referencing it arrive later
    let tree = tree
        .document("management-zone", "zoneC", serde_json::json!({"id": "Z3"}))
        .document("auto-tag", "tagC", serde_json::json!({"id": "T3", "mzId": "Z3"}))
        .manifest("auto-tag", "auto-tag.yaml", "tagA:\n- name: Tag A\n- mzId: management-zone/zoneA.id\ntagC:\n- name: Tag C\n");

    let report = process_downloaded_files(tree.root(), &rerun_settings(), &KnownApis::default()).unwrap();

    assert_eq!(report.files_indexed, 2);
    assert_eq!(report.files_rewritten, 1);
    assert_eq!(report.parameters_injected, 1);
    let manifest = tree.read_manifest("auto-tag", "auto-tag.yaml");
    assert_eq!(manifest["tagA"].as_sequence().unwrap().len(), 2);
    assert_eq!(manifest["tagC"][1]["mzId"].as_str(), Some("management-zone/zoneC.id"));
}
