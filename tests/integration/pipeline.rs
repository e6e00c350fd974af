//! Full pipeline runs through `process_downloaded_files`.

use crate::common::{ConfigTree, download_tree};
use cfgdeps_cli::api::KnownApis;
use cfgdeps_cli::config::Settings;
use cfgdeps_cli::core::CfgdepsError;
use cfgdeps_cli::solver::{Pass, process_downloaded_files};
use serde_json::json;

fn params(tree: &ConfigTree, config_type: &str, entry: &str) -> Vec<(String, String)> {
    let manifest = tree.read_manifest(config_type, &format!("{config_type}.yaml"));
    manifest[entry]
        .as_sequence()
        .unwrap()
        .iter()
        .map(|item| {
            let (k, v) = item.as_mapping().unwrap().iter().next().unwrap();
            (k.as_str().unwrap().to_string(), v.as_str().unwrap().to_string())
        })
        .collect()
}

#[test]
fn test_download_tree_is_fully_templated() {
    cfgdeps_cli::test_utils::init_test_logging(None);
    let tree = download_tree(ConfigTree::new());
    let settings = Settings::default();

    let report =
        process_downloaded_files(tree.root(), &settings, &KnownApis::from_settings(&settings)).unwrap();

    assert_eq!(report.files_indexed, 6);
    assert_eq!(report.files_rewritten, 4);
    assert_eq!(report.references_resolved, 5);
    assert_eq!(report.manifests_updated, 3);
    assert_eq!(report.parameters_injected, 5);
    assert!(report.collisions.is_empty());

    // identifiers are gone everywhere
    for (config_type, name) in [
        ("management-zone", "zoneA"),
        ("management-zone", "zoneB"),
        ("alerting-profile", "profileA"),
        ("alerting-profile", "profileB"),
        ("auto-tag", "tagA"),
    ] {
        assert!(tree.read_json(config_type, name).get("id").is_none(), "{config_type}/{name}");
    }
    assert!(tree.read_json("application-web", "shop").get("identifier").is_none());

    let profile_b = tree.read_json("alerting-profile", "profileB");
    assert_eq!(profile_b["managementZoneId"], "{{.managementZoneId}}");
    assert_eq!(profile_b["applicationIdentifier"], "{{.applicationIdentifier}}");

    assert_eq!(
        params(&tree, "alerting-profile", "profileB"),
        vec![
            ("name".to_string(), "Profile B".to_string()),
            ("managementZoneId".to_string(), "management-zone/zoneB.id".to_string()),
            ("applicationIdentifier".to_string(), "application-web/shop.id".to_string()),
        ]
    );
    assert_eq!(params(&tree, "application-web", "shop")[1].1, "management-zone/zoneA.id");
    assert_eq!(params(&tree, "auto-tag", "tagA")[1].1, "management-zone/zoneA.id");
}

#[test]
fn test_nested_reference_is_left_alone() {
    let tree = download_tree(ConfigTree::new());
    process_downloaded_files(tree.root(), &Settings::default(), &KnownApis::default()).unwrap();

    let profile_a = tree.read_json("alerting-profile", "profileA");
    assert_eq!(profile_a["mzId"], "{{.mzId}}");
    assert_eq!(profile_a["rules"], json!([{"mzId": "Z1"}]));
    // one parameter for the top-level field only
    assert_eq!(params(&tree, "alerting-profile", "profileA").len(), 2);
}

#[test]
fn test_untouched_manifest_is_not_rewritten() {
    let tree = download_tree(ConfigTree::new());
    let before = tree.read_raw("management-zone", "management-zone.yaml");

    process_downloaded_files(tree.root(), &Settings::default(), &KnownApis::default()).unwrap();

    assert_eq!(tree.read_raw("management-zone", "management-zone.yaml"), before);
}

#[test]
fn test_unresolved_reference_fails_run_but_keeps_other_work() {
    let tree = download_tree(ConfigTree::new()).document(
        "dashboard",
        "board",
        json!({"id": "D1", "mzId": "Z1", "managementZoneId": "Z-GONE"}),
    );

    let err =
        process_downloaded_files(tree.root(), &Settings::default(), &KnownApis::default()).unwrap_err();

    let unresolved: Vec<_> = err.errors_in(Pass::References).collect();
    assert_eq!(unresolved.len(), 1);
    match unresolved[0] {
        CfgdepsError::UnresolvedDependency {
            config_type,
            field,
            value,
            ..
        } => {
            assert_eq!(config_type, "dashboard");
            assert_eq!(field, "managementZoneId");
            assert_eq!(value, "Z-GONE");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    // the failing document is untouched, even its resolvable field
    let board = tree.read_json("dashboard", "board");
    assert_eq!(board["mzId"], "Z1");
    assert_eq!(board["managementZoneId"], "Z-GONE");

    // everything else still went through
    assert_eq!(err.report.files_rewritten, 4);
    assert_eq!(err.report.manifests_updated, 3);
}

#[test]
fn test_forward_reference_resolves() {
    // alerting-profile is walked before management-zone
    let tree = ConfigTree::new()
        .document("alerting-profile", "a-first", json!({"id": "P1", "mzId": "Z9"}))
        .manifest("alerting-profile", "alerting-profile.yaml", "a-first:\n- name: A\n")
        .document("management-zone", "z-last", json!({"id": "Z9"}));

    let report =
        process_downloaded_files(tree.root(), &Settings::default(), &KnownApis::default()).unwrap();

    assert_eq!(report.references_resolved, 1);
    assert_eq!(params(&tree, "alerting-profile", "a-first")[1].1, "management-zone/z-last.id");
}

#[test]
fn test_collision_is_reported_not_fatal() {
    let tree = ConfigTree::new()
        .document("auto-tag", "dup", json!({"id": "SAME"}))
        .document("management-zone", "dup", json!({"id": "SAME"}))
        .document("my-notes", "note", json!({"id": "N1", "mzId": "SAME"}));

    let report =
        process_downloaded_files(tree.root(), &Settings::default(), &KnownApis::default()).unwrap();

    assert_eq!(report.collisions.len(), 1);
    assert_eq!(report.collisions[0].kept, "management-zone/dup.json");
    assert_eq!(report.files_indexed, 3);
    // my-notes is not API-backed: rewritten, but no manifest needed
    assert_eq!(tree.read_json("my-notes", "note")["mzId"], "{{.mzId}}");
    assert_eq!(report.manifests_updated, 0);
}

#[test]
fn test_custom_reference_field_and_api_type() {
    let tree = ConfigTree::new()
        .document("synthetic-location", "loc", json!({"id": "L1"}))
        .document("my-monitor", "mon", json!({"id": "M1", "locationId": "L1"}))
        .manifest("my-monitor", "my-monitor.yaml", "mon:\n- name: Mon\n");

    let mut settings = Settings::default();
    settings.reference_fields.insert("locationId".to_string());
    settings.api_types.insert("my-monitor".to_string());

    let report =
        process_downloaded_files(tree.root(), &settings, &KnownApis::from_settings(&settings)).unwrap();

    assert_eq!(report.parameters_injected, 1);
    assert_eq!(
        params(&tree, "my-monitor", "mon")[1],
        ("locationId".to_string(), "synthetic-location/loc.id".to_string())
    );
}
