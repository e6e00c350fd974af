//! Common test utilities and fixtures for cfgdeps integration tests
//!
//! Builds realistic downloaded trees on top of
//! [`cfgdeps_cli::test_utils::ConfigTree`] and runs the `cfgdeps` binary
//! against them.

// Allow dead code because these utilities are used across different test files
// and not all utilities are used in every test file
#![allow(dead_code)]

use anyhow::{Context, Result};
use serde_json::json;
use std::path::Path;
use std::process::Command;

pub use cfgdeps_cli::test_utils::ConfigTree;

/// Manifest of the `management-zone` type in [`download_tree`].
pub const ZONE_MANIFEST: &str = "\
config:
- zoneA: zoneA.json
- zoneB: zoneB.json
zoneA:
- name: Zone A
zoneB:
- name: Zone B
";

/// Manifest of the `alerting-profile` type in [`download_tree`].
pub const PROFILE_MANIFEST: &str = "\
config:
- profileA: profileA.json
- profileB: profileB.json
profileA:
- name: Profile A
profileB:
- name: Profile B
";

/// Manifest of the `application-web` type in [`download_tree`].
pub const APP_MANIFEST: &str = "\
config:
- shop: shop.json
shop:
- name: Shop
";

/// Manifest of the `auto-tag` type in [`download_tree`].
pub const TAG_MANIFEST: &str = "\
config:
- tagA: tagA.json
tagA:
- name: Tag A
";

/// Fill `tree` with a small but complete download.
///
/// - two management zones (string and numeric identifiers)
/// - a web application (identified by `identifier`)
/// - alerting profiles and an auto-tag referencing them at the top level
/// - a nested rule that must never be rewritten
pub fn download_tree(tree: ConfigTree) -> ConfigTree {
    tree.document("management-zone", "zoneA", json!({"id": "Z1", "name": "Zone A"}))
        .document("management-zone", "zoneB", json!({"id": 9001, "name": "Zone B"}))
        .manifest("management-zone", "management-zone.yaml", ZONE_MANIFEST)
        .document(
            "application-web",
            "shop",
            json!({"identifier": "APPLICATION-1", "name": "Shop", "mzId": "Z1"}),
        )
        .manifest("application-web", "application-web.yaml", APP_MANIFEST)
        .document(
            "alerting-profile",
            "profileA",
            json!({"id": "P1", "name": "Profile A", "mzId": "Z1", "rules": [{"mzId": "Z1"}]}),
        )
        .document(
            "alerting-profile",
            "profileB",
            json!({"id": "P2", "name": "Profile B", "managementZoneId": 9001, "applicationIdentifier": "APPLICATION-1"}),
        )
        .manifest("alerting-profile", "alerting-profile.yaml", PROFILE_MANIFEST)
        .document("auto-tag", "tagA", json!({"id": "T1", "name": "Tag A", "mzId": "Z1"}))
        .manifest("auto-tag", "auto-tag.yaml", TAG_MANIFEST)
}

/// Output of one `cfgdeps` invocation.
#[derive(Debug)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub code: Option<i32>,
}

/// Run the `cfgdeps` binary in `dir` with colors off and the user config dir inside `dir`.
pub fn run_cfgdeps(dir: &Path, args: &[&str]) -> Result<CommandOutput> {
    let binary = env!("CARGO_BIN_EXE_cfgdeps");
    let output = Command::new(binary)
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("CFGDEPS_CONFIG")
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env_remove("RUST_LOG")
        .output()
        .context("Failed to run cfgdeps command")?;

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        success: output.status.success(),
        code: output.status.code(),
    })
}
