//! Path helpers for locations inside a downloaded tree.

use std::path::{Component, Path};

/// Renders `path` relative to `root` with `/` separators on every platform.
///
/// Relative paths end up inside parameter manifests, which must not change
/// between a Windows and a Unix download of the same environment. Returns `None`
/// when `path` is not below `root`.
///
/// ```rust
/// use cfgdeps_cli::utils::fs::relative_slash_path;
/// use std::path::Path;
///
/// let rel = relative_slash_path(Path::new("/dl/prod"), Path::new("/dl/prod/management-zone/zoneA.json"));
/// assert_eq!(rel.as_deref(), Some("management-zone/zoneA.json"));
/// ```
#[must_use]
pub fn relative_slash_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Name of the directory directly containing `path`.
///
/// In a downloaded tree this is the configuration type (`management-zone`,
/// `alerting-profile`, ...).
#[must_use]
pub fn parent_dir_name(path: &Path) -> Option<String> {
    path.parent()?.file_name().map(|name| name.to_string_lossy().into_owned())
}
