//! Atomic file write operations using a temp-and-rename strategy.
//!
//! Rewritten configuration documents and manifests replace the originals in one
//! step, so an interrupted run never leaves a half-written JSON or YAML file in
//! the downloaded tree.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

/// Safely writes a string to a file using atomic operations.
///
/// Convenience wrapper around [`atomic_write`].
///
/// # Examples
///
/// ```rust,no_run
/// use cfgdeps_cli::utils::fs::safe_write;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// safe_write(Path::new("alerting-profile/alerting-profile.yaml"), "config: []\n")?;
/// # Ok(())
/// # }
/// ```
pub fn safe_write(path: &Path, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
}

/// Atomically writes bytes to a file.
///
/// The content goes to a temporary file created next to the target (same
/// directory, hence same filesystem), is synced to disk, and is then renamed over
/// the target path. Readers see either the old or the new content, never a mix.
///
/// The parent directory must already exist; the engine only rewrites files it
/// has just read.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = tempfile::Builder::new()
        .prefix(".cfgdeps-")
        .suffix(".tmp")
        .tempfile_in(parent)
        .with_context(|| format!("Failed to create temp file in: {}", parent.display()))?;

    temp.write_all(content)
        .with_context(|| format!("Failed to write temp file for: {}", path.display()))?;
    temp.as_file().sync_all().with_context(|| "Failed to sync file to disk")?;

    temp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to rename temp file to: {}", path.display()))?;

    Ok(())
}
