//! Directory walking for downloaded configuration trees.
//!
//! Every pass of the engine enumerates the same tree, so the walk must be
//! deterministic: entries are visited depth-first with siblings sorted by file
//! name.

use crate::core::file_error::{FileOperation, FileOperationError, FileResultExt};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recursively finds files whose extension is one of `extensions`.
///
/// Directories are never returned. Extension matching is exact and
/// case-sensitive (`json` matches `zone.json`, not `zone.JSON` or
/// `zone.json.bak`).
///
/// Entries that cannot be read (e.g. a sub-directory without permissions) are
/// returned as errors in walk order so callers can record them and keep going.
///
/// # Examples
///
/// ```rust,no_run
/// use cfgdeps_cli::utils::fs::find_files_by_extension;
/// use std::path::Path;
///
/// for entry in find_files_by_extension(Path::new("download/prod"), &["json"]) {
///     match entry {
///         Ok(path) => println!("{}", path.display()),
///         Err(e) => eprintln!("{}", e.user_message()),
///     }
/// }
/// ```
pub fn find_files_by_extension(
    dir: &Path,
    extensions: &[&str],
) -> Vec<Result<PathBuf, FileOperationError>> {
    let mut results = Vec::new();

    for entry in WalkDir::new(dir).follow_links(false).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let failed_path = e.path().map_or_else(|| dir.to_path_buf(), Path::to_path_buf);
                let result: Result<PathBuf, std::io::Error> = Err(e.into());
                results.push(result.with_file_context(
                    FileOperation::Walk,
                    failed_path,
                    "enumerating configuration files",
                    "utils::fs::discovery",
                ));
                continue;
            }
        };

        if entry.file_type().is_dir() {
            continue;
        }

        let matches = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.contains(&ext));

        if matches {
            results.push(Ok(entry.into_path()));
        }
    }

    results
}
