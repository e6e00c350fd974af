//! File system utilities for the downloaded configuration tree
//!
//! # Key Features
//!
//! - **Atomic writes**: documents and manifests are replaced via temp-and-rename
//! - **Deterministic discovery**: walks are sorted so repeated runs match byte for byte
//! - **Contextual errors**: reads report which file failed and for what purpose
//!
//! # Examples
//!
//! ```rust,no_run
//! use cfgdeps_cli::utils::fs::{find_files_by_extension, read_text_file, safe_write};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! for path in find_files_by_extension(Path::new("download/prod"), &["json"]) {
//!     let path = path?;
//!     let content = read_text_file(&path, "inspecting")?;
//!     safe_write(&path, &content)?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod atomic;
pub mod discovery;
pub mod formats;
pub mod paths;

// Atomic write operations
pub use atomic::{atomic_write, safe_write};

// File discovery
pub use discovery::find_files_by_extension;

// Formats
pub use formats::{read_text_file, write_json_file, write_text_file, write_yaml_file};

// Path utilities
pub use paths::{parent_dir_name, relative_slash_path};
