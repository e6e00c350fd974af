//! Utilities shared by the engine passes and the CLI
//!
//! # Modules
//!
//! - [`fs`] - Atomic writes, deterministic tree walks, JSON/YAML file I/O

pub mod fs;

pub use fs::{atomic_write, find_files_by_extension, safe_write};
