//! Core types for cfgdeps
//!
//! Error handling shared by every layer of the crate:
//! - [`CfgdepsError`] - typed failure modes of the engine, settings and file I/O
//! - [`ErrorContext`] - user-facing wrapper with details and a suggestion
//! - [`user_friendly_error`] - turn any [`anyhow::Error`] into an [`ErrorContext`]
//! - [`file_error`] - I/O errors that remember which file, why and who asked
//!
//! # Examples
//!
//! ```rust
//! use cfgdeps_cli::core::{CfgdepsError, ErrorContext};
//!
//! let ctx = ErrorContext::new(CfgdepsError::ConfigError {
//!     message: "reference-fields must not be empty".to_string(),
//! })
//! .with_suggestion("List at least one reference field in cfgdeps.toml");
//!
//! assert!(ctx.to_string().contains("reference-fields"));
//! ```

pub mod error;
pub mod file_error;

pub use error::{CfgdepsError, ErrorContext, user_friendly_error};
pub use file_error::{FileOperation, FileOperationError, FileResultExt};
