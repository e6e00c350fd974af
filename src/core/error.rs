//! Error handling for cfgdeps
//!
//! This module provides the error types and user-facing error reporting for the
//! dependency resolution engine. The error system follows two rules:
//! 1. **Strongly-typed errors** so each pass can record precise, per-file failures
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`CfgdepsError`] - Enumerated failure modes of the engine and its ambient layers
//! - [`ErrorContext`] - Wrapper that adds details and a suggestion for display
//!
//! # Error Categories
//!
//! - **Engine**: [`CfgdepsError::InvalidRoot`], [`CfgdepsError::MissingIdentifier`],
//!   [`CfgdepsError::UnresolvedDependency`], [`CfgdepsError::ManifestConsistency`]
//! - **Files**: [`CfgdepsError::Read`], [`CfgdepsError::Parse`], [`CfgdepsError::Write`]
//! - **Configuration**: [`CfgdepsError::ConfigError`], [`CfgdepsError::TomlError`]
//!
//! Every engine error names the file it concerns so the caller can locate and fix
//! the source configuration.
//!
//! # Examples
//!
//! ```rust,no_run
//! use cfgdeps_cli::core::{CfgdepsError, user_friendly_error};
//!
//! let error = CfgdepsError::UnresolvedDependency {
//!     config_type: "alerting-profile".to_string(),
//!     field: "mzId".to_string(),
//!     value: "Z404".to_string(),
//!     path: "alerting-profile/profileA.json".into(),
//! };
//!
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for cfgdeps operations.
///
/// Per-file variants carry the path relative to the processed root where one is
/// known, so aggregated reports stay readable.
#[derive(Error, Debug)]
pub enum CfgdepsError {
    /// The root directory handed to the engine does not exist.
    ///
    /// Fatal: no pass runs.
    #[error("Not a valid path: {path}")]
    InvalidRoot {
        /// The path that was requested
        path: PathBuf,
    },

    /// A file in the tree could not be read (or the tree could not be walked).
    #[error("Failed to read {path}: {reason}")]
    Read {
        /// File or directory that could not be read
        path: PathBuf,
        /// Underlying failure
        reason: String,
    },

    /// A configuration document or parameter manifest could not be parsed.
    #[error("Failed to parse {path}: {reason}")]
    Parse {
        /// File that failed to parse
        path: PathBuf,
        /// Parser message
        reason: String,
    },

    /// A configuration document does not carry a usable identifier field.
    #[error("Configuration {path} has no usable '{field}' field: {reason}")]
    MissingIdentifier {
        /// Document missing its identifier
        path: PathBuf,
        /// Identifier field that was expected
        field: String,
        /// Why the field could not be used
        reason: String,
    },

    /// A reference field points at an identifier no downloaded configuration holds.
    #[error(
        "Configuration {config_type} has a dependency for the field {field}, but the Id {value} is not found ({path})"
    )]
    UnresolvedDependency {
        /// Type (directory name) of the referencing configuration
        config_type: String,
        /// Reference field name
        field: String,
        /// The raw identifier that could not be resolved
        value: String,
        /// Referencing document
        path: PathBuf,
    },

    /// A resolved dependency has no manifest entry to receive its parameter.
    #[error(
        "Parameter manifest for {config_type} cannot take '{field}' for config '{config_name}': {reason}"
    )]
    ManifestConsistency {
        /// Configuration type whose manifest was searched
        config_type: String,
        /// Config name (document stem) the parameter belongs to
        config_name: String,
        /// Parameter that could not be injected
        field: String,
        /// What was wrong with the manifest
        reason: String,
    },

    /// Persisting a rewritten document or manifest failed.
    #[error("Failed to write {path}: {reason}")]
    Write {
        /// Target path
        path: PathBuf,
        /// Underlying failure
        reason: String,
    },

    /// Settings could not be loaded or are inconsistent.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// What went wrong
        message: String,
    },

    /// TOML parsing error from the settings file
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Catch-all for errors without a dedicated variant
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl Clone for CfgdepsError {
    fn clone(&self) -> Self {
        match self {
            Self::InvalidRoot {
                path,
            } => Self::InvalidRoot {
                path: path.clone(),
            },
            Self::Read {
                path,
                reason,
            } => Self::Read {
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::Parse {
                path,
                reason,
            } => Self::Parse {
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::MissingIdentifier {
                path,
                field,
                reason,
            } => Self::MissingIdentifier {
                path: path.clone(),
                field: field.clone(),
                reason: reason.clone(),
            },
            Self::UnresolvedDependency {
                config_type,
                field,
                value,
                path,
            } => Self::UnresolvedDependency {
                config_type: config_type.clone(),
                field: field.clone(),
                value: value.clone(),
                path: path.clone(),
            },
            Self::ManifestConsistency {
                config_type,
                config_name,
                field,
                reason,
            } => Self::ManifestConsistency {
                config_type: config_type.clone(),
                config_name: config_name.clone(),
                field: field.clone(),
                reason: reason.clone(),
            },
            Self::Write {
                path,
                reason,
            } => Self::Write {
                path: path.clone(),
                reason: reason.clone(),
            },
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            Self::TomlError(e) => Self::Other {
                message: format!("TOML parsing error: {e}"),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

impl CfgdepsError {
    /// Short, stable name of the error kind, used in summaries and JSON output.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRoot {
                ..
            } => "invalid-root",
            Self::Read {
                ..
            } => "read",
            Self::Parse {
                ..
            } => "parse",
            Self::MissingIdentifier {
                ..
            } => "missing-identifier",
            Self::UnresolvedDependency {
                ..
            } => "unresolved-dependency",
            Self::ManifestConsistency {
                ..
            } => "manifest-consistency",
            Self::Write {
                ..
            } => "write",
            Self::ConfigError {
                ..
            }
            | Self::TomlError(_) => "config",
            Self::Other {
                ..
            } => "other",
        }
    }
}

/// Error wrapper with optional details and a suggestion for the user.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: CfgdepsError,
    /// Suggested fix
    pub suggestion: Option<String>,
    /// Extra explanation
    pub details: Option<String>,
}

impl ErrorContext {
    /// Wrap an error without details or suggestion.
    #[must_use]
    pub const fn new(error: CfgdepsError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Attach a suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] suitable for the terminal.
///
/// Known [`CfgdepsError`] variants get tailored suggestions; anything else is
/// rendered with its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(CfgdepsError::TomlError(toml_error)) = error.downcast_ref::<CfgdepsError>() {
        return ErrorContext::new(CfgdepsError::ConfigError {
            message: format!("{error}: {toml_error}"),
        })
        .with_suggestion("Check the TOML syntax of your cfgdeps.toml. Keys use kebab-case, e.g. reference-fields = [\"mzId\"]");
    }

    if let Some(cfg_error) = error.downcast_ref::<CfgdepsError>() {
        return create_error_context(cfg_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>()
        && io_error.kind() == std::io::ErrorKind::PermissionDenied
    {
        return ErrorContext::new(CfgdepsError::Other {
            message: error.to_string(),
        })
        .with_suggestion("Check that the downloaded tree is writable by the current user");
    }

    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(CfgdepsError::Other {
        message,
    })
}

fn create_error_context(error: CfgdepsError) -> ErrorContext {
    match &error {
        CfgdepsError::InvalidRoot {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Point cfgdeps at the directory the download step created (one sub-directory per configuration type)"),

        CfgdepsError::Parse {
            path,
            ..
        } => {
            let suggestion = if path.extension().is_some_and(|ext| ext == "json") {
                "Re-download the configuration; the file is not a JSON object"
            } else {
                "Fix the YAML syntax of the parameter manifest"
            };
            ErrorContext::new(error).with_suggestion(suggestion)
        }

        CfgdepsError::MissingIdentifier {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("If this tree was already processed, run again with --rerun")
            .with_details("Every downloaded configuration must carry the identifier the source system assigned to it"),

        CfgdepsError::UnresolvedDependency {
            field,
            ..
        } => {
            let suggestion = format!(
                "Download the configuration type that owns this '{field}' value as well, or remove the reference"
            );
            ErrorContext::new(error)
                .with_suggestion(suggestion)
                .with_details("The referenced object was not part of the download, so its identifier cannot be turned into a path")
        }

        CfgdepsError::ManifestConsistency {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Regenerate the type's YAML manifest so it lists every downloaded config"),

        CfgdepsError::Read {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check that the downloaded tree is readable by the current user"),

        CfgdepsError::Write {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Check free disk space and permissions on the output tree"),

        CfgdepsError::ConfigError {
            ..
        }
        | CfgdepsError::TomlError(_) => ErrorContext::new(error)
            .with_suggestion("Run 'cfgdeps config show' to see the effective settings"),

        CfgdepsError::Other {
            ..
        } => ErrorContext::new(error),
    }
}
