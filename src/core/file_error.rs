//! Structured file system error handling for cfgdeps
//!
//! Captures context at the operation site (which file, why, who asked) instead of
//! parsing error messages after the fact.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Detailed file operation context for better error messages
#[derive(Debug, Clone)]
pub struct FileOperationContext {
    /// The type of operation being performed
    pub operation: FileOperation,
    /// The file path being accessed
    pub file_path: PathBuf,
    /// Why the file is being accessed
    pub purpose: String,
    /// The module that initiated the operation
    pub caller: String,
}

/// Types of file operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOperation {
    /// Reading a file completely
    Read,
    /// Checking if a file exists
    Exists,
    /// Walking a directory tree
    Walk,
}

impl std::fmt::Display for FileOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileOperation::Read => write!(f, "reading"),
            FileOperation::Exists => write!(f, "checking if file exists"),
            FileOperation::Walk => write!(f, "walking directory"),
        }
    }
}

impl FileOperationContext {
    /// Create a new file operation context
    pub fn new(
        operation: FileOperation,
        file_path: impl Into<PathBuf>,
        purpose: impl Into<String>,
        caller: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            file_path: file_path.into(),
            purpose: purpose.into(),
            caller: caller.into(),
        }
    }
}

/// File operation error with full context
#[derive(Error, Debug)]
#[error("File operation failed: {operation} {}", .file_path.display())]
pub struct FileOperationError {
    /// The type of operation that failed
    pub operation: FileOperation,
    /// The file path that was being accessed
    pub file_path: PathBuf,
    /// Why the file was being accessed
    pub purpose: String,
    /// What code initiated the operation
    pub caller: String,
    /// The underlying IO error
    #[source]
    pub source: std::io::Error,
}

impl FileOperationError {
    /// Create a new file operation error from context and IO error
    pub fn new(context: FileOperationContext, source: std::io::Error) -> Self {
        Self {
            operation: context.operation,
            file_path: context.file_path,
            purpose: context.purpose,
            caller: context.caller,
            source,
        }
    }

    /// Get a user-friendly error message with context
    pub fn user_message(&self) -> String {
        let mut message = format!(
            "Failed {} '{}' for {} ({})",
            self.operation,
            self.file_path.display(),
            self.purpose,
            self.caller
        );

        match self.source.kind() {
            std::io::ErrorKind::NotFound => {
                message.push_str("\n\nThe file does not exist at the specified path.");
            }
            std::io::ErrorKind::PermissionDenied => {
                message.push_str(&format!(
                    "\n\nPermission denied. Check file/directory permissions for: {}",
                    self.file_path.display()
                ));
            }
            std::io::ErrorKind::InvalidData => {
                message.push_str("\n\nThe file contains invalid data or encoding.");
                message.push_str("\nEnsure the file contains valid UTF-8 text.");
            }
            _ => {
                message.push_str(&format!("\n\nError details: {}", self.source));
            }
        }

        message
    }
}

/// Extension trait for Result types to add file operation context
pub trait FileResultExt<T> {
    /// Add file operation context to a Result
    fn with_file_context(
        self,
        operation: FileOperation,
        file_path: impl Into<PathBuf>,
        purpose: impl Into<String>,
        caller: impl Into<String>,
    ) -> Result<T, FileOperationError>;
}

impl<T> FileResultExt<T> for Result<T, std::io::Error> {
    fn with_file_context(
        self,
        operation: FileOperation,
        file_path: impl Into<PathBuf>,
        purpose: impl Into<String>,
        caller: impl Into<String>,
    ) -> Result<T, FileOperationError> {
        self.map_err(|io_error| {
            let context = FileOperationContext::new(operation, file_path, purpose, caller);
            FileOperationError::new(context, io_error)
        })
    }
}

/// Async helpers used by the settings loader
pub struct FileOps;

impl FileOps {
    /// Read a file with full context
    pub async fn read_with_context(
        path: &Path,
        purpose: &str,
        caller: &str,
    ) -> Result<String, FileOperationError> {
        tokio::fs::read_to_string(path).await.with_file_context(
            FileOperation::Read,
            path,
            purpose,
            caller,
        )
    }

    /// Check if a file exists with context
    pub async fn exists_with_context(
        path: &Path,
        purpose: &str,
        caller: &str,
    ) -> Result<bool, FileOperationError> {
        tokio::fs::metadata(path)
            .await
            .map(|_| true)
            .or_else(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Ok(false)
                } else {
                    Err(e)
                }
            })
            .with_file_context(FileOperation::Exists, path, purpose, caller)
    }
}
