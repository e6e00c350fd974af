//! Test utilities for cfgdeps
//!
//! This module provides helpers for writing tests against downloaded
//! configuration trees: a [`ConfigTree`] builder that lays out documents and
//! manifests in a temporary directory, and a one-time logging setup.
//!
//! # Example
//!
//! ```rust,no_run
//! use cfgdeps_cli::test_utils::ConfigTree;
//! use serde_json::json;
//!
//! let tree = ConfigTree::new()
//!     .document("management-zone", "zoneA", json!({"id": "Z1"}))
//!     .manifest("management-zone", "management-zone.yaml", "zoneA:\n- name: A\n");
//!
//! assert_eq!(tree.read_json("management-zone", "zoneA")["id"], "Z1");
//! ```

mod tree;

pub use tree::ConfigTree;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. With `level` set, that level is used;
/// otherwise `RUST_LOG` decides, and without it tests run silently.
///
/// ```bash
/// RUST_LOG=cfgdeps_cli=trace cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
