//! Integration test suite for cfgdeps
//!
//! End-to-end tests running the library pipeline and the `cfgdeps` binary over
//! complete downloaded trees.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **pipeline**: full runs through the library entry point
//! - **idempotence**: re-running on processed output
//! - **cli**: the `cfgdeps` binary (`process`, `index`, `config`)

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod cli;
mod idempotence;
mod pipeline;
