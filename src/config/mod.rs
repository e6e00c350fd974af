//! Configuration management for cfgdeps
//!
//! The engine's behavior (which fields are references, which file extensions
//! matter, which configuration types are API-backed) is data, not code. It lives
//! in [`Settings`], loaded from TOML.
//!
//! # Locations
//!
//! 1. `--config <path>` on the command line
//! 2. `$CFGDEPS_CONFIG`
//! 3. `./cfgdeps.toml`
//! 4. `<config dir>/cfgdeps/config.toml` (`~/.config` on Linux, `~/Library/Application Support` on macOS)
//!
//! The first two must exist when given; the last two are optional. Without any
//! file the built-in defaults apply.
//!
//! # Example
//!
//! ```rust,no_run
//! use cfgdeps_cli::config::Settings;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let settings = Settings::load_with_optional(None).await?;
//! assert!(settings.is_reference_field("mzId"));
//! # Ok(())
//! # }
//! ```

mod settings;

pub use settings::{CONFIG_ENV_VAR, LOCAL_CONFIG_FILE, Settings};
