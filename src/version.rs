//! Runner version information.
//!
//! Taken from Cargo metadata (`CARGO_PKG_VERSION`) at compile time; the CLI's
//! `--version` reads it from here.

/// The runner version string (for example, `0.1.0`).
pub const RUNNER_VERSION: &str = env!("CARGO_PKG_VERSION");
