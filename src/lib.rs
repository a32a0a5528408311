#![forbid(unsafe_code)]
//! SIRF Conformance Runner
//!
//! Compiles every test case in a directory with `sirfc`, runs the resulting
//! executables and compares their stdout against golden `.out` files. The
//! process exit code is 0 only when every case passed, so the runner can gate
//! CI directly.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod compare;
pub mod config;
pub mod version;

pub use cli::test_runner::{LogReporter, TestOutcome, TestReporter, TestRunner, TestSummary, run_tests};
pub use compare::{OutputMismatch, trimmed_eq};
pub use config::RunnerConfig;
