//! CLI module for the SIRF conformance runner
//!
//! ## Modules
//!
//! - `test_interfaces` - Discovery/compiler/executor traits and their process-backed impls
//! - `test_runner` - The compile → run → compare loop and reporting
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod test_interfaces;
pub mod test_runner;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use crate::config::{
    DEFAULT_ARTIFACT_SUFFIX, DEFAULT_COMPILER, DEFAULT_EXPECTED_SUFFIX, DEFAULT_TEST_EXTENSION, DEFAULT_TESTS_DIR,
    RunnerConfig,
};
use crate::version::RUNNER_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Compile every test case with sirfc, run it and diff its stdout against the golden file
#[derive(Parser, Debug)]
#[command(name = "sirf-test")]
#[command(version = RUNNER_VERSION)]
#[command(about = "Conformance test runner for the SIRF compiler", long_about = None)]
pub struct Cli {
    /// Directory containing the test cases (not searched recursively)
    #[arg(long, value_name = "DIR", default_value = DEFAULT_TESTS_DIR)]
    pub tests_dir: PathBuf,

    /// Compiler binary to invoke
    #[arg(long, value_name = "PATH", default_value = DEFAULT_COMPILER)]
    pub compiler: PathBuf,

    /// File-name suffix of test sources
    #[arg(long, value_name = "EXT", default_value = DEFAULT_TEST_EXTENSION)]
    pub extension: String,

    /// Suffix appended to a test path to locate its expected output
    #[arg(long, value_name = "SUFFIX", default_value = DEFAULT_EXPECTED_SUFFIX)]
    pub expected_suffix: String,

    /// Suffix appended to a test path for the compiled executable.
    /// Pass the expected-output suffix to reproduce the legacy shared path.
    #[arg(long, value_name = "SUFFIX", default_value = DEFAULT_ARTIFACT_SUFFIX)]
    pub artifact_suffix: String,
}

impl Cli {
    pub fn into_config(self) -> RunnerConfig {
        RunnerConfig {
            tests_dir: self.tests_dir,
            compiler: self.compiler,
            test_extension: self.extension,
            expected_suffix: self.expected_suffix,
            artifact_suffix: self.artifact_suffix,
        }
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    let config = cli.into_config();
    test_runner::run_tests(&config)
}

// ============================================================================
// Tests
// ============================================================================
