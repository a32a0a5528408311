//! Conformance test runner
//!
//! Drives each test case through compile → run → compare and folds the
//! verdicts into an aggregate result. Execution is strictly sequential; every
//! subprocess finishes before the next step starts.
//!
//! ## TestReporter Trait
//!
//! Reporting is separated from execution through the `TestReporter` trait.
//! `LogReporter` writes the console log lines via `tracing`; tests plug in
//! recording reporters to inspect what would have been logged.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::compare::{OutputMismatch, compare_output};
use crate::config::{OPT_LEVEL, RunnerConfig};

use super::test_interfaces::{
    ArtifactExecutor, CompileRequest, Compiler, DefaultTestDiscovery, EmitMode, ProcessCompiler, ProcessExecutor,
    TestDiscovery, TestError,
};
use super::{CliError, CliResult, ExitCode};

// ============================================================================
// Outcomes
// ============================================================================

/// Verdict for a single test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestOutcome {
    Passed,
    /// The compiler exited nonzero; nothing was executed.
    BuildFailed { exit_code: Option<i32> },
    /// The program ran but its trimmed stdout differs from the golden text.
    Mismatch(OutputMismatch),
}

impl TestOutcome {
    pub fn passed(&self) -> bool {
        matches!(self, TestOutcome::Passed)
    }
}

/// Summary of a suite run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Subset of `failed` that never got past the compiler.
    pub build_failures: usize,
    pub duration: Duration,
}

impl TestSummary {
    /// Aggregate result: true iff no case failed (vacuously true when empty).
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

// ============================================================================
// Test Reporter Trait
// ============================================================================

/// Trait for reporting test execution results.
pub trait TestReporter {
    /// Called once discovery is done, before the first case runs
    fn on_suite_start(&mut self, _tests_dir: &Path, _test_count: usize) {}

    /// Called when a test case reaches a verdict
    fn on_test_complete(&mut self, test: &Path, outcome: &TestOutcome);

    /// Called when all tests have completed
    fn on_run_complete(&mut self, summary: &TestSummary);
}

/// Default reporter: one log line per verdict, plus the expected/stdout/stderr
/// dump for mismatches.
#[derive(Debug, Default)]
pub struct LogReporter;

impl TestReporter for LogReporter {
    fn on_suite_start(&mut self, tests_dir: &Path, test_count: usize) {
        tracing::debug!(tests_dir = %tests_dir.display(), test_count, "collected test cases");
    }

    fn on_test_complete(&mut self, test: &Path, outcome: &TestOutcome) {
        match outcome {
            TestOutcome::Passed => tracing::info!("Test passed: {}", test.display()),
            TestOutcome::BuildFailed { exit_code } => {
                let code = exit_code.map_or_else(|| "none".to_string(), |c| c.to_string());
                tracing::error!("Test failed to build: {} (compiler exit code {})", test.display(), code);
            }
            TestOutcome::Mismatch(mismatch) => {
                tracing::error!("Test failed: {}", test.display());
                tracing::info!("Expected:\n{}", mismatch.expected);
                tracing::info!("File stdout:\n{}", mismatch.actual);
                tracing::info!("File stderr:\n{}", mismatch.stderr);
            }
        }
    }

    fn on_run_complete(&mut self, summary: &TestSummary) {
        let elapsed = format!("{:.2}s", summary.duration.as_secs_f64());
        if summary.all_passed() {
            tracing::info!(total = summary.total, elapsed = %elapsed, "All tests passed!");
        } else {
            tracing::error!(
                total = summary.total,
                failed = summary.failed,
                build_failures = summary.build_failures,
                elapsed = %elapsed,
                "Some tests failed."
            );
        }
    }
}

// ============================================================================
// Runner
// ============================================================================

/// Sequential suite runner over pluggable discovery/compiler/executor.
pub struct TestRunner<'a> {
    config: &'a RunnerConfig,
    discovery: &'a dyn TestDiscovery,
    compiler: &'a dyn Compiler,
    executor: &'a dyn ArtifactExecutor,
}

impl<'a> TestRunner<'a> {
    pub fn new(
        config: &'a RunnerConfig,
        discovery: &'a dyn TestDiscovery,
        compiler: &'a dyn Compiler,
        executor: &'a dyn ArtifactExecutor,
    ) -> Self {
        Self {
            config,
            discovery,
            compiler,
            executor,
        }
    }

    /// Compile, run and compare one test case without reporting it.
    ///
    /// ## Errors
    ///
    /// Launch failures and an unreadable expected-output file are returned as
    /// `TestError`; a nonzero compiler exit or an output difference is a
    /// normal `TestOutcome`.
    pub fn evaluate(&self, test: &Path) -> Result<TestOutcome, TestError> {
        let artifact = self.config.artifact_path(test);
        let request = CompileRequest {
            source: test,
            output: &artifact,
            opt_level: OPT_LEVEL,
            emit: EmitMode::Executable,
        };

        let status = self.compiler.compile(&request)?;
        if !status.success() {
            return Ok(TestOutcome::BuildFailed { exit_code: status.code });
        }

        let captured = self.executor.execute(&artifact)?;
        if let Some(code) = captured.exit_code.filter(|c| *c != 0) {
            tracing::debug!(test = %test.display(), exit_code = code, "artifact exited nonzero");
        }

        let expected_path = self.config.expected_path(test);
        let expected = fs::read_to_string(&expected_path).map_err(|source| TestError::ExpectedOutput {
            path: expected_path.clone(),
            source,
        })?;

        Ok(match compare_output(&expected, &captured.stdout, &captured.stderr) {
            Ok(()) => TestOutcome::Passed,
            Err(mismatch) => TestOutcome::Mismatch(mismatch),
        })
    }

    /// Run a single test case and report its verdict. Returns true on pass.
    pub fn run_test(&self, test: &Path, reporter: &mut dyn TestReporter) -> Result<bool, TestError> {
        self.run_case(test, reporter).map(|outcome| outcome.passed())
    }

    fn run_case(&self, test: &Path, reporter: &mut dyn TestReporter) -> Result<TestOutcome, TestError> {
        let span = tracing::info_span!("test_case", test = %test.display());
        let _guard = span.enter();

        let outcome = self.evaluate(test)?;
        reporter.on_test_complete(test, &outcome);
        Ok(outcome)
    }

    /// Discover and run every test case in the configured directory.
    ///
    /// A failing case never stops the loop; only infrastructure errors do.
    pub fn run_all(&self, reporter: &mut dyn TestReporter) -> Result<TestSummary, TestError> {
        let start = Instant::now();

        if self.config.artifact_overwrites_expected() {
            tracing::warn!(
                suffix = %self.config.artifact_suffix,
                "compiled artifacts share the expected-output path; golden files will be overwritten"
            );
        }

        let tests: Vec<PathBuf> = self
            .discovery
            .discover_test_files(&self.config.tests_dir, &self.config.test_extension)?;
        reporter.on_suite_start(&self.config.tests_dir, tests.len());

        let mut passed = 0;
        let mut failed = 0;
        let mut build_failures = 0;

        for test in &tests {
            match self.run_case(test, reporter)? {
                TestOutcome::Passed => passed += 1,
                TestOutcome::BuildFailed { .. } => {
                    failed += 1;
                    build_failures += 1;
                }
                TestOutcome::Mismatch(_) => failed += 1,
            }
        }

        let summary = TestSummary {
            total: tests.len(),
            passed,
            failed,
            build_failures,
            duration: start.elapsed(),
        };
        reporter.on_run_complete(&summary);
        Ok(summary)
    }
}

/// Run the suite described by `config` with the process-backed collaborators.
pub fn run_tests(config: &RunnerConfig) -> CliResult<ExitCode> {
    let compiler = ProcessCompiler::new(&config.compiler);
    let runner = TestRunner::new(config, &DefaultTestDiscovery, &compiler, &ProcessExecutor);

    let summary = runner
        .run_all(&mut LogReporter)
        .map_err(|e| CliError::failure(format!("Error: {}", e)))?;

    if summary.all_passed() {
        Ok(ExitCode::SUCCESS)
    } else {
        // Summary already logged
        Err(CliError::new("", ExitCode::FAILURE))
    }
}
