//! Output comparison.
//!
//! Captured stdout and golden text are compared after trimming leading and
//! trailing whitespace from both sides. Whitespace inside the text is
//! significant.

/// Trimmed equality of actual and expected output.
pub fn trimmed_eq(actual: &str, expected: &str) -> bool {
    actual.trim() == expected.trim()
}

/// The diagnostic payload of a failed comparison, all fields trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputMismatch {
    pub expected: String,
    pub actual: String,
    pub stderr: String,
}

/// Compare captured output against the golden text.
///
/// Returns `Ok(())` on trimmed equality, otherwise the mismatch with the
/// expected text, the actual stdout and stderr ready for display.
pub fn compare_output(expected: &str, stdout: &str, stderr: &str) -> Result<(), OutputMismatch> {
    if trimmed_eq(stdout, expected) {
        return Ok(());
    }
    Err(OutputMismatch {
        expected: expected.trim().to_string(),
        actual: stdout.trim().to_string(),
        stderr: stderr.trim().to_string(),
    })
}
