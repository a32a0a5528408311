//! Test runner I/O boundary interfaces
//!
//! This module defines trait-based abstractions for the runner's side effects:
//! - Test discovery (directory listing)
//! - Compilation (`sirfc` invocation)
//! - Artifact execution (running the compiled program + output capture)
//!
//! The runner only talks to these traits, so stub implementations can stand in
//! for real processes in tests. The `Default*`/`Process*` types are the
//! production behavior.

use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::string::FromUtf8Error;

use thiserror::Error;

/// Infrastructure errors. Any of these aborts the whole run; they are never
/// attributed to a single test case.
#[derive(Debug, Error)]
pub enum TestError {
    #[error("failed to list test directory '{}': {source}", .dir.display())]
    Discovery {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to launch compiler '{}': {source}", .compiler.display())]
    CompilerLaunch {
        compiler: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to run compiled artifact '{}': {source}", .artifact.display())]
    ArtifactLaunch {
        artifact: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("compiled artifact '{}' wrote non-UTF-8 {stream}: {source}", .artifact.display())]
    ArtifactOutput {
        artifact: PathBuf,
        stream: OutputStream,
        #[source]
        source: FromUtf8Error,
    },

    #[error("failed to read expected output '{}': {source}", .path.display())]
    ExpectedOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

// ============================================================================
// Test Discovery Interface
// ============================================================================

/// Find the test cases of a suite.
pub trait TestDiscovery {
    /// List `dir` (one level, no recursion) and return every entry whose file
    /// name ends with `extension`, sorted.
    fn discover_test_files(&self, dir: &Path, extension: &str) -> Result<Vec<PathBuf>, TestError>;
}

// ============================================================================
// Compiler Interface
// ============================================================================

/// Emission mode requested from the compiler (`-e`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitMode {
    /// Native executable (`-e exe`).
    Executable,
}

impl EmitMode {
    pub fn as_flag(self) -> &'static str {
        match self {
            EmitMode::Executable => "exe",
        }
    }
}

impl fmt::Display for EmitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_flag())
    }
}

/// One compiler invocation.
#[derive(Debug, Clone, Copy)]
pub struct CompileRequest<'a> {
    pub source: &'a Path,
    pub output: &'a Path,
    pub opt_level: u8,
    pub emit: EmitMode,
}

impl CompileRequest<'_> {
    /// Argument vector in the compiler's contract order:
    /// `-o <output> <source> -O <level> -e <mode>`.
    ///
    /// Paths are passed through as raw OS strings.
    pub fn args(&self) -> Vec<OsString> {
        vec![
            "-o".into(),
            self.output.as_os_str().to_os_string(),
            self.source.as_os_str().to_os_string(),
            "-O".into(),
            self.opt_level.to_string().into(),
            "-e".into(),
            self.emit.as_flag().into(),
        ]
    }
}

/// Exit status of a compiler run. `code` is `None` when the process was
/// killed by a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileStatus {
    pub code: Option<i32>,
}

impl CompileStatus {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Turn a test source into an executable artifact.
pub trait Compiler {
    fn compile(&self, request: &CompileRequest<'_>) -> Result<CompileStatus, TestError>;
}

// ============================================================================
// Artifact Executor Interface
// ============================================================================

/// Everything captured from one run of a compiled artifact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub stdout: String,
    pub stderr: String,
    /// Reported for diagnostics only; never part of the verdict.
    pub exit_code: Option<i32>,
}

/// Which captured stream failed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    Stdout,
    Stderr,
}

impl fmt::Display for OutputStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputStream::Stdout => f.write_str("stdout"),
            OutputStream::Stderr => f.write_str("stderr"),
        }
    }
}

/// Run a compiled artifact with no arguments and capture its output.
pub trait ArtifactExecutor {
    fn execute(&self, artifact: &Path) -> Result<CapturedOutput, TestError>;
}

// ============================================================================
// Default Implementations
// ============================================================================

/// Filesystem-based discovery.
pub struct DefaultTestDiscovery;

impl TestDiscovery for DefaultTestDiscovery {
    fn discover_test_files(&self, dir: &Path, extension: &str) -> Result<Vec<PathBuf>, TestError> {
        let entries = fs::read_dir(dir).map_err(|source| TestError::Discovery {
            dir: dir.to_path_buf(),
            source,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| TestError::Discovery {
                dir: dir.to_path_buf(),
                source,
            })?;
            let name = entry.file_name();
            if name.to_string_lossy().ends_with(extension) {
                files.push(dir.join(name));
            }
        }

        files.sort();
        Ok(files)
    }
}

/// Invokes the compiler binary as a child process. Its own stdout/stderr are
/// inherited so build errors show up on the console.
pub struct ProcessCompiler {
    pub binary: PathBuf,
}

impl ProcessCompiler {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self { binary: binary.into() }
    }
}

impl Compiler for ProcessCompiler {
    fn compile(&self, request: &CompileRequest<'_>) -> Result<CompileStatus, TestError> {
        let args = request.args();
        tracing::debug!(compiler = %self.binary.display(), args = ?args, "invoking compiler");

        let status = Command::new(&self.binary)
            .args(&args)
            .status()
            .map_err(|source| TestError::CompilerLaunch {
                compiler: self.binary.clone(),
                source,
            })?;

        Ok(CompileStatus { code: status.code() })
    }
}

/// Runs artifacts directly and captures stdout/stderr as UTF-8 text.
pub struct ProcessExecutor;

impl ArtifactExecutor for ProcessExecutor {
    fn execute(&self, artifact: &Path) -> Result<CapturedOutput, TestError> {
        tracing::debug!(artifact = %artifact.display(), "running artifact");

        let output = Command::new(artifact)
            .output()
            .map_err(|source| TestError::ArtifactLaunch {
                artifact: artifact.to_path_buf(),
                source,
            })?;

        Ok(CapturedOutput {
            stdout: decode_stream(artifact, OutputStream::Stdout, output.stdout)?,
            stderr: decode_stream(artifact, OutputStream::Stderr, output.stderr)?,
            exit_code: output.status.code(),
        })
    }
}

/// Strict UTF-8 decoding; invalid bytes abort the run like an unreadable golden file.
fn decode_stream(artifact: &Path, stream: OutputStream, bytes: Vec<u8>) -> Result<String, TestError> {
    String::from_utf8(bytes).map_err(|source| TestError::ArtifactOutput {
        artifact: artifact.to_path_buf(),
        stream,
        source,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_args_follow_contract() {
        let request = CompileRequest {
            source: Path::new("tests/auto/add.sirf"),
            output: Path::new("tests/auto/add.sirf.bin"),
            opt_level: 0,
            emit: EmitMode::Executable,
        };
        assert_eq!(
            request.args(),
            ["-o", "tests/auto/add.sirf.bin", "tests/auto/add.sirf", "-O", "0", "-e", "exe"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_compile_args_keep_non_utf8_paths() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let source = Path::new(OsStr::from_bytes(b"caf\xE9.sirf"));
        let output = Path::new(OsStr::from_bytes(b"caf\xE9.sirf.bin"));
        let request = CompileRequest {
            source,
            output,
            opt_level: 0,
            emit: EmitMode::Executable,
        };
        let args = request.args();
        assert_eq!(args[1].as_bytes(), b"caf\xE9.sirf.bin");
        assert_eq!(args[2].as_bytes(), b"caf\xE9.sirf");
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        let artifact = Path::new("bad.sirf.bin");
        assert_eq!(decode_stream(artifact, OutputStream::Stdout, b"3\n".to_vec()).unwrap(), "3\n");

        let err = decode_stream(artifact, OutputStream::Stderr, vec![b'3', 0xFF]).unwrap_err();
        assert!(matches!(err, TestError::ArtifactOutput { stream: OutputStream::Stderr, .. }));
        assert!(err.to_string().contains("non-UTF-8 stderr"));
    }

    #[test]
    fn test_compile_status_success() {
        assert!(CompileStatus { code: Some(0) }.success());
        assert!(!CompileStatus { code: Some(1) }.success());
        assert!(!CompileStatus { code: None }.success());
    }

    #[test]
    fn test_discovery_is_flat_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.sirf"), "").unwrap();
        fs::write(dir.path().join("a.sirf"), "").unwrap();
        fs::write(dir.path().join("a.sirf.out"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("deep.sirf"), "").unwrap();

        let files = DefaultTestDiscovery.discover_test_files(dir.path(), ".sirf").unwrap();
        assert_eq!(files, vec![dir.path().join("a.sirf"), dir.path().join("b.sirf")]);
    }

    #[test]
    fn test_discovery_of_missing_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let err = DefaultTestDiscovery.discover_test_files(&missing, ".sirf").unwrap_err();
        assert!(matches!(err, TestError::Discovery { .. }));
        assert!(err.to_string().contains("does-not-exist"));
    }

    #[test]
    fn test_missing_compiler_is_a_launch_error() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = ProcessCompiler::new(dir.path().join("no-such-sirfc"));
        let request = CompileRequest {
            source: Path::new("x.sirf"),
            output: Path::new("x.sirf.bin"),
            opt_level: 0,
            emit: EmitMode::Executable,
        };
        let err = compiler.compile(&request).unwrap_err();
        assert!(matches!(err, TestError::CompilerLaunch { .. }));
    }
}
