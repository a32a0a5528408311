//! Runner configuration.
//!
//! Everything the runner needs to know about the filesystem layout and the
//! compiler lives in [`RunnerConfig`]. It is passed explicitly into the runner,
//! so several suites with different layouts can run in the same process.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Directory scanned for test cases when none is given.
pub const DEFAULT_TESTS_DIR: &str = "./tests/auto";

/// Compiler binary used when none is given.
pub const DEFAULT_COMPILER: &str = "./build/sirfc";

/// Suffix identifying test source files.
pub const DEFAULT_TEST_EXTENSION: &str = ".sirf";

/// Suffix appended to a test path to find its golden output.
pub const DEFAULT_EXPECTED_SUFFIX: &str = ".out";

/// Suffix appended to a test path for the compiled executable.
///
/// Kept distinct from [`DEFAULT_EXPECTED_SUFFIX`] so compiling a case never
/// clobbers its golden file.
pub const DEFAULT_ARTIFACT_SUFFIX: &str = ".bin";

/// Optimization level passed to the compiler (`-O`). Not configurable.
pub const OPT_LEVEL: u8 = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Directory listed (non-recursively) for test cases.
    pub tests_dir: PathBuf,
    /// Path to the compiler binary.
    pub compiler: PathBuf,
    /// File-name suffix selecting test cases, e.g. `.sirf`.
    pub test_extension: String,
    /// Suffix of the golden output file, e.g. `.out`.
    pub expected_suffix: String,
    /// Suffix of the compiled artifact. Setting this equal to
    /// `expected_suffix` reproduces the legacy shared-path layout.
    pub artifact_suffix: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            tests_dir: PathBuf::from(DEFAULT_TESTS_DIR),
            compiler: PathBuf::from(DEFAULT_COMPILER),
            test_extension: DEFAULT_TEST_EXTENSION.to_string(),
            expected_suffix: DEFAULT_EXPECTED_SUFFIX.to_string(),
            artifact_suffix: DEFAULT_ARTIFACT_SUFFIX.to_string(),
        }
    }
}

impl RunnerConfig {
    /// Path of the golden output file for `test`.
    pub fn expected_path(&self, test: &Path) -> PathBuf {
        with_suffix(test, &self.expected_suffix)
    }

    /// Path the compiler is asked to write the executable to.
    pub fn artifact_path(&self, test: &Path) -> PathBuf {
        with_suffix(test, &self.artifact_suffix)
    }

    /// True when the compiler output lands on the golden file.
    ///
    /// In this layout the golden text is overwritten by the executable before
    /// it is read, so every case fails or aborts unless fixtures are restored
    /// out of band between runs.
    pub fn artifact_overwrites_expected(&self) -> bool {
        self.artifact_suffix == self.expected_suffix
    }
}

/// Append `suffix` to the full path (`add.sirf` + `.out` -> `add.sirf.out`).
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut raw: OsString = path.as_os_str().to_os_string();
    raw.push(suffix);
    PathBuf::from(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let config = RunnerConfig::default();
        assert_eq!(config.tests_dir, PathBuf::from("./tests/auto"));
        assert_eq!(config.compiler, PathBuf::from("./build/sirfc"));
        assert_eq!(config.test_extension, ".sirf");
        assert!(!config.artifact_overwrites_expected());
    }

    #[test]
    fn test_paths_append_to_full_file_name() {
        let config = RunnerConfig::default();
        let test = Path::new("./tests/auto/add.sirf");
        assert_eq!(config.expected_path(test), PathBuf::from("./tests/auto/add.sirf.out"));
        assert_eq!(config.artifact_path(test), PathBuf::from("./tests/auto/add.sirf.bin"));
    }

    #[test]
    fn test_legacy_layout_collides() {
        let config = RunnerConfig {
            artifact_suffix: ".out".to_string(),
            ..RunnerConfig::default()
        };
        let test = Path::new("add.sirf");
        assert!(config.artifact_overwrites_expected());
        assert_eq!(config.artifact_path(test), config.expected_path(test));
    }
}
