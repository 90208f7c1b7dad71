//! Output path resolution
//!
//! The base directory comes from an environment override or a fixed fallback.
//! It is resolved on first use and then cached for the lifetime of the layout;
//! later changes to the environment are ignored.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use contracts::OutputConfig;
use tracing::{debug, warn};

/// Per-run file name prefixes
const CAR_FILE_PREFIX: &str = "Car_output_";
const OBJECT_FILE_PREFIX: &str = "Object_Sensor_output_";
#[cfg(feature = "detection-log")]
const DETECTION_FILE_STEM: &str = "RSI_Detections";

/// Output directory layout
#[derive(Debug)]
pub struct OutputLayout {
    env_var: String,
    default_base_dir: PathBuf,
    run_subdir: String,
    extension: String,
    base_dir: OnceLock<PathBuf>,
}

impl OutputLayout {
    /// Create layout from output config; the base directory is not resolved yet
    pub fn new(config: &OutputConfig) -> Self {
        Self {
            env_var: config.env_var.clone(),
            default_base_dir: PathBuf::from(&config.default_base_dir),
            run_subdir: config.run_subdir.clone(),
            extension: config.extension.clone(),
            base_dir: OnceLock::new(),
        }
    }

    /// Pin the base directory, bypassing the environment
    pub fn with_base_dir(self, base_dir: impl Into<PathBuf>) -> Self {
        let pinned = OnceLock::new();
        let _ = pinned.set(base_dir.into());
        Self {
            base_dir: pinned,
            ..self
        }
    }

    /// Resolved base directory (memoized)
    pub fn base_dir(&self) -> &Path {
        self.base_dir
            .get_or_init(|| self.resolve_base_dir(|key| std::env::var_os(key)))
    }

    /// Run subdirectory: base joined with the fixed subdirectory name
    pub fn run_dir(&self) -> PathBuf {
        self.base_dir().join(&self.run_subdir)
    }

    /// Vehicle table path for a run timestamp
    pub fn car_file(&self, timestamp: &str) -> PathBuf {
        self.run_dir()
            .join(format!("{CAR_FILE_PREFIX}{timestamp}.{}", self.extension))
    }

    /// Object table path for a run timestamp
    pub fn object_file(&self, timestamp: &str) -> PathBuf {
        self.run_dir()
            .join(format!("{OBJECT_FILE_PREFIX}{timestamp}.{}", self.extension))
    }

    /// Detection table path; one file per base directory, truncated every run
    #[cfg(feature = "detection-log")]
    pub fn detection_file(&self) -> PathBuf {
        self.base_dir()
            .join(format!("{DETECTION_FILE_STEM}.{}", self.extension))
    }

    /// Create base and run directories if absent
    ///
    /// Best-effort: failures are logged and otherwise ignored. Opening the
    /// run files will report the real problem.
    pub fn ensure_dirs_exist(&self) {
        for dir in [self.base_dir().to_path_buf(), self.run_dir()] {
            match fs::create_dir_all(&dir) {
                Ok(()) => debug!(dir = %dir.display(), "Output directory ready"),
                Err(e) => warn!(dir = %dir.display(), error = %e, "Failed to create output directory"),
            }
        }
    }

    fn resolve_base_dir(&self, lookup: impl FnOnce(&str) -> Option<OsString>) -> PathBuf {
        match lookup(&self.env_var).filter(|value| !value.is_empty()) {
            Some(value) => {
                debug!(env_var = %self.env_var, "Output base directory taken from environment");
                PathBuf::from(value)
            }
            None => self.default_base_dir.clone(),
        }
    }
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self::new(&OutputConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_env_override() {
        let layout = OutputLayout::default();
        let base = layout.resolve_base_dir(|key| {
            assert_eq!(key, "CM_OUTDIR");
            Some(OsString::from("/data/runs"))
        });
        assert_eq!(base, PathBuf::from("/data/runs"));
    }

    #[test]
    fn test_empty_env_falls_back() {
        let layout = OutputLayout::default();
        assert_eq!(
            layout.resolve_base_dir(|_| Some(OsString::new())),
            PathBuf::from("SimOutput")
        );
        assert_eq!(layout.resolve_base_dir(|_| None), PathBuf::from("SimOutput"));
    }

    #[test]
    fn test_base_dir_memoized() {
        let layout = OutputLayout::default().with_base_dir("/first");
        assert_eq!(layout.base_dir(), Path::new("/first"));
        // Further lookups never consult the environment again
        assert_eq!(layout.base_dir(), Path::new("/first"));
    }

    #[test]
    fn test_env_base_dir_read_once() {
        // Variable name owned by this test only
        const VAR: &str = "ODOLOG_TEST_MEMOIZED_OUTDIR";
        let first = tempdir().unwrap();
        let second = tempdir().unwrap();
        let config = OutputConfig {
            env_var: VAR.to_string(),
            ..Default::default()
        };
        let layout = OutputLayout::new(&config);

        std::env::set_var(VAR, first.path());
        assert_eq!(layout.base_dir(), first.path());

        std::env::set_var(VAR, second.path());
        assert_eq!(layout.base_dir(), first.path());
        std::env::remove_var(VAR);
        assert_eq!(layout.base_dir(), first.path());
        assert_eq!(layout.run_dir(), first.path().join("reference_odometry_output"));

        // A fresh layout resolves again and falls back once the variable is gone
        assert_eq!(OutputLayout::new(&config).base_dir(), Path::new("SimOutput"));
    }

    #[test]
    fn test_file_names() {
        let layout = OutputLayout::default().with_base_dir("out");
        let run_dir = Path::new("out").join("reference_odometry_output");
        assert_eq!(layout.run_dir(), run_dir);
        assert_eq!(
            layout.car_file("20250101_120000"),
            run_dir.join("Car_output_20250101_120000.txt")
        );
        assert_eq!(
            layout.object_file("20250101_120000"),
            run_dir.join("Object_Sensor_output_20250101_120000.txt")
        );
    }

    #[test]
    fn test_ensure_dirs_idempotent() {
        let dir = tempdir().unwrap();
        let layout = OutputLayout::default().with_base_dir(dir.path().join("base"));
        layout.ensure_dirs_exist();
        layout.ensure_dirs_exist();
        assert!(layout.run_dir().is_dir());
    }

    #[test]
    fn test_ensure_dirs_failure_is_swallowed() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"not a dir").unwrap();
        let layout = OutputLayout::default().with_base_dir(&blocker);
        layout.ensure_dirs_exist();
        assert!(!layout.run_dir().exists());
    }
}
