//! Configuration for the teaching machine.
//!
//! Settings are layered: built-in defaults, then an optional `hsm.json`,
//! then environment variables, then command-line flags (applied by the
//! binary). Relative paths are resolved against a base directory, normally
//! the directory holding the executable.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MachineError, Result};

/// The default config file name.
pub const CONFIG_FILE_NAME: &str = "hsm.json";

/// Environment variable overriding [`Config::course_dir`].
pub const COURSE_DIR_ENV: &str = "HSM_COURSE_DIR";

/// Environment variable overriding [`Config::progress_file`].
pub const PROGRESS_FILE_ENV: &str = "HSM_PROGRESS_FILE";

fn default_course_dir() -> String {
    "resources/course".to_string()
}

fn default_progress_file() -> String {
    "resources/progress.json".to_string()
}

const fn default_true() -> bool {
    true
}

/// Main configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding one JSON file per lesson.
    #[serde(default = "default_course_dir")]
    pub course_dir: String,

    /// Path of the learner's progress file.
    #[serde(default = "default_progress_file")]
    pub progress_file: String,

    /// Whether to print the welcome banner at startup.
    #[serde(default = "default_true")]
    pub show_banner: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            course_dir: default_course_dir(),
            progress_file: default_progress_file(),
            show_banner: default_true(),
        }
    }
}

impl Config {
    /// Loads configuration from `hsm.json` in `dir`, falling back to the
    /// defaults if the file is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed or fails
    /// validation.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        Self::load_from_file(&dir.join(CONFIG_FILE_NAME))
    }

    /// Loads configuration from a specific file path.
    ///
    /// If the file does not exist, returns the default configuration.
    ///
    /// # Errors
    ///
    /// Returns `MachineError::ConfigParse` if the file cannot be read or is
    /// not valid JSON, and `MachineError::ConfigValidation` if a value is
    /// invalid.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(MachineError::config_parse(
                    path,
                    format!("failed to read file: {e}"),
                ));
            }
        };

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| MachineError::config_parse(path, e.to_string()))?;
        config.validate()?;
        tracing::debug!(path = %path.display(), ?config, "Config loaded");
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `MachineError::ConfigValidation` if `courseDir` or
    /// `progressFile` is blank.
    pub fn validate(&self) -> Result<()> {
        if self.course_dir.trim().is_empty() {
            return Err(MachineError::config_validation(
                "courseDir must not be empty",
                format!("Set courseDir in {CONFIG_FILE_NAME} or {COURSE_DIR_ENV} to the lesson directory"),
            ));
        }

        if self.progress_file.trim().is_empty() {
            return Err(MachineError::config_validation(
                "progressFile must not be empty",
                format!("Set progressFile in {CONFIG_FILE_NAME} or {PROGRESS_FILE_ENV} to a writable path"),
            ));
        }

        Ok(())
    }

    /// Applies overrides read through `lookup`, keyed by environment
    /// variable name. Blank values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(dir) = value(COURSE_DIR_ENV) {
            tracing::debug!(course_dir = %dir, "Course directory overridden by environment");
            self.course_dir = dir;
        }
        if let Some(file) = value(PROGRESS_FILE_ENV) {
            tracing::debug!(progress_file = %file, "Progress file overridden by environment");
            self.progress_file = file;
        }
    }

    /// Applies [`COURSE_DIR_ENV`] and [`PROGRESS_FILE_ENV`] from the process
    /// environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// The course directory, resolved against `base` if relative.
    #[must_use]
    pub fn course_dir_in(&self, base: &Path) -> PathBuf {
        base.join(&self.course_dir)
    }

    /// The progress file, resolved against `base` if relative.
    #[must_use]
    pub fn progress_file_in(&self, base: &Path) -> PathBuf {
        base.join(&self.progress_file)
    }
}

/// Directory containing the running executable.
///
/// # Errors
///
/// Returns `MachineError::ConfigParse` if the executable path cannot be
/// determined.
pub fn install_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().map_err(|e| {
        MachineError::config_parse(
            "<executable>",
            format!("cannot determine install directory: {e}"),
        )
    })?;
    Ok(exe
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf))
}
