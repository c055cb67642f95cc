use std::path::{Path, PathBuf};

/// Default migrations directory
pub const DEFAULT_PATH: &str = "migrations";

/// Default width of sequence prefixes
pub const DEFAULT_DIGITS: usize = 6;

/// Default strftime pattern for timestamp prefixes
pub const DEFAULT_TIME_FORMAT: &str = "%Y%m%d%H%M%S";

/// Name of the engine state file kept inside the migrations directory
pub const STATE_FILE: &str = ".migrate-state.json";

/// Resolved global options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrateConfig {
    /// Directory holding the migration files.
    pub path: PathBuf,
    /// Where the file engine records the current version.
    pub state_file: PathBuf,
    pub verbose: bool,
}

impl MigrateConfig {
    /// Build the configuration; without an explicit state file the state is
    /// kept next to the migrations.
    pub fn new(path: impl Into<PathBuf>, state_file: Option<PathBuf>, verbose: bool) -> Self {
        let path = path.into();
        let state_file = state_file.unwrap_or_else(|| default_state_file(&path));
        Self {
            path,
            state_file,
            verbose,
        }
    }

    /// Log filter used when `RUST_LOG` is not set.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

impl Default for MigrateConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PATH, None, false)
    }
}

/// Get the path to the state file for a migrations directory
pub fn default_state_file(path: &Path) -> PathBuf {
    path.join(STATE_FILE)
}
