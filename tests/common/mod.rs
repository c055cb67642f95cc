#![allow(dead_code)]

use migrate_cli::{Dispatcher, FileEngine};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create a temporary directory for testing
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Directory in prefix form, as the create command expects it
pub fn dir_string(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

/// Write empty up/down files for each `(version, name)` pair
pub fn write_migrations(dir: &Path, migrations: &[(u64, &str)]) {
    std::fs::create_dir_all(dir).expect("Failed to create migrations dir");
    for (version, name) in migrations {
        for direction in ["up", "down"] {
            let file = dir.join(format!("{}_{}.{}.sql", version, name, direction));
            std::fs::write(&file, format!("-- {} {}\n", name, direction))
                .expect("Failed to write migration");
        }
    }
}

pub fn state_path(dir: &Path) -> PathBuf {
    dir.join(".migrate-state.json")
}

/// Open a dispatcher backed by the file engine on `dir`
pub async fn open_dispatcher(dir: &Path) -> Dispatcher<FileEngine> {
    let engine = FileEngine::open(dir, &state_path(dir))
        .await
        .expect("Should open engine");
    Dispatcher::new(engine)
}
