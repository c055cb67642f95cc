//! Stub engine that tracks the current version in a JSON file.

use super::types::EngineState;
use super::{EngineError, MigrationEngine};
use crate::source::{Direction, Source};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Engine that records applied versions without touching a data store.
///
/// Each step reads the migration body so unreadable files fail the step, but
/// nothing is executed. The state is written after every step: dirty before
/// the body is read, clean once it succeeded.
pub struct FileEngine {
    source: Source,
    state_path: PathBuf,
    state: EngineState,
}

impl FileEngine {
    /// Load the source from `source_dir` and the state from `state_path`.
    pub async fn open(source_dir: &Path, state_path: &Path) -> Result<Self, EngineError> {
        let source = Source::open(source_dir).await?;
        let state = read_state(state_path).await?;

        debug!(
            source = %source_dir.display(),
            state = %state_path.display(),
            version = state.signed_version(),
            dirty = state.dirty,
            "Opened file engine"
        );

        Ok(Self::new(source, state_path.to_path_buf(), state))
    }

    pub fn new(source: Source, state_path: PathBuf, state: EngineState) -> Self {
        Self {
            source,
            state_path,
            state,
        }
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    fn ensure_clean(&self) -> Result<(), EngineError> {
        if self.state.dirty {
            return Err(EngineError::Dirty(self.state.signed_version()));
        }
        Ok(())
    }

    /// The recorded version must exist in the source before stepping from it.
    fn ensure_known(&self) -> Result<(), EngineError> {
        match self.state.version {
            Some(v) if !self.source.contains(v) => Err(EngineError::NotFound(v)),
            _ => Ok(()),
        }
    }

    /// Apply the next up migration. Returns false when none is left.
    async fn step_up(&mut self) -> Result<bool, EngineError> {
        let target = match self.state.version {
            None => self.source.first(),
            Some(current) => self.source.next(current),
        };
        match target {
            Some(version) => {
                self.run(version, Direction::Up, Some(version)).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Revert the current migration. Returns false when nothing is applied.
    async fn step_down(&mut self) -> Result<bool, EngineError> {
        match self.state.version {
            Some(current) => {
                let target = self.source.prev(current);
                self.run(current, Direction::Down, target).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn run(
        &mut self,
        version: u64,
        direction: Direction,
        target: Option<u64>,
    ) -> Result<(), EngineError> {
        let (identifier, body_path) = match self.source.get(version) {
            Some(files) => (files.identifier.clone(), files.path(direction).cloned()),
            None => (String::new(), None),
        };
        info!(version, name = %identifier, direction = %direction, "Applying migration");

        self.state = EngineState {
            version: target,
            dirty: true,
        };
        self.persist().await?;

        match body_path {
            Some(path) => {
                let body = fs::read(&path).await?;
                debug!(path = %path.display(), bytes = body.len(), "Read migration body");
            }
            None => debug!(version, direction = %direction, "No migration body, recording version only"),
        }

        self.state.dirty = false;
        self.persist().await
    }

    async fn persist(&self) -> Result<(), EngineError> {
        write_state(&self.state_path, &self.state).await
    }
}

#[async_trait]
impl MigrationEngine for FileEngine {
    async fn steps(&mut self, n: i64) -> Result<(), EngineError> {
        if n == 0 {
            return Err(EngineError::NoChange);
        }
        self.ensure_clean()?;
        self.ensure_known()?;

        let limit = n.unsigned_abs();
        let mut applied = 0;
        while applied < limit {
            let moved = if n > 0 {
                self.step_up().await?
            } else {
                self.step_down().await?
            };
            if !moved {
                break;
            }
            applied += 1;
        }

        if applied == 0 {
            Err(EngineError::NoMoreMigrations)
        } else if applied < limit {
            Err(EngineError::ShortLimit(limit - applied))
        } else {
            Ok(())
        }
    }

    async fn up(&mut self) -> Result<(), EngineError> {
        self.ensure_clean()?;
        self.ensure_known()?;

        let mut applied = 0;
        while self.step_up().await? {
            applied += 1;
        }
        if applied == 0 {
            return Err(EngineError::NoChange);
        }
        Ok(())
    }

    async fn down(&mut self) -> Result<(), EngineError> {
        self.ensure_clean()?;
        self.ensure_known()?;

        let mut applied = 0;
        while self.step_down().await? {
            applied += 1;
        }
        if applied == 0 {
            return Err(EngineError::NoChange);
        }
        Ok(())
    }

    async fn migrate(&mut self, version: u64) -> Result<(), EngineError> {
        self.ensure_clean()?;
        if !self.source.contains(version) {
            return Err(EngineError::NotFound(version));
        }
        self.ensure_known()?;

        let mut applied = 0;
        loop {
            let moved = match self.state.version {
                Some(current) if current == version => break,
                Some(current) if current > version => self.step_down().await?,
                _ => self.step_up().await?,
            };
            if !moved {
                break;
            }
            applied += 1;
        }
        if applied == 0 {
            return Err(EngineError::NoChange);
        }
        Ok(())
    }

    async fn drop_all(&mut self) -> Result<(), EngineError> {
        if self.state_path.exists() {
            fs::remove_file(&self.state_path).await?;
        }
        self.state = EngineState::default();
        info!(state = %self.state_path.display(), "Dropped migration state");
        Ok(())
    }

    async fn force(&mut self, version: i64) -> Result<(), EngineError> {
        if version < -1 {
            return Err(EngineError::InvalidVersion(version));
        }
        self.state = EngineState {
            version: u64::try_from(version).ok(),
            dirty: false,
        };
        self.persist().await
    }

    async fn version(&self) -> Result<(u64, bool), EngineError> {
        match self.state.version {
            Some(version) => Ok((version, self.state.dirty)),
            None => Err(EngineError::NilVersion),
        }
    }
}

/// Read the engine state; a missing file means nothing has been applied.
pub async fn read_state(path: &Path) -> Result<EngineState, EngineError> {
    if !path.exists() {
        return Ok(EngineState::default());
    }

    let content = fs::read_to_string(path).await?;
    let state: EngineState = serde_json::from_str(&content)?;
    Ok(state)
}

/// Write the engine state atomically using temp file + rename.
pub async fn write_state(path: &Path, state: &EngineState) -> Result<(), EngineError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let temp_path = path.with_extension("json.tmp");
    let content = serde_json::to_string_pretty(state)?;
    fs::write(&temp_path, &content).await?;
    fs::rename(&temp_path, path).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn engine_with(files: &[&str]) -> (TempDir, FileEngine) {
        let temp_dir = tempfile::tempdir().unwrap();
        for name in files {
            std::fs::write(temp_dir.path().join(name), "-- body\n").unwrap();
        }
        let state_path = temp_dir.path().join(".migrate-state.json");
        let engine = FileEngine::open(temp_dir.path(), &state_path).await.unwrap();
        (temp_dir, engine)
    }

    const THREE: &[&str] = &[
        "1_a.up.sql",
        "1_a.down.sql",
        "3_b.up.sql",
        "3_b.down.sql",
        "5_c.up.sql",
        "5_c.down.sql",
    ];

    #[tokio::test]
    async fn test_up_applies_all_then_no_change() {
        let (_dir, mut engine) = engine_with(THREE).await;

        engine.up().await.unwrap();
        assert_eq!(engine.version().await.unwrap(), (5, false));

        assert!(matches!(engine.up().await, Err(EngineError::NoChange)));
    }

    #[tokio::test]
    async fn test_down_reverts_all() {
        let (_dir, mut engine) = engine_with(THREE).await;
        engine.up().await.unwrap();

        engine.down().await.unwrap();
        assert!(matches!(engine.version().await, Err(EngineError::NilVersion)));
        assert!(matches!(engine.down().await, Err(EngineError::NoChange)));
    }

    #[tokio::test]
    async fn test_steps_up_and_down() {
        let (_dir, mut engine) = engine_with(THREE).await;

        engine.steps(2).await.unwrap();
        assert_eq!(engine.version().await.unwrap(), (3, false));

        engine.steps(-1).await.unwrap();
        assert_eq!(engine.version().await.unwrap(), (1, false));

        assert!(matches!(engine.steps(0).await, Err(EngineError::NoChange)));
    }

    #[tokio::test]
    async fn test_steps_short_limit() {
        let (_dir, mut engine) = engine_with(THREE).await;

        let err = engine.steps(5).await.unwrap_err();
        assert!(matches!(err, EngineError::ShortLimit(2)));
        assert_eq!(engine.version().await.unwrap(), (5, false));

        let err = engine.steps(1).await.unwrap_err();
        assert!(matches!(err, EngineError::NoMoreMigrations));
    }

    #[tokio::test]
    async fn test_migrate_both_directions() {
        let (_dir, mut engine) = engine_with(THREE).await;

        engine.migrate(3).await.unwrap();
        assert_eq!(engine.version().await.unwrap(), (3, false));

        engine.migrate(5).await.unwrap();
        engine.migrate(1).await.unwrap();
        assert_eq!(engine.version().await.unwrap(), (1, false));

        assert!(matches!(engine.migrate(1).await, Err(EngineError::NoChange)));
        assert!(matches!(engine.migrate(2).await, Err(EngineError::NotFound(2))));
    }

    #[tokio::test]
    async fn test_state_persisted_across_open() {
        let (dir, mut engine) = engine_with(THREE).await;
        engine.steps(2).await.unwrap();

        let state_path = dir.path().join(".migrate-state.json");
        let reopened = FileEngine::open(dir.path(), &state_path).await.unwrap();
        assert_eq!(reopened.state().version, Some(3));
        assert!(!reopened.state().dirty);
    }

    #[tokio::test]
    async fn test_unreadable_body_leaves_dirty() {
        let (dir, mut engine) = engine_with(&["1_a.up.sql"]).await;
        // Replace the body with a directory so reading it fails
        std::fs::remove_file(dir.path().join("1_a.up.sql")).unwrap();
        std::fs::create_dir(dir.path().join("1_a.up.sql")).unwrap();

        assert!(matches!(engine.up().await, Err(EngineError::IoError(_))));
        assert_eq!(engine.version().await.unwrap(), (1, true));
        assert!(matches!(engine.up().await, Err(EngineError::Dirty(1))));

        engine.force(-1).await.unwrap();
        assert!(matches!(engine.version().await, Err(EngineError::NilVersion)));
    }

    #[tokio::test]
    async fn test_force() {
        let (_dir, mut engine) = engine_with(THREE).await;

        engine.force(3).await.unwrap();
        assert_eq!(engine.version().await.unwrap(), (3, false));

        assert!(matches!(engine.force(-2).await, Err(EngineError::InvalidVersion(-2))));
    }

    #[tokio::test]
    async fn test_forced_unknown_version_blocks_stepping() {
        let (_dir, mut engine) = engine_with(THREE).await;
        engine.force(4).await.unwrap();

        assert!(matches!(engine.up().await, Err(EngineError::NotFound(4))));
    }

    #[tokio::test]
    async fn test_missing_down_file_records_version_only() {
        let (_dir, mut engine) = engine_with(&["1_a.up.sql", "2_b.up.sql"]).await;
        engine.up().await.unwrap();

        engine.steps(-1).await.unwrap();
        assert_eq!(engine.version().await.unwrap(), (1, false));
    }

    #[tokio::test]
    async fn test_drop_removes_state() {
        let (dir, mut engine) = engine_with(THREE).await;
        engine.up().await.unwrap();
        let state_path = dir.path().join(".migrate-state.json");
        assert!(state_path.exists());

        engine.drop_all().await.unwrap();
        assert!(!state_path.exists());
        assert_eq!(engine.state(), &EngineState::default());
    }
}
