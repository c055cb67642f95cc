//! Lifecycle commands.
//!
//! Each command validates its input, calls into the engine, and maps the
//! engine's answer to an [`Outcome`]. The engine's no-change sentinel is the
//! only error that is recovered; everything else is returned to the caller
//! unchanged.
//!
//! # Usage
//!
//! ```ignore
//! let engine = FileEngine::open(&config.path, &config.state_file).await?;
//! let mut dispatcher = Dispatcher::new(engine);
//! dispatcher.up(-1).await?;
//! ```

mod args;
mod create;
mod error;
mod prompt;

pub use args::num_down_migrations_from_args;
pub use create::{create_migration, time_prefix, CreateOptions, CreatedMigration, Zone};
pub use error::CommandError;
pub use prompt::confirm;

use crate::engine::{EngineError, MigrationEngine};
use std::fmt;
use tracing::info;

/// How an engine operation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The engine changed state.
    Applied,
    /// The requested state already held.
    NoChange,
}

/// Current version as reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionReport {
    pub version: u64,
    pub dirty: bool,
}

impl fmt::Display for VersionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dirty {
            write!(f, "{} (dirty)", self.version)
        } else {
            write!(f, "{}", self.version)
        }
    }
}

/// Runs lifecycle commands against an injected engine.
pub struct Dispatcher<E> {
    engine: E,
}

impl<E: MigrationEngine> Dispatcher<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn into_engine(self) -> E {
        self.engine
    }

    /// Move to exactly `version`.
    pub async fn goto(&mut self, version: u64) -> Result<Outcome, CommandError> {
        settle("goto", self.engine.migrate(version).await)
    }

    /// Apply at most `limit` up migrations, or all pending when `limit < 0`.
    pub async fn up(&mut self, limit: i64) -> Result<Outcome, CommandError> {
        let result = if limit >= 0 {
            self.engine.steps(limit).await
        } else {
            self.engine.up().await
        };
        settle("up", result)
    }

    /// Revert at most `limit` migrations, or all applied when `limit < 0`.
    pub async fn down(&mut self, limit: i64) -> Result<Outcome, CommandError> {
        let result = if limit >= 0 {
            self.engine.steps(-limit).await
        } else {
            self.engine.down().await
        };
        settle("down", result)
    }

    /// Remove everything the engine manages. Callers confirm beforehand.
    pub async fn drop_all(&mut self) -> Result<Outcome, CommandError> {
        settle("drop", self.engine.drop_all().await)
    }

    /// Set the recorded version without running migrations.
    pub async fn force(&mut self, version: i64) -> Result<Outcome, CommandError> {
        settle("force", self.engine.force(version).await)
    }

    pub async fn version(&self) -> Result<VersionReport, CommandError> {
        let (version, dirty) = self.engine.version().await?;
        Ok(VersionReport { version, dirty })
    }
}

/// Downgrade the no-change sentinel to an informational outcome.
fn settle(command: &str, result: Result<(), EngineError>) -> Result<Outcome, CommandError> {
    match result {
        Ok(()) => Ok(Outcome::Applied),
        Err(EngineError::NoChange) => {
            info!(command, "{}", EngineError::NoChange);
            Ok(Outcome::NoChange)
        }
        Err(e) => Err(e.into()),
    }
}
