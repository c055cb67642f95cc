//! Contract between the command layer and a migration engine.
//!
//! The engine owns applied-version tracking and dirty-state detection. The
//! command layer only translates user intent into calls on this trait and
//! decides how the results are reported.
//!
//! # Overview
//!
//! - Every operation may return [`EngineError::NoChange`] when the requested
//!   state already holds; callers treat it as success
//! - [`FileEngine`] is a stub engine that records the version in a JSON file
//!   without touching any data store

mod file;
mod types;

pub use file::FileEngine;
pub use types::EngineState;

use crate::source::SourceError;
use async_trait::async_trait;
use thiserror::Error;

/// Error types for engine operations.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The requested state is already in place.
    #[error("no change")]
    NoChange,

    #[error("no migration")]
    NilVersion,

    #[error("Dirty database version {0}. Fix and force version.")]
    Dirty(i64),

    #[error("no migration found for version {0}")]
    NotFound(u64),

    #[error("limit {0} short")]
    ShortLimit(u64),

    #[error("no more migrations to apply")]
    NoMoreMigrations,

    #[error("invalid version {0}")]
    InvalidVersion(i64),

    #[error("Source error: {0}")]
    SourceError(#[from] SourceError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Operations a migration engine exposes to the command layer.
#[async_trait]
pub trait MigrationEngine: Send + Sync {
    /// Apply `n` migrations: up when positive, down when negative.
    async fn steps(&mut self, n: i64) -> Result<(), EngineError>;

    /// Apply every pending up migration.
    async fn up(&mut self) -> Result<(), EngineError>;

    /// Revert every applied migration.
    async fn down(&mut self) -> Result<(), EngineError>;

    /// Move up or down until `version` is the current version.
    async fn migrate(&mut self, version: u64) -> Result<(), EngineError>;

    /// Remove all managed state.
    async fn drop_all(&mut self) -> Result<(), EngineError>;

    /// Record `version` as current and clean without running any migration.
    /// `-1` records no version.
    async fn force(&mut self, version: i64) -> Result<(), EngineError>;

    /// Current version and dirty flag.
    async fn version(&self) -> Result<(u64, bool), EngineError>;
}
