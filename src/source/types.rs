//! Types for the migration source.

use std::fmt;
use std::path::PathBuf;

/// Direction of a migration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Moves the target to a newer version.
    Up,
    /// Reverts the target to the previous version.
    Down,
}

impl Direction {
    /// The marker used in file names (`up` / `down`).
    pub fn marker(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// A migration file name split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub version: u64,
    pub identifier: String,
    pub direction: Direction,
}

/// The up/down file pair discovered for one version.
#[derive(Debug, Clone, Default)]
pub struct MigrationFiles {
    pub identifier: String,
    pub up: Option<PathBuf>,
    pub down: Option<PathBuf>,
}

impl MigrationFiles {
    /// Path of the file for `direction`, if one was found.
    pub fn path(&self, direction: Direction) -> Option<&PathBuf> {
        match direction {
            Direction::Up => self.up.as_ref(),
            Direction::Down => self.down.as_ref(),
        }
    }
}
