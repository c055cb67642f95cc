//! Discovery of migration files on disk.
//!
//! A source is the ordered set of versions found in one directory. File
//! names follow `{version}_{identifier}.{up|down}.{ext}`; anything that does
//! not match is ignored so the directory can hold other files.

mod types;

pub use types::{Direction, MigrationFiles, ParsedName};

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Unbounded};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::debug;

static MIGRATION_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]+)_(.*)\.(down|up)\.(.*)$").expect("migration name pattern is valid")
});

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unparsable migration filename: {0}")]
    Unparsable(String),

    #[error("Duplicate {direction} migration for version {version}: {path}")]
    Duplicate {
        version: u64,
        direction: Direction,
        path: String,
    },
}

/// Parse a migration file name (without directory).
pub fn parse_name(file_name: &str) -> Result<ParsedName, SourceError> {
    let caps = MIGRATION_NAME
        .captures(file_name)
        .ok_or_else(|| SourceError::Unparsable(file_name.to_string()))?;

    let version = caps[1]
        .parse::<u64>()
        .map_err(|_| SourceError::Unparsable(file_name.to_string()))?;
    let direction = match &caps[3] {
        "up" => Direction::Up,
        _ => Direction::Down,
    };

    Ok(ParsedName {
        version,
        identifier: caps[2].to_string(),
        direction,
    })
}

/// Migrations found in a directory, ordered by version.
#[derive(Debug, Clone, Default)]
pub struct Source {
    migrations: BTreeMap<u64, MigrationFiles>,
}

impl Source {
    /// Scan `dir` for migration files. A missing directory is an empty source.
    pub async fn open(dir: &Path) -> Result<Self, SourceError> {
        let mut source = Source::default();

        if !dir.exists() {
            debug!(dir = %dir.display(), "Migration directory does not exist");
            return Ok(source);
        }

        let mut entries = fs::read_dir(dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().to_string();
            match parse_name(&file_name) {
                Ok(parsed) => source.insert(parsed, entry.path())?,
                Err(_) => debug!(file = %file_name, "Skipping non-migration file"),
            }
        }

        debug!(dir = %dir.display(), count = source.len(), "Loaded migrations");
        Ok(source)
    }

    /// Add a parsed file to the source.
    pub fn insert(&mut self, parsed: ParsedName, path: PathBuf) -> Result<(), SourceError> {
        let files = self.migrations.entry(parsed.version).or_default();
        let slot = match parsed.direction {
            Direction::Up => &mut files.up,
            Direction::Down => &mut files.down,
        };
        if slot.is_some() {
            return Err(SourceError::Duplicate {
                version: parsed.version,
                direction: parsed.direction,
                path: path.to_string_lossy().to_string(),
            });
        }
        *slot = Some(path);
        files.identifier = parsed.identifier;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }

    pub fn contains(&self, version: u64) -> bool {
        self.migrations.contains_key(&version)
    }

    /// Lowest version in the source.
    pub fn first(&self) -> Option<u64> {
        self.migrations.keys().next().copied()
    }

    /// Version immediately before `version`.
    pub fn prev(&self, version: u64) -> Option<u64> {
        self.migrations.range(..version).next_back().map(|(v, _)| *v)
    }

    /// Version immediately after `version`.
    pub fn next(&self, version: u64) -> Option<u64> {
        self.migrations
            .range((Excluded(version), Unbounded))
            .next()
            .map(|(v, _)| *v)
    }

    pub fn get(&self, version: u64) -> Option<&MigrationFiles> {
        self.migrations.get(&version)
    }

    /// All versions in ascending order.
    pub fn versions(&self) -> Vec<u64> {
        self.migrations.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_name() {
        let parsed = parse_name("000001_create_users.up.sql").unwrap();
        assert_eq!(parsed.version, 1);
        assert_eq!(parsed.identifier, "create_users");
        assert_eq!(parsed.direction, Direction::Up);

        let parsed = parse_name("20240101120000_seed.down.json").unwrap();
        assert_eq!(parsed.version, 20240101120000);
        assert_eq!(parsed.direction, Direction::Down);
    }

    #[test]
    fn test_parse_name_rejects() {
        assert!(parse_name("README.md").is_err());
        assert!(parse_name("1_x.sideways.sql").is_err());
        assert!(parse_name("abc_x.up.sql").is_err());
        assert!(parse_name("99999999999999999999999_x.up.sql").is_err());
    }

    #[test]
    fn test_navigation() {
        let mut source = Source::default();
        for (version, dir) in [(1, Direction::Up), (3, Direction::Up), (3, Direction::Down), (7, Direction::Down)] {
            let parsed = ParsedName {
                version,
                identifier: "m".to_string(),
                direction: dir,
            };
            source.insert(parsed, PathBuf::from(format!("{}.{}", version, dir))).unwrap();
        }

        assert_eq!(source.len(), 3);
        assert_eq!(source.first(), Some(1));
        assert_eq!(source.next(1), Some(3));
        assert_eq!(source.next(7), None);
        assert_eq!(source.prev(3), Some(1));
        assert_eq!(source.prev(1), None);
        assert_eq!(source.next(2), Some(3));
        assert!(source.get(3).unwrap().down.is_some());
        assert_eq!(source.get(3).unwrap().identifier, "m");
        assert!(source.get(7).unwrap().path(Direction::Up).is_none());
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut source = Source::default();
        let parsed = parse_name("1_a.up.sql").unwrap();
        source.insert(parsed.clone(), PathBuf::from("1_a.up.sql")).unwrap();
        let err = source.insert(parsed, PathBuf::from("1_a.up.sql")).unwrap_err();
        assert!(matches!(err, SourceError::Duplicate { version: 1, .. }));
    }

    #[tokio::test]
    async fn test_open_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        for name in ["2_b.up.sql", "2_b.down.sql", "1_a.up.sql", "notes.txt", ".migrate-state.json"] {
            std::fs::write(temp_dir.path().join(name), "").unwrap();
        }
        std::fs::create_dir(temp_dir.path().join("3_dir.up.sql")).unwrap();

        let source = Source::open(temp_dir.path()).await.unwrap();
        assert_eq!(source.versions(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_open_missing_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = Source::open(&temp_dir.path().join("missing")).await.unwrap();
        assert!(source.is_empty());
    }
}
