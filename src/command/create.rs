use super::CommandError;
use crate::config::{DEFAULT_DIGITS, DEFAULT_TIME_FORMAT};
use crate::files::{create_file, generate_migration_files};
use crate::sequence::{list_matches, next_sequence};
use crate::utils::clean_dir;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, TimeZone, Utc};
use std::fmt::{Display, Write};
use std::path::PathBuf;
use tokio::fs;
use tracing::info;

/// Clock zone used to render timestamp prefixes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Zone {
    #[default]
    Utc,
    Local,
}

/// Options for creating a migration
#[derive(Debug, Clone)]
pub struct CreateOptions {
    pub dir: String,
    pub name: String,
    pub ext: String,
    /// Number migrations with a zero-padded sequence instead of a timestamp.
    pub seq: bool,
    pub seq_digits: usize,
    /// Timestamp format: `unix`, `unixNano` or a strftime pattern.
    /// `None` uses the default pattern.
    pub format: Option<String>,
    pub zone: Zone,
}

impl CreateOptions {
    pub fn new(dir: impl Into<String>, name: impl Into<String>, ext: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            name: name.into(),
            ext: ext.into(),
            seq: false,
            seq_digits: DEFAULT_DIGITS,
            format: None,
            zone: Zone::default(),
        }
    }
}

/// Result of migration creation
#[derive(Debug, Clone)]
pub struct CreatedMigration {
    pub prefix: String,
    pub up: PathBuf,
    pub down: PathBuf,
}

/// Create an empty up/down migration pair.
///
/// The prefix is either the next sequence number found in the directory or a
/// rendering of `start_time`. The directory is created when missing. The two
/// files are created one after the other; if the second fails the first
/// stays on disk.
pub async fn create_migration(
    options: &CreateOptions,
    start_time: DateTime<Utc>,
) -> Result<CreatedMigration, CommandError> {
    let dir = clean_dir(&options.dir);

    if options.seq && options.format.is_some() {
        return Err(CommandError::ConflictingFlags(
            "The seq and format options are mutually exclusive".to_string(),
        ));
    }

    let prefix = if options.seq {
        if options.seq_digits == 0 {
            return Err(CommandError::InvalidInput(
                "Digits must be positive".to_string(),
            ));
        }
        let matches = list_matches(&dir, &options.ext)?;
        next_sequence(&matches, options.seq_digits)?
    } else {
        time_prefix(options.format.as_deref(), options.zone, start_time)?
    };

    fs::create_dir_all(&dir).await?;

    let (up, down) = generate_migration_files(&dir, &prefix, &options.name, &options.ext);
    create_file(&up).await?;
    create_file(&down).await?;

    info!(up = %up.display(), down = %down.display(), "Created migration");

    Ok(CreatedMigration { prefix, up, down })
}

/// Render the timestamp prefix for `start_time`.
pub fn time_prefix(
    format: Option<&str>,
    zone: Zone,
    start_time: DateTime<Utc>,
) -> Result<String, CommandError> {
    match format {
        None => render_in_zone(start_time, DEFAULT_TIME_FORMAT, zone),
        Some("") => Err(CommandError::InvalidInput(
            "Time format may not be empty".to_string(),
        )),
        Some("unix") => Ok(start_time.timestamp().to_string()),
        Some("unixNano") => start_time
            .timestamp_nanos_opt()
            .map(|nanos| nanos.to_string())
            .ok_or_else(|| {
                CommandError::InvalidInput(format!(
                    "Time {} cannot be expressed in nanoseconds",
                    start_time
                ))
            }),
        Some(custom) => render_in_zone(start_time, custom, zone),
    }
}

fn render_in_zone(
    start_time: DateTime<Utc>,
    format: &str,
    zone: Zone,
) -> Result<String, CommandError> {
    match zone {
        Zone::Utc => render(&start_time, format),
        Zone::Local => render(&start_time.with_timezone(&Local), format),
    }
}

fn render<Tz: TimeZone>(time: &DateTime<Tz>, format: &str) -> Result<String, CommandError>
where
    Tz::Offset: Display,
{
    let invalid = || CommandError::InvalidInput(format!("Invalid time format: {}", format));

    let items: Vec<Item<'_>> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(invalid());
    }

    let mut rendered = String::new();
    write!(rendered, "{}", time.format_with_items(items.iter())).map_err(|_| invalid())?;
    Ok(rendered)
}
