//! Sequence numbering for migration file prefixes.
//!
//! In sequence mode every migration prefix is a fixed-width, zero-padded
//! decimal number. The next number is derived from the files already present
//! in the migrations directory; nothing about the sequence is persisted.

use crate::command::CommandError;
use tracing::debug;

/// List the files in `dir` that end with `ext`, sorted lexicographically.
///
/// `dir` must already be in the prefix form produced by
/// [`clean_dir`](crate::utils::clean_dir). A directory that does not exist
/// yields no matches.
pub fn list_matches(dir: &str, ext: &str) -> Result<Vec<String>, CommandError> {
    let pattern = format!(
        "{}*{}",
        glob::Pattern::escape(dir),
        glob::Pattern::escape(ext)
    );

    let mut matches = Vec::new();
    for entry in glob::glob(&pattern)? {
        let path = entry.map_err(|e| e.into_error())?;
        matches.push(path.to_string_lossy().to_string());
    }

    // next_sequence relies on the last entry holding the highest sequence
    matches.sort();

    debug!(pattern = %pattern, count = matches.len(), "Listed existing migrations");
    Ok(matches)
}

/// Compute the next zero-padded sequence prefix.
///
/// `matches` must be sorted so that its last entry carries the highest
/// sequence number; only that entry is inspected. For zero-padded names of
/// equal width a lexicographic sort guarantees this, which is what
/// [`list_matches`] returns. The leading token of the last entry's file
/// name, up to the first `_`, is parsed and incremented; an empty list
/// starts at 1.
pub fn next_sequence(matches: &[String], digits: usize) -> Result<String, CommandError> {
    if digits == 0 {
        return Err(CommandError::InvalidInput(
            "Digits must be positive".to_string(),
        ));
    }

    let next: i64 = match matches.last() {
        None => 1,
        Some(full_path) => {
            let file_name = full_path
                .rsplit(std::path::is_separator)
                .next()
                .unwrap_or_default();

            // At least one character must precede the separator
            let token = match file_name.find('_') {
                Some(idx) if idx >= 1 => &file_name[..idx],
                _ => return Err(CommandError::MalformedName(full_path.clone())),
            };

            let current: i64 = token.parse().map_err(|source| CommandError::NonNumericToken {
                token: token.to_string(),
                source,
            })?;

            current
                .checked_add(1)
                .ok_or_else(|| CommandError::SequenceOverflow {
                    value: (i128::from(current) + 1).to_string(),
                    digits,
                })?
        }
    };

    if next <= 0 {
        return Err(CommandError::NonPositiveSequence);
    }

    let next_str = next.to_string();
    if next_str.len() > digits {
        return Err(CommandError::SequenceOverflow {
            value: next_str,
            digits,
        });
    }

    Ok(format!("{:0>width$}", next_str, width = digits))
}
