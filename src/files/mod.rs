//! Migration file naming and creation.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Build the up and down paths for one migration.
///
/// Both paths share `{dir}/{prefix}_{name}` and differ only in the direction
/// marker placed before `ext`. `name` and `ext` are used verbatim.
pub fn generate_migration_files(
    dir: &str,
    prefix: &str,
    name: &str,
    ext: &str,
) -> (PathBuf, PathBuf) {
    let base = Path::new(dir).join(format!("{}_{}", prefix, name));
    (
        with_suffix(&base, &format!(".up{}", ext)),
        with_suffix(&base, &format!(".down{}", ext)),
    )
}

fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut path: OsString = base.as_os_str().to_owned();
    path.push(suffix);
    PathBuf::from(path)
}

/// Create an empty file at `path`, truncating any existing content.
pub async fn create_file(path: &Path) -> Result<(), std::io::Error> {
    let file = fs::File::create(path).await?;
    file.sync_all().await?;
    debug!(path = %path.display(), "Created migration file");
    Ok(())
}
