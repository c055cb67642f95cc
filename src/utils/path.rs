//! Lexical path cleaning for migration directories.
//!
//! Paths are treated as `/`-separated strings and are never touched on disk,
//! so a directory that does not exist yet cleans the same way as one that does.

/// Clean a `/`-separated path lexically.
///
/// Collapses repeated separators, drops `.` elements and resolves `..`
/// against the preceding element. A `..` that would climb above the root is
/// dropped for rooted paths and kept for relative ones. An empty result is
/// returned as `.`.
pub fn clean_path(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match parts.last() {
                Some(last) if *last != ".." => {
                    parts.pop();
                }
                _ if rooted => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    if rooted {
        format!("/{}", joined)
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// Normalize a migration directory into prefix form.
///
/// The result is empty for the current directory, `/` for the root, and
/// otherwise the cleaned path with exactly one trailing `/`, so a file name
/// can be appended directly.
pub fn clean_dir(dir: &str) -> String {
    let cleaned = clean_path(dir);
    match cleaned.as_str() {
        "." => String::new(),
        "/" => cleaned,
        _ => cleaned + "/",
    }
}
