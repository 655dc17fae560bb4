// src/utils.rs

use crate::{error::*, models::Target};
use anyhow::Context;
use std::{
    fs,
    path::{Path, PathBuf},
};
use url::Url;

/// Classifies a raw target string. Checks are ordered and the first match
/// wins: a string that parses as an http(s) URL is a URL even if a path of
/// the same name happens to exist on disk.
pub fn classify_target(raw: &str) -> Target {
    if let Ok(url) = Url::parse(raw)
        && matches!(url.scheme(), "http" | "https")
    {
        return Target::Url(raw.to_string());
    }
    let path = Path::new(raw);
    if path.is_file() {
        return Target::File(path.to_path_buf());
    }
    if path.is_dir() {
        return Target::Directory(path.to_path_buf());
    }
    Target::Invalid(raw.to_string())
}

/// Lists the immediate entries of a directory, skipping dotfiles.
/// The expansion is shallow: subdirectories are returned as plain paths and
/// never descended into. Entries come back sorted so that upload order is
/// stable across platforms.
pub fn expand_directory(dir: &Path) -> AppResult<Vec<PathBuf>> {
    let resolved = dunce::canonicalize(dir)
        .with_context(|| format!("directory '{}' is not accessible", dir.display()))?;
    let entries = fs::read_dir(&resolved)
        .with_context(|| format!("directory '{}' could not be read", resolved.display()))?;

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        paths.push(entry.path());
    }
    paths.sort();
    Ok(paths)
}
