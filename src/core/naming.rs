//! File and folder naming helpers
//!
//! String cleanup for genres, prefixes and comment markers, plus the
//! collision-free destination lookup used by every tool that moves files.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

static FORBIDDEN_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"\\|?*]"#).expect("valid regex"));

static WHITESPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Return the rest of `file_name` after `prefix`, if it starts with it
///
/// A name that consists of the prefix alone is not stripped.
pub fn strip_filename_prefix<'a>(file_name: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix.is_empty() {
        return None;
    }
    file_name
        .strip_prefix(prefix)
        .filter(|rest| !rest.is_empty())
}

/// Turn a raw GENRE value into something usable as a folder name
///
/// Only the part before the first `/` is kept, characters that are invalid
/// in folder names become `_`, and whitespace runs collapse to one space.
/// `.` and `..` name no folder of their own and count as no genre.
pub fn sanitize_genre(raw: &str) -> Option<String> {
    let first = raw.split('/').next().unwrap_or("").trim();
    let replaced = FORBIDDEN_CHARS.replace_all(first, "_");
    let collapsed = WHITESPACE_RUNS.replace_all(replaced.trim(), " ");

    match collapsed.as_ref() {
        "" | "." | ".." => None,
        _ => Some(collapsed.into_owned()),
    }
}

/// The GENRE value written for a file moved into `folder_name`
pub fn genre_tag_from_folder(folder_name: &str) -> String {
    folder_name
        .split('/')
        .next()
        .unwrap_or("")
        .trim()
        .trim_start_matches('_')
        .to_string()
}

/// Folder name offered when no folder exists for a genre yet
pub fn default_folder_name(genre: &str) -> String {
    format!("_{}", genre)
}

/// Whether a typed folder name stays inside the folder it is joined to
///
/// Nested names like `Electronic/House` are fine; absolute paths and `.` or
/// `..` components are not.
pub fn is_contained_folder_name(folder_name: &str) -> bool {
    !folder_name.is_empty()
        && Path::new(folder_name)
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
}

/// Names of child folders of `dir` that look like `genre`
///
/// A folder matches when either lowercased name contains the other.
pub fn find_similar_folders(dir: &Path, genre: &str) -> Vec<String> {
    let genre_lower = genre.to_lowercase();
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut similar: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .filter(|name| {
            let name_lower = name.to_lowercase();
            name_lower.contains(&genre_lower) || genre_lower.contains(&name_lower)
        })
        .collect();
    similar.sort();
    similar
}

/// First free path for `file_name` inside `dir`
///
/// Returns `dir/file_name` when nothing is there, otherwise `stem_1.ext`,
/// `stem_2.ext`, ... until a free name is found.
pub fn unique_destination(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let as_path = Path::new(file_name);
    let stem = as_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| file_name.to_string());
    let extension = as_path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut counter = 1;
    loop {
        let candidate = dir.join(format!("{}_{}{}", stem, counter, extension));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Build the pattern that finds `marker`
///
/// A marker starting with a word character only matches at the start of a
/// word, so `color=` leaves `bgcolor=` alone. Other markers match anywhere.
pub fn marker_pattern(marker: &str) -> Result<Regex, String> {
    let starts_with_word = marker
        .chars()
        .next()
        .is_some_and(|c| c.is_alphanumeric() || c == '_');
    let boundary = if starts_with_word { r"\b" } else { "" };

    Regex::new(&format!("{}{}", boundary, regex::escape(marker)))
        .map_err(|e| format!("Invalid comment marker '{}': {}", marker, e))
}

/// Remove every occurrence of the marker, leaving the value after it
pub fn strip_comment_marker(comment: &str, pattern: &Regex) -> String {
    pattern.replace_all(comment, "").into_owned()
}

/// Move a file, copying across filesystems when a rename is not possible
pub fn move_file(from: &Path, to: &Path) -> Result<(), String> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }

    fs::copy(from, to).map_err(|e| format!("Failed to copy {}: {}", from.display(), e))?;
    fs::remove_file(from).map_err(|e| format!("Failed to remove {}: {}", from.display(), e))
}
