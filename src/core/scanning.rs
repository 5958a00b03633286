//! Audio file discovery
//!
//! Every tool works on one of three shapes of input: the audio files directly
//! inside a folder, every audio file below a folder, or a mixed list of files
//! and folders given on the command line.

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::audio::is_audio_file;

/// Get the audio files directly inside `dir` (no subfolders), sorted by name
pub fn top_level_audio_files(dir: &Path) -> Result<Vec<PathBuf>, String> {
    let entries = fs::read_dir(dir)
        .map_err(|e| format!("Failed to read directory {}: {}", dir.display(), e))?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_audio_file(path))
        .collect();
    files.sort();
    Ok(files)
}

/// Get every audio file below `dir`, sorted by path
pub fn recursive_audio_files(dir: &Path) -> Vec<PathBuf> {
    recursive_files_matching(dir, is_audio_file)
}

/// Get every file below `dir` accepted by `filter`, sorted by path
pub fn recursive_files_matching(dir: &Path, filter: fn(&Path) -> bool) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| filter(path))
        .collect();
    files.sort();
    files
}

/// Get the immediate child directories of `dir`, sorted by name
pub fn subdirectories(dir: &Path) -> Result<Vec<PathBuf>, String> {
    let entries = fs::read_dir(dir)
        .map_err(|e| format!("Failed to read directory {}: {}", dir.display(), e))?;

    let mut dirs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();
    Ok(dirs)
}

/// One command-line path after classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputPath {
    /// A file that passed the filter
    File(PathBuf),
    /// A directory, with the matching files found below it
    Directory { path: PathBuf, files: Vec<PathBuf> },
    /// A file the filter rejected
    Skipped(PathBuf),
    /// Nothing exists at this path
    NotFound(PathBuf),
}

/// Classify command-line paths, expanding directories recursively
pub fn expand_inputs(paths: &[PathBuf], filter: fn(&Path) -> bool) -> Vec<InputPath> {
    paths
        .iter()
        .map(|path| {
            if path.is_file() {
                if filter(path) {
                    InputPath::File(path.clone())
                } else {
                    InputPath::Skipped(path.clone())
                }
            } else if path.is_dir() {
                InputPath::Directory {
                    path: path.clone(),
                    files: recursive_files_matching(path, filter),
                }
            } else {
                InputPath::NotFound(path.clone())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::detection::is_flac_file;
    use crate::test_fixtures::write_text_file;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_top_level_audio_files_ignores_subfolders() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("b.flac"));
        touch(&dir.path().join("a.MP3"));
        touch(&dir.path().join("notes.txt"));
        touch(&dir.path().join("sub").join("c.flac"));

        let files = top_level_audio_files(dir.path()).unwrap();
        assert_eq!(
            files,
            vec![dir.path().join("a.MP3"), dir.path().join("b.flac")]
        );
    }

    #[test]
    fn test_top_level_audio_files_missing_dir() {
        assert!(top_level_audio_files(Path::new("/nonexistent/dir")).is_err());
    }

    #[test]
    fn test_recursive_audio_files() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("a.flac"));
        touch(&dir.path().join("x").join("y").join("b.opus"));
        touch(&dir.path().join("x").join("cover.jpg"));

        let files = recursive_audio_files(dir.path());
        assert_eq!(
            files,
            vec![
                dir.path().join("a.flac"),
                dir.path().join("x").join("y").join("b.opus"),
            ]
        );
    }

    #[test]
    fn test_subdirectories_sorted() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("Techno")).unwrap();
        fs::create_dir(dir.path().join("Ambient")).unwrap();
        touch(&dir.path().join("file.flac"));

        assert_eq!(
            subdirectories(dir.path()).unwrap(),
            vec![dir.path().join("Ambient"), dir.path().join("Techno")]
        );
    }

    #[test]
    fn test_expand_inputs_classifies_paths() {
        let dir = TempDir::new().unwrap();
        let flac = dir.path().join("one.flac");
        touch(&flac);
        let text = write_text_file(dir.path(), "notes.txt");
        let album = dir.path().join("album");
        touch(&album.join("two.flac"));
        touch(&album.join("three.mp3"));
        let missing = dir.path().join("missing.flac");

        let inputs = expand_inputs(
            &[flac.clone(), text.clone(), album.clone(), missing.clone()],
            is_flac_file,
        );

        assert_eq!(
            inputs,
            vec![
                InputPath::File(flac),
                InputPath::Skipped(text),
                InputPath::Directory {
                    path: album.clone(),
                    files: vec![album.join("two.flac")],
                },
                InputPath::NotFound(missing),
            ]
        );
    }
}
