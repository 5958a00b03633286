//! `genre-from-folder`: set GENRE from the name of the folder a file is in

use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::audio::tags::write_genre;
use crate::core::{
    recursive_audio_files, subdirectories, top_level_audio_files, FolderChoice, Prompt, RunReport,
};

/// How many entries to list when a folder has no audio files
const LISTING_LIMIT: usize = 10;

/// Which files get which genre
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Every audio file below the folder gets the folder's name
    Single(PathBuf),
    /// Each child folder names the audio files directly inside it
    Subfolders(PathBuf),
}

impl Scope {
    /// Work out the scope from the command line, asking when no folder was given
    ///
    /// Returns `None` when the user quits the menu.
    pub fn resolve<R: BufRead, W: Write>(
        dir: Option<PathBuf>,
        subfolders: bool,
        prompt: &mut Prompt<R, W>,
    ) -> Result<Option<Self>, String> {
        match dir {
            Some(dir) if subfolders || dir == Path::new(".") => Ok(Some(Scope::Subfolders(dir))),
            Some(dir) => Ok(Some(Scope::Single(dir))),
            None if subfolders => Ok(Some(Scope::Subfolders(PathBuf::from(".")))),
            None => Ok(
                prompt
                    .choose_subfolder(Path::new("."))?
                    .map(|choice| match choice {
                        FolderChoice::One(dir) => Scope::Single(dir),
                        FolderChoice::All => Scope::Subfolders(PathBuf::from(".")),
                    }),
            ),
        }
    }
}

pub fn run(scope: &Scope) -> Result<RunReport, String> {
    let mut report = RunReport::new();

    match scope {
        Scope::Single(dir) => {
            let genre = folder_name(dir)?;
            println!("Processing folder: {}", dir.display());
            println!("Genre: {}", genre);
            report.folders += 1;

            let files = recursive_audio_files(dir);
            if files.is_empty() {
                println!("No audio files found in {}", dir.display());
                list_contents(dir);
            }
            for file in &files {
                update(file, &genre, &mut report);
            }
        }
        Scope::Subfolders(root) => {
            let folders = subdirectories(root)?;
            if folders.is_empty() {
                println!("No folders found in {}", root.display());
            }
            for folder in &folders {
                let genre = folder_name(folder)?;
                println!();
                println!("Folder: {}", genre);
                report.folders += 1;

                match top_level_audio_files(folder) {
                    Ok(files) if files.is_empty() => println!("   No audio files"),
                    Ok(files) => {
                        for file in &files {
                            update(file, &genre, &mut report);
                        }
                    }
                    Err(e) => report.record_error(&genre, &e),
                }
            }
        }
    }

    report.print_summary(
        "GENRE UPDATE SUMMARY",
        &[
            ("Folders processed", report.folders),
            ("Files found", report.processed),
            ("Updated", report.changed),
            ("Errors", report.errors),
        ],
    );
    if report.errors > 0 {
        println!("Some files could not be updated, see the log for details");
    }
    if report.processed == 0 {
        println!("No audio files found. Supported formats: flac, mp3, m4a, mp4, ogg, opus, aiff");
    }
    Ok(report)
}

fn update(file: &Path, genre: &str, report: &mut RunReport) {
    report.processed += 1;
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    match write_genre(file, genre) {
        Ok(previous) => {
            report.changed += 1;
            println!(
                "   {}: was '{}' → now '{}'",
                name,
                previous.as_deref().unwrap_or("NONE"),
                genre
            );
        }
        Err(e) => {
            println!("   Error updating {}: {}", name, e);
            report.record_error(&file.display().to_string(), &e);
        }
    }
}

/// Name of a folder, resolving `.` and `..` to the real name
fn folder_name(dir: &Path) -> Result<String, String> {
    let resolved = dir
        .canonicalize()
        .map_err(|e| format!("Folder {} not found: {}", dir.display(), e))?;
    if !resolved.is_dir() {
        return Err(format!("{} is not a folder", dir.display()));
    }
    resolved
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| format!("Folder {} has no name", resolved.display()))
}

fn list_contents(dir: &Path) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();

    if names.is_empty() {
        println!("The folder is empty");
        return;
    }
    println!("Folder contents:");
    for name in names.iter().take(LISTING_LIMIT) {
        println!("   {}", name);
    }
    if names.len() > LISTING_LIMIT {
        println!("   ... and {} more", names.len() - LISTING_LIMIT);
    }
}
