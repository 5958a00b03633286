//! `sort-by-genre`: move files into folders named after their genre
//!
//! When the genre has no folder yet the user picks one, with similar existing
//! folders as a hint and the track playing in the background. Picking a name
//! other than the genre also rewrites the moved file's GENRE tag.

use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::audio::tags::write_genre;
use crate::audio::{Previewer, TrackTags};
use crate::core::naming::{
    default_folder_name, find_similar_folders, genre_tag_from_folder, is_contained_folder_name,
    move_file, sanitize_genre, unique_destination,
};
use crate::core::{top_level_audio_files, Answer, Prompt, RunReport};

/// The folder a file is going to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreFolder {
    pub path: PathBuf,
    pub name: String,
    pub created: bool,
}

pub struct GenreSorter<'a, R, W> {
    output: PathBuf,
    unknown_genre: String,
    prompt: &'a mut Prompt<R, W>,
    previewer: &'a mut dyn Previewer,
}

impl<'a, R: BufRead, W: Write> GenreSorter<'a, R, W> {
    pub fn new(
        output: PathBuf,
        unknown_genre: String,
        prompt: &'a mut Prompt<R, W>,
        previewer: &'a mut dyn Previewer,
    ) -> Self {
        Self {
            output,
            unknown_genre,
            prompt,
            previewer,
        }
    }

    /// Sort every audio file directly inside `source`
    pub fn run(&mut self, source: &Path) -> Result<RunReport, String> {
        if !source.is_dir() {
            return Err(format!("Source directory {} does not exist", source.display()));
        }
        if !self.output.is_dir() {
            return Err(format!(
                "Output directory {} does not exist",
                self.output.display()
            ));
        }

        println!("Looking for files in: {}", display_absolute(source));
        println!("Creating genre folders in: {}", display_absolute(&self.output));

        let mut report = RunReport::new();
        let files = top_level_audio_files(source)?;
        if files.is_empty() {
            println!("No audio files found!");
            println!("Supported formats: flac, mp3, m4a, mp4, ogg, opus, aiff");
            return Ok(report);
        }
        println!("Found {} audio files", files.len());

        for (i, file) in files.iter().enumerate() {
            println!();
            println!("[{}/{}] Processing: {}", i + 1, files.len(), file_name(file));
            report.processed += 1;

            let genre = match read_genre(file) {
                Some(genre) => {
                    println!("   Genre: {}", genre);
                    report.genres.insert(genre.clone());
                    genre
                }
                None => {
                    println!(
                        "   No genre found, using folder '{}'",
                        self.unknown_genre
                    );
                    report.no_genre += 1;
                    self.unknown_genre.clone()
                }
            };

            let folder = match self.choose_folder(file, &genre) {
                Ok(Some(folder)) => folder,
                Ok(None) => {
                    println!("Stopped by user");
                    break;
                }
                Err(e) => {
                    println!("   Error: {}", e);
                    report.record_error(&file_name(file), &e);
                    continue;
                }
            };

            if folder.created {
                report.created_folders.insert(folder.name.clone());
            } else {
                report.existing_folders.insert(folder.name.clone());
            }

            match move_into(file, &folder, &genre) {
                Ok(destination) => {
                    report.changed += 1;
                    println!("   Moved to: {}", destination.display());
                }
                Err(e) => {
                    println!("   Error moving file: {}", e);
                    report.record_error(&file_name(file), &e);
                }
            }
        }

        report.print_summary(
            "GENRE SORT SUMMARY",
            &[
                ("Files processed", report.processed),
                ("Moved", report.changed),
                ("Without genre", report.no_genre),
                ("Errors", report.errors),
                ("Genres found", report.genres.len()),
                ("Folders created", report.created_folders.len()),
                ("Existing folders used", report.existing_folders.len()),
            ],
        );
        if report.no_genre > 0 {
            println!("Files without genre went to: {}", self.unknown_genre);
        }
        Ok(report)
    }

    /// Find or create the folder for `genre`
    ///
    /// An existing folder named exactly after the genre is used silently;
    /// otherwise the user is asked. Returns `None` when the user quits.
    pub fn choose_folder(&mut self, file: &Path, genre: &str) -> Result<Option<GenreFolder>, String> {
        let exact = self.output.join(genre);
        if exact.is_dir() {
            println!("   Using folder: {}", genre);
            return Ok(Some(GenreFolder {
                path: exact,
                name: genre.to_string(),
                created: false,
            }));
        }

        match find_similar_folders(&self.output, genre).first() {
            Some(similar) => self.prompt.say(&format!(
                "Similar folder for genre '{}': {}",
                genre, similar
            ))?,
            None => self
                .prompt
                .say(&format!("No folder for genre '{}'", genre))?,
        }
        self.prompt.say(&format!("Track: {}", file_name(file)))?;

        if let Err(e) = self.previewer.preview(file) {
            log::warn!("Preview failed: {}", e);
        }

        let default = default_folder_name(genre);
        let name = loop {
            match self.prompt.ask_with_default("Folder to use", &default)? {
                Answer::Quit => return Ok(None),
                Answer::Text(name) if is_contained_folder_name(&name) => break name,
                Answer::Text(name) => self.prompt.say(&format!(
                    "'{}' is not a folder inside {}",
                    name,
                    self.output.display()
                ))?,
            }
        };

        let path = self.output.join(&name);
        let created = if path.is_dir() {
            println!("   Using folder: {}", name);
            false
        } else {
            fs::create_dir_all(&path)
                .map_err(|e| format!("Failed to create folder {}: {}", name, e))?;
            println!("   Created folder: {}", name);
            true
        };

        Ok(Some(GenreFolder {
            path,
            name,
            created,
        }))
    }
}

/// Read and clean the genre of a file; unreadable files have no genre
pub fn read_genre(path: &Path) -> Option<String> {
    match TrackTags::open(path) {
        Ok(tags) => tags.genre().and_then(|raw| sanitize_genre(&raw)),
        Err(e) => {
            log::warn!("Failed to read metadata from {}: {}", path.display(), e);
            None
        }
    }
}

/// Move a file into its folder, retagging it when the folder is not the genre
fn move_into(file: &Path, folder: &GenreFolder, genre: &str) -> Result<PathBuf, String> {
    let destination = unique_destination(&folder.path, &file_name(file));
    move_file(file, &destination)?;

    if folder.name != genre {
        let new_genre = genre_tag_from_folder(&folder.name);
        println!("   Updating genre: '{}' -> '{}'", genre, new_genre);
        match write_genre(&destination, &new_genre) {
            Ok(_) => println!("   Genre updated"),
            Err(e) => log::warn!("Could not update genre in {}: {}", destination.display(), e),
        }
    }

    Ok(destination)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn display_absolute(path: &Path) -> String {
    path.canonicalize()
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}
