//! `move-by-keyword`: move files whose COMMENT mentions a keyword

use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::audio::TrackTags;
use crate::core::naming::{move_file, unique_destination};
use crate::core::{top_level_audio_files, Answer, Prompt, RunReport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordMove {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub keyword: String,
}

impl KeywordMove {
    /// Fill in whatever was not given on the command line by asking
    ///
    /// Returns `None` when the user quits.
    pub fn resolve<R: BufRead, W: Write>(
        source: Option<PathBuf>,
        destination: Option<PathBuf>,
        keyword: Option<String>,
        prompt: &mut Prompt<R, W>,
    ) -> Result<Option<Self>, String> {
        let source = match source {
            Some(source) => source,
            None => match prompt.ask_required("Folder with audio files: ")? {
                Answer::Quit => return Ok(None),
                Answer::Text(path) => PathBuf::from(path),
            },
        };
        let destination = match destination {
            Some(destination) => destination,
            None => match prompt.ask_required("Folder to move matching files to: ")? {
                Answer::Quit => return Ok(None),
                Answer::Text(path) => PathBuf::from(path),
            },
        };
        let keyword = match keyword {
            Some(keyword) => keyword,
            None => match prompt.ask_required("Keyword to look for in comments: ")? {
                Answer::Quit => return Ok(None),
                Answer::Text(keyword) => keyword,
            },
        };

        Ok(Some(Self {
            source,
            destination,
            keyword: keyword.trim().to_lowercase(),
        }))
    }

    pub fn run(&self) -> Result<RunReport, String> {
        if self.keyword.is_empty() {
            return Err("Keyword cannot be empty".to_string());
        }
        fs::create_dir_all(&self.destination).map_err(|e| {
            format!(
                "Failed to create destination {}: {}",
                self.destination.display(),
                e
            )
        })?;

        let mut report = RunReport::new();
        for path in top_level_audio_files(&self.source)? {
            report.processed += 1;
            let name = file_name(&path);
            match self.move_if_matches(&path) {
                Ok(Some(destination)) => {
                    report.changed += 1;
                    println!(
                        "Found \"{}\" in {}, moved to {}",
                        self.keyword,
                        name,
                        destination.display()
                    );
                }
                Ok(None) => report.unchanged += 1,
                Err(e) => {
                    println!("Error processing {}: {}", name, e);
                    report.record_error(&name, &e);
                }
            }
        }

        println!(
            "Done. {} of {} files moved ({} errors).",
            report.changed, report.processed, report.errors
        );
        Ok(report)
    }

    fn move_if_matches(&self, path: &Path) -> Result<Option<PathBuf>, String> {
        let comments = TrackTags::open(path)?.comments();
        if !comments_match(&comments, &self.keyword) {
            return Ok(None);
        }

        let destination = unique_destination(&self.destination, &file_name(path));
        move_file(path, &destination)?;
        Ok(Some(destination))
    }
}

/// Whether any comment contains the (already lowercased) keyword
pub fn comments_match(comments: &[String], keyword: &str) -> bool {
    comments
        .iter()
        .any(|comment| comment.to_lowercase().contains(keyword))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
