//! `strip-comment`: remove a marker such as `color=` from COMMENT values

use std::path::{Path, PathBuf};

use regex::Regex;

use crate::audio::{is_audio_file, TrackTags};
use crate::core::naming::{marker_pattern, strip_comment_marker};
use crate::core::{expand_inputs, InputPath, RunReport};

/// Strip the marker from every comment of one file
///
/// Returns whether the file was rewritten.
pub fn strip_file(path: &Path, pattern: &Regex) -> Result<bool, String> {
    let mut tags = TrackTags::open(path)?;
    let comments = tags.comments();
    let cleaned: Vec<String> = comments
        .iter()
        .map(|comment| strip_comment_marker(comment, pattern))
        .collect();

    if cleaned == comments {
        return Ok(false);
    }
    tags.set_comments(cleaned)?;
    tags.save(path)?;
    Ok(true)
}

pub fn run(paths: &[PathBuf], marker: &str) -> Result<RunReport, String> {
    if marker.is_empty() {
        return Err("Marker cannot be empty".to_string());
    }
    let pattern = marker_pattern(marker)?;
    let mut report = RunReport::new();

    for input in expand_inputs(paths, is_audio_file) {
        match input {
            InputPath::File(path) => process(&path, &pattern, &mut report),
            InputPath::Directory { path, files } => {
                report.folders += 1;
                if files.is_empty() {
                    println!("No audio files found in {}", path.display());
                    continue;
                }
                for file in &files {
                    process(file, &pattern, &mut report);
                }
                println!("Processed {} audio files in {}", files.len(), path.display());
            }
            InputPath::Skipped(path) => {
                report.skipped += 1;
                println!("Skipping non-audio file: {}", path.display());
            }
            InputPath::NotFound(path) => {
                report.skipped += 1;
                println!("Path not found: {}", path.display());
            }
        }
    }

    log::info!(
        "Stripped '{}' from {} of {} files",
        marker,
        report.changed,
        report.processed
    );
    Ok(report)
}

fn process(path: &Path, pattern: &Regex, report: &mut RunReport) {
    report.processed += 1;
    match strip_file(path, pattern) {
        Ok(true) => {
            report.changed += 1;
            println!("Updated: {}", path.display());
        }
        Ok(false) => {
            report.unchanged += 1;
            println!("No changes needed: {}", path.display());
        }
        Err(e) => {
            println!("Error processing {}: {}", path.display(), e);
            report.record_error(&path.display().to_string(), &e);
        }
    }
}
