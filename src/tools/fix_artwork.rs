//! `fix-artwork`: re-embed the first picture as a clean front cover
//!
//! Some taggers leave covers with odd picture types, stale descriptions or
//! several duplicates, which players then ignore. Rewriting the first picture
//! as the only "Front Cover" fixes that.

use std::path::{Path, PathBuf};

use crate::audio::{is_audio_file, TrackTags};
use crate::core::{expand_inputs, InputPath, RunReport};

/// Outcome for one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtworkFix {
    Fixed,
    NoArtwork,
}

/// Re-embed the artwork of a single file
pub fn fix_file(path: &Path) -> Result<ArtworkFix, String> {
    let mut tags = TrackTags::open(path)?;
    if !tags.reembed_front_cover()? {
        return Ok(ArtworkFix::NoArtwork);
    }
    tags.save(path)?;
    Ok(ArtworkFix::Fixed)
}

pub fn run(paths: &[PathBuf]) -> RunReport {
    let mut report = RunReport::new();

    for input in expand_inputs(paths, is_audio_file) {
        match input {
            InputPath::File(path) => process(&path, &mut report),
            InputPath::Directory { path, files } => {
                report.folders += 1;
                if files.is_empty() {
                    println!("No audio files found in: {}", path.display());
                }
                for file in &files {
                    process(file, &mut report);
                }
            }
            InputPath::Skipped(path) | InputPath::NotFound(path) => {
                report.skipped += 1;
                println!("Skipping: {}", path.display());
            }
        }
    }

    report.print_summary(
        "ARTWORK SUMMARY",
        &[
            ("Files processed", report.processed),
            ("Fixed", report.changed),
            ("Without artwork", report.unchanged),
            ("Skipped", report.skipped),
            ("Errors", report.errors),
        ],
    );
    report
}

fn process(path: &Path, report: &mut RunReport) {
    report.processed += 1;
    match fix_file(path) {
        Ok(ArtworkFix::Fixed) => {
            report.changed += 1;
            println!("Fixed artwork in: {}", path.display());
        }
        Ok(ArtworkFix::NoArtwork) => {
            report.unchanged += 1;
            println!("No artwork found in {}", path.display());
        }
        Err(e) => {
            println!("Error fixing {}: {}", path.display(), e);
            report.record_error(&path.display().to_string(), &e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{write_flac, write_flac_with_picture, write_text_file};
    use lofty::PictureType;
    use tempfile::TempDir;

    #[test]
    fn test_fix_file_without_artwork() {
        let dir = TempDir::new().unwrap();
        let path = write_flac(dir.path(), "bare.flac", &[]);
        let before = std::fs::read(&path).unwrap();

        assert_eq!(fix_file(&path).unwrap(), ArtworkFix::NoArtwork);
        assert_eq!(std::fs::read(&path).unwrap(), before, "file should be untouched");
    }

    #[test]
    fn test_fix_file_leaves_single_front_cover() {
        let dir = TempDir::new().unwrap();
        let path = write_flac_with_picture(dir.path(), "art.flac", PictureType::Media, 3);

        assert_eq!(fix_file(&path).unwrap(), ArtworkFix::Fixed);

        let tags = TrackTags::open(&path).unwrap();
        assert_eq!(tags.pictures_len(), 1);
        let cover = tags.first_picture().unwrap();
        assert_eq!(cover.picture.pic_type(), PictureType::CoverFront);
        assert_eq!(cover.picture.description(), Some("Cover"));
    }

    #[test]
    fn test_run_counts_each_outcome() {
        let dir = TempDir::new().unwrap();
        let art = write_flac_with_picture(dir.path(), "art.flac", PictureType::Other, 1);
        let bare = write_flac(dir.path(), "bare.flac", &[]);
        let text = write_text_file(dir.path(), "notes.txt");
        let broken = dir.path().join("broken.flac");
        std::fs::write(&broken, "not really flac").unwrap();
        let missing = dir.path().join("missing.flac");

        let report = run(&[art, bare, text, broken, missing]);
        assert_eq!(report.processed, 3);
        assert_eq!(report.changed, 1);
        assert_eq!(report.unchanged, 1);
        assert_eq!(report.errors, 1);
        assert_eq!(report.skipped, 2);
    }

    #[test]
    fn test_run_expands_directories() {
        let dir = TempDir::new().unwrap();
        let album = dir.path().join("album");
        std::fs::create_dir(&album).unwrap();
        write_flac_with_picture(&album, "one.flac", PictureType::Other, 1);
        write_flac_with_picture(&album, "two.flac", PictureType::Other, 2);

        let report = run(&[album]);
        assert_eq!(report.folders, 1);
        assert_eq!(report.changed, 2);
    }
}
