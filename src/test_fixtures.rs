//! Test fixtures for tag editing tests
//!
//! Generates small audio files in-process. FLAC fixtures are a STREAMINFO
//! block with no audio frames, optionally followed by Vorbis comments and
//! picture blocks written through lofty. MP3 fixtures are a run of silent
//! MPEG-1 Layer III frames, tagged through lofty's generic tag.

#![cfg(test)]

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use lofty::flac::FlacFile;
use lofty::ogg::{OggPictureStorage, VorbisComments};
use lofty::{
    Accessor, AudioFile, ItemKey, ItemValue, MimeType, ParseOptions, Picture, PictureInformation,
    PictureType, Probe, Tag, TagExt, TagItem, TaggedFileExt,
};

const PADDING_LEN: usize = 64;

/// MPEG-1 Layer III, no CRC, 128 kbps, 44.1 kHz, joint stereo
const MP3_FRAME_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0x64];
/// 144 * 128000 / 44100, without padding
const MP3_FRAME_LEN: usize = 417;
const MP3_FRAME_COUNT: usize = 20;

/// Bytes of a valid FLAC file with STREAMINFO and PADDING blocks and no frames
pub fn bare_flac_bytes() -> Vec<u8> {
    let mut bytes = b"fLaC".to_vec();
    // Block type 0 (STREAMINFO), length 34
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x22]);
    // Min/max block size
    bytes.extend_from_slice(&4096u16.to_be_bytes());
    bytes.extend_from_slice(&4096u16.to_be_bytes());
    // Min/max frame size (unknown)
    bytes.extend_from_slice(&[0; 6]);
    // 44.1kHz, 2 channels, 16 bits per sample, 0 total samples
    let packed: u64 = (44_100u64 << 44) | (1 << 41) | (15 << 36);
    bytes.extend_from_slice(&packed.to_be_bytes());
    // MD5 of the (empty) audio data
    bytes.extend_from_slice(&[0; 16]);
    // Last-metadata-block flag set, block type 1 (PADDING)
    bytes.extend_from_slice(&[0x81, 0x00, 0x00, PADDING_LEN as u8]);
    bytes.extend_from_slice(&[0; PADDING_LEN]);
    bytes
}

/// Write a FLAC file carrying the given Vorbis comment fields
pub fn write_flac(dir: &Path, name: &str, fields: &[(&str, &str)]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, bare_flac_bytes()).expect("Failed to write FLAC fixture");

    if !fields.is_empty() {
        edit_flac(&path, |flac| {
            let mut comments = VorbisComments::default();
            for (key, value) in fields {
                comments.push(key.to_string(), value.to_string());
            }
            flac.set_vorbis_comments(comments);
        });
    }

    path
}

/// Picture information attached to every fixture picture
pub fn sample_picture_info() -> PictureInformation {
    PictureInformation {
        width: 600,
        height: 600,
        color_depth: 24,
        num_colors: 0,
    }
}

/// Write a FLAC file with `count` embedded pictures of the given type
///
/// The first picture carries PNG-looking bytes; later ones are tagged as JPEG.
pub fn write_flac_with_picture(
    dir: &Path,
    name: &str,
    pic_type: PictureType,
    count: usize,
) -> PathBuf {
    let path = write_flac(dir, name, &[("TITLE", name)]);

    edit_flac(&path, |flac| {
        for i in 0..count {
            let (mime, data) = if i == 0 {
                (
                    MimeType::Png,
                    vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 1, 2, 3],
                )
            } else {
                (MimeType::Jpeg, vec![0xFF, 0xD8, 0xFF, 0xE0, i as u8])
            };
            let picture =
                Picture::new_unchecked(pic_type, Some(mime), Some(format!("junk {}", i)), data);
            flac.insert_picture(picture, Some(sample_picture_info()))
                .expect("Failed to insert fixture picture");
        }
    });

    path
}

/// Bytes of an untagged MP3 made of silent frames
pub fn bare_mp3_bytes() -> Vec<u8> {
    let mut bytes = Vec::with_capacity(MP3_FRAME_LEN * MP3_FRAME_COUNT);
    for _ in 0..MP3_FRAME_COUNT {
        bytes.extend_from_slice(&MP3_FRAME_HEADER);
        bytes.extend_from_slice(&[0; MP3_FRAME_LEN - 4]);
    }
    bytes
}

/// Write an MP3 file with an optional genre and the given comments
pub fn write_mp3(dir: &Path, name: &str, genre: Option<&str>, comments: &[&str]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, bare_mp3_bytes()).expect("Failed to write MP3 fixture");

    if genre.is_some() || !comments.is_empty() {
        edit_mp3(&path, |tag| {
            if let Some(genre) = genre {
                tag.set_genre(genre.to_string());
            }
            for comment in comments {
                tag.push(TagItem::new(
                    ItemKey::Comment,
                    ItemValue::Text(comment.to_string()),
                ));
            }
        });
    }

    path
}

/// Write an MP3 file with `count` embedded pictures
///
/// As with FLAC, the first picture is PNG and later ones are JPEG, each with
/// a distinct description.
pub fn write_mp3_with_pictures(dir: &Path, name: &str, count: usize) -> PathBuf {
    let path = write_mp3(dir, name, Some("Jazz"), &[]);

    edit_mp3(&path, |tag| {
        for i in 0..count {
            let (pic_type, mime, data) = if i == 0 {
                (
                    PictureType::Other,
                    MimeType::Png,
                    vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 1, 2, 3],
                )
            } else {
                (PictureType::Media, MimeType::Jpeg, vec![0xFF, 0xD8, 0xFF, 0xE0, i as u8])
            };
            tag.push_picture(Picture::new_unchecked(
                pic_type,
                Some(mime),
                Some(format!("junk {}", i)),
                data,
            ));
        }
    });

    path
}

/// Write a file that is not audio at all
pub fn write_text_file(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, "not audio").expect("Failed to write text fixture");
    path
}

fn edit_flac(path: &Path, edit: impl FnOnce(&mut FlacFile)) {
    let mut file = File::open(path).expect("Failed to open FLAC fixture");
    let mut flac =
        FlacFile::read_from(&mut file, ParseOptions::new()).expect("Failed to parse FLAC fixture");
    drop(file);

    edit(&mut flac);

    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .expect("Failed to reopen FLAC fixture");
    flac.save_to(&mut file).expect("Failed to save FLAC fixture");
}

fn edit_mp3(path: &Path, edit: impl FnOnce(&mut Tag)) {
    let tagged = Probe::open(path)
        .expect("Failed to open MP3 fixture")
        .read()
        .expect("Failed to parse MP3 fixture");
    let mut tag = tagged
        .primary_tag()
        .cloned()
        .unwrap_or_else(|| Tag::new(tagged.primary_tag_type()));

    edit(&mut tag);

    tag.save_to_path(path).expect("Failed to save MP3 fixture");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_bare_flac_has_streaminfo_and_padding() {
        let bytes = bare_flac_bytes();
        assert_eq!(&bytes[..4], b"fLaC");
        assert_eq!(bytes[4], 0x00);
        assert_eq!(bytes[4 + 4 + 34], 0x81);
        assert_eq!(bytes.len(), 4 + 4 + 34 + 4 + PADDING_LEN);
    }

    #[test]
    fn test_bare_flac_parses() {
        let dir = TempDir::new().unwrap();
        let path = write_flac(dir.path(), "bare.flac", &[]);
        let mut file = File::open(&path).unwrap();
        let flac = FlacFile::read_from(&mut file, ParseOptions::new()).unwrap();
        assert_eq!(flac.properties().sample_rate(), 44_100);
        assert_eq!(flac.properties().channels(), 2);
    }

    #[test]
    fn test_picture_fixture_has_pictures() {
        let dir = TempDir::new().unwrap();
        let path = write_flac_with_picture(dir.path(), "pic.flac", PictureType::Other, 3);
        let mut file = File::open(&path).unwrap();
        let flac = FlacFile::read_from(&mut file, ParseOptions::new()).unwrap();
        assert_eq!(flac.pictures().len(), 3);
    }

    #[test]
    fn test_bare_mp3_parses() {
        let dir = TempDir::new().unwrap();
        let path = write_mp3(dir.path(), "bare.mp3", None, &[]);
        let tagged = Probe::open(&path).unwrap().read().unwrap();
        assert_eq!(tagged.properties().sample_rate(), Some(44_100));
        assert!(tagged.primary_tag().is_none());
    }

    #[test]
    fn test_mp3_fixture_is_tagged() {
        let dir = TempDir::new().unwrap();
        let path = write_mp3(dir.path(), "tagged.mp3", Some("Funk"), &["hello"]);
        let tagged = Probe::open(&path).unwrap().read().unwrap();
        let tag = tagged.primary_tag().unwrap();
        assert_eq!(tag.genre().as_deref(), Some("Funk"));
        assert_eq!(tag.get_string(&ItemKey::Comment), Some("hello"));
    }
}
