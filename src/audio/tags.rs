//! Tag reading and writing for audio files
//!
//! Every tool edits tags through [`TrackTags`]. FLAC files are opened with the
//! FLAC-specific reader so picture blocks keep their width/height/depth
//! information across a rewrite; every other container goes through the
//! generic probe and is edited via its primary tag.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::time::Duration;

use lofty::flac::FlacFile;
use lofty::ogg::{OggPictureStorage, VorbisComments};
use lofty::{
    Accessor, AudioFile, ItemKey, ItemValue, ParseOptions, Picture, PictureInformation,
    PictureType, Probe, Tag, TagExt, TagItem, TaggedFile, TaggedFileExt,
};

use super::detection::is_flac_file;

const GENRE_KEY: &str = "GENRE";
const COMMENT_KEY: &str = "COMMENT";

/// Description written on a re-embedded front cover
pub const COVER_DESCRIPTION: &str = "Cover";

/// An embedded picture, with its FLAC block information when the file is FLAC
#[derive(Debug, Clone)]
pub struct EmbeddedPicture {
    pub picture: Picture,
    pub info: Option<PictureInformation>,
}

/// The tags of one opened audio file
pub enum TrackTags {
    Flac(FlacFile),
    Tagged(TaggedFile),
}

impl TrackTags {
    /// Read the tags of an audio file
    pub fn open(path: &Path) -> Result<Self, String> {
        if is_flac_file(path) {
            let mut file = File::open(path).map_err(|e| format!("Failed to open file: {}", e))?;
            let flac = FlacFile::read_from(&mut file, ParseOptions::new())
                .map_err(|e| format!("Failed to read FLAC file: {}", e))?;
            Ok(Self::Flac(flac))
        } else {
            let tagged_file = Probe::open(path)
                .map_err(|e| format!("Failed to open file: {}", e))?
                .read()
                .map_err(|e| format!("Failed to read file: {}", e))?;
            Ok(Self::Tagged(tagged_file))
        }
    }

    /// First GENRE value, if any
    pub fn genre(&self) -> Option<String> {
        match self {
            Self::Flac(flac) => flac
                .vorbis_comments()
                .and_then(|comments| comments.get(GENRE_KEY))
                .map(str::to_string),
            Self::Tagged(file) => {
                let primary = file
                    .primary_tag()
                    .and_then(|tag| tag.genre().map(|genre| genre.into_owned()));
                primary.or_else(|| {
                    file.tags()
                        .iter()
                        .find_map(|tag| tag.genre().map(|genre| genre.into_owned()))
                })
            }
        }
    }

    /// Replace every GENRE value with `genre`
    pub fn set_genre(&mut self, genre: &str) -> Result<(), String> {
        match self {
            Self::Flac(flac) => {
                vorbis_comments_mut(flac)?.insert(GENRE_KEY.to_string(), genre.to_string());
            }
            Self::Tagged(file) => {
                primary_tag_mut(file)?.set_genre(genre.to_string());
            }
        }
        Ok(())
    }

    /// Every COMMENT value, in file order
    pub fn comments(&self) -> Vec<String> {
        match self {
            Self::Flac(flac) => flac
                .vorbis_comments()
                .map(|comments| comments.get_all(COMMENT_KEY).map(str::to_string).collect())
                .unwrap_or_default(),
            Self::Tagged(file) => file
                .primary_tag()
                .or_else(|| file.first_tag())
                .map(|tag| {
                    tag.get_strings(&ItemKey::Comment)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    /// Replace every COMMENT value with `comments`
    pub fn set_comments(&mut self, comments: Vec<String>) -> Result<(), String> {
        match self {
            Self::Flac(flac) => {
                let vorbis = vorbis_comments_mut(flac)?;
                vorbis.remove(COMMENT_KEY).for_each(drop);
                for comment in comments {
                    vorbis.push(COMMENT_KEY.to_string(), comment);
                }
            }
            Self::Tagged(file) => {
                let tag = primary_tag_mut(file)?;
                tag.remove_key(&ItemKey::Comment);
                for comment in comments {
                    tag.push(TagItem::new(ItemKey::Comment, ItemValue::Text(comment)));
                }
            }
        }
        Ok(())
    }

    pub fn pictures_len(&self) -> usize {
        match self {
            Self::Flac(flac) => flac.pictures().len(),
            Self::Tagged(file) => file
                .primary_tag()
                .or_else(|| file.first_tag())
                .map(|tag| tag.pictures().len())
                .unwrap_or(0),
        }
    }

    pub fn first_picture(&self) -> Option<EmbeddedPicture> {
        match self {
            Self::Flac(flac) => flac.pictures().first().map(|(picture, info)| EmbeddedPicture {
                picture: picture.clone(),
                info: Some(*info),
            }),
            Self::Tagged(file) => file
                .primary_tag()
                .or_else(|| file.first_tag())
                .and_then(|tag| tag.pictures().first())
                .map(|picture| EmbeddedPicture {
                    picture: picture.clone(),
                    info: None,
                }),
        }
    }

    /// Replace all embedded pictures with a clean copy of the first one
    ///
    /// The copy is typed as the front cover and described as "Cover"; data,
    /// MIME type and (for FLAC) picture information are carried over.
    /// Returns false when the file has no picture to start from.
    pub fn reembed_front_cover(&mut self) -> Result<bool, String> {
        let Some(first) = self.first_picture() else {
            return Ok(false);
        };

        let cover = Picture::new_unchecked(
            PictureType::CoverFront,
            first.picture.mime_type().cloned(),
            Some(COVER_DESCRIPTION.to_string()),
            first.picture.data().to_vec(),
        );

        match self {
            Self::Flac(flac) => {
                flac.remove_pictures();
                flac.insert_picture(cover, first.info)
                    .map_err(|e| format!("Failed to embed picture: {}", e))?;
            }
            Self::Tagged(file) => {
                let tag = primary_tag_mut(file)?;
                while !tag.pictures().is_empty() {
                    tag.remove_picture(0);
                }
                tag.push_picture(cover);
            }
        }
        Ok(true)
    }

    /// Length of the audio stream
    pub fn duration(&self) -> Duration {
        match self {
            Self::Flac(flac) => flac.properties().duration(),
            Self::Tagged(file) => file.properties().duration(),
        }
    }

    /// Write the edited tags back to `path`
    pub fn save(&self, path: &Path) -> Result<(), String> {
        match self {
            Self::Flac(flac) => {
                let mut file = OpenOptions::new()
                    .read(true)
                    .write(true)
                    .open(path)
                    .map_err(|e| format!("Failed to open file for writing: {}", e))?;
                flac.save_to(&mut file)
                    .map_err(|e| format!("Failed to save file: {}", e))
            }
            Self::Tagged(file) => match file.primary_tag() {
                Some(tag) => tag
                    .save_to_path(path)
                    .map_err(|e| format!("Failed to save file: {}", e)),
                None => Ok(()),
            },
        }
    }
}

/// Get the Vorbis comments of a FLAC file, creating an empty block if missing
fn vorbis_comments_mut(flac: &mut FlacFile) -> Result<&mut VorbisComments, String> {
    if flac.vorbis_comments().is_none() {
        flac.set_vorbis_comments(VorbisComments::default());
    }
    flac.vorbis_comments_mut()
        .ok_or_else(|| "Failed to create Vorbis comments".to_string())
}

/// Get or create the primary tag
fn primary_tag_mut(tagged_file: &mut TaggedFile) -> Result<&mut Tag, String> {
    if tagged_file.primary_tag().is_none() {
        let tag_type = tagged_file.primary_tag_type();
        tagged_file.insert_tag(Tag::new(tag_type));
    }
    tagged_file
        .primary_tag_mut()
        .ok_or_else(|| "Failed to create tag".to_string())
}

/// Read just the stream duration of an audio file
pub fn probe_duration(path: &Path) -> Result<Duration, String> {
    TrackTags::open(path).map(|tags| tags.duration())
}

/// Set the GENRE of a file on disk, returning the value it replaced
pub fn write_genre(path: &Path, genre: &str) -> Result<Option<String>, String> {
    let mut tags = TrackTags::open(path)?;
    let previous = tags.genre();
    tags.set_genre(genre)?;
    tags.save(path)?;
    Ok(previous)
}
