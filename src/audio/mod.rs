// Audio module - file detection, tag editing and track previews

pub mod detection;
pub mod preview;
pub mod tags;

pub use detection::is_audio_file;
pub use preview::{NoPreview, PlayerPreview, Previewer};
pub use tags::TrackTags;
