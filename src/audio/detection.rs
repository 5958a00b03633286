use std::path::Path;

/// Check if a file is an audio file we can edit, based on its extension
pub fn is_audio_file(path: &Path) -> bool {
    if let Some(ext) = path.extension() {
        let ext = ext.to_string_lossy().to_lowercase();
        matches!(
            ext.as_str(),
            "flac" | "mp3" | "m4a" | "mp4" | "ogg" | "opus" | "aiff" | "aif"
        )
    } else {
        false
    }
}

/// Check if a file is a FLAC file based on its extension
pub fn is_flac_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("flac"))
        .unwrap_or(false)
}
