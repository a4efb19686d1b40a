use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn prefix(self) -> &'static str {
        match self {
            MediaKind::Image => "img",
            MediaKind::Video => "vid",
        }
    }
}

/// Extension lists used to classify directory entries.
///
/// Entries are stored lower-cased with a leading dot, so `classify` only has
/// to normalize the path side.
#[derive(Debug, Clone, Default)]
pub struct MediaExtensions {
    image: Vec<String>,
    video: Vec<String>,
}

impl MediaExtensions {
    pub fn new<S: AsRef<str>>(image: &[S], video: &[S]) -> Self {
        Self {
            image: image
                .iter()
                .filter_map(|v| normalize_extension(v.as_ref()))
                .collect(),
            video: video
                .iter()
                .filter_map(|v| normalize_extension(v.as_ref()))
                .collect(),
        }
    }

    pub fn classify(&self, path: &Path) -> Option<MediaKind> {
        let ext = dotted_extension(path)?;
        if self.image.contains(&ext) {
            Some(MediaKind::Image)
        } else if self.video.contains(&ext) {
            Some(MediaKind::Video)
        } else {
            None
        }
    }
}

/// `"JPG"`, `".jpg"` and `" .Jpg "` all become `".jpg"`.
pub fn normalize_extension(value: &str) -> Option<String> {
    let trimmed = value.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        return None;
    }
    Some(format!(".{}", trimmed.to_lowercase()))
}

/// Lower-cased extension of `path` including the leading dot.
pub fn dotted_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| normalize_extension(&ext.to_string_lossy()))
}

pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}
