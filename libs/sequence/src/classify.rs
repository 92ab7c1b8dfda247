//! Classification of a single pasted line

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use crate::item::Provider;

/// Kind of a media item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Image,
    Video,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ItemKind::Image => "image",
            ItemKind::Video => "video",
        })
    }
}

/// Result of classifying one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub kind: ItemKind,
    /// The line with any `video:`/`image:` prefix removed
    pub processed_url: String,
}

/// Decide whether a line denotes an image or a video.
///
/// An explicit `video:` or `image:` prefix (any case, optional whitespace
/// after the colon) wins. Otherwise YouTube links are videos and everything
/// else, Drive links included, is an image. Never fails.
pub fn classify_line(line: &str) -> Classified {
    let trimmed = line.trim();

    static PREFIX_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = PREFIX_REGEX.get_or_init(|| {
        Regex::new(r"(?i)^(video|image):\s*(.+)").expect("Failed to compile prefix regex")
    });

    if let Some(captures) = regex.captures(trimmed) {
        let kind = if captures[1].eq_ignore_ascii_case("video") {
            ItemKind::Video
        } else {
            ItemKind::Image
        };
        return Classified {
            kind,
            processed_url: captures[2].trim().to_string(),
        };
    }

    // Drive links carry no type signal, so they stay images unless prefixed
    let kind = match Provider::detect(trimmed) {
        Some(Provider::Youtube) => ItemKind::Video,
        Some(Provider::Drive) | None => ItemKind::Image,
    };

    Classified {
        kind,
        processed_url: trimmed.to_string(),
    }
}
