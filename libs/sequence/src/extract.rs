//! Identifier extraction for YouTube and Google Drive links
//!
//! The item extractors are tolerant: when no known form matches they hand
//! back the input unchanged, and the caller decides what that means.

use regex::Regex;
use std::sync::OnceLock;

/// Direct-view form served for Drive images
pub const DRIVE_VIEW_BASE: &str = "https://drive.google.com/uc?export=view&id=";

fn youtube_patterns() -> &'static [Regex; 2] {
    static PATTERNS: OnceLock<[Regex; 2]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([^&\n?#]+)")
                .expect("Failed to compile YouTube URL regex"),
            Regex::new(r"^([a-zA-Z0-9_-]{11})$").expect("Failed to compile YouTube ID regex"),
        ]
    })
}

fn drive_patterns() -> &'static [Regex; 2] {
    static PATTERNS: OnceLock<[Regex; 2]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(r"drive\.google\.com/file/d/([^/]+)")
                .expect("Failed to compile Drive file regex"),
            Regex::new(r"drive\.google\.com/open\?id=([^&]+)")
                .expect("Failed to compile Drive open regex"),
        ]
    })
}

fn first_capture<'a>(patterns: &[Regex], input: &'a str) -> Option<&'a str> {
    patterns.iter().find_map(|pattern| {
        pattern
            .captures(input)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str())
    })
}

/// Extract a YouTube video ID from a watch, short or embed link, or accept
/// a bare 11-character ID. Returns the input unchanged when nothing matches.
pub fn extract_youtube_id(url: &str) -> String {
    first_capture(youtube_patterns(), url)
        .unwrap_or(url)
        .to_string()
}

/// Whether a string has the shape of a YouTube video ID
pub fn is_youtube_id(candidate: &str) -> bool {
    youtube_patterns()[1].is_match(candidate)
}

/// The Drive file ID of a `/file/d/<id>` or `open?id=<id>` link, if any
pub fn drive_file_id(url: &str) -> Option<&str> {
    first_capture(drive_patterns(), url)
}

/// Extract a Drive file ID, returning the input unchanged when no known
/// form matches.
pub fn extract_drive_file_id(url: &str) -> String {
    drive_file_id(url).unwrap_or(url).to_string()
}

/// Rewrite a Drive file link into its direct-view form for images. Other
/// URLs, including ones already in direct-view form, pass through.
pub fn drive_image_url(url: &str) -> String {
    match drive_file_id(url) {
        Some(id) => format!("{DRIVE_VIEW_BASE}{id}"),
        None => url.to_string(),
    }
}

/// Whether a string has the shape of a bare Drive file or folder ID
pub fn is_drive_id(candidate: &str) -> bool {
    static BARE_REGEX: OnceLock<Regex> = OnceLock::new();
    BARE_REGEX
        .get_or_init(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("Failed to compile Drive ID regex"))
        .is_match(candidate)
}

/// Shareable Drive link for a file, as written back into bulk text
pub fn drive_file_url(file_id: &str) -> String {
    format!("https://drive.google.com/file/d/{file_id}/view")
}

/// Folder ID of a shared Drive folder link, or a bare folder ID
pub fn drive_folder_id(url: &str) -> Option<String> {
    static FOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

    let url = url.trim();
    let folder = FOLDER_REGEX.get_or_init(|| {
        Regex::new(r"/folders/([a-zA-Z0-9_-]+)").expect("Failed to compile Drive folder regex")
    });
    if let Some(captures) = folder.captures(url) {
        return Some(captures[1].to_string());
    }

    is_drive_id(url).then(|| url.to_string())
}

/// Playlist ID of a YouTube playlist link, or a bare `PL…` ID
pub fn youtube_playlist_id(url: &str) -> Option<String> {
    static LIST_REGEX: OnceLock<Regex> = OnceLock::new();
    static BARE_REGEX: OnceLock<Regex> = OnceLock::new();

    let url = url.trim();
    let list = LIST_REGEX
        .get_or_init(|| Regex::new(r"[?&]list=([^&]+)").expect("Failed to compile playlist regex"));
    if let Some(captures) = list.captures(url) {
        return Some(captures[1].to_string());
    }

    let bare = BARE_REGEX.get_or_init(|| {
        Regex::new(r"^PL[a-zA-Z0-9_-]+$").expect("Failed to compile playlist ID regex")
    });
    bare.is_match(url).then(|| url.to_string())
}
