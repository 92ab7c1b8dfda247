//! Bulk ingestion of pasted text
//!
//! A paste is split on newlines and commas, checked against the item
//! ceiling, and turned into a fresh list. The result always replaces the
//! previous list; nothing is merged.

use serde::Serialize;
use tracing::debug;

use crate::{
    classify::{ItemKind, classify_line},
    error::IngestError,
    extract::{
        drive_file_id, drive_image_url, extract_drive_file_id, extract_youtube_id, is_youtube_id,
    },
    item::{MediaItem, Provider},
    order::renumber,
};

/// Ceiling on the number of items in one list
pub const MAX_ITEMS: usize = 50;

/// Why a line produced a warning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningReason {
    /// Classified as video but hosted by neither YouTube nor Drive; dropped
    UnknownVideoHost,
    /// A YouTube or Drive link whose video ID could not be found; kept as pasted
    UnrecognizedVideoId,
}

/// A per-line diagnostic from ingestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineWarning {
    /// 1-based index of the line among the non-blank lines
    pub line: usize,
    pub text: String,
    pub reason: WarningReason,
}

/// Output of a successful ingestion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ingested {
    pub items: Vec<MediaItem>,
    pub warnings: Vec<LineWarning>,
}

/// Split pasted text into non-blank, trimmed lines
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split(['\n', ','])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Parse a block of pasted text into a new item list.
///
/// Blank input yields an empty list, which is how a list is cleared. More
/// than `max_items` lines is rejected as a whole.
pub fn ingest(text: &str, max_items: usize) -> Result<Ingested, IngestError> {
    if text.trim().is_empty() {
        return Ok(Ingested::default());
    }

    let lines = split_lines(text);
    if lines.len() > max_items {
        return Err(IngestError::TooManyItems {
            max: max_items,
            found: lines.len(),
        });
    }

    let mut ingested = Ingested::default();

    for (index, line) in lines.iter().enumerate() {
        let line_number = index + 1;
        let classified = classify_line(line);
        let url = classified.processed_url;

        let item = match classified.kind {
            ItemKind::Image => MediaItem::image(0, drive_image_url(&url)),
            ItemKind::Video => match Provider::detect(&url) {
                Some(Provider::Youtube) => {
                    let video_id = extract_youtube_id(&url);
                    if !is_youtube_id(&video_id) {
                        ingested.warnings.push(LineWarning {
                            line: line_number,
                            text: line.to_string(),
                            reason: WarningReason::UnrecognizedVideoId,
                        });
                    }
                    MediaItem::video(0, video_id, url, Provider::Youtube)
                }
                Some(Provider::Drive) => {
                    if drive_file_id(&url).is_none() {
                        ingested.warnings.push(LineWarning {
                            line: line_number,
                            text: line.to_string(),
                            reason: WarningReason::UnrecognizedVideoId,
                        });
                    }
                    let file_id = extract_drive_file_id(&url);
                    MediaItem::video(0, file_id, url, Provider::Drive)
                }
                None => {
                    debug!("Skipping video line with unknown host: {}", url);
                    ingested.warnings.push(LineWarning {
                        line: line_number,
                        text: line.to_string(),
                        reason: WarningReason::UnknownVideoHost,
                    });
                    continue;
                }
            },
        };

        ingested.items.push(item);
    }

    ingested.items = renumber(ingested.items);
    Ok(ingested)
}
