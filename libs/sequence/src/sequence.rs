//! Ordered media sequence
//!
//! `Sequence` is an immutable value: every edit returns a new sequence and
//! leaves the receiver as it was.

use serde::{Deserialize, Serialize};

use crate::{
    classify::{ItemKind, classify_line},
    error::{EditError, IngestError},
    extract::{drive_file_url, is_drive_id},
    ingest::{Ingested, ingest},
    item::{ItemField, MediaContent, MediaItem, Provider},
    order::{self, Direction, Positioned},
    repair::repair_item,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sequence {
    items: Vec<MediaItem>,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sequence from items already in display order
    pub fn from_items(items: Vec<MediaItem>) -> Self {
        Self {
            items: order::renumber(items),
        }
    }

    /// Parse pasted text into a new sequence, plus per-line warnings
    pub fn parse(text: &str, max_items: usize) -> Result<(Self, Ingested), IngestError> {
        let ingested = ingest(text, max_items)?;
        let sequence = Self::from_items(ingested.items.clone());
        Ok((sequence, ingested))
    }

    /// Build a sequence from persisted items.
    ///
    /// Items are ordered by their stored position, proxy-wrapped image URLs
    /// are unwrapped, and untagged videos receive their provider tag.
    pub fn from_stored(mut items: Vec<MediaItem>) -> Self {
        items.sort_by_key(|item| item.position);

        let items = items
            .into_iter()
            .map(repair_item)
            .map(|mut item| {
                if let MediaContent::Video(video) = &mut item.content {
                    video.provider = Some(video.provider());
                }
                item
            })
            .collect();

        Self::from_items(items)
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<MediaItem> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, position: u32) -> Option<&MediaItem> {
        self.items.iter().find(|item| item.position() == position)
    }

    /// Move the item at `from` to slot `to`
    pub fn move_to(&self, from: u32, to: u32) -> Result<Self, EditError> {
        Ok(Self {
            items: order::move_to(&self.items, from, to)?,
        })
    }

    /// Remove the item at `position`
    pub fn remove(&self, position: u32) -> Result<Self, EditError> {
        Ok(Self {
            items: order::remove(&self.items, position)?,
        })
    }

    /// Swap the item at `position` with its neighbour
    pub fn move_adjacent(&self, position: u32, direction: Direction) -> Result<Self, EditError> {
        Ok(Self {
            items: order::move_adjacent(&self.items, position, direction)?,
        })
    }

    /// Set an optional text field on one item
    pub fn edit(
        &self,
        position: u32,
        field: ItemField,
        value: impl Into<String>,
    ) -> Result<Self, EditError> {
        let value = value.into();
        let items = order::update(&self.items, position, |item| {
            let kind = item.kind();
            item.with_field(field, value)
                .ok_or(EditError::FieldNotApplicable { field, kind })
        })?;
        Ok(Self { items })
    }

    /// Items fit for persistence: those with an identifier, renumbered
    pub fn valid_items(&self) -> Vec<MediaItem> {
        order::renumber(
            self.items
                .iter()
                .filter(|item| item.is_valid())
                .cloned()
                .collect(),
        )
    }

    /// Reconstruct pasteable text that parses back into this sequence
    pub fn to_bulk_text(&self) -> String {
        self.items
            .iter()
            .map(|item| match &item.content {
                MediaContent::Image(image) => bulk_line(ItemKind::Image, &image.image_url),
                MediaContent::Video(video) => {
                    let pasted = video
                        .url
                        .as_deref()
                        .filter(|url| !url.trim().is_empty())
                        .unwrap_or(&video.video_id);
                    let url = match video.provider() {
                        Provider::Drive if is_drive_id(&video.video_id) => {
                            drive_file_url(&video.video_id)
                        }
                        Provider::Drive => pasted.to_string(),
                        Provider::Youtube if pasted.is_empty() || pasted == video.video_id => {
                            format!("https://youtube.com/watch?v={}", video.video_id)
                        }
                        Provider::Youtube => pasted.to_string(),
                    };
                    bulk_line(ItemKind::Video, &url)
                }
            })
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// One bulk text line for `url`, prefixed only when the bare URL would be
/// classified differently
fn bulk_line(kind: ItemKind, url: &str) -> String {
    let url = url.trim();
    if url.is_empty() {
        return String::new();
    }

    let unprefixed = classify_line(url);
    if unprefixed.kind == kind && unprefixed.processed_url == url {
        url.to_string()
    } else {
        format!("{kind}: {url}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ingest::MAX_ITEMS, order::is_contiguous, render::proxy_image_url};
    use serde_json::json;

    fn sample() -> Sequence {
        Sequence::from_items(
            ["A", "B", "C", "D", "E"]
                .iter()
                .map(|name| MediaItem::image(0, format!("https://example.com/{name}.png")))
                .collect(),
        )
    }

    fn names(sequence: &Sequence) -> String {
        sequence
            .items()
            .iter()
            .map(|item| {
                item.identifier()
                    .trim_start_matches("https://example.com/")
                    .trim_end_matches(".png")
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn test_move_e_to_second_slot() {
        let original = sample();
        let moved = original.move_to(5, 2).unwrap();

        assert_eq!(names(&moved), "AEBCD");
        assert!(is_contiguous(moved.items()));
        assert_eq!(names(&original), "ABCDE");
    }

    #[test]
    fn test_failed_edit_leaves_sequence_untouched() {
        let original = sample();
        assert!(original.move_to(1, 6).is_err());
        assert!(original.remove(9).is_err());
        assert_eq!(
            original.edit(1, ItemField::Title, "x"),
            Err(EditError::FieldNotApplicable {
                field: ItemField::Title,
                kind: ItemKind::Image,
            })
        );
        assert_eq!(original, sample());
    }

    #[test]
    fn test_edit_does_not_reorder() {
        let edited = sample().edit(3, ItemField::AltText, "Third").unwrap();
        assert_eq!(names(&edited), "ABCDE");
        assert_eq!(
            edited.get(3).unwrap().as_image().unwrap().alt_text.as_deref(),
            Some("Third")
        );
    }

    #[test]
    fn test_second_parse_replaces_first() {
        let (first, _) = Sequence::parse("https://example.com/1.png\nhttps://example.com/2.png", MAX_ITEMS)
            .unwrap();
        assert_eq!(first.len(), 2);

        let (second, _) = Sequence::parse("https://youtu.be/dQw4w9WgXcQ", MAX_ITEMS).unwrap();
        assert_eq!(second.len(), 1);
        assert!(
            second
                .items()
                .iter()
                .all(|item| !item.identifier().contains("example.com"))
        );
    }

    #[test]
    fn test_valid_items_drops_empty_and_renumbers() {
        let sequence = Sequence::from_items(vec![
            MediaItem::image(0, "https://example.com/a.png"),
            MediaItem::image(0, "  "),
            MediaItem::video(0, "", "https://youtube.com", Provider::Youtube),
            MediaItem::video(0, "dQw4w9WgXcQ", "https://youtu.be/dQw4w9WgXcQ", Provider::Youtube),
        ]);

        let valid = sequence.valid_items();
        assert_eq!(valid.len(), 2);
        assert!(is_contiguous(&valid));
    }

    #[test]
    fn test_from_stored_repairs_sorts_and_tags() {
        let stored: Vec<MediaItem> = serde_json::from_value(json!([
            {
                "position": 2,
                "type": "video",
                "video_id": "1AbCdEfGhIjKlMnOpQrStUvWx",
                "url": "video: https://drive.google.com/file/d/1AbCdEfGhIjKlMnOpQrStUvWx/view",
                "title": ""
            },
            {
                "position": 1,
                "type": "image",
                "image_url": proxy_image_url(&proxy_image_url("https://example.com/a.png")),
                "alt_text": ""
            }
        ]))
        .unwrap();

        let sequence = Sequence::from_stored(stored);
        assert_eq!(sequence.items()[0].identifier(), "https://example.com/a.png");
        assert_eq!(
            sequence.items()[1].as_video().unwrap().provider,
            Some(Provider::Drive)
        );
        assert!(is_contiguous(sequence.items()));
    }

    #[test]
    fn test_bulk_text_round_trip() {
        let text = "https://drive.google.com/uc?export=view&id=XYZ789\n\
                    video: https://drive.google.com/file/d/ABC123/view\n\
                    https://youtu.be/dQw4w9WgXcQ";
        let (sequence, _) = Sequence::parse(text, MAX_ITEMS).unwrap();

        assert_eq!(sequence.to_bulk_text(), text);
        let (reparsed, _) = Sequence::parse(&sequence.to_bulk_text(), MAX_ITEMS).unwrap();
        assert_eq!(reparsed, sequence);
    }

    #[test]
    fn test_bulk_text_keeps_explicit_image_prefix() {
        let text = "image: https://img.youtube.com/vi/dQw4w9WgXcQ/mqdefault.jpg";
        let (sequence, _) = Sequence::parse(text, MAX_ITEMS).unwrap();
        assert_eq!(sequence.items()[0].kind(), ItemKind::Image);

        assert_eq!(sequence.to_bulk_text(), text);
        let (reparsed, _) = Sequence::parse(&sequence.to_bulk_text(), MAX_ITEMS).unwrap();
        assert_eq!(reparsed, sequence);
    }

    #[test]
    fn test_bulk_text_keeps_unextracted_drive_video() {
        let text = "video: https://drive.google.com/drive/folders/abcDEF123";
        let (sequence, _) = Sequence::parse(text, MAX_ITEMS).unwrap();

        assert_eq!(sequence.to_bulk_text(), text);
        let (reparsed, _) = Sequence::parse(&sequence.to_bulk_text(), MAX_ITEMS).unwrap();
        assert_eq!(reparsed, sequence);
        assert_eq!(
            reparsed.items()[0].identifier(),
            "https://drive.google.com/drive/folders/abcDEF123"
        );
    }

    #[test]
    fn test_bulk_text_rebuilds_youtube_url_from_id() {
        let sequence = Sequence::from_items(vec![MediaItem {
            position: 1,
            content: MediaContent::Video(crate::item::VideoItem {
                video_id: "dQw4w9WgXcQ".to_string(),
                ..Default::default()
            }),
        }]);
        assert_eq!(
            sequence.to_bulk_text(),
            "https://youtube.com/watch?v=dQw4w9WgXcQ"
        );
    }
}
