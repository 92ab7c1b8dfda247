//! Media item model
//!
//! The serialized shape matches the `items` array stored in a sequence
//! document: a flat object carrying `position`, a `type` tag and the
//! fields of its variant.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{classify::ItemKind, order::Positioned};

/// Host of a video item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Youtube,
    Drive,
}

impl Provider {
    /// Detect the provider named by a URL, YouTube first
    pub fn detect(url: &str) -> Option<Self> {
        if url.contains("youtube.com") || url.contains("youtu.be") {
            Some(Provider::Youtube)
        } else if url.contains("drive.google.com") {
            Some(Provider::Drive)
        } else {
            None
        }
    }

    /// Derive the provider of a stored item that predates the provider tag.
    ///
    /// Older documents relied on YouTube IDs being exactly 11 characters;
    /// anything else was rendered as a Drive file.
    pub fn from_legacy_id(video_id: &str) -> Self {
        if video_id.chars().count() == 11 {
            Provider::Youtube
        } else {
            Provider::Drive
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Youtube => "youtube",
            Provider::Drive => "drive",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Image variant fields
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageItem {
    /// Canonical direct-fetch URL, never proxy-wrapped
    #[serde(default)]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narration: Option<String>,
}

/// Video variant fields
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VideoItem {
    /// YouTube video ID or Drive file ID
    #[serde(default)]
    pub video_id: String,
    /// URL as originally pasted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Absent only on documents saved before the tag existed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<Provider>,
}

impl VideoItem {
    /// The item's provider, falling back to the legacy ID-length rule
    pub fn provider(&self) -> Provider {
        self.provider
            .unwrap_or_else(|| Provider::from_legacy_id(&self.video_id))
    }
}

/// Variant payload of a media item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MediaContent {
    Image(ImageItem),
    Video(VideoItem),
}

/// One entry of an ordered sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    /// 1-based, dense and unique within a sequence
    pub position: u32,
    #[serde(flatten)]
    pub content: MediaContent,
}

impl MediaItem {
    pub fn image(position: u32, image_url: impl Into<String>) -> Self {
        Self {
            position,
            content: MediaContent::Image(ImageItem {
                image_url: image_url.into(),
                alt_text: Some(String::new()),
                narration: Some(String::new()),
            }),
        }
    }

    pub fn video(
        position: u32,
        video_id: impl Into<String>,
        url: impl Into<String>,
        provider: Provider,
    ) -> Self {
        Self {
            position,
            content: MediaContent::Video(VideoItem {
                video_id: video_id.into(),
                url: Some(url.into()),
                title: Some(String::new()),
                provider: Some(provider),
            }),
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self.content {
            MediaContent::Image(_) => ItemKind::Image,
            MediaContent::Video(_) => ItemKind::Video,
        }
    }

    /// The type-appropriate identifier: image URL or video ID
    pub fn identifier(&self) -> &str {
        match &self.content {
            MediaContent::Image(image) => &image.image_url,
            MediaContent::Video(video) => &video.video_id,
        }
    }

    /// Whether the item carries enough content to be persisted
    pub fn is_valid(&self) -> bool {
        !self.identifier().trim().is_empty()
    }

    pub fn as_image(&self) -> Option<&ImageItem> {
        match &self.content {
            MediaContent::Image(image) => Some(image),
            MediaContent::Video(_) => None,
        }
    }

    pub fn as_video(&self) -> Option<&VideoItem> {
        match &self.content {
            MediaContent::Video(video) => Some(video),
            MediaContent::Image(_) => None,
        }
    }

    /// Replace one optional text field, keeping the position.
    pub fn with_field(mut self, field: ItemField, value: impl Into<String>) -> Option<Self> {
        let value = Some(value.into());
        match (&mut self.content, field) {
            (MediaContent::Image(image), ItemField::AltText) => image.alt_text = value,
            (MediaContent::Image(image), ItemField::Narration) => image.narration = value,
            (MediaContent::Video(video), ItemField::Title) => video.title = value,
            _ => return None,
        }
        Some(self)
    }
}

impl Positioned for MediaItem {
    fn position(&self) -> u32 {
        self.position
    }

    fn set_position(&mut self, position: u32) {
        self.position = position;
    }
}

/// Optional text field editable on an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemField {
    AltText,
    Narration,
    Title,
}

impl fmt::Display for ItemField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ItemField::AltText => "alt_text",
            ItemField::Narration => "narration",
            ItemField::Title => "title",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_image_item_serializes_flat() {
        let item = MediaItem::image(1, "https://example.com/a.jpg");
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(
            value,
            json!({
                "position": 1,
                "type": "image",
                "image_url": "https://example.com/a.jpg",
                "alt_text": "",
                "narration": ""
            })
        );
    }

    #[test]
    fn test_legacy_video_without_provider_deserializes() {
        let item: MediaItem = serde_json::from_value(json!({
            "position": 2,
            "type": "video",
            "video_id": "dQw4w9WgXcQ",
            "url": "https://youtube.com/watch?v=dQw4w9WgXcQ",
            "title": ""
        }))
        .unwrap();

        let video = item.as_video().unwrap();
        assert_eq!(video.provider, None);
        assert_eq!(video.provider(), Provider::Youtube);
    }

    #[test]
    fn test_legacy_id_rule() {
        assert_eq!(Provider::from_legacy_id("dQw4w9WgXcQ"), Provider::Youtube);
        assert_eq!(
            Provider::from_legacy_id("1AbCdEfGhIjKlMnOpQrStUvWxYz"),
            Provider::Drive
        );
        assert_eq!(Provider::from_legacy_id("short"), Provider::Drive);
    }

    #[test]
    fn test_explicit_provider_wins_over_id_length() {
        let item = MediaItem::video(1, "ABCDEFGHIJK", "video: x", Provider::Drive);
        assert_eq!(item.as_video().unwrap().provider(), Provider::Drive);
    }

    #[test]
    fn test_with_field_rejects_wrong_variant() {
        let image = MediaItem::image(1, "https://example.com/a.jpg");
        assert!(image.clone().with_field(ItemField::Title, "x").is_none());

        let edited = image.with_field(ItemField::Narration, "Once upon a time").unwrap();
        assert_eq!(
            edited.as_image().unwrap().narration.as_deref(),
            Some("Once upon a time")
        );
    }

    #[test]
    fn test_validity_ignores_whitespace() {
        assert!(!MediaItem::image(1, "   ").is_valid());
        assert!(MediaItem::image(1, "x").is_valid());
    }
}
