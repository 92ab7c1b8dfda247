//! Stored document shapes
//!
//! Every creation lives in one `user_documents` row whose `document_data`
//! JSON holds one of the shapes below. Sequence flags are stored as the
//! strings `"true"`/`"false"`; both strings and booleans are accepted back.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{fmt, sync::OnceLock};
use uuid::Uuid;

use crate::{item::MediaItem, playlist::PlaylistVideo, story::Page};

/// Tool that produced a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Sequence,
    Story,
    Playlist,
}

impl ToolKind {
    pub fn document_type(&self) -> &'static str {
        match self {
            ToolKind::Sequence => "creative_work",
            ToolKind::Story => "story",
            ToolKind::Playlist => "playlist",
        }
    }

    pub fn tool_slug(&self) -> &'static str {
        match self {
            ToolKind::Sequence => "sequence",
            ToolKind::Story => "story",
            ToolKind::Playlist => "playlist",
        }
    }

    pub fn from_tool_slug(slug: &str) -> Option<Self> {
        match slug {
            "sequence" => Some(ToolKind::Sequence),
            "story" => Some(ToolKind::Story),
            "playlist" => Some(ToolKind::Playlist),
            _ => None,
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tool_slug())
    }
}

/// Booleans persisted as `"true"` / `"false"`
pub mod string_bool {
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "true" } else { "false" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Flag {
            Bool(bool),
            Text(String),
        }

        match Flag::deserialize(deserializer)? {
            Flag::Bool(value) => Ok(value),
            Flag::Text(text) => match text.as_str() {
                "true" => Ok(true),
                "false" | "" => Ok(false),
                other => Err(de::Error::custom(format!("invalid flag value: {other}"))),
            },
        }
    }
}

/// Data of a sequence document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceDocument {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, with = "string_bool")]
    pub is_active: bool,
    #[serde(default, with = "string_bool")]
    pub reviewed: bool,
    pub creator_id: Uuid,
    #[serde(default)]
    pub items: Vec<MediaItem>,
}

/// Data of a story document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryDocument {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default = "default_author")]
    pub author: String,
    #[serde(default, with = "string_bool")]
    pub is_active: bool,
    #[serde(default, with = "string_bool")]
    pub reviewed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<Uuid>,
    #[serde(default)]
    pub pages: Vec<Page>,
}

/// Data of a playlist document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistDocument {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default, with = "string_bool")]
    pub is_active: bool,
    #[serde(default, with = "string_bool")]
    pub reviewed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<Uuid>,
    #[serde(default)]
    pub videos: Vec<PlaylistVideo>,
}

pub const DEFAULT_AUTHOR: &str = "Anonymous";
pub const DEFAULT_CATEGORY: &str = "General";

fn default_author() -> String {
    DEFAULT_AUTHOR.to_string()
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// Kebab-cased title suffixed with a creation timestamp in milliseconds
pub fn slugify(title: &str, timestamp_ms: i64) -> String {
    static NON_ALNUM: OnceLock<Regex> = OnceLock::new();
    let non_alnum = NON_ALNUM
        .get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("Failed to compile slug regex"));

    let lowered = title.to_lowercase();
    let kebab = non_alnum.replace_all(&lowered, "-");
    format!("{}-{timestamp_ms}", kebab.trim_matches('-'))
}

/// Dashboard publish state of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishStatus {
    Published,
    Reviewed,
    Pending,
}

impl PublishStatus {
    pub fn of(is_public: bool, reviewed: bool) -> Self {
        if is_public {
            PublishStatus::Published
        } else if reviewed {
            PublishStatus::Reviewed
        } else {
            PublishStatus::Pending
        }
    }

    /// Read the status out of raw document data
    pub fn from_data(is_public: bool, data: &serde_json::Value) -> Self {
        let reviewed = match data.get("reviewed") {
            Some(serde_json::Value::Bool(value)) => *value,
            Some(serde_json::Value::String(value)) => value == "true",
            _ => false,
        };
        Self::of(is_public, reviewed)
    }
}
