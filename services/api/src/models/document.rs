//! Stored documents and their API views

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use sequence::{EditSession, MediaItem, PublishStatus, ToolKind};

/// A `user_documents` row
#[derive(Debug, Clone)]
pub struct DocumentRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub tool_slug: String,
    pub story_slug: String,
    pub document_data: serde_json::Value,
    pub is_public: bool,
    /// Set once a viewer has reported the document
    pub reported: bool,
    /// Owner's address at creation time, used for report mail
    pub creator_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DocumentRecord {
    pub fn title(&self) -> &str {
        self.document_data
            .get("title")
            .and_then(|title| title.as_str())
            .unwrap_or_default()
    }

    pub fn status(&self) -> PublishStatus {
        PublishStatus::from_data(self.is_public, &self.document_data)
    }
}

/// One row of the dashboard listing
#[derive(Debug, Serialize)]
pub struct DashboardEntry {
    pub id: Uuid,
    pub tool: Option<ToolKind>,
    pub title: String,
    pub status: PublishStatus,
    /// Present once the document is published
    pub public_url: Option<String>,
    pub reported: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DashboardEntry {
    pub fn from_record(record: &DocumentRecord, public_url: impl Fn(Uuid) -> String) -> Self {
        let status = record.status();
        Self {
            id: record.id,
            tool: ToolKind::from_tool_slug(&record.tool_slug),
            title: record.title().to_string(),
            status,
            public_url: (status == PublishStatus::Published).then(|| public_url(record.id)),
            reported: record.reported,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// A sequence loaded into the editor
#[derive(Debug, Serialize)]
pub struct SequenceView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub items: Vec<MediaItem>,
    /// Pasteable text that parses back into `items`
    pub bulk_text: String,
    pub status: PublishStatus,
    pub updated_at: DateTime<Utc>,
}

impl SequenceView {
    pub fn new(record: &DocumentRecord, session: &EditSession) -> Self {
        Self {
            id: record.id,
            title: session.title.clone(),
            description: session.description.clone(),
            items: session.sequence().items().to_vec(),
            bulk_text: session.bulk_text().to_string(),
            status: record.status(),
            updated_at: record.updated_at,
        }
    }
}

/// A story or playlist loaded into its editor
#[derive(Debug, Serialize)]
pub struct DocumentView<T> {
    pub id: Uuid,
    pub status: PublishStatus,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub data: T,
}

impl<T> DocumentView<T> {
    pub fn new(record: &DocumentRecord, data: T) -> Self {
        Self {
            id: record.id,
            status: record.status(),
            updated_at: record.updated_at,
            data,
        }
    }
}
