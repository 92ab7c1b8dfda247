//! API models for request and response payloads

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sequence::{LineWarning, MediaItem};

use crate::error::ApiError;

pub mod document;

/// Shortest explanation accepted when a viewer unpublishes a document
pub const MIN_UNPUBLISH_EXPLANATION: usize = 50;

/// Bulk text to parse into a sequence preview
#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    #[serde(default)]
    pub bulk_text: String,
}

#[derive(Debug, Serialize)]
pub struct ParseResponse {
    pub items: Vec<MediaItem>,
    pub warnings: Vec<LineWarning>,
}

/// A sequence as held by the editor when saving
#[derive(Debug, Deserialize)]
pub struct SequenceDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub items: Vec<MediaItem>,
}

/// Filter for the dashboard listing
#[derive(Debug, Deserialize)]
pub struct DocumentQuery {
    /// Tool slug: `sequence`, `story` or `playlist`
    pub tool: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportFolderRequest {
    #[serde(default)]
    pub folder_url: String,
}

#[derive(Debug, Serialize)]
pub struct ImportFolderResponse {
    pub urls: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractPlaylistRequest {
    #[serde(default)]
    pub playlist_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractPlaylistResponse {
    pub videos: Vec<crate::clients::youtube::ExtractedVideo>,
    pub count: usize,
    pub playlist_title: String,
}

#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
    pub url: Option<String>,
}

/// Identifier of a newly created document
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: Uuid,
    pub story_slug: String,
}

/// What a viewer asks for when reporting a document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    /// Take the document private right away
    Unpublish,
    /// Only alert the admin and the creator
    #[default]
    #[serde(other)]
    Notify,
}

impl ReportKind {
    pub fn acknowledgement(&self) -> &'static str {
        match self {
            ReportKind::Unpublish => {
                "Content has been unpublished and reported. Thank you for keeping our community safe."
            }
            ReportKind::Notify => "Report submitted. We will review this content. Thank you.",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    #[serde(default)]
    pub document_id: Option<Uuid>,
    #[serde(default)]
    pub report_type: ReportKind,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub viewer_url: Option<String>,
}

impl ReportRequest {
    /// The reported document's ID, once the request is acceptable
    pub fn validate(&self) -> Result<Uuid, ApiError> {
        let document_id = self
            .document_id
            .ok_or_else(|| ApiError::BadRequest("Document ID is required".to_string()))?;

        let explained = self
            .explanation
            .as_deref()
            .map_or(0, |text| text.trim().chars().count());
        if self.report_type == ReportKind::Unpublish && explained < MIN_UNPUBLISH_EXPLANATION {
            return Err(ApiError::BadRequest(format!(
                "Explanation must be at least {MIN_UNPUBLISH_EXPLANATION} characters when unpublishing"
            )));
        }

        Ok(document_id)
    }
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub success: bool,
    pub message: &'static str,
}
