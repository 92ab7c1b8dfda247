//! Google Drive folder listing

use axum::http::StatusCode;
use serde::Deserialize;
use tracing::{error, info};

use sequence::extract::{DRIVE_VIEW_BASE, drive_file_url};

use super::{ClientError, google_error_message};

const FILES_ENDPOINT: &str = "https://www.googleapis.com/drive/v3/files";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    #[serde(default)]
    pub mime_type: String,
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

/// Turn folder entries into pasteable lines: images in direct-view form,
/// videos with the `video:` marker. Other files are skipped.
pub fn media_lines(files: &[DriveFile]) -> Vec<String> {
    files
        .iter()
        .filter_map(|file| {
            if file.mime_type.starts_with("video/") {
                Some(format!("video: {}", drive_file_url(&file.id)))
            } else if file.mime_type.starts_with("image/") {
                Some(format!("{DRIVE_VIEW_BASE}{}", file.id))
            } else {
                None
            }
        })
        .collect()
}

#[derive(Clone)]
pub struct DriveClient {
    http: reqwest::Client,
    api_key: Option<String>,
}

impl DriveClient {
    pub fn new(http: reqwest::Client, api_key: Option<String>) -> Self {
        Self { http, api_key }
    }

    /// List a publicly shared folder and return one line per image or video
    pub async fn folder_media_lines(&self, folder_id: &str) -> Result<Vec<String>, ClientError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ClientError::NotConfigured(
                "Google Drive API key not configured. Please add CREATOR_GOOGLE_DRIVE_API_KEY to the environment."
                    .to_string(),
            )
        })?;

        let query = format!("'{folder_id}' in parents");
        let response = self
            .http
            .get(FILES_ENDPOINT)
            .query(&[
                ("q", query.as_str()),
                ("fields", "files(id,mimeType)"),
                ("key", api_key),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body: serde_json::Value = response.json().await.unwrap_or_default();
            error!("Drive API error for folder {}: {}", folder_id, body);
            return Err(rejection(status, &body));
        }

        let list: FileList = response.json().await?;
        let lines = media_lines(&list.files);
        if lines.is_empty() {
            return Err(ClientError::Rejected {
                status: StatusCode::NOT_FOUND,
                message: "No images or videos found in this folder.".to_string(),
            });
        }

        info!(
            "Imported {} media files from Drive folder {}",
            lines.len(),
            folder_id
        );
        Ok(lines)
    }
}

fn rejection(status: StatusCode, body: &serde_json::Value) -> ClientError {
    let message = match status {
        StatusCode::NOT_FOUND => "Folder not found. Make sure the folder is shared publicly (\"Anyone with link can view\").".to_string(),
        StatusCode::FORBIDDEN => {
            "Access denied. The folder must be set to \"Anyone with link can view\".".to_string()
        }
        _ => format!(
            "Drive API error: {}",
            google_error_message(body).unwrap_or_else(|| "Unknown error".to_string())
        ),
    };
    ClientError::Rejected { status, message }
}
