//! HTTP clients for the external collaborators: Google Drive, the YouTube
//! Data API and the Resend mail API.

use axum::http::StatusCode;
use thiserror::Error;

pub mod drive;
pub mod mailer;
pub mod youtube;

pub use drive::DriveClient;
pub use mailer::{ContentReport, Mailer, PublishNotice};
pub use youtube::YoutubeClient;

/// Failure talking to a collaborator
#[derive(Error, Debug)]
pub enum ClientError {
    /// The API key for this collaborator is not configured
    #[error("{0}")]
    NotConfigured(String),

    /// The collaborator answered, but not with what was asked for
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Shared HTTP client with the service's user agent
pub fn http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("recursive-creator/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Pull `error.message` out of a Google API error body
fn google_error_message(body: &serde_json::Value) -> Option<String> {
    body.get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_google_error_message() {
        let body = json!({"error": {"code": 400, "message": "Invalid Value"}});
        assert_eq!(google_error_message(&body).as_deref(), Some("Invalid Value"));
        assert_eq!(google_error_message(&json!({})), None);
    }
}
