//! YouTube playlist extraction

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use sequence::PlaylistVideo;

use super::{ClientError, google_error_message};

const PLAYLIST_ITEMS_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/playlistItems";
const MAX_RESULTS: &str = "50";
const DEFAULT_PLAYLIST_TITLE: &str = "YouTube Playlist";

/// One video of an extracted playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedVideo {
    pub video_id: String,
    pub title: String,
    pub url: String,
    pub thumbnail: String,
}

impl From<ExtractedVideo> for PlaylistVideo {
    fn from(video: ExtractedVideo) -> Self {
        PlaylistVideo::new(video.video_id, video.url, video.title)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPlaylist {
    pub title: String,
    pub videos: Vec<ExtractedVideo>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItems {
    #[serde(default)]
    items: Vec<PlaylistItem>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    channel_title: Option<String>,
    resource_id: ResourceId,
    #[serde(default)]
    thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    #[serde(default)]
    video_id: String,
}

#[derive(Debug, Deserialize)]
struct Thumbnails {
    #[serde(default)]
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

fn into_playlist(response: PlaylistItems) -> Option<ExtractedPlaylist> {
    let title = response
        .items
        .first()?
        .snippet
        .channel_title
        .clone()
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| DEFAULT_PLAYLIST_TITLE.to_string());

    let videos = response
        .items
        .into_iter()
        .map(|item| {
            let snippet = item.snippet;
            let video_id = snippet.resource_id.video_id;
            ExtractedVideo {
                url: format!("https://youtube.com/watch?v={video_id}"),
                thumbnail: snippet
                    .thumbnails
                    .and_then(|thumbnails| thumbnails.default)
                    .map(|thumbnail| thumbnail.url)
                    .unwrap_or_default(),
                title: snippet.title,
                video_id,
            }
        })
        .collect();

    Some(ExtractedPlaylist { title, videos })
}

#[derive(Clone)]
pub struct YoutubeClient {
    http: reqwest::Client,
    api_key: Option<String>,
}

impl YoutubeClient {
    pub fn new(http: reqwest::Client, api_key: Option<String>) -> Self {
        Self { http, api_key }
    }

    /// Fetch the first page (up to 50 videos) of a public playlist
    pub async fn playlist(&self, playlist_id: &str) -> Result<ExtractedPlaylist, ClientError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ClientError::NotConfigured("YouTube API not configured. Please contact support.".to_string())
        })?;

        let response = self
            .http
            .get(PLAYLIST_ITEMS_ENDPOINT)
            .query(&[
                ("part", "snippet"),
                ("maxResults", MAX_RESULTS),
                ("playlistId", playlist_id),
                ("key", api_key),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body: serde_json::Value = response.json().await.unwrap_or_default();
            error!(
                "YouTube API error for playlist {}: {}",
                playlist_id,
                google_error_message(&body).unwrap_or_default()
            );
            let message = if status == StatusCode::FORBIDDEN {
                "API quota exceeded or playlist is private. Please try again later."
            } else {
                "Failed to fetch playlist from YouTube. Please check if the playlist is public."
            };
            return Err(ClientError::Rejected {
                status,
                message: message.to_string(),
            });
        }

        let items: PlaylistItems = response.json().await?;
        let playlist = into_playlist(items).ok_or_else(|| ClientError::Rejected {
            status: StatusCode::NOT_FOUND,
            message: "Playlist is empty or not found.".to_string(),
        })?;

        info!(
            "Extracted {} videos from playlist {}",
            playlist.videos.len(),
            playlist_id
        );
        Ok(playlist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_into_playlist() {
        let response: PlaylistItems = serde_json::from_value(json!({
            "items": [
                {
                    "snippet": {
                        "title": "First",
                        "channelTitle": "Nature Channel",
                        "resourceId": {"kind": "youtube#video", "videoId": "aaaaaaaaaaa"},
                        "thumbnails": {"default": {"url": "https://i.ytimg.com/vi/aaaaaaaaaaa/default.jpg"}}
                    }
                },
                {
                    "snippet": {
                        "title": "Second",
                        "resourceId": {"videoId": "bbbbbbbbbbb"}
                    }
                }
            ]
        }))
        .unwrap();

        let playlist = into_playlist(response).unwrap();
        assert_eq!(playlist.title, "Nature Channel");
        assert_eq!(playlist.videos.len(), 2);
        assert_eq!(playlist.videos[1].url, "https://youtube.com/watch?v=bbbbbbbbbbb");
        assert_eq!(playlist.videos[1].thumbnail, "");

        let rows: Vec<PlaylistVideo> = playlist.videos.into_iter().map(Into::into).collect();
        assert_eq!(rows[0].video_id, "aaaaaaaaaaa");
        assert_eq!(rows[0].title, "First");
    }

    #[test]
    fn test_empty_playlist() {
        let response: PlaylistItems = serde_json::from_value(json!({"items": []})).unwrap();
        assert_eq!(into_playlist(response), None);
    }

    #[test]
    fn test_default_title() {
        let response: PlaylistItems = serde_json::from_value(json!({
            "items": [{"snippet": {"title": "x", "resourceId": {"videoId": "ccccccccccc"}}}]
        }))
        .unwrap();
        assert_eq!(into_playlist(response).unwrap().title, "YouTube Playlist");
    }
}
