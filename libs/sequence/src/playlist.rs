//! YouTube playlists

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    document::{DEFAULT_CATEGORY, PlaylistDocument},
    error::{EditError, SaveError},
    extract::{extract_youtube_id, is_youtube_id},
    ingest::MAX_ITEMS,
    order::{self, Direction, Positioned},
};

/// One playlist row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistVideo {
    pub position: u32,
    #[serde(default)]
    pub video_id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
}

impl PlaylistVideo {
    pub fn new(video_id: impl Into<String>, url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            position: 0,
            video_id: video_id.into(),
            url: url.into(),
            title: title.into(),
        }
    }
}

impl Positioned for PlaylistVideo {
    fn position(&self) -> u32 {
        self.position
    }

    fn set_position(&mut self, position: u32) {
        self.position = position;
    }
}

/// Playlist being edited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub title: String,
    pub description: String,
    pub category: String,
    videos: Vec<PlaylistVideo>,
}

impl Default for Playlist {
    fn default() -> Self {
        Self::new()
    }
}

impl Playlist {
    /// A new playlist with a single empty row
    pub fn new() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            category: DEFAULT_CATEGORY.to_string(),
            videos: order::renumber(vec![PlaylistVideo::default()]),
        }
    }

    pub fn from_stored(document: PlaylistDocument) -> Self {
        let mut videos = document.videos;
        videos.sort_by_key(|video| video.position);

        Self {
            title: document.title,
            description: document.description,
            category: document.category,
            videos: if videos.is_empty() {
                Self::new().videos
            } else {
                order::renumber(videos)
            },
        }
    }

    pub fn videos(&self) -> &[PlaylistVideo] {
        &self.videos
    }

    pub fn add_video(&self) -> Result<Self, EditError> {
        if self.videos.len() >= MAX_ITEMS {
            return Err(EditError::LimitReached {
                max: MAX_ITEMS,
                noun: "videos",
            });
        }

        let mut videos = self.videos.clone();
        videos.push(PlaylistVideo::default());
        Ok(self.with_videos(order::renumber(videos)))
    }

    pub fn remove_video(&self, position: u32) -> Result<Self, EditError> {
        if self.videos.len() <= 1 {
            return Err(EditError::LastEntry { noun: "video" });
        }
        Ok(self.with_videos(order::remove(&self.videos, position)?))
    }

    pub fn move_video(&self, position: u32, direction: Direction) -> Result<Self, EditError> {
        Ok(self.with_videos(order::move_adjacent(&self.videos, position, direction)?))
    }

    /// Set a row's URL and derive its video ID
    pub fn set_video_url(&self, position: u32, url: &str) -> Result<Self, EditError> {
        let url = url.trim().to_string();
        let video_id = extract_youtube_id(&url);
        let videos = order::update(&self.videos, position, |video| {
            Ok(PlaylistVideo {
                video_id,
                url,
                ..video
            })
        })?;
        Ok(self.with_videos(videos))
    }

    pub fn set_video_title(&self, position: u32, title: &str) -> Result<Self, EditError> {
        let title = title.to_string();
        let videos = order::update(&self.videos, position, |video| {
            Ok(PlaylistVideo { title, ..video })
        })?;
        Ok(self.with_videos(videos))
    }

    /// Replace every row with videos extracted from a YouTube playlist
    pub fn replace_videos(&self, videos: Vec<PlaylistVideo>) -> Result<Self, EditError> {
        if videos.len() > MAX_ITEMS {
            return Err(EditError::LimitReached {
                max: MAX_ITEMS,
                noun: "videos",
            });
        }
        if videos.is_empty() {
            return Err(EditError::LastEntry { noun: "video" });
        }
        Ok(self.with_videos(order::renumber(videos)))
    }

    /// Validate and produce the stored shape; rows without a video ID are dropped
    pub fn prepare(&self, creator_id: Option<Uuid>) -> Result<PlaylistDocument, SaveError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(SaveError::TitleRequired);
        }
        if self.videos.len() > MAX_ITEMS {
            return Err(SaveError::TooManyEntries {
                max: MAX_ITEMS,
                found: self.videos.len(),
                noun: "videos",
            });
        }

        let videos: Vec<PlaylistVideo> = self
            .videos
            .iter()
            .filter(|video| is_youtube_id(video.video_id.trim()))
            .cloned()
            .collect();
        if videos.is_empty() {
            return Err(SaveError::NoValidContent("video"));
        }

        let category = self.category.trim();
        Ok(PlaylistDocument {
            title: title.to_string(),
            description: self.description.trim().to_string(),
            category: if category.is_empty() {
                DEFAULT_CATEGORY.to_string()
            } else {
                category.to_string()
            },
            is_active: false,
            reviewed: false,
            creator_id,
            videos: order::renumber(videos),
        })
    }

    fn with_videos(&self, videos: Vec<PlaylistVideo>) -> Self {
        Self {
            videos,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::is_contiguous;

    #[test]
    fn test_set_video_url_extracts_id() {
        let playlist = Playlist::new()
            .set_video_url(1, "https://youtu.be/dQw4w9WgXcQ")
            .unwrap();
        assert_eq!(playlist.videos()[0].video_id, "dQw4w9WgXcQ");
        assert_eq!(playlist.videos()[0].url, "https://youtu.be/dQw4w9WgXcQ");
    }

    #[test]
    fn test_last_row_stays() {
        assert_eq!(
            Playlist::new().remove_video(1),
            Err(EditError::LastEntry { noun: "video" })
        );
    }

    #[test]
    fn test_replace_videos_renumbers() {
        let imported = vec![
            PlaylistVideo::new("aaaaaaaaaaa", "https://www.youtube.com/watch?v=aaaaaaaaaaa", "A"),
            PlaylistVideo::new("bbbbbbbbbbb", "https://www.youtube.com/watch?v=bbbbbbbbbbb", "B"),
        ];
        let playlist = Playlist::new().replace_videos(imported).unwrap();
        assert_eq!(playlist.videos().len(), 2);
        assert!(is_contiguous(playlist.videos()));

        let too_many = vec![PlaylistVideo::default(); MAX_ITEMS + 1];
        assert!(Playlist::new().replace_videos(too_many).is_err());
    }

    #[test]
    fn test_prepare_drops_rows_without_id() {
        let mut playlist = Playlist::new()
            .add_video()
            .unwrap()
            .set_video_url(2, "https://youtube.com/watch?v=dQw4w9WgXcQ")
            .unwrap()
            .set_video_title(2, "Classic")
            .unwrap();
        assert_eq!(playlist.prepare(None), Err(SaveError::TitleRequired));

        playlist.title = "Favourites".to_string();
        playlist.category = "  ".to_string();
        let document = playlist.prepare(None).unwrap();
        assert_eq!(document.category, "General");
        assert_eq!(document.videos.len(), 1);
        assert_eq!(document.videos[0].position, 1);
        assert_eq!(document.videos[0].title, "Classic");
    }

    #[test]
    fn test_prepare_rejects_oversized_stored_playlist() {
        let stored = PlaylistDocument {
            title: "Marathon".to_string(),
            description: String::new(),
            category: String::new(),
            is_active: false,
            reviewed: false,
            creator_id: None,
            videos: vec![
                PlaylistVideo::new("dQw4w9WgXcQ", "https://youtu.be/dQw4w9WgXcQ", "");
                MAX_ITEMS + 1
            ],
        };

        assert_eq!(
            Playlist::from_stored(stored).prepare(None),
            Err(SaveError::TooManyEntries {
                max: MAX_ITEMS,
                found: MAX_ITEMS + 1,
                noun: "videos",
            })
        );
    }

    #[test]
    fn test_prepare_requires_a_video() {
        let mut playlist = Playlist::new();
        playlist.title = "Empty".to_string();
        assert_eq!(playlist.prepare(None), Err(SaveError::NoValidContent("video")));
    }
}
