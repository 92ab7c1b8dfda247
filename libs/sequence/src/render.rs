//! Render-time URL helpers
//!
//! Proxy wrapping happens here and only here; the wrapped form is handed
//! to a viewer and never written back into an item.

use crate::item::{Provider, VideoItem};

/// Path of the image proxy route
pub const PROXY_PATH: &str = "/api/proxy-image";

/// Wrap an image URL in the local proxy for display
pub fn proxy_image_url(image_url: &str) -> String {
    format!("{PROXY_PATH}?url={}", urlencoding::encode(image_url))
}

/// Embeddable player URL for a video item
pub fn embed_url(video: &VideoItem) -> String {
    match video.provider() {
        Provider::Youtube => format!(
            "https://www.youtube-nocookie.com/embed/{}?rel=0&modestbranding=1",
            video.video_id
        ),
        Provider::Drive => format!("https://drive.google.com/file/d/{}/preview", video.video_id),
    }
}

/// Preview thumbnail; Drive videos have none
pub fn thumbnail_url(video: &VideoItem) -> Option<String> {
    match video.provider() {
        Provider::Youtube => Some(format!(
            "https://img.youtube.com/vi/{}/mqdefault.jpg",
            video.video_id
        )),
        Provider::Drive => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(video_id: &str, provider: Option<Provider>) -> VideoItem {
        VideoItem {
            video_id: video_id.to_string(),
            provider,
            ..VideoItem::default()
        }
    }

    #[test]
    fn test_proxy_image_url_encodes_inner_url() {
        assert_eq!(
            proxy_image_url("https://drive.google.com/uc?export=view&id=X"),
            "/api/proxy-image?url=https%3A%2F%2Fdrive.google.com%2Fuc%3Fexport%3Dview%26id%3DX"
        );
    }

    #[test]
    fn test_embed_url_follows_provider_tag() {
        // 11 characters, but tagged as a Drive file
        let drive = video("ABCDEFGHIJK", Some(Provider::Drive));
        assert_eq!(
            embed_url(&drive),
            "https://drive.google.com/file/d/ABCDEFGHIJK/preview"
        );
        assert_eq!(thumbnail_url(&drive), None);

        let youtube = video("dQw4w9WgXcQ", Some(Provider::Youtube));
        assert_eq!(
            embed_url(&youtube),
            "https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ?rel=0&modestbranding=1"
        );
        assert_eq!(
            thumbnail_url(&youtube).as_deref(),
            Some("https://img.youtube.com/vi/dQw4w9WgXcQ/mqdefault.jpg")
        );
    }

    #[test]
    fn test_untagged_video_uses_legacy_rule() {
        let legacy = video("1AbCdEfGhIjKlMnOpQrStUv", None);
        assert!(embed_url(&legacy).starts_with("https://drive.google.com/file/d/"));
    }
}
