//! Legacy URL repair
//!
//! An earlier renderer stored image URLs already wrapped in the image proxy,
//! sometimes twice. Loading collapses every layer so the editable list
//! always holds the upstream URL.

use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, warn};

use crate::{
    item::{MediaContent, MediaItem},
    render::PROXY_PATH,
};

fn proxy_regex() -> &'static Regex {
    static PROXY_REGEX: OnceLock<Regex> = OnceLock::new();
    PROXY_REGEX.get_or_init(|| {
        Regex::new(&format!(r"{}\?url=(.+)", regex::escape(PROXY_PATH)))
            .expect("Failed to compile proxy regex")
    })
}

/// Whether a URL has the proxy-wrapper shape
pub fn is_proxy_wrapped(url: &str) -> bool {
    proxy_regex().is_match(url)
}

/// Strip every proxy layer from an image URL.
///
/// Each layer is decoded once; the loop ends at the first value that is not
/// wrapped, so the result is a fixed point and a second call is a no-op.
/// A layer whose payload does not decode is kept as is.
pub fn unwrap_proxy_url(url: &str) -> String {
    let mut current = url.to_string();

    loop {
        let inner = match proxy_regex().captures(&current) {
            Some(captures) => captures[1].to_string(),
            None => return current,
        };

        match urlencoding::decode(&inner) {
            Ok(decoded) => {
                debug!("Unwrapped proxied image URL: {}", current);
                current = decoded.into_owned();
            }
            Err(e) => {
                warn!("Leaving undecodable proxied URL in place: {}", e);
                return current;
            }
        }
    }
}

/// Repair one stored item; only images are touched
pub fn repair_item(mut item: MediaItem) -> MediaItem {
    if let MediaContent::Image(image) = &mut item.content {
        if !image.image_url.is_empty() {
            image.image_url = unwrap_proxy_url(&image.image_url);
        }
    }
    item
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::proxy_image_url;

    const UPSTREAM: &str = "https://drive.google.com/uc?export=view&id=XYZ789";

    #[test]
    fn test_unwrapped_url_untouched() {
        assert_eq!(unwrap_proxy_url(UPSTREAM), UPSTREAM);
        assert_eq!(unwrap_proxy_url("not-a-url-at-all"), "not-a-url-at-all");
    }

    #[test]
    fn test_single_and_double_wrapping_collapse() {
        let once = format!("https://creator.recursive.eco{}", proxy_image_url(UPSTREAM));
        let twice = proxy_image_url(&once);

        assert_eq!(unwrap_proxy_url(&once), UPSTREAM);
        assert_eq!(unwrap_proxy_url(&twice), UPSTREAM);
    }

    #[test]
    fn test_unencoded_double_wrap() {
        let raw = format!("/api/proxy-image?url=/api/proxy-image?url={UPSTREAM}");
        assert_eq!(unwrap_proxy_url(&raw), UPSTREAM);
    }

    #[test]
    fn test_repair_is_idempotent() {
        let inputs = [
            UPSTREAM.to_string(),
            proxy_image_url(UPSTREAM),
            proxy_image_url(&proxy_image_url(UPSTREAM)),
        ];

        for input in inputs {
            let once = unwrap_proxy_url(&input);
            assert_eq!(unwrap_proxy_url(&once), once);
            assert_eq!(once, UPSTREAM);
        }
    }

    #[test]
    fn test_repair_item_skips_videos() {
        let video = MediaItem::video(
            1,
            "dQw4w9WgXcQ",
            proxy_image_url("https://youtu.be/dQw4w9WgXcQ"),
            crate::item::Provider::Youtube,
        );
        assert_eq!(repair_item(video.clone()), video);

        let image = MediaItem::image(2, proxy_image_url(UPSTREAM));
        assert_eq!(repair_item(image).identifier(), UPSTREAM);
    }
}
