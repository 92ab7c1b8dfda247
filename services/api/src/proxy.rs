//! Image proxy
//!
//! Fetches images from a fixed set of hosts so viewers can embed them
//! without hitting cross-origin or hotlink restrictions.

use axum::{
    body::Body,
    http::{HeaderValue, StatusCode, header},
    response::Response,
};
use tracing::error;
use url::Url;

use crate::error::ApiError;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const CACHE_FOREVER: &str = "public, max-age=31536000, immutable";
const MAX_REDIRECTS: usize = 10;

/// Hosts Drive hands image downloads off to; accepted only as redirect hops
const REDIRECT_HOSTS: [&str; 2] = ["drive.usercontent.google.com", "googleusercontent.com"];

/// Whether `host` equals an allowed domain or is a subdomain of one
pub fn host_allowed(host: &str, allowed: &[String]) -> bool {
    let host = host.to_ascii_lowercase();
    allowed.iter().any(|domain| {
        let domain = domain.trim().to_ascii_lowercase();
        !domain.is_empty()
            && (host == domain
                || host
                    .strip_suffix(domain.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.')))
    })
}

/// Whether a redirect hop may be followed: http(s) to an allowed domain or
/// a Drive content host
pub fn redirect_allowed(url: &Url, allowed: &[String]) -> bool {
    matches!(url.scheme(), "http" | "https")
        && url.host_str().is_some_and(|host| {
            host_allowed(host, allowed)
                || host_allowed(host, &REDIRECT_HOSTS.map(String::from))
        })
}

/// HTTP client for the proxy. Redirects are followed only while every hop
/// stays on an allowed host; otherwise the redirect itself is returned.
pub fn proxy_client(allowed: Vec<String>) -> reqwest::Result<reqwest::Client> {
    let policy = reqwest::redirect::Policy::custom(move |attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            attempt.error("too many redirects")
        } else if redirect_allowed(attempt.url(), &allowed) {
            attempt.follow()
        } else {
            attempt.stop()
        }
    });

    reqwest::Client::builder()
        .user_agent(BROWSER_USER_AGENT)
        .redirect(policy)
        .build()
}

/// Validate a proxy target against the allow list
pub fn validate_target(raw: Option<&str>, allowed: &[String]) -> Result<Url, ApiError> {
    let raw = raw
        .filter(|raw| !raw.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing url parameter".to_string()))?;

    let url = Url::parse(raw).map_err(|_| ApiError::BadRequest("Invalid URL".to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ApiError::BadRequest("Invalid URL".to_string()));
    }

    let host = url
        .host_str()
        .ok_or_else(|| ApiError::BadRequest("Invalid URL".to_string()))?;
    if !host_allowed(host, allowed) {
        return Err(ApiError::Forbidden("Domain not allowed".to_string()));
    }

    Ok(url)
}

/// Fetch an allowed image and relay it with long-lived caching and open CORS
pub async fn fetch_image(http: &reqwest::Client, url: Url) -> Result<Response, ApiError> {
    let upstream = http
        .get(url.clone())
        .send()
        .await
        .map_err(|e| {
            error!("Error proxying image {}: {}", url, e);
            ApiError::InternalServerError
        })?;

    let status = upstream.status();
    if status.is_redirection() {
        error!("Proxied image {} redirected to a host outside the allow list", url);
        return Err(ApiError::Forbidden("Domain not allowed".to_string()));
    }
    if !status.is_success() {
        return Err(ApiError::Upstream {
            status,
            message: format!(
                "Failed to fetch image: {}",
                status.canonical_reason().unwrap_or("unknown status")
            ),
        });
    }

    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("image/jpeg"));

    let bytes = upstream.bytes().await.map_err(|e| {
        error!("Error reading proxied image {}: {}", url, e);
        ApiError::InternalServerError
    })?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CACHE_CONTROL, CACHE_FOREVER)
        .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .header(header::ACCESS_CONTROL_ALLOW_METHODS, "GET")
        .body(Body::from(bytes))
        .map_err(|e| {
            error!("Failed to build proxy response: {}", e);
            ApiError::InternalServerError
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed() -> Vec<String> {
        vec![
            "drive.google.com".to_string(),
            "lh3.googleusercontent.com".to_string(),
            "supabase.co".to_string(),
        ]
    }

    #[test]
    fn test_host_allowed() {
        assert!(host_allowed("drive.google.com", &allowed()));
        assert!(host_allowed("abc.supabase.co", &allowed()));
        assert!(host_allowed("LH3.googleusercontent.com", &allowed()));
        assert!(!host_allowed("evilsupabase.co", &allowed()));
        assert!(!host_allowed("supabase.co.evil.com", &allowed()));
        assert!(!host_allowed("example.com", &allowed()));
    }

    #[test]
    fn test_validate_target() {
        assert!(matches!(
            validate_target(None, &allowed()),
            Err(ApiError::BadRequest(msg)) if msg == "Missing url parameter"
        ));
        assert!(matches!(
            validate_target(Some("not a url"), &allowed()),
            Err(ApiError::BadRequest(msg)) if msg == "Invalid URL"
        ));
        assert!(matches!(
            validate_target(Some("https://example.com/a.png"), &allowed()),
            Err(ApiError::Forbidden(_))
        ));

        let url = validate_target(
            Some("https://drive.google.com/uc?export=view&id=XYZ789"),
            &allowed(),
        )
        .unwrap();
        assert_eq!(url.host_str(), Some("drive.google.com"));
    }

    #[test]
    fn test_redirect_hops() {
        let hop = |raw: &str| redirect_allowed(&Url::parse(raw).unwrap(), &allowed());

        assert!(hop("https://abc.supabase.co/storage/v1/object/a.png"));
        assert!(hop("https://drive.usercontent.google.com/download?id=XYZ789"));
        assert!(hop("https://doc-0s-6k-docs.googleusercontent.com/docs/x"));
        assert!(!hop("https://example.com/a.png"));
        assert!(!hop("http://169.254.169.254/latest/meta-data"));
        assert!(!hop("ftp://drive.google.com/a.png"));
    }
}
