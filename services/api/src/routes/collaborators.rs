//! Endpoints backed by external collaborators

use axum::{
    Extension, Json,
    extract::{Query, State},
    http::{HeaderName, header},
    response::{IntoResponse, Response},
};
use tracing::{info, warn};

use sequence::extract::{drive_folder_id, youtube_playlist_id};

use super::storage_error;
use crate::{
    clients::{ContentReport, PublishNotice},
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::{
        ExtractPlaylistRequest, ExtractPlaylistResponse, ImportFolderRequest,
        ImportFolderResponse, ProxyQuery, ReportKind, ReportRequest, ReportResponse,
    },
    proxy,
    state::AppState,
};

/// List a shared Drive folder as pasteable lines
pub async fn import_drive_folder(
    State(state): State<AppState>,
    Json(payload): Json<ImportFolderRequest>,
) -> ApiResult<impl IntoResponse> {
    let folder_url = payload.folder_url.trim();
    if folder_url.is_empty() {
        return Err(ApiError::BadRequest("Folder URL is required".to_string()));
    }

    let folder_id = drive_folder_id(folder_url).ok_or_else(|| {
        ApiError::BadRequest(
            "Invalid Drive folder URL. Please use a link like: https://drive.google.com/drive/folders/FOLDER_ID"
                .to_string(),
        )
    })?;

    let urls = state.drive.folder_media_lines(&folder_id).await?;

    Ok(Json(ImportFolderResponse {
        count: urls.len(),
        urls,
    }))
}

/// Fetch the videos of a public YouTube playlist
pub async fn extract_playlist(
    State(state): State<AppState>,
    Json(payload): Json<ExtractPlaylistRequest>,
) -> ApiResult<impl IntoResponse> {
    let playlist_url = payload.playlist_url.trim();
    if playlist_url.is_empty() {
        return Err(ApiError::BadRequest("Playlist URL is required".to_string()));
    }

    let playlist_id = youtube_playlist_id(playlist_url).ok_or_else(|| {
        ApiError::BadRequest(
            "Invalid YouTube playlist URL. Please check the URL and try again.".to_string(),
        )
    })?;

    let playlist = state.youtube.playlist(&playlist_id).await?;

    Ok(Json(ExtractPlaylistResponse {
        count: playlist.videos.len(),
        videos: playlist.videos,
        playlist_title: playlist.title,
    }))
}

/// Relay an image from an allowed host
pub async fn proxy_image(
    State(state): State<AppState>,
    Query(query): Query<ProxyQuery>,
) -> ApiResult<Response> {
    let url = proxy::validate_target(query.url.as_deref(), &state.config.proxy_allowed_domains)?;
    proxy::fetch_image(&state.proxy_http, url).await
}

/// Tell the admin (and the author) that a document was published.
/// Always answers with success; `sent` reports whether mail went out.
pub async fn notify_publish(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(mut notice): Json<PublishNotice>,
) -> impl IntoResponse {
    notice.user_id.get_or_insert_with(|| user.id.to_string());
    if notice.user_email.is_none() {
        notice.user_email = user.email;
    }

    let outcome = state.mailer.notify_publish(&notice).await;
    info!(
        "Publish notification for {} processed (sent: {})",
        notice.project_id, outcome.sent
    );
    Json(outcome)
}

/// Reports come from public viewer pages on other origins
fn report_cors() -> [(HeaderName, &'static str); 3] {
    [
        (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
        (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type, Authorization"),
    ]
}

pub async fn report_preflight() -> impl IntoResponse {
    report_cors()
}

/// Flag a document reported by a viewer and alert the admin and creator.
/// An unpublish report also takes the document private.
pub async fn report_content(
    State(state): State<AppState>,
    Json(request): Json<ReportRequest>,
) -> ApiResult<impl IntoResponse> {
    let document_id = request.validate()?;
    let unpublish = request.report_type == ReportKind::Unpublish;

    let record = state
        .documents
        .mark_reported(document_id, unpublish)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| ApiError::NotFound("Document not found".to_string()))?;

    warn!(
        "Document {} reported by a viewer ({:?})",
        record.id, request.report_type
    );

    let title = match record.title() {
        "" => "Untitled".to_string(),
        title => title.to_string(),
    };
    let outcome = state
        .mailer
        .notify_report(&ContentReport {
            document_id: record.id,
            creator_id: record.user_id,
            creator_email: record.creator_email.clone(),
            title,
            kind: request.report_type,
            explanation: request.explanation,
            viewer_url: request.viewer_url,
        })
        .await;
    info!("Report for {} processed (sent: {})", record.id, outcome.sent);

    Ok((
        report_cors(),
        Json(ReportResponse {
            success: true,
            message: request.report_type.acknowledgement(),
        }),
    ))
}
