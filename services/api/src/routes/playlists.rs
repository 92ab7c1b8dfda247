//! Playlist editor endpoints

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;
use uuid::Uuid;

use sequence::{Playlist, PlaylistDocument, ToolKind};

use super::{decode, encode, storage_error};
use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::{CreatedResponse, document::DocumentView},
    state::AppState,
};

pub async fn create_playlist(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(draft): Json<PlaylistDocument>,
) -> ApiResult<impl IntoResponse> {
    let document = Playlist::from_stored(draft).prepare(Some(user.id))?;

    let record = state
        .documents
        .insert(
            user.id,
            user.email.as_deref(),
            ToolKind::Playlist,
            &document.title,
            encode(&document)?,
        )
        .await
        .map_err(storage_error)?;

    info!(
        "Created playlist {} with {} videos",
        record.id,
        document.videos.len()
    );
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id: record.id,
            story_slug: record.story_slug,
        }),
    ))
}

pub async fn get_playlist(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let record = state
        .documents
        .find_for_user(id, user.id, ToolKind::Playlist)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| ApiError::NotFound("Playlist not found".to_string()))?;

    let stored: PlaylistDocument = decode(record.id, record.document_data.clone())?;
    let playlist = Playlist::from_stored(stored.clone());

    let data = PlaylistDocument {
        videos: playlist.videos().to_vec(),
        ..stored
    };
    Ok(Json(DocumentView::new(&record, data)))
}

pub async fn update_playlist(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(draft): Json<PlaylistDocument>,
) -> ApiResult<impl IntoResponse> {
    let document = Playlist::from_stored(draft).prepare(Some(user.id))?;

    let record = state
        .documents
        .update_data(id, user.id, ToolKind::Playlist, encode(&document)?)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| ApiError::NotFound("Playlist not found".to_string()))?;

    info!("Updated playlist {}", record.id);
    Ok(Json(DocumentView::new(&record, document)))
}
