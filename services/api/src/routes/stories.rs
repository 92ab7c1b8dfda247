//! Story editor endpoints

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;
use uuid::Uuid;

use sequence::{Story, StoryDocument, ToolKind};

use super::{decode, encode, storage_error};
use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::{CreatedResponse, document::DocumentView},
    state::AppState,
};

pub async fn create_story(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(draft): Json<StoryDocument>,
) -> ApiResult<impl IntoResponse> {
    let document = Story::from_stored(draft).prepare(Some(user.id))?;

    let record = state
        .documents
        .insert(
            user.id,
            user.email.as_deref(),
            ToolKind::Story,
            &document.title,
            encode(&document)?,
        )
        .await
        .map_err(storage_error)?;

    info!("Created story {} with {} pages", record.id, document.pages.len());
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id: record.id,
            story_slug: record.story_slug,
        }),
    ))
}

/// Load a story; pages saved in proxied form come back unwrapped
pub async fn get_story(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let record = state
        .documents
        .find_for_user(id, user.id, ToolKind::Story)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| ApiError::NotFound("Story not found".to_string()))?;

    let stored: StoryDocument = decode(record.id, record.document_data.clone())?;
    let story = Story::from_stored(stored.clone());

    let data = StoryDocument {
        title: story.title.clone(),
        subtitle: story.subtitle.clone(),
        author: story.author.clone(),
        pages: story.pages().to_vec(),
        ..stored
    };
    Ok(Json(DocumentView::new(&record, data)))
}

pub async fn update_story(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(draft): Json<StoryDocument>,
) -> ApiResult<impl IntoResponse> {
    let document = Story::from_stored(draft).prepare(Some(user.id))?;

    let record = state
        .documents
        .update_data(id, user.id, ToolKind::Story, encode(&document)?)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| ApiError::NotFound("Story not found".to_string()))?;

    info!("Updated story {}", record.id);
    Ok(Json(DocumentView::new(&record, document)))
}
