//! Sequence editor endpoints

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;
use uuid::Uuid;

use sequence::{EditSession, MAX_ITEMS, Sequence, SequenceDocument, ToolKind};

use super::{decode, encode, storage_error};
use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::{
        CreatedResponse, ParseRequest, ParseResponse, SequenceDraft, document::SequenceView,
    },
    state::AppState,
};

/// Preview the items a paste produces, with per-line warnings
pub async fn parse_sequence(Json(payload): Json<ParseRequest>) -> ApiResult<impl IntoResponse> {
    let (sequence, ingested) = Sequence::parse(&payload.bulk_text, MAX_ITEMS)?;

    Ok(Json(ParseResponse {
        items: sequence.into_items(),
        warnings: ingested.warnings,
    }))
}

/// Create a new sequence. Saving a loaded sequence as new goes through here too.
pub async fn create_sequence(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(draft): Json<SequenceDraft>,
) -> ApiResult<impl IntoResponse> {
    let document = EditSession::restore(draft.title, draft.description, draft.items)
        .prepare_save(user.id)?;

    let record = state
        .documents
        .insert(
            user.id,
            user.email.as_deref(),
            ToolKind::Sequence,
            &document.title,
            encode(&document)?,
        )
        .await
        .map_err(storage_error)?;

    info!(
        "Created sequence {} with {} items",
        record.id,
        document.items.len()
    );
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id: record.id,
            story_slug: record.story_slug,
        }),
    ))
}

/// Load a sequence into the editor, repairing legacy URLs
pub async fn get_sequence(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let record = state
        .documents
        .find_for_user(id, user.id, ToolKind::Sequence)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| ApiError::NotFound("Sequence not found".to_string()))?;

    let document: SequenceDocument = decode(record.id, record.document_data.clone())?;
    let session = EditSession::restore(document.title, document.description, document.items);

    Ok(Json(SequenceView::new(&record, &session)))
}

/// Save over an existing sequence; the publish flags go back to pending
pub async fn update_sequence(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(draft): Json<SequenceDraft>,
) -> ApiResult<impl IntoResponse> {
    let session = EditSession::restore(draft.title, draft.description, draft.items);
    let document = session.prepare_save(user.id)?;

    let record = state
        .documents
        .update_data(id, user.id, ToolKind::Sequence, encode(&document)?)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| ApiError::NotFound("Sequence not found".to_string()))?;

    let saved = EditSession::restore(document.title, document.description, document.items);
    info!("Updated sequence {}", record.id);
    Ok(Json(SequenceView::new(&record, &saved)))
}
