//! API service routes

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{delete, get, post},
};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use sequence::{ToolKind, render::PROXY_PATH};

use crate::{
    error::{ApiError, ApiResult},
    middleware::{AuthUser, auth_middleware},
    models::{DocumentQuery, document::DashboardEntry},
    state::AppState,
};

mod collaborators;
mod playlists;
mod sequences;
mod stories;

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/api/documents", get(list_documents))
        .route("/api/documents/:id", delete(delete_document))
        .route("/api/sequences/parse", post(sequences::parse_sequence))
        .route("/api/sequences", post(sequences::create_sequence))
        .route(
            "/api/sequences/:id",
            get(sequences::get_sequence).put(sequences::update_sequence),
        )
        .route("/api/stories", post(stories::create_story))
        .route(
            "/api/stories/:id",
            get(stories::get_story).put(stories::update_story),
        )
        .route("/api/playlists", post(playlists::create_playlist))
        .route(
            "/api/playlists/:id",
            get(playlists::get_playlist).put(playlists::update_playlist),
        )
        .route(
            "/api/import-drive-folder",
            post(collaborators::import_drive_folder),
        )
        .route("/api/extract-playlist", post(collaborators::extract_playlist))
        .route("/api/notify-publish", post(collaborators::notify_publish))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route(PROXY_PATH, get(collaborators::proxy_image))
        .route(
            "/api/report-content",
            post(collaborators::report_content).options(collaborators::report_preflight),
        )
        .merge(protected_routes)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = match common::database::health_check(&state.db_pool).await {
        Ok(_) => "ok",
        Err(e) => {
            error!("Database health check failed: {}", e);
            "unavailable"
        }
    };

    let status = if database == "ok" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": database,
            "service": "recursive-creator-api"
        })),
    )
}

/// Dashboard listing of the caller's documents
pub async fn list_documents(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<DocumentQuery>,
) -> ApiResult<impl IntoResponse> {
    let kind = match query.tool.as_deref() {
        Some(slug) => Some(
            ToolKind::from_tool_slug(slug)
                .ok_or_else(|| ApiError::BadRequest(format!("Unknown tool: {slug}")))?,
        ),
        None => None,
    };

    let records = state
        .documents
        .list_for_user(user.id, kind)
        .await
        .map_err(|e| {
            error!("Failed to list documents: {}", e);
            ApiError::InternalServerError
        })?;

    let entries: Vec<DashboardEntry> = records
        .iter()
        .map(|record| DashboardEntry::from_record(record, |id| state.config.public_url(id)))
        .collect();

    Ok(Json(entries))
}

/// Delete one of the caller's documents
pub async fn delete_document(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let deleted = state.documents.delete(id, user.id).await.map_err(|e| {
        error!("Failed to delete document: {}", e);
        ApiError::InternalServerError
    })?;

    if deleted {
        Ok(Json(json!({"message": "Document deleted successfully"})))
    } else {
        Err(ApiError::NotFound("Document not found".to_string()))
    }
}

/// Decode stored document data into its typed shape
fn decode<T: serde::de::DeserializeOwned>(id: Uuid, data: serde_json::Value) -> ApiResult<T> {
    serde_json::from_value(data).map_err(|e| {
        error!("Stored document {} has an unexpected shape: {}", id, e);
        ApiError::InternalServerError
    })
}

fn encode<T: serde::Serialize>(data: &T) -> ApiResult<serde_json::Value> {
    serde_json::to_value(data).map_err(|e| {
        error!("Failed to encode document data: {}", e);
        ApiError::InternalServerError
    })
}

fn storage_error(e: anyhow::Error) -> ApiError {
    error!("Document storage failed: {}", e);
    ApiError::InternalServerError
}
