//! File upload API
//!
//! Uploads happen before the document that references them: the
//! client uploads proof or attachment files here, then submits the
//! returned references with its next action. Files that never get
//! referenced are reclaimed by the orphan sweeper.

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
};
use serde::Serialize;

use crate::core::{Config, Result, ServerError, ServerState};
use shared::models::FileRef;

use super::ExtractPrincipal;

pub fn router(config: &Config) -> Router<ServerState> {
    Router::new().nest(
        "/api/upload",
        Router::new()
            .route("/", post(upload))
            .layer(DefaultBodyLimit::max(config.max_upload_bytes)),
    )
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub files: Vec<FileRef>,
}

/// POST /api/upload
async fn upload(
    State(state): State<ServerState>,
    ExtractPrincipal(principal): ExtractPrincipal,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    if !principal.role.is_admin() && !principal.role.is_client() {
        return Err(ServerError::Forbidden);
    }

    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::Validation(format!("invalid multipart request: {e}")))?
    {
        let file_name = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| "unnamed".to_string());
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ServerError::Validation(format!("failed to read upload: {e}")))?;
        if bytes.is_empty() {
            return Err(ServerError::Validation("empty file".to_string()));
        }

        let stored = state
            .files
            .store(&file_name, bytes.to_vec())
            .await
            .map_err(|e| ServerError::Internal(e.into()))?;
        tracing::info!(
            file_id = %stored.file_id,
            file_name = %stored.file_name,
            size = bytes.len(),
            operator = %principal.id,
            "File uploaded"
        );
        files.push(stored);
    }

    if files.is_empty() {
        return Err(ServerError::Validation("no file field in request".to_string()));
    }

    Ok(Json(UploadResponse { files }))
}
