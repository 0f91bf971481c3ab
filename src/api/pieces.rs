/// Piece API endpoints, including image upload
use crate::{
    catalog::pieces::{NewPiece, Piece, PiecePatch},
    context::AppContext,
    error::{StoreError, StoreResult},
};
use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

// Ten files of five MiB each, plus multipart framing.
const UPLOAD_BODY_LIMIT: usize = 64 * 1024 * 1024;

/// Build piece API routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/api/pieces", get(list_pieces).post(create_piece))
        .route(
            "/api/pieces/upload-images",
            post(upload_images).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route(
            "/api/pieces/:id",
            get(get_piece).put(update_piece).delete(delete_piece),
        )
        .route("/api/pieces/:id/toggle-status", put(toggle_status))
}

/// All pieces with their categories, newest first
async fn list_pieces(State(ctx): State<AppContext>) -> StoreResult<Json<Vec<Piece>>> {
    let pieces = ctx.piece_manager.list().await?;
    Ok(Json(pieces))
}

/// One piece by id
async fn get_piece(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> StoreResult<Json<Piece>> {
    let piece = ctx.piece_manager.get(&id).await?;
    Ok(Json(piece))
}

/// Create a piece
async fn create_piece(
    State(ctx): State<AppContext>,
    Json(req): Json<NewPiece>,
) -> StoreResult<(StatusCode, Json<Piece>)> {
    let piece = ctx.piece_manager.create(req).await?;
    Ok((StatusCode::CREATED, Json(piece)))
}

/// Apply a partial update to a piece
async fn update_piece(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    Json(req): Json<PiecePatch>,
) -> StoreResult<Json<Piece>> {
    let piece = ctx.piece_manager.update(&id, req).await?;
    Ok(Json(piece))
}

#[derive(Debug, Deserialize)]
struct ToggleStatusRequest {
    status: Option<String>,
}

/// Set the rental status to a final value
async fn toggle_status(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    Json(req): Json<ToggleStatusRequest>,
) -> StoreResult<Json<Piece>> {
    let piece = ctx
        .piece_manager
        .toggle_status(&id, req.status.as_deref())
        .await?;
    Ok(Json(piece))
}

/// Delete a piece
async fn delete_piece(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
) -> StoreResult<StatusCode> {
    ctx.piece_manager.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
struct UploadResponse {
    urls: Vec<String>,
}

/// Accept a batch of piece images and return their public URLs
async fn upload_images(
    State(ctx): State<AppContext>,
    mut multipart: Multipart,
) -> StoreResult<Json<UploadResponse>> {
    let max_files = ctx.config.service.upload_max_files;
    let mut urls = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| StoreError::Validation(format!("Invalid multipart payload: {}", e)))?
    {
        if field.name() != Some("files") {
            continue;
        }
        if urls.len() >= max_files {
            return Err(StoreError::Validation(format!(
                "At most {} files per upload",
                max_files
            )));
        }

        let original_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(|ct| ct.to_string());
        let bytes = field.bytes().await.map_err(|e| {
            StoreError::Validation(format!("Failed to read '{}': {}", original_name, e))
        })?;

        let stored = ctx
            .upload_store
            .save(&original_name, content_type.as_deref(), &bytes)
            .await?;
        urls.push(ctx.upload_store.public_url(&stored));
    }

    if urls.is_empty() {
        return Err(StoreError::Validation("No files uploaded".to_string()));
    }

    Ok(Json(UploadResponse { urls }))
}
