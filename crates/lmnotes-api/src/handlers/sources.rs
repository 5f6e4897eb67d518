//! Source ingestion and deletion HTTP handlers.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::{ApiError, AppState};
use lmnotes_core::{Error, IngestSourceRequest, NotebookRepository, Source, SourceRepository};

/// List a notebook's sources, oldest first.
#[utoipa::path(get, path = "/api/v1/notebooks/{id}/sources", tag = "Sources",
    params(("id" = Uuid, Path, description = "Notebook ID")),
    responses(
        (status = 200, description = "The notebook's sources", body = [Source]),
        (status = 404, description = "Notebook not found"),
    ))]
pub async fn list_sources(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Source>>, ApiError> {
    if !state.db.notebooks.exists(id).await? {
        return Err(Error::NotebookNotFound(id).into());
    }
    let sources = state.db.sources.list_for_notebook(id).await?;
    Ok(Json(sources))
}

/// Upload one file into a notebook.
///
/// Accepts multipart/form-data with a single `file` field. The file's
/// declared MIME type must be `application/pdf` or `text/plain` and the
/// payload at most 10 MiB. The source row and the agent-side index entry
/// are created together; on agent failure nothing persists.
#[utoipa::path(post, path = "/api/v1/notebooks/{id}/sources", tag = "Sources",
    params(("id" = Uuid, Path, description = "Notebook ID")),
    responses(
        (status = 201, description = "Source ingested", body = Source),
        (status = 400, description = "Missing file, unsupported type, or invalid name"),
        (status = 404, description = "Notebook not found"),
        (status = 413, description = "File exceeds the size limit"),
        (status = 502, description = "Agent rejected the upload"),
    ))]
pub async fn upload_source(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Source>), ApiError> {
    let mut file_name: Option<String> = None;
    let mut mime_type: Option<String> = None;
    let mut data: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Multipart error: {}", e)))?
    {
        if field.name() == Some("file") {
            file_name = field.file_name().map(|n| n.to_string());
            mime_type = field.content_type().map(|c| c.to_string());
            data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Read error: {}", e)))?
                    .to_vec(),
            );
        }
        // ignore unknown fields
    }

    let data =
        data.ok_or_else(|| ApiError::BadRequest("Missing file in multipart form".to_string()))?;
    let file_name = file_name
        .ok_or_else(|| ApiError::BadRequest("File field has no file name".to_string()))?;
    let mime_type = mime_type
        .ok_or_else(|| ApiError::BadRequest("File field has no content type".to_string()))?;

    let source = state
        .db
        .sources
        .ingest(IngestSourceRequest {
            notebook_id: id,
            file_name,
            mime_type,
            data,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(source)))
}

/// Delete a source and its agent-side index entry.
#[utoipa::path(delete, path = "/api/v1/sources/{id}", tag = "Sources",
    params(("id" = Uuid, Path, description = "Source ID")),
    responses(
        (status = 204, description = "Deleted (or already absent)"),
        (status = 502, description = "Agent rejected the delete; the source is unchanged"),
    ))]
pub async fn delete_source(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.db.sources.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
