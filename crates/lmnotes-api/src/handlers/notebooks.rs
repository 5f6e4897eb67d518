//! Notebook CRUD HTTP handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::{ApiError, AppState};
use lmnotes_core::{
    CreateNotebookRequest, Notebook, NotebookRepository, NotebookSummary, UpdateNotebookRequest,
};

/// Request body for creating a notebook.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateNotebookBody {
    pub title: String,
    /// Defaults to "📝" when omitted.
    pub emoji: Option<String>,
}

/// Request body for renaming a notebook or changing its emoji.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateNotebookBody {
    pub title: String,
    pub emoji: Option<String>,
}

/// List all notebooks with their source counts, newest first.
#[utoipa::path(get, path = "/api/v1/notebooks", tag = "Notebooks",
    responses((status = 200, description = "All notebooks", body = [NotebookSummary])))]
pub async fn list_notebooks(
    State(state): State<AppState>,
) -> Result<Json<Vec<NotebookSummary>>, ApiError> {
    let notebooks = state.db.notebooks.list().await?;
    Ok(Json(notebooks))
}

/// Create a new notebook.
#[utoipa::path(post, path = "/api/v1/notebooks", tag = "Notebooks",
    request_body = CreateNotebookBody,
    responses(
        (status = 201, description = "Notebook created", body = Notebook),
        (status = 400, description = "Invalid title or emoji"),
    ))]
pub async fn create_notebook(
    State(state): State<AppState>,
    Json(body): Json<CreateNotebookBody>,
) -> Result<(StatusCode, Json<Notebook>), ApiError> {
    let notebook = state
        .db
        .notebooks
        .create(CreateNotebookRequest {
            title: body.title,
            emoji: body.emoji,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(notebook)))
}

/// Fetch one notebook.
#[utoipa::path(get, path = "/api/v1/notebooks/{id}", tag = "Notebooks",
    params(("id" = Uuid, Path, description = "Notebook ID")),
    responses(
        (status = 200, description = "The notebook", body = Notebook),
        (status = 404, description = "Notebook not found"),
    ))]
pub async fn get_notebook(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Notebook>, ApiError> {
    let notebook = state.db.notebooks.fetch(id).await?;
    Ok(Json(notebook))
}

/// Rename a notebook or change its emoji.
#[utoipa::path(patch, path = "/api/v1/notebooks/{id}", tag = "Notebooks",
    params(("id" = Uuid, Path, description = "Notebook ID")),
    request_body = UpdateNotebookBody,
    responses(
        (status = 200, description = "Updated notebook", body = Notebook),
        (status = 404, description = "Notebook not found"),
    ))]
pub async fn update_notebook(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateNotebookBody>,
) -> Result<Json<Notebook>, ApiError> {
    let notebook = state
        .db
        .notebooks
        .update(
            id,
            UpdateNotebookRequest {
                title: body.title,
                emoji: body.emoji,
            },
        )
        .await?;
    Ok(Json(notebook))
}

/// Delete a notebook and all its sources.
#[utoipa::path(delete, path = "/api/v1/notebooks/{id}", tag = "Notebooks",
    params(("id" = Uuid, Path, description = "Notebook ID")),
    responses((status = 204, description = "Deleted (or already absent)")))]
pub async fn delete_notebook(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.db.notebooks.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
