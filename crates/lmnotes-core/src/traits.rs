//! Core traits for LMNotes abstractions.
//!
//! These traits define the interfaces that concrete implementations must
//! satisfy, enabling pluggable backends and testability. The repository
//! traits are implemented over PostgreSQL in `lmnotes-db`; the agent client
//! trait is implemented over HTTP in `lmnotes-agent` and by a mock for
//! workflow tests.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{ChatMessage, Notebook, NotebookSummary, Source};

// =============================================================================
// NOTEBOOK REPOSITORY
// =============================================================================

/// Request for creating a new notebook.
#[derive(Debug, Clone)]
pub struct CreateNotebookRequest {
    pub title: String,
    /// Falls back to the default glyph when absent.
    pub emoji: Option<String>,
}

/// Request for renaming a notebook or changing its emoji.
#[derive(Debug, Clone)]
pub struct UpdateNotebookRequest {
    pub title: String,
    pub emoji: Option<String>,
}

/// Repository for notebook CRUD operations.
#[async_trait]
pub trait NotebookRepository: Send + Sync {
    /// Create a new notebook.
    async fn create(&self, req: CreateNotebookRequest) -> Result<Notebook>;

    /// Fetch a notebook by ID.
    async fn fetch(&self, id: Uuid) -> Result<Notebook>;

    /// List all notebooks with their source counts, newest first.
    async fn list(&self) -> Result<Vec<NotebookSummary>>;

    /// Update title/emoji. Refreshes `updated_at`.
    async fn update(&self, id: Uuid, req: UpdateNotebookRequest) -> Result<Notebook>;

    /// Delete a notebook and, by cascade, all its sources.
    /// Deleting a missing notebook is a no-op success.
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Check if a notebook exists.
    async fn exists(&self, id: Uuid) -> Result<bool>;
}

// =============================================================================
// SOURCE REPOSITORY / INGESTION WORKFLOW
// =============================================================================

/// Request for ingesting one uploaded file into a notebook.
#[derive(Debug, Clone)]
pub struct IngestSourceRequest {
    pub notebook_id: Uuid,
    /// The uploaded file's name; becomes the source title after sanitization.
    pub file_name: String,
    /// Declared MIME type; must be exactly `application/pdf` or `text/plain`.
    pub mime_type: String,
    /// Raw file bytes.
    pub data: Vec<u8>,
}

/// Repository for sources, including the ingestion and deletion workflows
/// that keep the relational store and the agent's index consistent.
#[async_trait]
pub trait SourceRepository: Send + Sync {
    /// Validate, persist, and forward one uploaded file to the agent.
    ///
    /// The insert and the agent upload run inside one database transaction:
    /// if the agent call fails, the transaction aborts and no source row
    /// remains. Not idempotent: repeating the call creates a new source.
    async fn ingest(&self, req: IngestSourceRequest) -> Result<Source>;

    /// Remove a source and its agent-side index entry together.
    ///
    /// If the agent call fails the row deletion rolls back, so the source
    /// stays visible (and deletable again). Deleting a missing source is a
    /// no-op success.
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Fetch a source by ID.
    async fn fetch(&self, id: Uuid) -> Result<Source>;

    /// List a notebook's sources, oldest first.
    async fn list_for_notebook(&self, notebook_id: Uuid) -> Result<Vec<Source>>;
}

// =============================================================================
// AGENT CLIENT
// =============================================================================

/// Request to index an uploaded file under its source/notebook identifiers.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub source_id: Uuid,
    pub notebook_id: Uuid,
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// Client for the external indexing agent.
///
/// Any non-success HTTP response or transport error is a hard failure of
/// the surrounding workflow step; no automatic retry.
#[async_trait]
pub trait AgentClient: Send + Sync {
    /// Index file content under the given identifiers.
    async fn upload(&self, req: &UploadRequest) -> Result<()>;

    /// Remove indexed content for a source.
    async fn delete_by_source_id(&self, source_id: Uuid) -> Result<()>;

    /// Answer a question grounded in the notebook's indexed sources.
    async fn chat(&self, messages: &[ChatMessage], notebook_id: Uuid) -> Result<String>;
}
