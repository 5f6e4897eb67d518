//! Source repository and the ingestion/deletion workflows.
//!
//! The relational store is the source of truth for source existence; the
//! agent's index is a secondary store. Consistency between the two is
//! best-effort: each workflow wraps its row mutation and the outbound agent
//! call in one database transaction, so an agent failure aborts the row
//! change. This is not a distributed transaction; a crash between the
//! agent's 2xx and the local commit can still strand an index entry.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use sqlx::{postgres::PgRow, Pool, Postgres, Row};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::now_micros;
use lmnotes_core::{
    new_v7, validate_upload, AgentClient, Error, IngestSourceRequest, Result, Source,
    SourceRepository, UploadRequest,
};

/// PostgreSQL implementation of SourceRepository.
///
/// The agent client is injected so workflow tests can substitute a
/// recording mock.
pub struct PgSourceRepository {
    pool: Pool<Postgres>,
    agent: Arc<dyn AgentClient>,
}

impl PgSourceRepository {
    /// Create a new PgSourceRepository with the given pool and agent client.
    pub fn new(pool: Pool<Postgres>, agent: Arc<dyn AgentClient>) -> Self {
        Self { pool, agent }
    }

    async fn notebook_exists(&self, notebook_id: Uuid) -> Result<bool> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM notebooks WHERE id = $1) AS present")
            .bind(notebook_id)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(row.get("present"))
    }
}

fn map_row_to_source(row: &PgRow) -> Result<Source> {
    let kind: String = row.get("type");
    Ok(Source {
        id: row.get("id"),
        notebook_id: row.get("notebook_id"),
        title: row.get("title"),
        kind: kind.parse()?,
        content: row.get("content"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[async_trait]
impl SourceRepository for PgSourceRepository {
    async fn ingest(&self, req: IngestSourceRequest) -> Result<Source> {
        let start = Instant::now();

        // Fail fast: nothing below runs (and no state exists) unless the
        // upload passes validation and the notebook is real.
        let (title, kind) = validate_upload(&req.file_name, &req.mime_type, &req.data)?;
        if !self.notebook_exists(req.notebook_id).await? {
            return Err(Error::NotebookNotFound(req.notebook_id));
        }

        let id = new_v7();
        let now = now_micros();
        let size_bytes = req.data.len();

        // The insert is provisional until the agent confirms: an error from
        // the upload call propagates out, the transaction drops, and the
        // row is rolled back.
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        sqlx::query(
            "INSERT INTO sources (id, notebook_id, title, type, content, created_at, updated_at)
             VALUES ($1, $2, $3, $4, NULL, $5, $5)",
        )
        .bind(id)
        .bind(req.notebook_id)
        .bind(&title)
        .bind(kind.as_str())
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?;

        let upload = UploadRequest {
            source_id: id,
            notebook_id: req.notebook_id,
            file_name: title.clone(),
            mime_type: kind.as_mime().to_string(),
            data: req.data,
        };
        if let Err(e) = self.agent.upload(&upload).await {
            warn!(
                subsystem = "db",
                component = "sources",
                op = "ingest",
                source_id = %id,
                notebook_id = %req.notebook_id,
                error = %e,
                "Agent upload failed, rolling back source row"
            );
            return Err(e);
        }

        tx.commit().await.map_err(Error::Database)?;

        info!(
            subsystem = "db",
            component = "sources",
            op = "ingest",
            source_id = %id,
            notebook_id = %req.notebook_id,
            kind = %kind,
            size_bytes = size_bytes,
            duration_ms = start.elapsed().as_millis() as u64,
            "Source ingested"
        );

        Ok(Source {
            id,
            notebook_id: req.notebook_id,
            title,
            kind,
            content: None,
            created_at: now,
            updated_at: now,
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let result = sqlx::query("DELETE FROM sources WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            // Nothing to reconcile with the agent either.
            debug!(
                subsystem = "db",
                component = "sources",
                op = "delete",
                source_id = %id,
                "Source already absent, no-op"
            );
            return Ok(());
        }

        // The row only disappears once the agent confirms its index entry
        // is gone; a failure here rolls the DELETE back.
        if let Err(e) = self.agent.delete_by_source_id(id).await {
            warn!(
                subsystem = "db",
                component = "sources",
                op = "delete",
                source_id = %id,
                error = %e,
                "Agent delete failed, restoring source row"
            );
            return Err(e);
        }

        tx.commit().await.map_err(Error::Database)?;

        info!(
            subsystem = "db",
            component = "sources",
            op = "delete",
            source_id = %id,
            "Source deleted"
        );
        Ok(())
    }

    async fn fetch(&self, id: Uuid) -> Result<Source> {
        let row = sqlx::query(
            "SELECT id, notebook_id, title, type, content, created_at, updated_at
             FROM sources WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        match row {
            Some(r) => map_row_to_source(&r),
            None => Err(Error::SourceNotFound(id)),
        }
    }

    async fn list_for_notebook(&self, notebook_id: Uuid) -> Result<Vec<Source>> {
        let rows = sqlx::query(
            "SELECT id, notebook_id, title, type, content, created_at, updated_at
             FROM sources WHERE notebook_id = $1 ORDER BY created_at ASC",
        )
        .bind(notebook_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        rows.iter().map(map_row_to_source).collect()
    }
}

#[cfg(test)]
mod tests {
    //! Fail-fast behavior is testable without a live database: validation
    //! runs before any pool access, so a lazy (never-connected) pool works.

    use super::*;
    use lmnotes_core::defaults::MAX_UPLOAD_SIZE_BYTES;
    use sqlx::postgres::PgPoolOptions;

    // The mock lives in lmnotes-agent; a hand-rolled stub avoids the
    // circular dev-dependency inside unit tests of this crate.
    struct PanickingAgent;

    #[async_trait]
    impl AgentClient for PanickingAgent {
        async fn upload(&self, _req: &UploadRequest) -> Result<()> {
            panic!("agent must not be called for invalid uploads");
        }
        async fn delete_by_source_id(&self, _source_id: Uuid) -> Result<()> {
            panic!("agent must not be called");
        }
        async fn chat(&self, _messages: &[lmnotes_core::ChatMessage], _id: Uuid) -> Result<String> {
            panic!("agent must not be called");
        }
    }

    fn lazy_repo() -> PgSourceRepository {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unreachable")
            .expect("lazy pool");
        PgSourceRepository::new(pool, Arc::new(PanickingAgent))
    }

    #[tokio::test]
    async fn test_ingest_rejects_unsupported_type_before_any_side_effect() {
        let repo = lazy_repo();
        let err = repo
            .ingest(IngestSourceRequest {
                notebook_id: Uuid::new_v4(),
                file_name: "photo.png".to_string(),
                mime_type: "image/png".to_string(),
                data: vec![0x89, 0x50, 0x4E, 0x47],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedType(_)));
    }

    #[tokio::test]
    async fn test_ingest_rejects_oversized_payload_before_any_side_effect() {
        let repo = lazy_repo();
        let err = repo
            .ingest(IngestSourceRequest {
                notebook_id: Uuid::new_v4(),
                file_name: "big.txt".to_string(),
                mime_type: "text/plain".to_string(),
                data: vec![b'A'; MAX_UPLOAD_SIZE_BYTES + 1],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::PayloadTooLarge { .. }));
    }

    #[tokio::test]
    async fn test_ingest_rejects_empty_file() {
        let repo = lazy_repo();
        let err = repo
            .ingest(IngestSourceRequest {
                notebook_id: Uuid::new_v4(),
                file_name: "empty.txt".to_string(),
                mime_type: "text/plain".to_string(),
                data: Vec::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
