//! Notebook repository implementation.

use async_trait::async_trait;
use sqlx::{postgres::PgRow, Pool, Postgres, Row};
use tracing::{debug, info};
use uuid::Uuid;

use crate::now_micros;
use lmnotes_core::{
    new_v7, validate_emoji, validate_notebook_title, CreateNotebookRequest, Error, Notebook,
    NotebookRepository, NotebookSummary, Result, UpdateNotebookRequest,
};

/// PostgreSQL implementation of NotebookRepository.
pub struct PgNotebookRepository {
    pool: Pool<Postgres>,
}

impl PgNotebookRepository {
    /// Create a new PgNotebookRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn map_row_to_notebook(row: &PgRow) -> Notebook {
    Notebook {
        id: row.get("id"),
        title: row.get("title"),
        emoji: row.get("emoji"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl NotebookRepository for PgNotebookRepository {
    async fn create(&self, req: CreateNotebookRequest) -> Result<Notebook> {
        let title = validate_notebook_title(&req.title)?;
        let emoji = validate_emoji(req.emoji.as_deref())?;

        let id = new_v7();
        let now = now_micros();

        sqlx::query(
            "INSERT INTO notebooks (id, title, emoji, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $4)",
        )
        .bind(id)
        .bind(&title)
        .bind(&emoji)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        info!(
            subsystem = "db",
            component = "notebooks",
            op = "create",
            notebook_id = %id,
            "Notebook created"
        );

        Ok(Notebook {
            id,
            title,
            emoji,
            created_at: now,
            updated_at: now,
        })
    }

    async fn fetch(&self, id: Uuid) -> Result<Notebook> {
        let row = sqlx::query(
            "SELECT id, title, emoji, created_at, updated_at FROM notebooks WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.map(|r| map_row_to_notebook(&r))
            .ok_or(Error::NotebookNotFound(id))
    }

    async fn list(&self) -> Result<Vec<NotebookSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT n.id, n.title, n.emoji, n.created_at, n.updated_at,
                   COALESCE((SELECT COUNT(*) FROM sources s WHERE s.notebook_id = n.id), 0) AS source_count
            FROM notebooks n
            ORDER BY n.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "notebooks",
            op = "list",
            result_count = rows.len(),
            "Notebooks listed"
        );

        Ok(rows
            .into_iter()
            .map(|r| NotebookSummary {
                id: r.get("id"),
                title: r.get("title"),
                emoji: r.get("emoji"),
                source_count: r.get("source_count"),
                created_at: r.get("created_at"),
                updated_at: r.get("updated_at"),
            })
            .collect())
    }

    async fn update(&self, id: Uuid, req: UpdateNotebookRequest) -> Result<Notebook> {
        let title = validate_notebook_title(&req.title)?;
        let emoji = validate_emoji(req.emoji.as_deref())?;
        let now = now_micros();

        let result = sqlx::query(
            "UPDATE notebooks SET title = $1, emoji = $2, updated_at = $3 WHERE id = $4",
        )
        .bind(&title)
        .bind(&emoji)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotebookNotFound(id));
        }

        info!(
            subsystem = "db",
            component = "notebooks",
            op = "update",
            notebook_id = %id,
            "Notebook updated"
        );

        self.fetch(id).await
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        // Sources go with the notebook via ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM notebooks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        info!(
            subsystem = "db",
            component = "notebooks",
            op = "delete",
            notebook_id = %id,
            deleted = result.rows_affected() > 0,
            "Notebook delete"
        );
        Ok(())
    }

    async fn exists(&self, id: Uuid) -> Result<bool> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM notebooks WHERE id = $1) AS present")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(row.get("present"))
    }
}
