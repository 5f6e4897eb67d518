//! # lmnotes-db
//!
//! PostgreSQL database layer for LMNotes.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for notebooks and sources
//! - The source ingestion/deletion workflows that keep the relational
//!   store and the external agent's index consistent
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use lmnotes_agent::HttpAgentClient;
//! use lmnotes_db::Database;
//! use lmnotes_core::{CreateNotebookRequest, NotebookRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let agent = Arc::new(HttpAgentClient::with_config("http://localhost:8000"));
//!     let db = Database::connect("postgres://localhost/lmnotes", agent).await?;
//!
//!     let notebook = db.notebooks.create(CreateNotebookRequest {
//!         title: "Research".to_string(),
//!         emoji: Some("📚".to_string()),
//!     }).await?;
//!
//!     println!("Created notebook: {}", notebook.id);
//!     Ok(())
//! }
//! ```

pub mod notebooks;
pub mod pool;
pub mod sources;

// Test fixtures for integration tests
// Note: Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};

// Re-export core types
pub use lmnotes_core::*;

/// Current time truncated to microseconds, the precision Postgres stores.
/// Keeps returned models byte-equal to their later fetched form.
pub(crate) fn now_micros() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

// Re-export repository implementations
pub use notebooks::PgNotebookRepository;
pub use pool::{create_pool, create_pool_with_config, PoolConfig};
pub use sources::PgSourceRepository;

/// Combined database context with all repositories.
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Notebook repository for CRUD operations.
    pub notebooks: PgNotebookRepository,
    /// Source repository with the ingestion/deletion workflows.
    pub sources: PgSourceRepository,
    /// Agent client shared with the source repository (kept for Clone).
    agent: Arc<dyn AgentClient>,
}

impl Database {
    /// Create a new Database instance from a connection pool and agent client.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>, agent: Arc<dyn AgentClient>) -> Self {
        Self {
            notebooks: PgNotebookRepository::new(pool.clone()),
            sources: PgSourceRepository::new(pool.clone(), agent.clone()),
            agent,
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str, agent: Arc<dyn AgentClient>) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool, agent))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(
        url: &str,
        config: PoolConfig,
        agent: Arc<dyn AgentClient>,
    ) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool, agent))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self::new(self.pool.clone(), self.agent.clone())
    }
}
