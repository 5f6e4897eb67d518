//! # lmnotes-core
//!
//! Core types, traits, and abstractions for the LMNotes system.
//!
//! This crate provides the foundational data structures and trait
//! definitions that the other LMNotes crates depend on: domain models,
//! the error taxonomy, input validation for the ingestion boundary, and
//! the repository/agent-client interfaces.

pub mod config;
pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;
pub mod uuid_utils;
pub mod validation;

// Re-export commonly used types at crate root
pub use config::AppConfig;
pub use error::{Error, Result};
pub use models::{ChatMessage, ChatRole, Notebook, NotebookSummary, Source, SourceKind};
pub use traits::{
    AgentClient, CreateNotebookRequest, IngestSourceRequest, NotebookRepository, SourceRepository,
    UpdateNotebookRequest, UploadRequest,
};
pub use uuid_utils::{is_v7, new_v7};
pub use validation::{
    sanitize_filename, validate_emoji, validate_notebook_title, validate_upload,
};
