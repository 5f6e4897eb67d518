//! Core data models for LMNotes.
//!
//! These types are shared across all LMNotes crates and represent the
//! core domain entities: notebooks, their uploaded sources, and the chat
//! messages exchanged with the indexing agent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

// =============================================================================
// NOTEBOOK TYPES
// =============================================================================

/// A named collection of sources the user organizes work around.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Notebook {
    pub id: Uuid,
    pub title: String,
    pub emoji: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Notebook with its source count, for list views.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct NotebookSummary {
    pub id: Uuid,
    pub title: String,
    pub emoji: String,
    pub source_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// SOURCE TYPES
// =============================================================================

/// Kind of an uploaded source document.
///
/// This is the single canonical representation at the core boundary. The
/// MIME-string form (`application/pdf`, `text/plain`) exists only at the
/// upload/agent edges via [`SourceKind::from_mime`] / [`SourceKind::as_mime`];
/// the persisted form is the short code (`pdf`, `text`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Pdf,
    Text,
}

impl SourceKind {
    /// Map an externally supplied MIME type into the enumeration.
    ///
    /// Returns `None` for anything outside the supported set.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "application/pdf" => Some(Self::Pdf),
            "text/plain" => Some(Self::Text),
            _ => None,
        }
    }

    /// The MIME type sent to the agent for this kind.
    pub fn as_mime(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Text => "text/plain",
        }
    }

    /// The short code persisted in the `sources.type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Text => "text",
        }
    }
}

impl std::str::FromStr for SourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pdf" => Ok(Self::Pdf),
            "text" => Ok(Self::Text),
            other => Err(Error::InvalidInput(format!(
                "unknown source kind: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single uploaded document associated with one notebook.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Source {
    pub id: Uuid,
    pub notebook_id: Uuid,
    /// The uploaded file's name.
    pub title: String,
    #[serde(rename = "type")]
    pub kind: SourceKind,
    /// Optional inline text; indexed content lives in the agent's store.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// CHAT TYPES
// =============================================================================

/// Role of a chat participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    System,
}

/// A single message in a chat conversation with the agent.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    /// Convenience constructor for a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    /// Convenience constructor for an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_source_kind_from_mime() {
        assert_eq!(
            SourceKind::from_mime("application/pdf"),
            Some(SourceKind::Pdf)
        );
        assert_eq!(SourceKind::from_mime("text/plain"), Some(SourceKind::Text));
    }

    #[test]
    fn test_source_kind_rejects_other_mimes() {
        assert_eq!(SourceKind::from_mime("image/png"), None);
        assert_eq!(SourceKind::from_mime("application/json"), None);
        assert_eq!(SourceKind::from_mime("text/html"), None);
        assert_eq!(SourceKind::from_mime(""), None);
        // No prefix or parameter matching, the comparison is exact
        assert_eq!(SourceKind::from_mime("text/plain; charset=utf-8"), None);
        assert_eq!(SourceKind::from_mime("APPLICATION/PDF"), None);
    }

    #[test]
    fn test_source_kind_round_trip() {
        for kind in [SourceKind::Pdf, SourceKind::Text] {
            assert_eq!(SourceKind::from_str(kind.as_str()).unwrap(), kind);
            assert_eq!(SourceKind::from_mime(kind.as_mime()), Some(kind));
        }
    }

    #[test]
    fn test_source_kind_from_str_rejects_mime_form() {
        // The persisted form is the short code, never the MIME string
        assert!(SourceKind::from_str("application/pdf").is_err());
        assert!(SourceKind::from_str("txt").is_err());
    }

    #[test]
    fn test_source_kind_serde_form() {
        assert_eq!(serde_json::to_string(&SourceKind::Pdf).unwrap(), "\"pdf\"");
        assert_eq!(
            serde_json::to_string(&SourceKind::Text).unwrap(),
            "\"text\""
        );
        let kind: SourceKind = serde_json::from_str("\"pdf\"").unwrap();
        assert_eq!(kind, SourceKind::Pdf);
    }

    #[test]
    fn test_chat_role_serde_form() {
        assert_eq!(serde_json::to_string(&ChatRole::User).unwrap(), "\"user\"");
        let role: ChatRole = serde_json::from_str("\"assistant\"").unwrap();
        assert_eq!(role, ChatRole::Assistant);
    }

    #[test]
    fn test_source_serializes_kind_as_type() {
        let source = Source {
            id: Uuid::nil(),
            notebook_id: Uuid::nil(),
            title: "notes.pdf".to_string(),
            kind: SourceKind::Pdf,
            content: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&source).unwrap();
        assert_eq!(json["type"], "pdf");
        assert!(json.get("content").is_none());
    }
}
