//! Chat HTTP handler — proxies questions to the indexing agent.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ApiError, AppState};
use lmnotes_core::{ChatMessage, ChatRole, Error, NotebookRepository};

/// One part of a structured message body.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ContentPart {
    #[serde(default, rename = "type")]
    pub part_type: Option<String>,
    pub text: String,
}

/// Message content: either a plain string or a list of text parts
/// (assistant-UI clients send the latter).
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    /// Flatten structured parts into one text block.
    fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Parts(parts) => parts
                .into_iter()
                .map(|p| p.text)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// An incoming chat message.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct IncomingMessage {
    pub role: ChatRole,
    pub content: MessageContent,
}

/// Request body for the chat endpoint.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ChatRequest {
    pub messages: Vec<IncomingMessage>,
    #[serde(rename = "notebookId")]
    pub notebook_id: Uuid,
}

/// The agent's reply.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ChatReply {
    pub text: String,
}

/// Ask the agent a question grounded in the notebook's indexed sources.
#[utoipa::path(post, path = "/api/v1/chat", tag = "Chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Assistant reply", body = ChatReply),
        (status = 400, description = "No messages"),
        (status = 404, description = "Notebook not found"),
        (status = 502, description = "Agent unavailable"),
    ))]
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatReply>, ApiError> {
    if body.messages.is_empty() {
        return Err(ApiError::BadRequest("No messages provided".to_string()));
    }
    if !state.db.notebooks.exists(body.notebook_id).await? {
        return Err(Error::NotebookNotFound(body.notebook_id).into());
    }

    let messages: Vec<ChatMessage> = body
        .messages
        .into_iter()
        .map(|m| ChatMessage {
            role: m.role,
            content: m.content.into_text(),
        })
        .collect();

    let text = state.agent.chat(&messages, body.notebook_id).await?;
    Ok(Json(ChatReply { text }))
}
