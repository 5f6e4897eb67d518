//! HTTP implementation of the agent client.
//!
//! The agent exposes three endpoints this service consumes:
//! - `POST /upload` — multipart form (`file`, `notebookId`, `sourceId`)
//! - `DELETE /documents/sources/{sourceId}`
//! - `POST /chat` — JSON `{ messages, notebookId }`
//!
//! Any non-2xx response or transport error maps to [`Error::Agent`]; the
//! surrounding workflow treats that as a hard failure. No automatic retry.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{multipart, Client, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use lmnotes_core::defaults::{
    AGENT_CHAT_TIMEOUT_SECS, AGENT_REQUEST_TIMEOUT_SECS, AGENT_UPLOAD_TIMEOUT_SECS,
    ENV_AGENT_BASE_URL,
};
use lmnotes_core::{AgentClient, ChatMessage, Error, Result, UploadRequest};

/// Maximum bytes of an error response body carried into an error message.
const ERROR_BODY_SNIPPET_LEN: usize = 256;

/// HTTP client for the external indexing agent.
pub struct HttpAgentClient {
    client: Client,
    base_url: String,
    upload_timeout: Duration,
    chat_timeout: Duration,
    request_timeout: Duration,
}

impl HttpAgentClient {
    /// Create a client for the given base URL with default timeouts.
    pub fn with_config(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .build()
            .expect("Failed to create HTTP client");

        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!(
            subsystem = "agent",
            component = "http_client",
            base_url = %base_url,
            "Initializing agent client"
        );

        Self {
            client,
            base_url,
            upload_timeout: Duration::from_secs(AGENT_UPLOAD_TIMEOUT_SECS),
            chat_timeout: Duration::from_secs(AGENT_CHAT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(AGENT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Create from environment variables. `AGENT_BASE_URL` is required;
    /// `AGENT_UPLOAD_TIMEOUT_SECS` and `AGENT_CHAT_TIMEOUT_SECS` override
    /// the default timeouts.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(ENV_AGENT_BASE_URL)
            .map_err(|_| Error::Config(format!("{} is not set", ENV_AGENT_BASE_URL)))?;

        let mut client = Self::with_config(base_url);
        if let Some(secs) = env_secs("AGENT_UPLOAD_TIMEOUT_SECS") {
            client.upload_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = env_secs("AGENT_CHAT_TIMEOUT_SECS") {
            client.chat_timeout = Duration::from_secs(secs);
        }
        Ok(client)
    }

    /// The configured agent base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Map a non-success response to `Error::Agent` with a body snippet.
    /// Full detail stays in the server logs; callers surface coarse errors.
    async fn check_status(op: &str, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let snippet: String = body.chars().take(ERROR_BODY_SNIPPET_LEN).collect();
        warn!(
            subsystem = "agent",
            component = "http_client",
            op = op,
            status = %status,
            error = %snippet,
            "Agent request failed"
        );
        Err(Error::Agent(format!("{} returned {}: {}", op, status, snippet)))
    }
}

/// Wire form of the chat request body.
#[derive(Debug, Serialize)]
struct ChatRequestBody<'a> {
    messages: &'a [ChatMessage],
    #[serde(rename = "notebookId")]
    notebook_id: Uuid,
}

/// Wire form of the chat response; the agent may instead answer with a
/// bare text body, which the client also accepts.
#[derive(Debug, Deserialize)]
struct ChatResponseBody {
    text: String,
}

#[async_trait]
impl AgentClient for HttpAgentClient {
    async fn upload(&self, req: &UploadRequest) -> Result<()> {
        let start = Instant::now();

        let part = multipart::Part::bytes(req.data.clone())
            .file_name(req.file_name.clone())
            .mime_str(&req.mime_type)
            .map_err(|e| Error::InvalidInput(format!("invalid MIME type: {}", e)))?;
        let form = multipart::Form::new()
            .part("file", part)
            .text("notebookId", req.notebook_id.to_string())
            .text("sourceId", req.source_id.to_string());

        let response = self
            .client
            .post(format!("{}/upload", self.base_url))
            .multipart(form)
            .timeout(self.upload_timeout)
            .send()
            .await?;
        Self::check_status("upload", response).await?;

        debug!(
            subsystem = "agent",
            component = "http_client",
            op = "upload",
            source_id = %req.source_id,
            notebook_id = %req.notebook_id,
            size_bytes = req.data.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Source uploaded to agent"
        );
        Ok(())
    }

    async fn delete_by_source_id(&self, source_id: Uuid) -> Result<()> {
        let response = self
            .client
            .delete(format!(
                "{}/documents/sources/{}",
                self.base_url, source_id
            ))
            .timeout(self.request_timeout)
            .send()
            .await?;
        Self::check_status("delete", response).await?;

        debug!(
            subsystem = "agent",
            component = "http_client",
            op = "delete",
            source_id = %source_id,
            "Source index entry deleted from agent"
        );
        Ok(())
    }

    async fn chat(&self, messages: &[ChatMessage], notebook_id: Uuid) -> Result<String> {
        let start = Instant::now();

        let response = self
            .client
            .post(format!("{}/chat", self.base_url))
            .json(&ChatRequestBody {
                messages,
                notebook_id,
            })
            .timeout(self.chat_timeout)
            .send()
            .await?;
        let response = Self::check_status("chat", response).await?;

        let body = response.text().await?;
        // Prefer the JSON envelope; fall back to a bare text body.
        let text = match serde_json::from_str::<ChatResponseBody>(&body) {
            Ok(parsed) => parsed.text,
            Err(_) => body,
        };

        debug!(
            subsystem = "agent",
            component = "http_client",
            op = "chat",
            notebook_id = %notebook_id,
            response_len = text.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Chat reply received from agent"
        );
        Ok(text)
    }
}

fn env_secs(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|v| v.parse::<u64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_normalized() {
        let client = HttpAgentClient::with_config("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_chat_request_wire_form() {
        let messages = vec![ChatMessage::user("What does the PDF say?")];
        let notebook_id = Uuid::nil();
        let body = ChatRequestBody {
            messages: &messages,
            notebook_id,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["notebookId"], notebook_id.to_string());
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "What does the PDF say?");
    }
}
