//! Mock agent client for deterministic testing.
//!
//! Records every call and can be configured to fail specific operations,
//! which is how the workflow tests verify the rollback properties of
//! ingestion and deletion.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use lmnotes_core::{AgentClient, ChatMessage, Error, Result, UploadRequest};

/// One recorded agent call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Upload {
        source_id: Uuid,
        notebook_id: Uuid,
        file_name: String,
        mime_type: String,
        size_bytes: usize,
    },
    Delete {
        source_id: Uuid,
    },
    Chat {
        notebook_id: Uuid,
        message_count: usize,
    },
}

#[derive(Debug, Clone)]
struct MockConfig {
    fail_uploads: bool,
    fail_deletes: bool,
    fail_chat: bool,
    chat_response: String,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            fail_uploads: false,
            fail_deletes: false,
            fail_chat: false,
            chat_response: "Mock agent reply".to_string(),
        }
    }
}

/// Mock agent client for testing.
#[derive(Clone, Default)]
pub struct MockAgentClient {
    config: Arc<MockConfig>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockAgentClient {
    /// Create a mock that succeeds on every call.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every upload call fail, as if the agent returned 500.
    pub fn with_fail_uploads(mut self) -> Self {
        Arc::make_mut(&mut self.config).fail_uploads = true;
        self
    }

    /// Make every delete call fail.
    pub fn with_fail_deletes(mut self) -> Self {
        Arc::make_mut(&mut self.config).fail_deletes = true;
        self
    }

    /// Make every chat call fail.
    pub fn with_fail_chat(mut self) -> Self {
        Arc::make_mut(&mut self.config).fail_chat = true;
        self
    }

    /// Set the canned chat reply.
    pub fn with_chat_response(mut self, response: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).chat_response = response.into();
        self
    }

    /// All calls recorded so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("mock call log poisoned").clone()
    }

    /// Recorded upload calls only.
    pub fn upload_calls(&self) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, RecordedCall::Upload { .. }))
            .collect()
    }

    fn record(&self, call: RecordedCall) {
        self.calls.lock().expect("mock call log poisoned").push(call);
    }
}

#[async_trait]
impl AgentClient for MockAgentClient {
    async fn upload(&self, req: &UploadRequest) -> Result<()> {
        self.record(RecordedCall::Upload {
            source_id: req.source_id,
            notebook_id: req.notebook_id,
            file_name: req.file_name.clone(),
            mime_type: req.mime_type.clone(),
            size_bytes: req.data.len(),
        });
        if self.config.fail_uploads {
            return Err(Error::Agent("upload returned 500: mock failure".to_string()));
        }
        Ok(())
    }

    async fn delete_by_source_id(&self, source_id: Uuid) -> Result<()> {
        self.record(RecordedCall::Delete { source_id });
        if self.config.fail_deletes {
            return Err(Error::Agent("delete returned 500: mock failure".to_string()));
        }
        Ok(())
    }

    async fn chat(&self, messages: &[ChatMessage], notebook_id: Uuid) -> Result<String> {
        self.record(RecordedCall::Chat {
            notebook_id,
            message_count: messages.len(),
        });
        if self.config.fail_chat {
            return Err(Error::Agent("chat returned 500: mock failure".to_string()));
        }
        Ok(self.config.chat_response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload_request() -> UploadRequest {
        UploadRequest {
            source_id: Uuid::new_v4(),
            notebook_id: Uuid::new_v4(),
            file_name: "notes.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            data: b"%PDF-1.4".to_vec(),
        }
    }

    #[tokio::test]
    async fn test_records_upload_calls() {
        let mock = MockAgentClient::new();
        let req = upload_request();
        mock.upload(&req).await.unwrap();

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            RecordedCall::Upload {
                source_id,
                file_name,
                ..
            } => {
                assert_eq!(*source_id, req.source_id);
                assert_eq!(file_name, "notes.pdf");
            }
            other => panic!("Expected Upload, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fail_uploads_records_then_fails() {
        let mock = MockAgentClient::new().with_fail_uploads();
        let err = mock.upload(&upload_request()).await.unwrap_err();
        assert!(matches!(err, Error::Agent(_)));
        // The call is still recorded, mirroring a real request that reached
        // the agent and came back non-2xx.
        assert_eq!(mock.upload_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_chat_returns_configured_response() {
        let mock = MockAgentClient::new().with_chat_response("grounded answer");
        let reply = mock
            .chat(&[ChatMessage::user("question")], Uuid::new_v4())
            .await
            .unwrap();
        assert_eq!(reply, "grounded answer");
    }

    #[tokio::test]
    async fn test_delete_failure() {
        let mock = MockAgentClient::new().with_fail_deletes();
        assert!(mock.delete_by_source_id(Uuid::new_v4()).await.is_err());
    }
}
