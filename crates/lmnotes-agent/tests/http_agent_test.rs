//! Integration tests for the HTTP agent client against a local mock server.

use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lmnotes_agent::HttpAgentClient;
use lmnotes_core::{AgentClient, ChatMessage, Error, UploadRequest};

fn upload_request() -> UploadRequest {
    UploadRequest {
        source_id: Uuid::new_v4(),
        notebook_id: Uuid::new_v4(),
        file_name: "notes.pdf".to_string(),
        mime_type: "application/pdf".to_string(),
        data: b"%PDF-1.4 two kilobytes of knowledge".to_vec(),
    }
}

#[tokio::test]
async fn upload_posts_multipart_form_with_identifiers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpAgentClient::with_config(server.uri());
    let req = upload_request();
    client.upload(&req).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let content_type = requests[0]
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(content_type.starts_with("multipart/form-data"));

    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("name=\"file\""));
    assert!(body.contains("filename=\"notes.pdf\""));
    assert!(body.contains("application/pdf"));
    assert!(body.contains("%PDF-1.4 two kilobytes of knowledge"));
    assert!(body.contains("name=\"sourceId\""));
    assert!(body.contains(&req.source_id.to_string()));
    assert!(body.contains("name=\"notebookId\""));
    assert!(body.contains(&req.notebook_id.to_string()));
}

#[tokio::test]
async fn upload_non_success_status_is_agent_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(500).set_body_string("index unavailable"))
        .mount(&server)
        .await;

    let client = HttpAgentClient::with_config(server.uri());
    let err = client.upload(&upload_request()).await.unwrap_err();
    match err {
        Error::Agent(msg) => {
            assert!(msg.contains("500"));
            assert!(msg.contains("index unavailable"));
        }
        other => panic!("Expected Agent error, got {:?}", other),
    }
}

#[tokio::test]
async fn upload_transport_error_is_agent_error() {
    // Bind a server and drop it so the port refuses connections.
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client = HttpAgentClient::with_config(uri);
    let err = client.upload(&upload_request()).await.unwrap_err();
    assert!(matches!(err, Error::Agent(_)));
}

#[tokio::test]
async fn delete_targets_documents_sources_path() {
    let server = MockServer::start().await;
    let source_id = Uuid::new_v4();
    Mock::given(method("DELETE"))
        .and(path(format!("/documents/sources/{}", source_id)))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpAgentClient::with_config(server.uri());
    client.delete_by_source_id(source_id).await.unwrap();
}

#[tokio::test]
async fn delete_non_success_status_is_agent_error() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = HttpAgentClient::with_config(server.uri());
    let err = client.delete_by_source_id(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, Error::Agent(_)));
}

#[tokio::test]
async fn chat_sends_messages_and_parses_json_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "text": "The PDF covers Rust." })),
        )
        .mount(&server)
        .await;

    let client = HttpAgentClient::with_config(server.uri());
    let notebook_id = Uuid::new_v4();
    let messages = vec![
        ChatMessage::user("What does the PDF cover?"),
        ChatMessage::assistant("Let me check."),
        ChatMessage::user("Go ahead."),
    ];
    let reply = client.chat(&messages, notebook_id).await.unwrap();
    assert_eq!(reply, "The PDF covers Rust.");

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["notebookId"], notebook_id.to_string());
    assert_eq!(body["messages"].as_array().unwrap().len(), 3);
    assert_eq!(body["messages"][0]["role"], "user");
}

#[tokio::test]
async fn chat_accepts_bare_text_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string("plain text reply"))
        .mount(&server)
        .await;

    let client = HttpAgentClient::with_config(server.uri());
    let reply = client
        .chat(&[ChatMessage::user("hi")], Uuid::new_v4())
        .await
        .unwrap();
    assert_eq!(reply, "plain text reply");
}

#[tokio::test]
async fn chat_non_success_status_is_agent_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = HttpAgentClient::with_config(server.uri());
    let err = client
        .chat(&[ChatMessage::user("hi")], Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Agent(_)));
}
