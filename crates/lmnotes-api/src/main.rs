//! lmnotes-api - HTTP API server for LMNotes.
//!
//! Thin HTTP layer over the database workflows: notebook CRUD, source
//! ingestion/deletion, and the chat proxy to the indexing agent. All
//! domain logic lives in `lmnotes-db`; handlers translate between HTTP
//! and the core types and map errors to coarse JSON responses.

mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;

use lmnotes_agent::HttpAgentClient;
use lmnotes_core::{
    defaults::REQUEST_BODY_LIMIT_BYTES, AgentClient, AppConfig, ChatRole, Error, Notebook,
    NotebookSummary, Source, SourceKind,
};
use lmnotes_db::Database;

use handlers::chat::{chat, ChatReply, ChatRequest, ContentPart, IncomingMessage};
use handlers::notebooks::{
    create_notebook, delete_notebook, get_notebook, list_notebooks, update_notebook,
    CreateNotebookBody, UpdateNotebookBody,
};
use handlers::sources::{delete_source, list_sources, upload_source};

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
///
/// UUIDv7 embeds a Unix timestamp, so IDs sort chronologically — useful for
/// log correlation and debugging production incidents.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = lmnotes_core::new_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// APPLICATION STATE
// =============================================================================

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub agent: Arc<dyn AgentClient>,
}

// =============================================================================
// OPENAPI
// =============================================================================

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LMNotes API",
        version = "0.3.0",
        description = "Notebooks of uploaded sources, indexed and answered by an external agent"
    ),
    paths(
        handlers::notebooks::list_notebooks,
        handlers::notebooks::create_notebook,
        handlers::notebooks::get_notebook,
        handlers::notebooks::update_notebook,
        handlers::notebooks::delete_notebook,
        handlers::sources::list_sources,
        handlers::sources::upload_source,
        handlers::sources::delete_source,
        handlers::chat::chat,
    ),
    components(schemas(
        Notebook,
        NotebookSummary,
        Source,
        SourceKind,
        ChatRole,
        CreateNotebookBody,
        UpdateNotebookBody,
        ChatRequest,
        ChatReply,
        IncomingMessage,
        ContentPart,
    )),
    tags(
        (name = "Notebooks", description = "Notebook CRUD operations"),
        (name = "Sources", description = "Source ingestion and deletion"),
        (name = "Chat", description = "Questions grounded in a notebook's sources"),
        (name = "System", description = "Health checks")
    )
)]
struct ApiDoc;

// =============================================================================
// ERROR HANDLING
// =============================================================================

/// API-level error with the message that crosses the HTTP boundary.
///
/// Validation errors carry the caller's mistake verbatim; agent and
/// database failures carry a coarse message while the full detail goes to
/// the server logs only.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    PayloadTooLarge(String),
    NotFound(String),
    Upstream(String),
    Internal(String),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            Error::UnsupportedType(_) => ApiError::BadRequest(err.to_string()),
            Error::PayloadTooLarge { .. } => ApiError::PayloadTooLarge(err.to_string()),
            Error::NotFound(_) | Error::NotebookNotFound(_) | Error::SourceNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            Error::Agent(detail) => {
                error!(
                    subsystem = "api",
                    error = %detail,
                    "Agent call failed"
                );
                ApiError::Upstream("The document agent is unavailable".to_string())
            }
            other => {
                error!(
                    subsystem = "api",
                    error = %other,
                    "Internal error"
                );
                ApiError::Internal("Internal server error".to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

// =============================================================================
// SYSTEM HANDLERS
// =============================================================================

/// Liveness probe.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let db_up = !state.db.pool().is_closed();
    Json(serde_json::json!({
        "status": if db_up { "ok" } else { "degraded" },
    }))
}

/// Serve the generated OpenAPI document.
async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

// =============================================================================
// STARTUP
// =============================================================================

/// Initialize tracing with configurable output.
///
/// Environment variables:
///   LOG_FORMAT  - "json" or "text" (default: "text")
///   LOG_FILE    - path to log file (optional, enables file logging)
///   LOG_ANSI    - "true"/"false" override ANSI colors (auto-detected by default)
///   RUST_LOG    - standard env filter (default: "lmnotes_api=debug,tower_http=debug")
fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "lmnotes_api=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    let guard = if let Some(ref path) = log_file {
        let file_dir = std::path::Path::new(path)
            .parent()
            .unwrap_or(std::path::Path::new("."));
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("lmnotes-api.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(log_ansi.unwrap_or(false)),
                )
                .init();
        }
        Some(guard)
    } else {
        if log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer();
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );
    guard
}

fn app(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // OpenAPI document
        .route("/api-docs/openapi.json", get(openapi_json))
        // Notebook CRUD
        .route("/api/v1/notebooks", get(list_notebooks).post(create_notebook))
        .route(
            "/api/v1/notebooks/:id",
            get(get_notebook).patch(update_notebook).delete(delete_notebook),
        )
        // Sources
        .route(
            "/api/v1/notebooks/:id/sources",
            get(list_sources).post(upload_source),
        )
        .route("/api/v1/sources/:id", delete(delete_source))
        // Chat
        .route("/api/v1/chat", post(chat))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(CorsLayer::permissive())
        // axum's built-in extractor limit defaults to 2 MB; raise it so a
        // 10 MiB file reaches validation and gets the typed error.
        .layer(DefaultBodyLimit::max(REQUEST_BODY_LIMIT_BYTES))
        .layer(RequestBodyLimitLayer::new(REQUEST_BODY_LIMIT_BYTES))
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let _log_guard = init_tracing();

    // DATABASE_URL and AGENT_BASE_URL are required; bail out before
    // touching the network if either is missing.
    let config = AppConfig::from_env()?;

    let agent: Arc<dyn AgentClient> =
        Arc::new(HttpAgentClient::with_config(config.agent_base_url.clone()));

    info!("Connecting to database...");
    let db = Database::connect(&config.database_url, agent.clone()).await?;
    info!("Database connected");

    info!("Running database migrations...");
    db.migrate().await?;
    info!("Database migrations complete");

    let state = AppState { db, agent };
    let router = app(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_validation_errors_map_to_400() {
        let err: ApiError = Error::InvalidInput("empty title".to_string()).into();
        assert_eq!(status_of(err), StatusCode::BAD_REQUEST);

        let err: ApiError = Error::UnsupportedType("image/png".to_string()).into();
        assert_eq!(status_of(err), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_validation_message_crosses_boundary_verbatim() {
        let err: ApiError = Error::InvalidInput("Title is required".to_string()).into();
        match err {
            ApiError::BadRequest(msg) => assert_eq!(msg, "Title is required"),
            other => panic!("Expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_payload_too_large_maps_to_413() {
        let err: ApiError = Error::PayloadTooLarge {
            size: 11_000_000,
            max: 10_485_760,
        }
        .into();
        assert_eq!(status_of(err), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err: ApiError = Error::NotebookNotFound(Uuid::nil()).into();
        assert_eq!(status_of(err), StatusCode::NOT_FOUND);

        let err: ApiError = Error::SourceNotFound(Uuid::nil()).into();
        assert_eq!(status_of(err), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_agent_error_maps_to_502_with_coarse_message() {
        let err: ApiError =
            Error::Agent("upload returned 500: stack trace with internals".to_string()).into();
        match &err {
            ApiError::Upstream(msg) => {
                // No internal detail leaks across the boundary.
                assert!(!msg.contains("stack trace"));
                assert!(!msg.contains("500"));
            }
            other => panic!("Expected Upstream, got {:?}", other),
        }
        assert_eq!(status_of(err), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_database_error_maps_to_500_with_coarse_message() {
        let err: ApiError = Error::Database(sqlx::Error::PoolTimedOut).into();
        match &err {
            ApiError::Internal(msg) => assert_eq!(msg, "Internal server error"),
            other => panic!("Expected Internal, got {:?}", other),
        }
        assert_eq!(status_of(err), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
