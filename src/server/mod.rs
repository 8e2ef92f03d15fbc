//! HTTP surface
//!
//! Routes:
//!
//! - `POST /upload` multipart form with `source_file` and `sink_file`
//! - `POST /chat` url-encoded form with `message`
//! - `GET /session` current state of the caller's session
//! - `GET /healthz` liveness probe
//!
//! The caller's session is chosen by the `x-session-id` header and falls
//! back to [`DEFAULT_SESSION_ID`].

pub mod error;

pub use error::ApiError;

use crate::assistant::{Assistant, ChatReply, UploadReply};
use crate::error::{Result, SchemaBridgeError};
use crate::session::{Session, SessionHandle, SessionStore, DEFAULT_SESSION_ID};
use crate::upload::UploadedDocument;
use anyhow::Context;
use axum::extract::{Multipart, State};
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Header naming the session a request belongs to
pub const SESSION_HEADER: &str = "x-session-id";

const SOURCE_FIELD: &str = "source_file";
const SINK_FIELD: &str = "sink_file";

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub assistant: Arc<Assistant>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(assistant: Assistant) -> Self {
        Self {
            assistant: Arc::new(assistant),
            sessions: Arc::new(SessionStore::new()),
        }
    }

    fn session_for(&self, headers: &HeaderMap) -> SessionHandle {
        let id = headers
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_SESSION_ID);
        self.sessions.get_or_create(id)
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatForm {
    pub message: String,
}

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/upload", post(upload))
        .route("/chat", post(chat))
        .route("/session", get(session))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Serve `router` on `bind` until Ctrl-C is received
pub async fn serve(router: Router, bind: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    tracing::info!("SchemaBridge HTTP server listening on {}", bind);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
            tracing::info!("Shutting down");
        })
        .await
        .context("HTTP server failed")?;
    Ok(())
}

async fn healthz() -> &'static str {
    "ok"
}

async fn upload(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> std::result::Result<Json<UploadReply>, ApiError> {
    let (source, sink) = read_upload_pair(multipart).await?;

    let handle = state.session_for(&headers);
    let mut session = handle.lock().await;
    let reply = state.assistant.upload(&mut session, source, sink).await?;
    Ok(Json(reply))
}

async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ChatForm>,
) -> std::result::Result<Json<ChatReply>, ApiError> {
    let handle = state.session_for(&headers);
    let mut session = handle.lock().await;
    let reply = state.assistant.chat(&mut session, &form.message).await?;
    Ok(Json(reply))
}

async fn session(State(state): State<AppState>, headers: HeaderMap) -> Json<Session> {
    let handle = state.session_for(&headers);
    let session = handle.lock().await;
    Json(session.clone())
}

/// Read and validate both files before any session is touched
async fn read_upload_pair(
    mut multipart: Multipart,
) -> Result<(UploadedDocument, UploadedDocument)> {
    let mut source = None;
    let mut sink = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| SchemaBridgeError::InvalidUpload(format!("Malformed multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name != SOURCE_FIELD && name != SINK_FIELD {
            tracing::debug!("Ignoring multipart field {}", name);
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(|e| {
            SchemaBridgeError::InvalidUpload(format!("Failed to read {}: {}", name, e))
        })?;
        let document = UploadedDocument::parse(&filename, &bytes)?;

        if name == SOURCE_FIELD {
            source = Some(document);
        } else {
            sink = Some(document);
        }
    }

    match (source, sink) {
        (Some(source), Some(sink)) => Ok((source, sink)),
        (None, _) => Err(missing_field(SOURCE_FIELD)),
        (_, None) => Err(missing_field(SINK_FIELD)),
    }
}

fn missing_field(name: &str) -> anyhow::Error {
    SchemaBridgeError::InvalidUpload(format!("Missing form field '{}'", name)).into()
}
