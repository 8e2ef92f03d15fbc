//! HTTP error responses

use crate::error::SchemaBridgeError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Error returned by handlers, rendered as `{"detail": "..."}`
#[derive(Debug)]
pub struct ApiError(anyhow::Error);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.downcast_ref::<SchemaBridgeError>() {
            Some(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            Some(SchemaBridgeError::Provider(_))
            | Some(SchemaBridgeError::MissingCredentials(_))
            | Some(SchemaBridgeError::Http(_)) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {:#}", self.0);
        } else {
            tracing::warn!("Request rejected: {}", self.0);
        }
        (status, Json(json!({ "detail": self.0.to_string() }))).into_response()
    }
}
