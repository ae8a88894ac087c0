//! Error bodies returned by the HTTP layer.

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde_json::json;

use crate::export::ExportError;
use crate::github::error::FetchError;

impl IntoResponse for FetchError {
    fn into_response(self) -> Response {
        match &self {
            Self::Validation { .. } | Self::MissingCredential => {
                tracing::debug!("rejecting request: {self}");
            }
            Self::ProtocolViolation { .. } | Self::Unknown { .. } => {
                tracing::error!("comment fetch failed: {self}");
            }
            _ => tracing::warn!("comment fetch failed: {self}"),
        }

        let body = Json(json!({ "error": self.user_message() }));
        (self.status_code(), body).into_response()
    }
}

impl IntoResponse for ExportError {
    fn into_response(self) -> Response {
        tracing::error!("{self}");
        let body = Json(json!({ "error": "Failed to generate export. Please try again." }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
