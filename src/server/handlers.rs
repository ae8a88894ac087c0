//! Route handlers.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::PrivateCookieJar;
use chrono::Utc;
use http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue};
use serde_json::{Map, Value, json};

use super::AppState;
use crate::export::{ExportError, MARKDOWN_CONTENT_TYPE, write_markdown};
use crate::github::error::FetchError;
use crate::github::locator::{FetchRequest, PersonalAccessToken};
use crate::service::{CommentService, CommentsPayload};
use crate::session::{CookieCredentialStore, CredentialStore};

const JSON_MEDIA_TYPE: &str = "application/json";

pub(super) async fn health() -> &'static str {
    "OK"
}

pub(super) async fn store_credential(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let token = match json_object(&headers, &body).and_then(|fields| submitted_token(&fields)) {
        Ok(token) => token,
        Err(error) => return error.into_response(),
    };

    let store = state.credential_store(jar).set(&token);
    tracing::info!("stored GitHub token for session");
    (store.into_jar(), Json(json!({ "success": true }))).into_response()
}

pub(super) async fn credential_status(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
) -> Json<Value> {
    let has_token = state.credential_store(jar).get().is_some();
    Json(json!({ "hasToken": has_token }))
}

pub(super) async fn delete_credential(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
) -> impl IntoResponse {
    let store = state.credential_store(jar).clear();
    tracing::info!("cleared GitHub token for session");
    (store.into_jar(), Json(json!({ "success": true })))
}

pub(super) async fn fetch_comments(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let store = state.credential_store(jar);
    let request = match checked_request(&store, &headers, &body) {
        Ok(request) => request,
        Err(error) => return error.into_response(),
    };

    let service = CommentService::new(state.gateway.as_ref());
    let (updated, result) = service.fetch(store, &request).await;
    (updated.into_jar(), result.map(Json)).into_response()
}

pub(super) async fn export_comments(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let store = state.credential_store(jar);
    let request = match checked_request(&store, &headers, &body) {
        Ok(request) => request,
        Err(error) => return error.into_response(),
    };

    let service = CommentService::new(state.gateway.as_ref());
    let (updated, result) = service.fetch(store, &request).await;
    let response = match result {
        Ok(payload) => markdown_attachment(&request, &payload).into_response(),
        Err(error) => error.into_response(),
    };
    (updated.into_jar(), response).into_response()
}

/// Applies the checks shared by the comment routes, in order: media type,
/// stored token, then body fields.
fn checked_request(
    store: &CookieCredentialStore,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<FetchRequest, FetchError> {
    require_json(headers)?;
    if store.get().is_none() {
        return Err(FetchError::MissingCredential);
    }
    let fields = parse_object(body)?;
    FetchRequest::from_body(&fields)
}

fn json_object(headers: &HeaderMap, body: &[u8]) -> Result<Map<String, Value>, FetchError> {
    require_json(headers)?;
    parse_object(body)
}

fn require_json(headers: &HeaderMap) -> Result<(), FetchError> {
    let is_json = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.to_ascii_lowercase().contains(JSON_MEDIA_TYPE));
    if is_json {
        Ok(())
    } else {
        Err(FetchError::validation("Content-Type must be application/json"))
    }
}

fn parse_object(body: &[u8]) -> Result<Map<String, Value>, FetchError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(fields)) => Ok(fields),
        _ => Err(FetchError::validation("Invalid request body")),
    }
}

fn submitted_token(fields: &Map<String, Value>) -> Result<PersonalAccessToken, FetchError> {
    let token = fields
        .get("token")
        .and_then(Value::as_str)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| FetchError::validation("Token is required"))?;
    PersonalAccessToken::parse_submitted(token)
}

fn markdown_attachment(
    request: &FetchRequest,
    payload: &CommentsPayload,
) -> Result<Response, ExportError> {
    let mut document = Vec::new();
    write_markdown(&mut document, request, &payload.comments, Utc::now())?;

    let disposition = format!("attachment; filename=\"{}\"", request.export_file_name());
    let disposition_value =
        HeaderValue::from_str(&disposition).map_err(|error| ExportError::Io {
            message: error.to_string(),
        })?;

    Ok((
        [
            (CONTENT_TYPE, HeaderValue::from_static(MARKDOWN_CONTENT_TYPE)),
            (CONTENT_DISPOSITION, disposition_value),
        ],
        document,
    )
        .into_response())
}
