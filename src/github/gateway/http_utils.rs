//! Shared HTTP body helpers for gateway implementations.

use serde_json::Value;

use crate::github::error::FetchError;
use crate::github::models::RawReviewComment;

pub(super) fn extract_github_message(body: &str) -> Option<String> {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return None;
    };
    value
        .get("message")
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
}

/// Decodes one successful page, which must be a JSON array.
pub(super) fn parse_page_body(body: &[u8]) -> Result<Vec<RawReviewComment>, FetchError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|error| FetchError::ProtocolViolation {
            message: format!("response body is not JSON: {error}"),
        })?;

    match value {
        Value::Array(items) => Ok(items.into_iter().map(RawReviewComment::new).collect()),
        other => Err(FetchError::ProtocolViolation {
            message: format!("expected a JSON array, got {}", json_kind(&other)),
        }),
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
