//! Review comment records as GitHub returns them and as this crate exposes them.
//!
//! GitHub's payload is treated as untrusted: [`RawReviewComment`] keeps the
//! JSON value untouched and every field is read through an accessor that
//! returns `Option`, so each caller has to decide what absence means.
//! [`ReviewComment`] is the stable shape handed to clients.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Author login used when a comment's user record has no login.
pub const UNKNOWN_AUTHOR: &str = "unknown";

/// One element of a review comments page, exactly as GitHub sent it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct RawReviewComment(Value);

impl RawReviewComment {
    /// Wraps an arbitrary JSON value.
    #[must_use]
    pub const fn new(value: Value) -> Self {
        Self(value)
    }

    /// Borrow the underlying JSON.
    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }

    fn field(&self, name: &str) -> Option<&Value> {
        self.0
            .as_object()
            .and_then(|record| record.get(name))
            .filter(|value| !value.is_null())
    }

    fn text_field(&self, name: &str) -> Option<&str> {
        self.field(name)
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
    }

    fn line_field(&self, name: &str) -> Option<u64> {
        self.field(name)
            .and_then(Value::as_u64)
            .filter(|line| *line > 0)
    }

    /// The `user` sub-record, when present and not `null`.
    #[must_use]
    pub fn user(&self) -> Option<&Value> {
        self.field("user")
    }

    /// The user's login, when the user record carries a non-empty one.
    #[must_use]
    pub fn author_login(&self) -> Option<&str> {
        self.user()
            .and_then(|user| user.get("login"))
            .and_then(Value::as_str)
            .filter(|login| !login.is_empty())
    }

    /// File path the comment is attached to.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.text_field("path")
    }

    /// Comment body.
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.text_field("body")
    }

    /// Line in the current diff.
    #[must_use]
    pub fn line(&self) -> Option<u64> {
        self.line_field("line")
    }

    /// Line in the diff the comment was originally made on.
    #[must_use]
    pub fn original_line(&self) -> Option<u64> {
        self.line_field("original_line")
    }

    /// Creation timestamp (ISO 8601).
    #[must_use]
    pub fn created_at(&self) -> Option<&str> {
        self.text_field("created_at")
    }
}

impl From<Value> for RawReviewComment {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

/// Normalized pull request review comment.
///
/// Serializes as `{ path, body, line?, user: { login }, created_at }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "WireReviewComment")]
pub struct ReviewComment {
    /// File path the comment is attached to, or empty.
    pub path: String,
    /// Comment body, or empty.
    pub body: String,
    /// Current line, falling back to the original line.
    pub line: Option<u64>,
    /// Author login, or [`UNKNOWN_AUTHOR`].
    pub author: String,
    /// Creation timestamp, or empty.
    pub created_at: String,
}

impl ReviewComment {
    /// Normalizes one raw record.
    ///
    /// Returns `None` for records without a user, which are not genuine
    /// review comments.
    #[must_use]
    pub fn from_raw(raw: &RawReviewComment) -> Option<Self> {
        raw.user()?;

        Some(Self {
            path: raw.path().unwrap_or_default().to_owned(),
            body: raw.body().unwrap_or_default().to_owned(),
            line: raw.line().or_else(|| raw.original_line()),
            author: raw.author_login().unwrap_or(UNKNOWN_AUTHOR).to_owned(),
            created_at: raw.created_at().unwrap_or_default().to_owned(),
        })
    }
}

#[derive(Serialize)]
struct WireReviewComment {
    path: String,
    body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<u64>,
    user: WireUser,
    created_at: String,
}

#[derive(Serialize)]
struct WireUser {
    login: String,
}

impl From<ReviewComment> for WireReviewComment {
    fn from(comment: ReviewComment) -> Self {
        Self {
            path: comment.path,
            body: comment.body,
            line: comment.line,
            user: WireUser {
                login: comment.author,
            },
            created_at: comment.created_at,
        }
    }
}
