//! Error types exposed by the GitHub comment-fetching layer.
//!
//! Every failure a caller can observe is one variant of [`FetchError`]. Each
//! variant carries the HTTP status the API boundary answers with and a
//! message that is safe to show to the person who submitted the request.

use http::StatusCode;
use thiserror::Error;

/// Errors surfaced while validating input or communicating with GitHub.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The request was malformed and never reached the network.
    #[error("invalid request: {message}")]
    Validation {
        /// Human-readable description of what was rejected.
        message: String,
    },

    /// No personal access token is stored for this session.
    #[error("no token found; authenticate first")]
    MissingCredential,

    /// GitHub answered 401; the stored token is no longer valid.
    #[error("GitHub rejected the token")]
    AuthenticationFailed,

    /// GitHub answered 404 for the pull request.
    #[error("pull request not found")]
    ResourceNotFound,

    /// GitHub answered 403; the token lacks access.
    #[error("GitHub denied access to the pull request")]
    AccessForbidden,

    /// GitHub answered with any other non-success status.
    #[error("GitHub API returned status {status}")]
    Upstream {
        /// Raw status code returned by GitHub.
        status: u16,
    },

    /// GitHub answered 2xx but the body was not a JSON array.
    #[error("unexpected response from GitHub: {message}")]
    ProtocolViolation {
        /// What was wrong with the body.
        message: String,
    },

    /// The whole fetch did not finish within the configured deadline.
    #[error("request to GitHub timed out")]
    Timeout,

    /// Any other transport failure.
    #[error("request to GitHub failed: {message}")]
    Unknown {
        /// Transport-level error detail.
        message: String,
    },
}

impl FetchError {
    /// Builds a [`FetchError::Validation`] from any displayable message.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// HTTP status the API boundary answers with for this error.
    ///
    /// Upstream statuses are passed through when they are client or server
    /// errors; anything else GitHub might send on a failure path becomes
    /// `502 Bad Gateway`.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::MissingCredential | Self::AuthenticationFailed => StatusCode::UNAUTHORIZED,
            Self::ResourceNotFound => StatusCode::NOT_FOUND,
            Self::AccessForbidden => StatusCode::FORBIDDEN,
            Self::Upstream { status } => StatusCode::from_u16(*status)
                .ok()
                .filter(|code| code.is_client_error() || code.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            Self::ProtocolViolation { .. } | Self::Unknown { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    /// Message shown to the user.
    ///
    /// Transport and protocol details stay in the logs; only validation
    /// messages are echoed verbatim because they describe the caller's input.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { message } => message.clone(),
            Self::MissingCredential => "No token found. Please authenticate first.".to_owned(),
            Self::AuthenticationFailed => {
                "Authentication failed. Please check your token.".to_owned()
            }
            Self::ResourceNotFound => {
                "Pull request not found. Please verify the repository and PR number.".to_owned()
            }
            Self::AccessForbidden => {
                "Access forbidden. Token may not have permission.".to_owned()
            }
            Self::Upstream { .. } => "GitHub API error. Please try again later.".to_owned(),
            Self::ProtocolViolation { .. } => "Invalid response from GitHub API".to_owned(),
            Self::Timeout => "Request timeout. Please try again.".to_owned(),
            Self::Unknown { .. } => "Failed to fetch comments. Please try again.".to_owned(),
        }
    }

    /// Returns true when this failure proves the stored token is unusable.
    #[must_use]
    pub const fn clears_credential(&self) -> bool {
        matches!(self, Self::AuthenticationFailed)
    }
}
