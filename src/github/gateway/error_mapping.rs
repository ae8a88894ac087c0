//! Classification of GitHub responses and transport failures.

use http::StatusCode;

use crate::github::error::FetchError;

/// Maps a non-success GitHub status onto the error taxonomy.
///
/// GitHub's own `message` is logged for operators but never returned to the
/// caller.
pub(super) fn map_http_error(status: StatusCode, maybe_message: Option<&str>) -> FetchError {
    let message = maybe_message.unwrap_or("unknown error");
    tracing::debug!(status = status.as_u16(), "GitHub returned an error: {message}");

    match status {
        StatusCode::UNAUTHORIZED => FetchError::AuthenticationFailed,
        StatusCode::NOT_FOUND => FetchError::ResourceNotFound,
        StatusCode::FORBIDDEN => FetchError::AccessForbidden,
        other => FetchError::Upstream {
            status: other.as_u16(),
        },
    }
}

/// Maps a reqwest transport failure.
///
/// The request URL is stripped from the message before it is kept.
pub(super) fn map_transport_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        tracing::debug!("GitHub request timed out: {error}");
        return FetchError::Timeout;
    }

    FetchError::Unknown {
        message: error.without_url().to_string(),
    }
}
