//! HTTP surface for storing a token and fetching review comments.
//!
//! Routes:
//!
//! - `POST /credential`, `GET /credential`, `DELETE /credential` manage the
//!   token held in the encrypted session cookie.
//! - `POST /comments` returns normalized review comments as JSON.
//! - `POST /comments/export` returns the same comments as a Markdown file.
//! - `GET /health` answers `OK`.

mod handlers;
mod responses;

use std::io;
use std::sync::Arc;

use axum::Router;
use axum::extract::{DefaultBodyLimit, FromRef};
use axum::routing::{get, post};
use axum_extra::extract::cookie::{Key, PrivateCookieJar};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::{ConfigError, ServiceSettings};
use crate::github::gateway::{HttpReviewCommentGateway, ReviewCommentGateway};
use crate::session::{CookieCredentialStore, CookiePolicy};

/// Largest request body accepted.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Errors that stop the server from starting or running.
#[derive(Debug, Error)]
pub enum ServeError {
    /// Settings could not be turned into application state.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The listener could not be bound.
    #[error("failed to bind {address}: {source}")]
    Bind {
        /// Address that was requested.
        address: std::net::SocketAddr,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The server stopped with an I/O error.
    #[error("server error: {0}")]
    Io(#[from] io::Error),
}

/// Shared, immutable application state.
#[derive(Clone)]
pub struct AppState {
    gateway: Arc<dyn ReviewCommentGateway>,
    cookie_key: Key,
    cookie_policy: CookiePolicy,
}

impl AppState {
    /// Assembles state from a gateway and cookie settings.
    #[must_use]
    pub const fn new(
        gateway: Arc<dyn ReviewCommentGateway>,
        cookie_key: Key,
        cookie_policy: CookiePolicy,
    ) -> Self {
        Self {
            gateway,
            cookie_key,
            cookie_policy,
        }
    }

    /// Builds state backed by the HTTP gateway described by `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HttpClient`] when the HTTP client cannot be
    /// built.
    pub fn from_settings(settings: &ServiceSettings) -> Result<Self, ConfigError> {
        let gateway =
            HttpReviewCommentGateway::new(settings.api_base.clone(), settings.fetch_policy)?;
        Ok(Self::new(
            Arc::new(gateway),
            settings.session_secret.cookie_key(),
            CookiePolicy {
                secure: settings.secure_cookies,
            },
        ))
    }

    fn credential_store(&self, jar: PrivateCookieJar) -> CookieCredentialStore {
        CookieCredentialStore::new(jar, self.cookie_policy)
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Builds the router with tracing and the body size limit applied.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/credential",
            post(handlers::store_credential)
                .get(handlers::credential_status)
                .delete(handlers::delete_credential),
        )
        .route("/comments", post(handlers::fetch_comments))
        .route("/comments/export", post(handlers::export_comments))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `settings.bind_address` and serves until Ctrl-C.
///
/// # Errors
///
/// Returns [`ServeError`] when state cannot be built, the address cannot be
/// bound, or the server fails.
pub async fn serve(settings: &ServiceSettings) -> Result<(), ServeError> {
    let state = AppState::from_settings(settings)?;
    let listener = TcpListener::bind(settings.bind_address)
        .await
        .map_err(|source| ServeError::Bind {
            address: settings.bind_address,
            source,
        })?;

    tracing::info!(address = %settings.bind_address, "listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {error}");
        std::future::pending::<()>().await;
    }
}
