//! Fetches the review comments of a GitHub pull request for a browser
//! session.
//!
//! The library validates which pull request is being asked for, keeps the
//! user's personal access token in an encrypted session cookie, walks every
//! page of the review comments listing under one deadline, normalizes the
//! records, and serves the result over HTTP as JSON or a Markdown export.

pub mod config;
pub mod export;
pub mod github;
pub mod server;
pub mod service;
pub mod session;

pub use config::{ConfigError, ServiceConfig, ServiceSettings};
pub use github::{
    FetchError, FetchPolicy, FetchRequest, HttpReviewCommentGateway, PersonalAccessToken,
    ReviewComment, ReviewCommentGateway,
};
pub use server::{AppState, ServeError, router, serve};
pub use service::{CommentService, CommentsPayload};
pub use session::{CookieCredentialStore, CookiePolicy, CredentialStore, MemoryCredentialStore};
