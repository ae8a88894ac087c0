//! Gateways for loading review comments from the GitHub REST API.
//!
//! The trait-based design enables mocking in tests while the reqwest
//! implementation handles real HTTP requests, pagination, and the overall
//! deadline.

mod client;
mod error_mapping;
mod http_utils;
mod review_comments;

pub use client::{GITHUB_ACCEPT, GITHUB_API_VERSION, USER_AGENT};
pub use review_comments::HttpReviewCommentGateway;

use async_trait::async_trait;

use crate::github::error::FetchError;
use crate::github::locator::{FetchRequest, PersonalAccessToken};
use crate::github::models::RawReviewComment;

/// Gateway for fetching PR review comments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewCommentGateway: Send + Sync {
    /// Fetch every page of review comments for the pull request, in order.
    ///
    /// Implementations stop at their page ceiling without error and fail
    /// the whole call on the first page-level error or on timeout.
    async fn fetch_review_comments(
        &self,
        request: &FetchRequest,
        token: &PersonalAccessToken,
    ) -> Result<Vec<RawReviewComment>, FetchError>;
}
