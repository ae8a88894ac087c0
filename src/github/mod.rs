//! GitHub pull request review comment retrieval.
//!
//! This module validates the pull request a caller asks for, checks
//! submitted personal access tokens, fetches every page of review comments
//! through a reqwest-backed gateway, and normalizes the raw records. All
//! failures are classified into [`FetchError`] so the HTTP layer can answer
//! with a precise status without exposing GitHub's own messages.

pub mod error;
pub mod gateway;
pub mod identifiers;
pub mod locator;
pub mod models;
pub mod normalize;
pub mod pagination;

pub use error::FetchError;
pub use gateway::{HttpReviewCommentGateway, ReviewCommentGateway};
pub use identifiers::{PullRequestNumber, RepositoryName, RepositoryOwner};
pub use locator::{FetchRequest, PersonalAccessToken};
pub use models::{RawReviewComment, ReviewComment};
pub use normalize::normalize;
pub use pagination::FetchPolicy;

#[cfg(test)]
pub use gateway::MockReviewCommentGateway;
