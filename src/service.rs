//! Fetch flow combining the credential store, gateway, and normalizer.

use serde::Serialize;

use crate::github::error::FetchError;
use crate::github::gateway::ReviewCommentGateway;
use crate::github::locator::FetchRequest;
use crate::github::models::ReviewComment;
use crate::github::normalize::normalize;
use crate::session::CredentialStore;

/// Normalized comments returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentsPayload {
    /// Comments in the order GitHub returned them.
    pub comments: Vec<ReviewComment>,
    /// Number of entries in `comments`.
    pub total: usize,
}

impl CommentsPayload {
    /// Wraps normalized comments, counting them.
    #[must_use]
    pub fn new(comments: Vec<ReviewComment>) -> Self {
        let total = comments.len();
        Self { comments, total }
    }
}

/// Loads review comments for the token held in a credential store.
pub struct CommentService<'client, Gateway>
where
    Gateway: ReviewCommentGateway + ?Sized,
{
    client: &'client Gateway,
}

impl<'client, Gateway> CommentService<'client, Gateway>
where
    Gateway: ReviewCommentGateway + ?Sized,
{
    /// Create a new service using the provided gateway.
    #[must_use]
    pub const fn new(client: &'client Gateway) -> Self {
        Self { client }
    }

    /// Fetch and normalize the review comments for `request`.
    ///
    /// The store is handed back in every case. When GitHub rejects the
    /// token the returned store no longer holds it.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::MissingCredential`] when the store is empty
    /// and propagates any gateway failure.
    pub async fn fetch<Store: CredentialStore>(
        &self,
        store: Store,
        request: &FetchRequest,
    ) -> (Store, Result<CommentsPayload, FetchError>) {
        let Some(token) = store.get() else {
            return (store, Err(FetchError::MissingCredential));
        };

        match self.client.fetch_review_comments(request, &token).await {
            Ok(records) => {
                let comments = normalize(&records);
                tracing::debug!(
                    fetched = records.len(),
                    kept = comments.len(),
                    "normalized review comments"
                );
                (store, Ok(CommentsPayload::new(comments)))
            }
            Err(error) if error.clears_credential() => {
                tracing::info!("GitHub rejected the stored token; clearing it");
                (store.clear(), Err(error))
            }
            Err(error) => (store, Err(error)),
        }
    }
}
