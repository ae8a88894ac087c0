//! Gateway for fetching PR review comments.

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::config::ConfigError;
use crate::github::error::FetchError;
use crate::github::locator::{FetchRequest, PersonalAccessToken};
use crate::github::models::RawReviewComment;
use crate::github::pagination::{FetchPolicy, PageCursor};

use super::ReviewCommentGateway;
use super::client::{authorised_get, build_http_client};
use super::error_mapping::{map_http_error, map_transport_error};
use super::http_utils::{extract_github_message, parse_page_body};

/// One decoded page and the cursor to the page after it.
struct FetchedPage {
    records: Vec<RawReviewComment>,
    next: Option<PageCursor>,
}

/// Gateway for loading PR review comments over HTTP.
#[derive(Debug, Clone)]
pub struct HttpReviewCommentGateway {
    client: Client,
    api_base: Url,
    policy: FetchPolicy,
}

impl HttpReviewCommentGateway {
    /// Creates a new gateway for the given API base URL and bounds.
    ///
    /// # Arguments
    ///
    /// * `api_base` - Base URL for the GitHub API (e.g. `https://api.github.com`).
    /// * `policy` - Page ceiling, page size, and overall deadline.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_base: Url, policy: FetchPolicy) -> Result<Self, ConfigError> {
        let client = build_http_client()?;
        Ok(Self {
            client,
            api_base,
            policy,
        })
    }

    /// Returns the bounds this gateway applies.
    #[must_use]
    pub const fn policy(&self) -> FetchPolicy {
        self.policy
    }

    /// Fetches every page of review comments under one deadline.
    ///
    /// Pages are requested strictly in sequence because each page's URL is
    /// only known from the previous response. When the deadline passes the
    /// in-flight request is dropped and everything gathered so far is
    /// discarded.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when any of the following conditions occur:
    ///
    /// - **Authentication/authorization errors**: GitHub answered 401 or 403.
    /// - **Missing pull request**: GitHub answered 404.
    /// - **Other API errors**: any other non-success status.
    /// - **Malformed pages**: a successful response whose body is not a JSON
    ///   array.
    /// - **Timeout**: the configured deadline elapsed before the last page.
    /// - **Transport failures**: connection errors and similar.
    pub async fn fetch_all_pages(
        &self,
        request: &FetchRequest,
        token: &PersonalAccessToken,
    ) -> Result<Vec<RawReviewComment>, FetchError> {
        let first_page = request.review_comments_url(&self.api_base, self.policy.per_page())?;
        let deadline = self.policy.timeout();

        tokio::time::timeout(deadline, self.collect_pages(first_page, token))
            .await
            .unwrap_or_else(|_elapsed| {
                tracing::warn!(
                    owner = request.owner().as_str(),
                    repo = request.repository().as_str(),
                    number = request.number().get(),
                    "review comment fetch exceeded {deadline:?}"
                );
                Err(FetchError::Timeout)
            })
    }

    async fn collect_pages(
        &self,
        first_page: Url,
        token: &PersonalAccessToken,
    ) -> Result<Vec<RawReviewComment>, FetchError> {
        let mut records = Vec::new();
        let mut cursor = Some(PageCursor::new(first_page));
        let mut pages_fetched: u32 = 0;

        while let Some(page) = cursor.take() {
            if pages_fetched >= self.policy.max_pages() {
                tracing::warn!(
                    "stopping after {pages_fetched} pages; {} review comments kept, more remain",
                    records.len()
                );
                break;
            }

            let fetched = self.fetch_page(page.url(), token).await?;
            pages_fetched = pages_fetched.saturating_add(1);
            tracing::debug!(
                page = pages_fetched,
                records = fetched.records.len(),
                "fetched review comment page"
            );
            records.extend(fetched.records);
            cursor = fetched.next;
        }

        Ok(records)
    }

    async fn fetch_page(
        &self,
        url: &Url,
        token: &PersonalAccessToken,
    ) -> Result<FetchedPage, FetchError> {
        let response = authorised_get(&self.client, url, token)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(error) => {
                    tracing::debug!(%status, "could not read GitHub error body: {error}");
                    String::new()
                }
            };
            return Err(map_http_error(
                status,
                extract_github_message(&body).as_deref(),
            ));
        }

        let next = PageCursor::next_from_headers(response.headers());
        if let Some(cursor) = next
            .as_ref()
            .filter(|cursor| !cursor.shares_origin_with(&self.api_base))
        {
            tracing::warn!(
                next = cursor.url().as_str(),
                "refusing to follow a pagination link off the API host"
            );
            return Err(FetchError::ProtocolViolation {
                message: "pagination link points outside the API host".to_owned(),
            });
        }

        let body = response.bytes().await.map_err(map_transport_error)?;
        let records = parse_page_body(&body)?;

        Ok(FetchedPage { records, next })
    }
}

#[async_trait]
impl ReviewCommentGateway for HttpReviewCommentGateway {
    async fn fetch_review_comments(
        &self,
        request: &FetchRequest,
        token: &PersonalAccessToken,
    ) -> Result<Vec<RawReviewComment>, FetchError> {
        self.fetch_all_pages(request, token).await
    }
}
