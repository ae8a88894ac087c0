//! reqwest client construction and request headers for GitHub calls.

use http::header::ACCEPT;
use reqwest::{Client, RequestBuilder};
use url::Url;

use crate::config::ConfigError;
use crate::github::locator::PersonalAccessToken;

/// Media type pinning the REST API's JSON representation.
pub const GITHUB_ACCEPT: &str = "application/vnd.github+json";
/// REST API version sent with every request.
pub const GITHUB_API_VERSION: &str = "2022-11-28";
/// User agent GitHub requires on API calls.
pub const USER_AGENT: &str = "comments-fetcher";

const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";

/// Builds the shared HTTP client.
///
/// No per-request timeout is configured here; the gateway bounds the whole
/// multi-page fetch instead.
///
/// # Errors
///
/// Returns [`ConfigError::HttpClient`] when the TLS backend cannot be
/// initialised.
pub(super) fn build_http_client() -> Result<Client, ConfigError> {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|error| ConfigError::HttpClient {
            message: error.to_string(),
        })
}

/// Prepares an authenticated GET for one page.
pub(super) fn authorised_get(
    client: &Client,
    url: &Url,
    token: &PersonalAccessToken,
) -> RequestBuilder {
    client
        .get(url.clone())
        .bearer_auth(token.value())
        .header(ACCEPT, GITHUB_ACCEPT)
        .header(API_VERSION_HEADER, GITHUB_API_VERSION)
}
