//! Pagination policy and `Link` header navigation for GitHub listings.
//!
//! GitHub paginates list endpoints with an RFC 8288 `Link` header such as
//!
//! ```text
//! <https://api.github.com/repositories/1/pulls/2/comments?page=2>; rel="next",
//! <https://api.github.com/repositories/1/pulls/2/comments?page=5>; rel="last"
//! ```
//!
//! Only the `rel="next"` target matters here; its absence ends the walk.

use std::time::Duration;

use http::HeaderMap;
use http::header::LINK;
use url::Url;

/// Largest `per_page` GitHub honours.
pub const MAX_PER_PAGE: u8 = 100;
/// Default cap on requests issued for one fetch.
pub const DEFAULT_MAX_PAGES: u32 = 10;
/// Default deadline for a whole multi-page fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Bounds applied to one paginated fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPolicy {
    /// Stop after this many pages even if more exist.
    max_pages: u32,
    /// Items requested per page.
    per_page: u8,
    /// Wall-clock limit for all pages combined.
    timeout: Duration,
}

impl FetchPolicy {
    /// Creates a policy from explicit bounds.
    #[must_use]
    pub const fn new(max_pages: u32, per_page: u8, timeout: Duration) -> Self {
        Self {
            max_pages,
            per_page,
            timeout,
        }
    }

    /// Replaces the page ceiling.
    #[must_use]
    pub const fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Replaces the page size.
    #[must_use]
    pub const fn with_per_page(mut self, per_page: u8) -> Self {
        self.per_page = per_page;
        self
    }

    /// Replaces the overall deadline.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the page ceiling.
    #[must_use]
    pub const fn max_pages(&self) -> u32 {
        self.max_pages
    }

    /// Returns the page size.
    #[must_use]
    pub const fn per_page(&self) -> u8 {
        self.per_page
    }

    /// Returns the overall deadline.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PAGES, MAX_PER_PAGE, DEFAULT_FETCH_TIMEOUT)
    }
}

/// Location of the next page to request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor(Url);

impl PageCursor {
    /// Wraps the URL of a page.
    #[must_use]
    pub const fn new(url: Url) -> Self {
        Self(url)
    }

    /// Cursor for the `rel="next"` target of a response, if any.
    #[must_use]
    pub fn next_from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get_all(LINK)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(next_link)
            .map(Self)
    }

    /// Borrow the page URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.0
    }

    /// True when the page lives on the same scheme, host, and port as `base`.
    ///
    /// Requests carry the caller's token, so a `Link` target on any other
    /// origin must not be followed.
    #[must_use]
    pub fn shares_origin_with(&self, base: &Url) -> bool {
        self.0.origin() == base.origin()
    }
}

/// Extracts the `rel="next"` target from one `Link` header value.
#[must_use]
pub fn next_link(header: &str) -> Option<Url> {
    header.split(',').find_map(|entry| {
        let (target, params) = split_link_value(entry)?;
        params
            .split(';')
            .any(is_next_relation)
            .then(|| Url::parse(target).ok())
            .flatten()
    })
}

fn split_link_value(entry: &str) -> Option<(&str, &str)> {
    let trimmed = entry.trim();
    let rest = trimmed.strip_prefix('<')?;
    let (target, params) = rest.split_once('>')?;
    Some((target.trim(), params))
}

fn is_next_relation(param: &str) -> bool {
    let Some((name, value)) = param.split_once('=') else {
        return false;
    };
    name.trim().eq_ignore_ascii_case("rel")
        && value
            .trim()
            .trim_matches('"')
            .split_ascii_whitespace()
            .any(|relation| relation.eq_ignore_ascii_case("next"))
}
