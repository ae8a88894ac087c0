//! Fetch targets and credentials for the review comment endpoint.

use std::fmt;

use serde_json::{Map, Value};
use url::Url;

use super::error::FetchError;
use super::identifiers::{
    PullRequestNumber, RepositoryName, RepositoryOwner, parse_pr_number, validate_pr_number,
};

const INVALID_PARAMETERS: &str = "Invalid parameters. Owner and repo must be valid GitHub \
                                  identifiers, PR number must be a positive integer.";
const INVALID_PR_URL: &str =
    "Invalid URL format. Expected: https://github.com/owner/repo/pull/123";
const INVALID_TOKEN_FORMAT: &str = "Invalid token format";

/// Shortest token the credential endpoint accepts.
pub const MIN_TOKEN_LEN: usize = 20;
/// Longest token the credential endpoint accepts.
pub const MAX_TOKEN_LEN: usize = 500;
/// Prefixes of classic and fine-grained GitHub personal access tokens.
pub const TOKEN_PREFIXES: [&str; 2] = ["ghp_", "github_pat_"];

/// Personal access token wrapper enforcing presence.
///
/// The `Debug` implementation never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Wraps a previously accepted token, such as one read back from the
    /// session cookie.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::MissingCredential`] when the value is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, FetchError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(FetchError::MissingCredential);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Validates a token submitted by the user before it is stored.
    ///
    /// The token must be 20–500 characters long and start with `ghp_` or
    /// `github_pat_`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Validation`] when either rule is broken.
    pub fn parse_submitted(token: &str) -> Result<Self, FetchError> {
        let length = token.chars().count();
        if !(MIN_TOKEN_LEN..=MAX_TOKEN_LEN).contains(&length) {
            return Err(FetchError::validation(INVALID_TOKEN_FORMAT));
        }
        if !TOKEN_PREFIXES.iter().any(|prefix| token.starts_with(prefix)) {
            return Err(FetchError::validation(INVALID_TOKEN_FORMAT));
        }
        Ok(Self(token.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

impl fmt::Debug for PersonalAccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PersonalAccessToken(<redacted>)")
    }
}

/// Validated pull request whose review comments should be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    owner: RepositoryOwner,
    repository: RepositoryName,
    number: PullRequestNumber,
}

impl FetchRequest {
    /// Assembles a request from already validated parts.
    #[must_use]
    pub const fn new(
        owner: RepositoryOwner,
        repository: RepositoryName,
        number: PullRequestNumber,
    ) -> Self {
        Self {
            owner,
            repository,
            number,
        }
    }

    /// Builds a request from loosely typed JSON fields.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Validation`] when any field fails its check.
    pub fn from_fields(owner: &Value, repo: &Value, pr_number: &Value) -> Result<Self, FetchError> {
        let validated_owner = owner.as_str().and_then(RepositoryOwner::parse);
        let validated_repository = repo.as_str().and_then(RepositoryName::parse);
        let validated_number = validate_pr_number(pr_number);

        match (validated_owner, validated_repository, validated_number) {
            (Some(valid_owner), Some(valid_repository), Some(valid_number)) => {
                Ok(Self::new(valid_owner, valid_repository, valid_number))
            }
            _ => Err(FetchError::validation(INVALID_PARAMETERS)),
        }
    }

    /// Builds a request from a JSON request body.
    ///
    /// The body names the pull request either with `owner`, `repo`, and
    /// `prNumber` (or `pr_number`), or with a single `url`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Validation`] when the fields are missing or
    /// invalid.
    pub fn from_body(body: &Map<String, Value>) -> Result<Self, FetchError> {
        if let Some(url) = body.get("url") {
            let text = url
                .as_str()
                .ok_or_else(|| FetchError::validation(INVALID_PR_URL))?;
            return Self::parse_url(text);
        }

        let missing = Value::Null;
        let pr_number = body
            .get("prNumber")
            .or_else(|| body.get("pr_number"))
            .unwrap_or(&missing);
        Self::from_fields(
            body.get("owner").unwrap_or(&missing),
            body.get("repo").unwrap_or(&missing),
            pr_number,
        )
    }

    /// Parses a GitHub pull request URL in the form
    /// `https://github.com/<owner>/<repo>/pull/<number>`.
    ///
    /// Trailing segments such as `/files` are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Validation`] when the URL does not point at a
    /// github.com pull request or any segment fails validation.
    pub fn parse_url(input: &str) -> Result<Self, FetchError> {
        let invalid = || FetchError::validation(INVALID_PR_URL);
        let parsed = Url::parse(input.trim()).map_err(|_| invalid())?;

        let host = parsed.host_str().ok_or_else(invalid)?;
        if !host.eq_ignore_ascii_case("github.com") && !host.eq_ignore_ascii_case("www.github.com")
        {
            return Err(invalid());
        }

        let mut segments = parsed.path_segments().ok_or_else(invalid)?;
        let owner_segment = segments.next().ok_or_else(invalid)?;
        let repository_segment = segments.next().ok_or_else(invalid)?;
        let marker = segments.next().ok_or_else(invalid)?;
        let number_segment = segments.next().ok_or_else(invalid)?;

        if marker != "pull" {
            return Err(invalid());
        }

        let owner = RepositoryOwner::parse(owner_segment)
            .ok_or_else(|| FetchError::validation(INVALID_PARAMETERS))?;
        let repository = RepositoryName::parse(repository_segment)
            .ok_or_else(|| FetchError::validation(INVALID_PARAMETERS))?;
        let number = parse_pr_number(number_segment)
            .ok_or_else(|| FetchError::validation(INVALID_PARAMETERS))?;

        Ok(Self::new(owner, repository, number))
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    /// Pull request number.
    #[must_use]
    pub const fn number(&self) -> PullRequestNumber {
        self.number
    }

    /// First page of the review comments listing below `api_base`.
    ///
    /// Owner and repository are pushed as path segments so they are
    /// percent-encoded even though validation already restricts them.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Unknown`] when `api_base` cannot carry a path.
    pub fn review_comments_url(&self, api_base: &Url, per_page: u8) -> Result<Url, FetchError> {
        let number = self.number.to_string();
        let mut url = api_base.clone();
        url.path_segments_mut()
            .map_err(|()| FetchError::Unknown {
                message: format!("API base {api_base} cannot be a base URL"),
            })?
            .pop_if_empty()
            .extend([
                "repos",
                self.owner.as_str(),
                self.repository.as_str(),
                "pulls",
                number.as_str(),
                "comments",
            ]);
        url.query_pairs_mut()
            .clear()
            .append_pair("per_page", &per_page.to_string());
        Ok(url)
    }

    /// File name used when the comments are exported.
    #[must_use]
    pub fn export_file_name(&self) -> String {
        format!(
            "comments-{}-{}-pr{}.md",
            self.owner, self.repository, self.number
        )
    }
}
