//! Syntax checks for repository identifiers and pull request numbers.
//!
//! These run before a value is embedded in an API URL. The bounds mirror
//! GitHub's own limits: owner and repository names are at most 39 characters
//! of `[A-Za-z0-9._-]`, and pull request numbers fit a signed 32-bit integer.
//! Validators return `None` instead of failing so callers decide how to
//! report the rejection.

use std::fmt;

use serde_json::Value;

/// Longest owner or repository name GitHub accepts.
pub const MAX_IDENTIFIER_LEN: usize = 39;

/// Largest pull request number GitHub can assign.
pub const MAX_PULL_REQUEST_NUMBER: u32 = 2_147_483_647;

const fn is_identifier_char(character: char) -> bool {
    character.is_ascii_alphanumeric() || matches!(character, '.' | '_' | '-')
}

/// Accepts `value` when it is 1–39 characters drawn from `[A-Za-z0-9._-]`.
///
/// # Example
///
/// ```
/// use comments_fetcher::github::identifiers::validate_identifier;
///
/// assert_eq!(validate_identifier("rust-lang"), Some("rust-lang"));
/// assert_eq!(validate_identifier("rust/lang"), None);
/// ```
#[must_use]
pub fn validate_identifier(value: &str) -> Option<&str> {
    let within_bounds = !value.is_empty() && value.len() <= MAX_IDENTIFIER_LEN;
    (within_bounds && value.chars().all(is_identifier_char)).then_some(value)
}

/// Like [`validate_identifier`] but for untyped JSON; non-strings are rejected.
#[must_use]
pub fn validate_identifier_value(value: &Value) -> Option<&str> {
    value.as_str().and_then(validate_identifier)
}

/// Accepts a JSON integer or a numeric string in `[1, 2147483647]`.
///
/// Integral floats such as `12.0` count as integers. Fractional numbers,
/// negative values, zero, and anything out of range are rejected.
#[must_use]
pub fn validate_pr_number(value: &Value) -> Option<PullRequestNumber> {
    match value {
        Value::Number(number) => number.as_u64().map_or_else(
            // `f64` displays integral values without a fraction, so `12.0`
            // prints as `12` while `1.5` stays unparseable.
            || number.as_f64().and_then(|float| parse_pr_number(&float.to_string())),
            PullRequestNumber::from_u64,
        ),
        Value::String(text) => parse_pr_number(text),
        _ => None,
    }
}

/// Parses a base-10 pull request number, tolerating surrounding whitespace.
#[must_use]
pub fn parse_pr_number(text: &str) -> Option<PullRequestNumber> {
    text.trim()
        .parse::<u64>()
        .ok()
        .and_then(PullRequestNumber::from_u64)
}

/// Repository owner that passed [`validate_identifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    /// Validates and wraps an owner login.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        validate_identifier(value).map(|owner| Self(owner.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RepositoryOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Repository name that passed [`validate_identifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryName(String);

impl RepositoryName {
    /// Validates and wraps a repository name.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        validate_identifier(value).map(|name| Self(name.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RepositoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pull request number in `[1, 2147483647]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullRequestNumber(u32);

impl PullRequestNumber {
    /// Wraps `value` when it lies inside GitHub's numeric ID range.
    #[must_use]
    pub fn from_u64(value: u64) -> Option<Self> {
        u32::try_from(value)
            .ok()
            .filter(|number| (1..=MAX_PULL_REQUEST_NUMBER).contains(number))
            .map(Self)
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PullRequestNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::{
        MAX_IDENTIFIER_LEN, PullRequestNumber, parse_pr_number, validate_identifier,
        validate_identifier_value, validate_pr_number,
    };

    #[rstest]
    #[case("a")]
    #[case("octocat")]
    #[case("rust-lang")]
    #[case("my_repo.rs")]
    #[case("A.B-C_9")]
    #[case("...")]
    #[case("abcdefghijklmnopqrstuvwxyz0123456789ABC")]
    fn accepts_valid_identifiers(#[case] input: &str) {
        assert_eq!(validate_identifier(input), Some(input), "should accept {input:?}");
    }

    #[rstest]
    #[case::empty("")]
    #[case::slash("owner/repo")]
    #[case::at("user@example")]
    #[case::space("has space")]
    #[case::tab("tab\there")]
    #[case::newline("line\n")]
    #[case::percent("%2e%2e")]
    #[case::query("repo?x=1")]
    #[case::unicode("caf\u{e9}")]
    #[case::forty_chars("abcdefghijklmnopqrstuvwxyz0123456789ABCD")]
    fn rejects_invalid_identifiers(#[case] input: &str) {
        assert_eq!(validate_identifier(input), None, "should reject {input:?}");
    }

    #[rstest]
    fn rejects_every_length_above_the_limit() {
        for length in (MAX_IDENTIFIER_LEN + 1)..(MAX_IDENTIFIER_LEN + 20) {
            let candidate = "a".repeat(length);
            assert_eq!(validate_identifier(&candidate), None, "length {length}");
        }
    }

    #[rstest]
    #[case(json!(null))]
    #[case(json!(42))]
    #[case(json!(["octocat"]))]
    #[case(json!({ "login": "octocat" }))]
    fn rejects_non_string_identifiers(#[case] input: Value) {
        assert_eq!(validate_identifier_value(&input), None, "should reject {input}");
    }

    #[rstest]
    #[case(json!(1), 1)]
    #[case(json!(42), 42)]
    #[case(json!(2_147_483_647_u64), 2_147_483_647)]
    #[case(json!(12.0), 12)]
    #[case(json!(2_147_483_647.0), 2_147_483_647)]
    #[case(json!("1"), 1)]
    #[case(json!("123"), 123)]
    #[case(json!(" 77 "), 77)]
    #[case(json!("2147483647"), 2_147_483_647)]
    fn accepts_valid_pr_numbers(#[case] input: Value, #[case] expected: u32) {
        let parsed = validate_pr_number(&input).map(PullRequestNumber::get);
        assert_eq!(parsed, Some(expected), "should accept {input}");
    }

    #[rstest]
    #[case::zero(json!(0))]
    #[case::zero_string(json!("0"))]
    #[case::negative(json!(-5))]
    #[case::negative_string(json!("-5"))]
    #[case::fractional(json!(1.5))]
    #[case::negative_float(json!(-5.0))]
    #[case::zero_float(json!(0.0))]
    #[case::above_range_float(json!(2_147_483_648.0))]
    #[case::exponent_float(json!(1e20))]
    #[case::fractional_string(json!("1.5"))]
    #[case::above_range(json!(2_147_483_648_u64))]
    #[case::above_range_string(json!("2147483648"))]
    #[case::huge_string(json!("99999999999999999999999"))]
    #[case::word(json!("twelve"))]
    #[case::empty_string(json!(""))]
    #[case::null(json!(null))]
    #[case::boolean(json!(true))]
    #[case::array(json!([1]))]
    fn rejects_invalid_pr_numbers(#[case] input: Value) {
        assert_eq!(validate_pr_number(&input), None, "should reject {input}");
    }

    #[rstest]
    fn parse_pr_number_rejects_trailing_garbage() {
        assert_eq!(parse_pr_number("12abc"), None);
    }
}
