//! HTTP round trips through the router with real encrypted cookies.

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::response::Response;
use axum_extra::extract::cookie::Key;
use comments_fetcher::{AppState, CookiePolicy, FetchPolicy, HttpReviewCommentGateway, router};
use http::header::{CONTENT_DISPOSITION, CONTENT_TYPE, COOKIE, SET_COOKIE};
use http::{Method, Request, StatusCode};
use rstest::rstest;
use serde_json::{Value, json};
use tower::ServiceExt;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

type TestResult = Result<(), Box<dyn std::error::Error>>;

const SECRET: &[u8] = b"router-test-secret-0123456789abcdef";
const TOKEN: &str = "ghp_router_token_value_01";
const COMMENTS_PATH: &str = "/api/v3/repos/owner/repo/pulls/42/comments";

fn app(server: &MockServer) -> Result<Router, Box<dyn std::error::Error>> {
    let api_base = Url::parse(&format!("{}/api/v3", server.uri()))?;
    let gateway = HttpReviewCommentGateway::new(api_base, FetchPolicy::default())?;
    Ok(router(AppState::new(
        Arc::new(gateway),
        Key::derive_from(SECRET),
        CookiePolicy::default(),
    )))
}

fn json_request(
    method: Method,
    uri: &str,
    body: &Value,
    cookie: Option<&str>,
) -> Result<Request<Body>, http::Error> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(value) = cookie {
        builder = builder.header(COOKIE, value);
    }
    builder.body(Body::from(body.to_string()))
}

fn empty_request(method: Method, uri: &str, cookie: Option<&str>) -> Result<Request<Body>, http::Error> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(value) = cookie {
        builder = builder.header(COOKIE, value);
    }
    builder.body(Body::empty())
}

fn set_cookies(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok().map(ToOwned::to_owned))
        .collect()
}

async fn json_body(response: Response) -> Result<Value, Box<dyn std::error::Error>> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Stores the test token and returns the `Cookie` header value to replay.
async fn session_cookie(app: &Router) -> Result<String, Box<dyn std::error::Error>> {
    let request = json_request(Method::POST, "/credential", &json!({ "token": TOKEN }), None)?;
    let response = app.clone().oneshot(request).await?;
    let cookies = set_cookies(&response);
    let first = cookies.first().ok_or("credential response set no cookie")?;
    let pair = first.split(';').next().ok_or("empty Set-Cookie header")?;
    Ok(pair.to_owned())
}

fn comment_page() -> Value {
    json!([
        {
            "id": 1,
            "path": "src/lib.rs",
            "body": "Extract this into a helper.",
            "line": 12,
            "user": { "login": "alice" },
            "created_at": "2025-01-01T00:00:00Z"
        },
        { "id": 2, "path": "src/lib.rs", "body": "ghost", "user": null },
        {
            "id": 3,
            "body": "Outdated comment.",
            "line": null,
            "original_line": 8,
            "user": { "login": "" }
        }
    ])
}

#[rstest]
#[tokio::test]
async fn health_answers_ok() -> TestResult {
    let server = MockServer::start().await;
    let response = app(&server)?
        .oneshot(empty_request(Method::GET, "/health", None)?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    assert_eq!(bytes.as_ref(), b"OK");
    Ok(())
}

#[rstest]
#[tokio::test]
async fn storing_a_token_sets_an_encrypted_session_cookie() -> TestResult {
    let server = MockServer::start().await;
    let request = json_request(Method::POST, "/credential", &json!({ "token": TOKEN }), None)?;

    let response = app(&server)?.oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::OK);
    let cookies = set_cookies(&response);
    let cookie = cookies.first().ok_or("expected a Set-Cookie header")?;
    assert!(cookie.starts_with("comments_session="), "cookie name: {cookie}");
    assert!(!cookie.contains(TOKEN), "token must not appear in clear text");
    for attribute in ["HttpOnly", "SameSite=Lax", "Path=/", "Max-Age=604800"] {
        assert!(cookie.contains(attribute), "missing {attribute} in {cookie}");
    }
    assert_eq!(json_body(response).await?, json!({ "success": true }));
    Ok(())
}

#[rstest]
#[case::too_short(json!({ "token": "abc" }), "Invalid token format")]
#[case::wrong_prefix(json!({ "token": "gho_abcdefghijklmnopqrstuvwxyz" }), "Invalid token format")]
#[case::missing(json!({}), "Token is required")]
#[case::not_a_string(json!({ "token": 42 }), "Token is required")]
#[tokio::test]
async fn malformed_tokens_are_rejected_without_a_cookie(
    #[case] body: Value,
    #[case] message: &str,
) -> TestResult {
    let server = MockServer::start().await;
    let request = json_request(Method::POST, "/credential", &body, None)?;

    let response = app(&server)?.oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(set_cookies(&response).is_empty(), "no cookie may be set");
    assert_eq!(json_body(response).await?, json!({ "error": message }));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn non_json_bodies_are_rejected() -> TestResult {
    let server = MockServer::start().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/credential")
        .header(CONTENT_TYPE, "text/plain")
        .body(Body::from(format!("{{\"token\": \"{TOKEN}\"}}")))?;

    let response = app(&server)?.oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await?,
        json!({ "error": "Content-Type must be application/json" })
    );
    Ok(())
}

#[rstest]
#[tokio::test]
async fn credential_status_reflects_the_cookie() -> TestResult {
    let server = MockServer::start().await;
    let app = app(&server)?;
    let cookie = session_cookie(&app).await?;

    let without = app
        .clone()
        .oneshot(empty_request(Method::GET, "/credential", None)?)
        .await?;
    assert_eq!(json_body(without).await?, json!({ "hasToken": false }));

    let with = app
        .clone()
        .oneshot(empty_request(Method::GET, "/credential", Some(&cookie))?)
        .await?;
    assert_eq!(json_body(with).await?, json!({ "hasToken": true }));

    let tampered = app
        .oneshot(empty_request(
            Method::GET,
            "/credential",
            Some("comments_session=forged"),
        )?)
        .await?;
    assert_eq!(json_body(tampered).await?, json!({ "hasToken": false }));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn deleting_the_credential_expires_the_cookie() -> TestResult {
    let server = MockServer::start().await;
    let app = app(&server)?;
    let cookie = session_cookie(&app).await?;

    let response = app
        .oneshot(empty_request(Method::DELETE, "/credential", Some(&cookie))?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let cookies = set_cookies(&response);
    assert!(
        cookies
            .iter()
            .any(|value| value.starts_with("comments_session=") && value.contains("Max-Age=0")),
        "expected a removal cookie, got {cookies:?}"
    );
    assert_eq!(json_body(response).await?, json!({ "success": true }));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn comments_require_a_stored_token_before_body_validation() -> TestResult {
    let server = MockServer::start().await;
    let request = json_request(
        Method::POST,
        "/comments",
        &json!({ "owner": "bad/owner", "repo": "repo", "prNumber": 42 }),
        None,
    )?;

    let response = app(&server)?.oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        json_body(response).await?,
        json!({ "error": "No token found. Please authenticate first." })
    );
    let received = server.received_requests().await.unwrap_or_default();
    assert!(received.is_empty(), "GitHub must not be called");
    Ok(())
}

#[rstest]
#[case::bad_owner(json!({ "owner": "bad/owner", "repo": "repo", "prNumber": 42 }))]
#[case::zero_number(json!({ "owner": "owner", "repo": "repo", "prNumber": 0 }))]
#[case::foreign_url(json!({ "url": "https://gitlab.com/owner/repo/pull/42" }))]
#[tokio::test]
async fn invalid_targets_are_rejected(#[case] body: Value) -> TestResult {
    let server = MockServer::start().await;
    let app = app(&server)?;
    let cookie = session_cookie(&app).await?;

    let response = app
        .oneshot(json_request(Method::POST, "/comments", &body, Some(&cookie))?)
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let received = server.received_requests().await.unwrap_or_default();
    assert!(received.is_empty(), "GitHub must not be called");
    Ok(())
}

#[rstest]
#[case::fields(json!({ "owner": "owner", "repo": "repo", "prNumber": 42 }))]
#[case::url(json!({ "url": "https://github.com/owner/repo/pull/42" }))]
#[tokio::test]
async fn comments_are_fetched_and_normalized(#[case] body: Value) -> TestResult {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(COMMENTS_PATH))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(comment_page()))
        .expect(1)
        .mount(&server)
        .await;
    let app = app(&server)?;
    let cookie = session_cookie(&app).await?;

    let response = app
        .oneshot(json_request(Method::POST, "/comments", &body, Some(&cookie))?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await?,
        json!({
            "comments": [
                {
                    "path": "src/lib.rs",
                    "body": "Extract this into a helper.",
                    "line": 12,
                    "user": { "login": "alice" },
                    "created_at": "2025-01-01T00:00:00Z"
                },
                {
                    "path": "",
                    "body": "Outdated comment.",
                    "line": 8,
                    "user": { "login": "unknown" },
                    "created_at": ""
                }
            ],
            "total": 2
        })
    );
    Ok(())
}

#[rstest]
#[tokio::test]
async fn rejected_token_is_cleared_from_the_session() -> TestResult {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(COMMENTS_PATH))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Bad credentials" })),
        )
        .mount(&server)
        .await;
    let app = app(&server)?;
    let cookie = session_cookie(&app).await?;
    let body = json!({ "owner": "owner", "repo": "repo", "prNumber": 42 });

    let response = app
        .oneshot(json_request(Method::POST, "/comments", &body, Some(&cookie))?)
        .await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let cookies = set_cookies(&response);
    assert!(
        cookies.iter().any(|value| value.contains("Max-Age=0")),
        "expected a removal cookie, got {cookies:?}"
    );
    assert_eq!(
        json_body(response).await?,
        json!({ "error": "Authentication failed. Please check your token." })
    );
    Ok(())
}

#[rstest]
#[case::forbidden(403, StatusCode::FORBIDDEN, "Access forbidden. Token may not have permission.")]
#[case::not_found(
    404,
    StatusCode::NOT_FOUND,
    "Pull request not found. Please verify the repository and PR number."
)]
#[case::unavailable(
    503,
    StatusCode::SERVICE_UNAVAILABLE,
    "GitHub API error. Please try again later."
)]
#[tokio::test]
async fn upstream_failures_keep_the_token(
    #[case] upstream: u16,
    #[case] expected: StatusCode,
    #[case] message: &str,
) -> TestResult {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(COMMENTS_PATH))
        .respond_with(ResponseTemplate::new(upstream))
        .mount(&server)
        .await;
    let app = app(&server)?;
    let cookie = session_cookie(&app).await?;
    let body = json!({ "owner": "owner", "repo": "repo", "prNumber": 42 });

    let response = app
        .oneshot(json_request(Method::POST, "/comments", &body, Some(&cookie))?)
        .await?;

    assert_eq!(response.status(), expected);
    assert!(set_cookies(&response).is_empty(), "cookie must be untouched");
    assert_eq!(json_body(response).await?, json!({ "error": message }));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn export_returns_a_markdown_attachment() -> TestResult {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(COMMENTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(comment_page()))
        .mount(&server)
        .await;
    let app = app(&server)?;
    let cookie = session_cookie(&app).await?;
    let body = json!({ "owner": "owner", "repo": "repo", "prNumber": 42 });

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/comments/export",
            &body,
            Some(&cookie),
        )?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(CONTENT_TYPE).map(|value| value.as_bytes()),
        Some(b"text/markdown; charset=utf-8".as_slice())
    );
    assert_eq!(
        response
            .headers()
            .get(CONTENT_DISPOSITION)
            .map(|value| value.as_bytes()),
        Some(b"attachment; filename=\"comments-owner-repo-pr42.md\"".as_slice())
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let document = String::from_utf8(bytes.to_vec())?;
    assert!(document.contains("**Total Comments:** 2"), "{document}");
    assert!(document.contains("## 1. src/lib.rs"), "{document}");
    assert!(document.contains("**Line:** 8"), "{document}");
    Ok(())
}

#[rstest]
#[tokio::test]
async fn oversized_bodies_are_rejected() -> TestResult {
    let server = MockServer::start().await;
    let padding = "x".repeat(2 * 1024 * 1024);
    let request = json_request(
        Method::POST,
        "/credential",
        &json!({ "token": TOKEN, "padding": padding }),
        None,
    )?;

    let response = app(&server)?.oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    Ok(())
}
