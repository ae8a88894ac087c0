//! Per-session storage for the user's GitHub token.
//!
//! The token lives in a single encrypted cookie. Stores have value
//! semantics: `set` and `clear` consume the store and hand back the updated
//! one, which the HTTP layer then returns so the cookie changes reach the
//! browser.

use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};

use crate::github::locator::PersonalAccessToken;

/// Name of the encrypted cookie holding the token.
pub const SESSION_COOKIE_NAME: &str = "comments_session";

/// Lifetime of the session cookie.
pub const SESSION_MAX_AGE: time::Duration = time::Duration::days(7);

/// A per-session slot holding at most one token.
pub trait CredentialStore: Sized {
    /// Returns the stored token, if any.
    fn get(&self) -> Option<PersonalAccessToken>;

    /// Stores `token`, replacing any previous value.
    #[must_use]
    fn set(self, token: &PersonalAccessToken) -> Self;

    /// Removes the stored token. Clearing an empty store is a no-op.
    #[must_use]
    fn clear(self) -> Self;
}

/// Cookie attributes that depend on the deployment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CookiePolicy {
    /// Adds the `Secure` attribute.
    pub secure: bool,
}

/// Credential store backed by an AES-GCM encrypted cookie.
#[derive(Debug)]
pub struct CookieCredentialStore {
    jar: PrivateCookieJar,
    policy: CookiePolicy,
}

impl CookieCredentialStore {
    /// Wraps the jar extracted from the incoming request.
    #[must_use]
    pub const fn new(jar: PrivateCookieJar, policy: CookiePolicy) -> Self {
        Self { jar, policy }
    }

    /// Releases the jar so its pending changes can be written to a response.
    #[must_use]
    pub fn into_jar(self) -> PrivateCookieJar {
        self.jar
    }

    fn session_cookie(&self, token: &PersonalAccessToken) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE_NAME, token.value().to_owned()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.policy.secure)
            .max_age(SESSION_MAX_AGE)
            .build()
    }
}

impl CredentialStore for CookieCredentialStore {
    fn get(&self) -> Option<PersonalAccessToken> {
        self.jar
            .get(SESSION_COOKIE_NAME)
            .and_then(|cookie| PersonalAccessToken::new(cookie.value()).ok())
    }

    fn set(self, token: &PersonalAccessToken) -> Self {
        let cookie = self.session_cookie(token);
        Self {
            jar: self.jar.add(cookie),
            policy: self.policy,
        }
    }

    fn clear(self) -> Self {
        let removal = Cookie::build(SESSION_COOKIE_NAME).path("/").build();
        Self {
            jar: self.jar.remove(removal),
            policy: self.policy,
        }
    }
}

/// Credential store kept in memory, for callers without cookies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryCredentialStore {
    token: Option<PersonalAccessToken>,
}

impl MemoryCredentialStore {
    /// Creates a store already holding `token`.
    #[must_use]
    pub const fn with_token(token: PersonalAccessToken) -> Self {
        Self { token: Some(token) }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Option<PersonalAccessToken> {
        self.token.clone()
    }

    fn set(self, token: &PersonalAccessToken) -> Self {
        Self {
            token: Some(token.clone()),
        }
    }

    fn clear(self) -> Self {
        Self { token: None }
    }
}
