//! Session and login-state cookies.
//!
//! The session cookie carries the provider access token verbatim; its
//! lifetime is bounded by the provider-issued `expires_in`. The state
//! cookie exists only between login redirect and callback and is removed
//! on first read.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

pub use utils::api::auth::SESSION_COOKIE;

/// Name of the short-lived cookie holding the CSRF state token.
pub const STATE_COOKIE: &str = "battlenet_oauth_state";

/// Fallback session lifetime when the provider omits `expires_in`.
pub const DEFAULT_SESSION_TTL_SECS: i64 = 3600;

/// How long a login attempt may sit between redirect and callback.
const STATE_TTL_SECS: i64 = 600;

pub fn issue(jar: CookieJar, token: &str, ttl_secs: i64) -> CookieJar {
    jar.add(base_cookie(SESSION_COOKIE, token.to_string(), ttl_secs))
}

/// Idempotent: clearing an absent session is not an error.
pub fn clear(jar: CookieJar) -> CookieJar {
    jar.remove(removal(SESSION_COOKIE))
}

/// Absence is a normal, non-error state.
pub fn read(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

pub fn issue_state(jar: CookieJar, state: &str) -> CookieJar {
    jar.add(base_cookie(STATE_COOKIE, state.to_string(), STATE_TTL_SECS))
}

/// Reads and deletes the state cookie in one step; it is single use.
pub fn take_state(jar: CookieJar) -> (CookieJar, Option<String>) {
    let value = jar
        .get(STATE_COOKIE)
        .map(|cookie| cookie.value().to_string());
    (jar.remove(removal(STATE_COOKIE)), value)
}

fn base_cookie(name: &'static str, value: String, ttl_secs: i64) -> Cookie<'static> {
    let mut cookie = Cookie::new(name, value);
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_secure(!cfg!(debug_assertions));
    cookie.set_path("/");
    cookie.set_max_age(cookie::time::Duration::seconds(ttl_secs));
    cookie
}

// The removal cookie must carry the same path as the original or the
// browser keeps the old entry.
fn removal(name: &'static str) -> Cookie<'static> {
    let mut cookie = Cookie::from(name);
    cookie.set_path("/");
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_sets_a_guarded_session_cookie() {
        let jar = issue(CookieJar::new(), "token-value", 1200);
        let cookie = jar.get(SESSION_COOKIE).unwrap();

        assert_eq!(cookie.value(), "token-value");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(
            cookie.max_age(),
            Some(cookie::time::Duration::seconds(1200))
        );
    }

    #[test]
    fn read_returns_none_without_a_session() {
        assert_eq!(read(&CookieJar::new()), None);
    }

    #[test]
    fn clear_is_idempotent() {
        let jar = clear(CookieJar::new());
        let jar = clear(jar);
        assert_eq!(read(&jar), None);
    }

    #[test]
    fn take_state_removes_the_cookie() {
        let jar = issue_state(CookieJar::new(), "abc123");
        let (jar, state) = take_state(jar);
        assert_eq!(state.as_deref(), Some("abc123"));

        // Second read: the cookie is gone.
        let (_, state) = take_state(jar);
        assert_eq!(state, None);
    }
}
