use axum::{
    Json, Router,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::CookieJar;
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::warn;
use utils::api::auth::{LogoutResponse, MeResponse};

use crate::{
    ApiError, AppState,
    auth::{AuthService, session},
};

/// Landing page after a completed login.
const POST_LOGIN_REDIRECT: &str = "/dashboard";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/battlenet/login", get(login))
        .route("/auth/battlenet/callback", get(callback))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
}

async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), ApiError> {
    let (state_token, authorize_url) = state
        .auth()
        .begin_login()
        .map_err(|e| ApiError::Internal(format!("failed to build authorize url: {e}")))?;

    let jar = session::issue_state(jar, &state_token);
    Ok((jar, Redirect::temporary(authorize_url.as_str())))
}

#[derive(Debug, Deserialize)]
struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
}

async fn callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
    jar: CookieJar,
) -> Response {
    // The state cookie is single use: it is removed on every outcome,
    // which makes a replayed callback fail the CSRF check.
    let (jar, stored_state) = session::take_state(jar);

    if let Err(error) = AuthService::validate_state(query.state.as_deref(), stored_state.as_deref())
    {
        return (jar, ApiError::from(error)).into_response();
    }

    let grant = match state.auth().complete_login(query.code.as_deref()).await {
        Ok(grant) => grant,
        Err(error) => {
            warn!(%error, "authorization code exchange failed");
            return (jar, ApiError::from(error)).into_response();
        }
    };

    let ttl = grant
        .expires_in
        .unwrap_or(session::DEFAULT_SESSION_TTL_SECS);
    let jar = session::issue(jar, grant.access_token.expose_secret(), ttl);

    (jar, Redirect::temporary(POST_LOGIN_REDIRECT)).into_response()
}

async fn logout(jar: CookieJar) -> (CookieJar, Json<LogoutResponse>) {
    (session::clear(jar), Json(LogoutResponse { success: true }))
}

async fn me(State(state): State<AppState>, jar: CookieJar) -> Result<Json<MeResponse>, ApiError> {
    let Some(token) = session::read(&jar) else {
        return Ok(Json(MeResponse::anonymous()));
    };

    match state.auth().provider().fetch_userinfo(&token).await {
        Ok(profile) => Ok(Json(MeResponse::signed_in(profile))),
        // A rejected token is the normal "session expired" case, not a
        // fault: answer 200 with authenticated=false.
        Err(error) if error.is_rejection() => Ok(Json(MeResponse::anonymous())),
        Err(error) => {
            warn!(%error, "userinfo request failed");
            Err(ApiError::Userinfo(error))
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::extract::State;
    use secrecy::SecretString;

    use super::*;
    use crate::{
        auth::{BattleNetProvider, Region},
        config::{BattleNetConfig, ServerConfig},
    };

    fn test_state() -> AppState {
        // The production binary installs the rustls crypto provider in
        // `main`; tests must install it before building a reqwest client.
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
        let battlenet = BattleNetConfig::new(
            "client-id".to_string(),
            SecretString::new("secret".into()),
            Region::Eu,
        );
        let config = ServerConfig {
            listen_addr: "127.0.0.1:0".to_string(),
            public_base_url: "http://localhost:3000".to_string(),
            frontend_origin: "http://localhost:3000".to_string(),
            strict_stats: false,
            battlenet,
        };
        let provider = BattleNetProvider::new(&config.battlenet).unwrap();
        let auth = AuthService::new(provider, config.public_base_url.clone());
        AppState::new(config, auth)
    }

    #[tokio::test]
    async fn me_without_a_session_is_anonymous_not_an_error() {
        let response = me(State(test_state()), CookieJar::new()).await.unwrap();
        assert!(!response.0.authenticated);
        assert!(response.0.profile.is_none());
    }

    #[tokio::test]
    async fn login_issues_a_state_cookie() {
        let (jar, _redirect) = login(State(test_state()), CookieJar::new()).await.unwrap();
        let cookie = jar.get(session::STATE_COOKIE).unwrap();
        assert_eq!(cookie.value().len(), crate::auth::STATE_TOKEN_LENGTH);
        assert_eq!(cookie.http_only(), Some(true));
    }

    #[tokio::test]
    async fn logout_clears_the_session_and_reports_success() {
        let jar = session::issue(CookieJar::new(), "token", 60);
        let (jar, body) = logout(jar).await;
        assert!(body.0.success);
        assert_eq!(session::read(&jar), None);
    }

    #[tokio::test]
    async fn replayed_callback_fails_the_state_check() {
        // First pass consumes the state cookie.
        let jar = session::issue_state(CookieJar::new(), "state-1");
        let (jar, taken) = session::take_state(jar);
        assert_eq!(taken.as_deref(), Some("state-1"));

        // Replay: the cookie is gone, so the same query state no longer
        // validates.
        let (_, replayed) = session::take_state(jar);
        assert!(AuthService::validate_state(Some("state-1"), replayed.as_deref()).is_err());
    }
}
