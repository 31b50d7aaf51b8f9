use axum::{Json, Router, extract::State, routing::get};
use axum_extra::extract::CookieJar;
use tracing::warn;
use utils::{
    api::stats::{StatsResponse, StatsUpdateRequest, StatsUpdateResponse},
    identity::derive_user_id,
};

use crate::{ApiError, AppState, auth::session};

pub fn router() -> Router<AppState> {
    Router::new().route("/user/stats", get(get_stats).post(update_stats))
}

/// Resolves the calling user by verifying the session token against the
/// provider. Stats routes require a valid token: a missing session is 401
/// before any store access, a provider-rejected token is 401 as well.
async fn authenticate(state: &AppState, jar: &CookieJar) -> Result<serde_json::Value, ApiError> {
    let token = session::read(jar).ok_or(ApiError::NotAuthenticated)?;

    match state.auth().provider().fetch_userinfo(&token).await {
        Ok(profile) => Ok(profile),
        Err(error) if error.is_rejection() => Err(ApiError::InvalidToken),
        Err(error) => {
            warn!(%error, "userinfo request failed");
            Err(ApiError::Userinfo(error))
        }
    }
}

async fn get_stats(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<StatsResponse>, ApiError> {
    let profile = authenticate(&state, &jar).await?;
    let user_id = derive_user_id(&profile);
    let stats = state.stats().get(&user_id).await;

    Ok(Json(StatsResponse {
        authenticated: true,
        profile,
        stats,
    }))
}

async fn update_stats(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(update): Json<StatsUpdateRequest>,
) -> Result<Json<StatsUpdateResponse>, ApiError> {
    let profile = authenticate(&state, &jar).await?;
    let user_id = derive_user_id(&profile);
    let stats = state.stats().apply(&user_id, &update).await?;

    Ok(Json(StatsUpdateResponse {
        success: true,
        stats,
    }))
}
