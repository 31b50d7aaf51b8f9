use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use utils::api::stats::{RankingEntry, RankingSubmission};

use crate::{ApiError, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/rankings", post(submit_ranking))
        .route("/rankings/{difficulty}", get(get_rankings))
}

async fn get_rankings(
    State(state): State<AppState>,
    Path(difficulty): Path<String>,
) -> Result<Json<Vec<RankingEntry>>, ApiError> {
    let difficulty: u8 = difficulty
        .parse()
        .map_err(|_| ApiError::BadRequest("invalid difficulty parameter".to_string()))?;

    Ok(Json(state.rankings().top(difficulty).await))
}

async fn submit_ranking(
    State(state): State<AppState>,
    Json(submission): Json<RankingSubmission>,
) -> StatusCode {
    state.rankings().submit(submission).await;
    StatusCode::CREATED
}
