use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::{
    auth::{AuthFlowError, ProviderError},
    stats::StatsError,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid or missing state parameter")]
    InvalidState,
    #[error("missing authorization code")]
    MissingCode,
    #[error("token exchange failed: {0}")]
    TokenExchange(ProviderError),
    #[error("failed to fetch userinfo: {0}")]
    Userinfo(ProviderError),
    #[error("not authenticated")]
    NotAuthenticated,
    #[error("invalid token")]
    InvalidToken,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<AuthFlowError> for ApiError {
    fn from(error: AuthFlowError) -> Self {
        match error {
            AuthFlowError::InvalidState => ApiError::InvalidState,
            AuthFlowError::MissingCode => ApiError::MissingCode,
            AuthFlowError::Exchange(inner) => ApiError::TokenExchange(inner),
        }
    }
}

impl From<StatsError> for ApiError {
    fn from(error: StatsError) -> Self {
        ApiError::BadRequest(error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidState | ApiError::MissingCode | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotAuthenticated | ApiError::InvalidToken => StatusCode::UNAUTHORIZED,
            ApiError::TokenExchange(_) | ApiError::Userinfo(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
