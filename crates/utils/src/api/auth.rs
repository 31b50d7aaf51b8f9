use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Name of the HTTP-only cookie carrying the provider access token.
pub const SESSION_COOKIE: &str = "battlenet_token";

/// Body of `GET /api/auth/me`.
///
/// "Not signed in" is a normal state, not an error: the endpoint always
/// answers 200 and flags authentication through the boolean.
#[derive(Debug, Serialize, Deserialize, Clone, TS)]
#[ts(export)]
pub struct MeResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<serde_json::Value>,
}

impl MeResponse {
    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
            profile: None,
        }
    }

    pub fn signed_in(profile: serde_json::Value) -> Self {
        Self {
            authenticated: true,
            profile: Some(profile),
        }
    }
}

/// Body of `POST /api/auth/logout`.
#[derive(Debug, Serialize, Deserialize, Clone, TS)]
#[ts(export)]
pub struct LogoutResponse {
    pub success: bool,
}
