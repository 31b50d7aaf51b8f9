use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Server-authoritative per-user counters.
///
/// Field names are camelCase on the wire to match the frontend contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserStats {
    pub games_played: u64,
    pub wins: u64,
    pub high_score: u64,
}

/// Per-field increments. Absent fields are untouched; negative values are
/// accepted by the permissive default contract.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StatsIncrement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub games_played: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wins: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_score: Option<i64>,
}

/// Per-field absolute overwrites. Absent fields are untouched.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StatsSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub games_played: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wins: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_score: Option<u64>,
}

/// Body of `POST /api/user/stats`. Increments apply before sets.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StatsUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub increment: Option<StatsIncrement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set: Option<StatsSet>,
}

/// Body of `GET /api/user/stats`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StatsResponse {
    pub authenticated: bool,
    pub profile: serde_json::Value,
    pub stats: UserStats,
}

/// Body of a successful `POST /api/user/stats`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StatsUpdateResponse {
    pub success: bool,
    pub stats: UserStats,
}

/// One leaderboard row, as returned by `GET /api/rankings/{difficulty}`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RankingEntry {
    pub battle_tag: String,
    pub score: i64,
    pub difficulty_level: u8,
    pub date_game: DateTime<Utc>,
}

/// Body of `POST /api/rankings`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RankingSubmission {
    pub battle_tag: String,
    pub score: i64,
    pub difficulty_level: u8,
}
