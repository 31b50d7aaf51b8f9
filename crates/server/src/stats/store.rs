use std::{collections::HashMap, sync::Arc};

use thiserror::Error;
use tokio::sync::RwLock;
use utils::api::stats::{StatsUpdateRequest, UserStats};

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("negative increment for `{0}` rejected in strict mode")]
    NegativeIncrement(&'static str),
    #[error("high score set from {from} to {to} rejected in strict mode")]
    HighScoreRegression { from: u64, to: u64 },
}

/// Process-lifetime store of per-user counters. No persistence, no
/// eviction; records are created zero-valued on first access.
///
/// The write lock spans each read-modify-write so concurrent updates for
/// the same user cannot drop increments.
#[derive(Clone, Default)]
pub struct StatsService {
    entries: Arc<RwLock<HashMap<String, UserStats>>>,
    strict: bool,
}

impl StatsService {
    pub fn new(strict: bool) -> Self {
        Self {
            entries: Arc::default(),
            strict,
        }
    }

    pub async fn get(&self, user_id: &str) -> UserStats {
        let mut entries = self.entries.write().await;
        *entries.entry(user_id.to_string()).or_default()
    }

    /// Applies increments, then absolute sets. Fields absent from the
    /// request are untouched.
    ///
    /// The default contract is permissive: negative increments are taken
    /// verbatim (saturating at zero) and sets may regress any field.
    /// Strict mode turns both into errors before anything is mutated.
    pub async fn apply(
        &self,
        user_id: &str,
        update: &StatsUpdateRequest,
    ) -> Result<UserStats, StatsError> {
        let mut entries = self.entries.write().await;
        let stats = entries.entry(user_id.to_string()).or_default();

        if self.strict {
            check_strict(stats, update)?;
        }

        if let Some(increment) = &update.increment {
            if let Some(delta) = increment.games_played {
                stats.games_played = stats.games_played.saturating_add_signed(delta);
            }
            if let Some(delta) = increment.wins {
                stats.wins = stats.wins.saturating_add_signed(delta);
            }
            // The high score only ever moves up under increment; a low or
            // negative candidate is a no-op.
            if let Some(delta) = increment.high_score
                && delta > 0
            {
                stats.high_score = stats.high_score.max(delta as u64);
            }
        }

        if let Some(set) = &update.set {
            if let Some(value) = set.games_played {
                stats.games_played = value;
            }
            if let Some(value) = set.wins {
                stats.wins = value;
            }
            if let Some(value) = set.high_score {
                stats.high_score = value;
            }
        }

        Ok(*stats)
    }
}

fn check_strict(current: &UserStats, update: &StatsUpdateRequest) -> Result<(), StatsError> {
    if let Some(increment) = &update.increment {
        for (field, delta) in [
            ("gamesPlayed", increment.games_played),
            ("wins", increment.wins),
            ("highScore", increment.high_score),
        ] {
            if delta.is_some_and(|d| d < 0) {
                return Err(StatsError::NegativeIncrement(field));
            }
        }
    }

    if let Some(set) = &update.set
        && let Some(value) = set.high_score
        && value < current.high_score
    {
        return Err(StatsError::HighScoreRegression {
            from: current.high_score,
            to: value,
        });
    }

    Ok(())
}
