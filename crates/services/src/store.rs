//! Client-side game store: the local mirror of the player's stats and the
//! reconciliation against the server-authoritative record.

use serde::{Deserialize, Serialize};
use tracing::warn;
use utils::{api::stats::UserStats, identity::derive_user_id};

use crate::{
    api::{ApiClient, ClientError},
    cache::StatsCache,
};

/// Namespace used while nobody is signed in.
pub const GUEST_USER: &str = "guest";

/// Counters for one mini game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameRecord {
    pub games_played: u64,
    pub wins: u64,
    pub high_score: u64,
    pub current_score: u64,
}

/// Rock-paper-scissors additionally tracks losses and ties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RpsRecord {
    pub games_played: u64,
    pub wins: u64,
    pub losses: u64,
    pub ties: u64,
    pub high_score: u64,
    pub current_score: u64,
}

/// Snapshot persisted to the local cache, shaped like the frontend's
/// storage entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CachedStats {
    pub high_score: u64,
    pub wins: u64,
    pub games_played: u64,
    pub last_score: u64,
    pub hangman: GameRecord,
    pub guess_number: GameRecord,
    pub rps: RpsRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameKind {
    Hangman,
    GuessNumber,
    Rps,
}

/// Result of one finished round.
#[derive(Debug, Clone, Copy, Default)]
pub struct GameOutcome {
    pub won: bool,
    pub points: u64,
    pub is_loss: bool,
    pub is_tie: bool,
}

/// Per-user game state. Counters accumulate locally between syncs; on user
/// identification the server-authoritative counts win while the high score
/// never regresses.
pub struct GameStore {
    cache: StatsCache,
    user_id: String,
    /// Running score for the current session; persisted as `lastScore`.
    score: u64,
    high_score: u64,
    wins: u64,
    games_played: u64,
    hangman: GameRecord,
    guess_number: GameRecord,
    rps: RpsRecord,
}

impl GameStore {
    pub fn new(cache: StatsCache) -> Self {
        let mut store = Self {
            cache,
            user_id: GUEST_USER.to_string(),
            score: 0,
            high_score: 0,
            wins: 0,
            games_played: 0,
            hangman: GameRecord::default(),
            guess_number: GameRecord::default(),
            rps: RpsRecord::default(),
        };
        store.load();
        store
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    pub fn wins(&self) -> u64 {
        self.wins
    }

    pub fn games_played(&self) -> u64 {
        self.games_played
    }

    pub fn game(&self, game: GameKind) -> GameRecord {
        match game {
            GameKind::Hangman => self.hangman,
            GameKind::GuessNumber => self.guess_number,
            GameKind::Rps => GameRecord {
                games_played: self.rps.games_played,
                wins: self.rps.wins,
                high_score: self.rps.high_score,
                current_score: self.rps.current_score,
            },
        }
    }

    pub fn rps(&self) -> RpsRecord {
        self.rps
    }

    pub fn add_score(&mut self, points: u64) {
        self.score += points;
        if self.score > self.high_score {
            self.high_score = self.score;
            self.save();
        }
    }

    pub fn reset_score(&mut self) {
        self.score = 0;
    }

    pub fn record_win(&mut self) {
        self.wins += 1;
        self.games_played += 1;
        if self.score > self.high_score {
            self.high_score = self.score;
        }
        self.save();
    }

    pub fn record_loss(&mut self) {
        self.games_played += 1;
        self.save();
    }

    /// Books one finished round against its game and the global counters.
    pub fn record_game_result(&mut self, game: GameKind, outcome: GameOutcome) {
        match game {
            GameKind::Hangman => Self::book_round(&mut self.hangman, &outcome),
            GameKind::GuessNumber => Self::book_round(&mut self.guess_number, &outcome),
            GameKind::Rps => {
                self.rps.games_played += 1;
                self.rps.current_score = outcome.points;
                if outcome.won {
                    self.rps.wins += 1;
                    if outcome.points > self.rps.high_score {
                        self.rps.high_score = outcome.points;
                    }
                } else if outcome.is_loss {
                    self.rps.losses += 1;
                } else if outcome.is_tie {
                    self.rps.ties += 1;
                }
            }
        }

        self.games_played += 1;
        if outcome.won {
            self.wins += 1;
        }
        self.score += outcome.points;
        if self.score > self.high_score {
            self.high_score = self.score;
        }

        self.save();
    }

    fn book_round(record: &mut GameRecord, outcome: &GameOutcome) {
        record.games_played += 1;
        record.current_score = outcome.points;
        if outcome.won {
            record.wins += 1;
            if outcome.points > record.high_score {
                record.high_score = outcome.points;
            }
        }
    }

    /// Switches the store to `user_id` (or back to guest) and reconciles
    /// with the server-authoritative record when one is available: server
    /// counts win outright, the high score keeps whichever side is larger.
    pub fn set_user(&mut self, user_id: Option<&str>, server_stats: Option<&UserStats>) {
        self.user_id = user_id
            .filter(|id| !id.is_empty())
            .unwrap_or(GUEST_USER)
            .to_string();

        self.reset();
        self.load();

        if let Some(server) = server_stats {
            self.games_played = server.games_played;
            self.wins = server.wins;
            if server.high_score > self.high_score {
                self.high_score = server.high_score;
            }
            self.save();
        }
    }

    /// Resolves the signed-in user through the backend and reconciles.
    /// A 401 switches to the guest namespace; transport failures leave the
    /// local state untouched and bubble up.
    pub async fn sync_with_server(&mut self, client: &ApiClient) -> Result<(), ClientError> {
        match client.fetch_stats().await {
            Ok(response) => {
                let user_id = derive_user_id(&response.profile);
                self.set_user(Some(&user_id), Some(&response.stats));
                Ok(())
            }
            Err(error) if error.is_auth() => {
                self.set_user(None, None);
                Ok(())
            }
            Err(error) => {
                warn!(%error, "stats sync failed, keeping local state");
                Err(error)
            }
        }
    }

    fn reset(&mut self) {
        self.score = 0;
        self.high_score = 0;
        self.wins = 0;
        self.games_played = 0;
        self.hangman = GameRecord::default();
        self.guess_number = GameRecord::default();
        self.rps = RpsRecord::default();
    }

    fn load(&mut self) {
        let Some(cached) = self.cache.load(&self.user_id) else {
            return;
        };
        self.high_score = cached.high_score;
        self.wins = cached.wins;
        self.games_played = cached.games_played;
        self.score = cached.last_score;
        self.hangman = cached.hangman;
        self.guess_number = cached.guess_number;
        self.rps = cached.rps;
    }

    fn save(&self) {
        self.cache.save(&self.user_id, &self.snapshot());
    }

    fn snapshot(&self) -> CachedStats {
        CachedStats {
            high_score: self.high_score,
            wins: self.wins,
            games_played: self.games_played,
            last_score: self.score,
            hangman: self.hangman,
            guess_number: self.guess_number,
            rps: self.rps,
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn store(dir: &TempDir) -> GameStore {
        GameStore::new(StatsCache::new(dir.path().to_path_buf()))
    }

    #[test]
    fn switching_users_does_not_leak_guest_state() {
        let dir = TempDir::new().unwrap();
        let mut store = store(&dir);

        store.add_score(50);
        store.set_user(
            Some("user-1"),
            Some(&UserStats {
                games_played: 7,
                wins: 3,
                high_score: 30,
            }),
        );

        // Fresh namespace: the guest high score does not leak over, but
        // the server record fills in.
        assert_eq!(store.games_played(), 7);
        assert_eq!(store.wins(), 3);
        assert_eq!(store.high_score(), 30);
    }

    #[test]
    fn reconciliation_adopts_the_larger_server_high_score() {
        let dir = TempDir::new().unwrap();
        let mut store = store(&dir);

        // Build a cached high score of 30 for the user, then reconcile
        // against a server record of 50.
        store.set_user(Some("user-1"), None);
        store.add_score(30);

        store.set_user(
            Some("user-1"),
            Some(&UserStats {
                games_played: 1,
                wins: 0,
                high_score: 50,
            }),
        );
        assert_eq!(store.high_score(), 50);
    }

    #[test]
    fn reconciliation_never_regresses_the_high_score() {
        let dir = TempDir::new().unwrap();
        let mut store = store(&dir);

        store.set_user(Some("user-1"), None);
        store.add_score(50);

        store.set_user(
            Some("user-1"),
            Some(&UserStats {
                games_played: 9,
                wins: 4,
                high_score: 30,
            }),
        );
        assert_eq!(store.high_score(), 50);
        // Counts are still server-authoritative.
        assert_eq!(store.games_played(), 9);
    }

    #[test]
    fn merged_state_is_persisted_per_user() {
        let dir = TempDir::new().unwrap();
        {
            let mut store = store(&dir);
            store.set_user(
                Some("user-1"),
                Some(&UserStats {
                    games_played: 2,
                    wins: 1,
                    high_score: 40,
                }),
            );
        }

        let mut reloaded = store(&dir);
        reloaded.set_user(Some("user-1"), None);
        assert_eq!(reloaded.high_score(), 40);
        assert_eq!(reloaded.games_played(), 2);

        // A different user starts from zero.
        reloaded.set_user(Some("user-2"), None);
        assert_eq!(reloaded.high_score(), 0);
    }

    #[test]
    fn game_results_book_per_game_and_globally() {
        let dir = TempDir::new().unwrap();
        let mut store = store(&dir);

        store.record_game_result(
            GameKind::Hangman,
            GameOutcome {
                won: true,
                points: 25,
                ..GameOutcome::default()
            },
        );
        store.record_game_result(
            GameKind::Rps,
            GameOutcome {
                is_loss: true,
                ..GameOutcome::default()
            },
        );

        let hangman = store.game(GameKind::Hangman);
        assert_eq!(hangman.games_played, 1);
        assert_eq!(hangman.wins, 1);
        assert_eq!(hangman.high_score, 25);

        // The other games are untouched.
        assert_eq!(store.game(GameKind::GuessNumber), GameRecord::default());
        assert_eq!(store.rps().losses, 1);
        assert_eq!(store.rps().wins, 0);

        assert_eq!(store.games_played(), 2);
        assert_eq!(store.wins(), 1);
        assert_eq!(store.score(), 25);
    }

    #[test]
    fn losing_counts_a_game_without_a_win() {
        let dir = TempDir::new().unwrap();
        let mut store = store(&dir);

        store.record_loss();
        assert_eq!(store.games_played(), 1);
        assert_eq!(store.wins(), 0);
    }

    #[test]
    fn session_score_feeds_the_high_score() {
        let dir = TempDir::new().unwrap();
        let mut store = store(&dir);

        store.add_score(10);
        store.add_score(15);
        assert_eq!(store.high_score(), 25);

        store.reset_score();
        store.add_score(5);
        // The high score survives a score reset.
        assert_eq!(store.high_score(), 25);
    }
}
