use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use tokio::sync::RwLock;
use utils::api::stats::{RankingEntry, RankingSubmission};

/// How many rows a difficulty board returns.
const BOARD_LIMIT: usize = 10;

/// In-memory leaderboard, one board per difficulty level. Lives for the
/// process lifetime like the stats store.
#[derive(Clone, Default)]
pub struct RankingBoard {
    boards: Arc<RwLock<HashMap<u8, Vec<RankingEntry>>>>,
}

impl RankingBoard {
    pub async fn submit(&self, submission: RankingSubmission) {
        let entry = RankingEntry {
            battle_tag: submission.battle_tag,
            score: submission.score,
            difficulty_level: submission.difficulty_level,
            date_game: Utc::now(),
        };
        self.boards
            .write()
            .await
            .entry(entry.difficulty_level)
            .or_default()
            .push(entry);
    }

    /// Top rows for a difficulty: score descending, earlier submission
    /// winning ties.
    pub async fn top(&self, difficulty: u8) -> Vec<RankingEntry> {
        let boards = self.boards.read().await;
        let mut entries = boards.get(&difficulty).cloned().unwrap_or_default();
        entries.sort_by(|a, b| b.score.cmp(&a.score).then(a.date_game.cmp(&b.date_game)));
        entries.truncate(BOARD_LIMIT);
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(battle_tag: &str, score: i64, difficulty_level: u8) -> RankingSubmission {
        RankingSubmission {
            battle_tag: battle_tag.to_string(),
            score,
            difficulty_level,
        }
    }

    #[tokio::test]
    async fn boards_are_separated_by_difficulty() {
        let board = RankingBoard::default();
        board.submit(submission("Easy#1", 10, 1)).await;
        board.submit(submission("Hard#1", 99, 3)).await;

        assert_eq!(board.top(1).await.len(), 1);
        assert_eq!(board.top(3).await[0].battle_tag, "Hard#1");
        assert!(board.top(2).await.is_empty());
    }

    #[tokio::test]
    async fn rows_are_ordered_by_score_then_submission_time() {
        let board = RankingBoard::default();
        board.submit(submission("First#1", 50, 1)).await;
        board.submit(submission("Top#1", 80, 1)).await;
        board.submit(submission("Tied#1", 50, 1)).await;

        let rows = board.top(1).await;
        let tags: Vec<_> = rows.iter().map(|r| r.battle_tag.as_str()).collect();
        assert_eq!(tags, ["Top#1", "First#1", "Tied#1"]);
    }

    #[tokio::test]
    async fn boards_are_truncated() {
        let board = RankingBoard::default();
        for score in 0..25 {
            board.submit(submission("Player#1", score, 1)).await;
        }
        let rows = board.top(1).await;
        assert_eq!(rows.len(), BOARD_LIMIT);
        assert_eq!(rows[0].score, 24);
    }
}
