//! In-process stores

use super::{HighScoreStore, LeaderboardService, StoreError};
use crate::highscores::{Leaderboard, LeaderboardEntry, Submission};
use crate::identity::Identity;

#[derive(Debug, Clone, Default)]
pub struct MemoryHighScore {
    best: Option<u32>,
}

impl MemoryHighScore {
    pub fn with_score(score: u32) -> Self {
        Self { best: Some(score) }
    }
}

impl HighScoreStore for MemoryHighScore {
    fn high_score(&self) -> Result<Option<u32>, StoreError> {
        Ok(self.best)
    }

    fn set_high_score(&mut self, score: u32) -> Result<(), StoreError> {
        self.best = Some(score);
        Ok(())
    }
}

/// Leaderboard held in memory. Can be switched offline to exercise the
/// failure paths.
#[derive(Debug, Clone)]
pub struct MemoryLeaderboard {
    table: Leaderboard,
    online: bool,
}

impl Default for MemoryLeaderboard {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLeaderboard {
    pub fn new() -> Self {
        Self {
            table: Leaderboard::new(),
            online: true,
        }
    }

    pub fn set_online(&mut self, online: bool) {
        self.online = online;
    }

    pub fn table(&self) -> &Leaderboard {
        &self.table
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.online {
            Ok(())
        } else {
            Err(StoreError::Unavailable("leaderboard is offline".into()))
        }
    }
}

impl LeaderboardService for MemoryLeaderboard {
    fn submit_score(&mut self, user: &Identity, score: u32) -> Result<Submission, StoreError> {
        self.check_online()?;
        Ok(self.table.submit(user, score))
    }

    fn fetch_top_scores(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, StoreError> {
        self.check_online()?;
        Ok(self.table.top(limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offline_leaderboard_errors() {
        let mut board = MemoryLeaderboard::new();
        let user = Identity::new("1");
        board.submit_score(&user, 10).unwrap();

        board.set_online(false);
        assert!(matches!(
            board.submit_score(&user, 20),
            Err(StoreError::Unavailable(_))
        ));
        assert!(board.fetch_top_scores(10).is_err());
        assert_eq!(board.table().best_for("1"), Some(10));
    }

    #[test]
    fn test_memory_high_score() {
        let mut store = MemoryHighScore::default();
        assert_eq!(store.high_score().unwrap(), None);
        store.set_high_score(77).unwrap();
        assert_eq!(store.high_score().unwrap(), Some(77));
    }
}
