//! Leaderboard table
//!
//! One row per user holding their best score, kept sorted descending.
//! Submissions only ever raise a user's score.

use serde::{Deserialize, Serialize};

use crate::identity::Identity;

/// A single leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub display_name: String,
    pub score: u32,
}

/// What a submission did to the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// First score for this user
    Inserted,
    /// Replaced a lower score
    Improved { previous: u32 },
    /// Existing score was at least as high; nothing changed
    Kept { best: u32 },
}

/// Best score per user, sorted descending by score
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Upsert-if-greater
    pub fn submit(&mut self, user: &Identity, score: u32) -> Submission {
        let existing = self.entries.iter().position(|e| e.user_id == user.id);

        let outcome = match existing {
            Some(i) if self.entries[i].score >= score => {
                return Submission::Kept {
                    best: self.entries[i].score,
                };
            }
            Some(i) => Submission::Improved {
                previous: self.entries.remove(i).score,
            },
            None => Submission::Inserted,
        };

        let entry = LeaderboardEntry {
            user_id: user.id.clone(),
            display_name: user.display_name(),
            score,
        };

        // Find insertion point (sorted descending, ties keep the earlier holder first)
        let pos = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);

        outcome
    }

    /// Top `limit` rows, highest first
    pub fn top(&self, limit: usize) -> Vec<LeaderboardEntry> {
        self.entries.iter().take(limit).cloned().collect()
    }

    /// Best score recorded for a user
    pub fn best_for(&self, user_id: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|e| e.user_id == user_id)
            .map(|e| e.score)
    }

    /// 1-indexed rank of a user
    pub fn rank_of(&self, user_id: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.user_id == user_id)
            .map(|i| i + 1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> Identity {
        Identity::new(id).with_first_name(format!("P{id}"))
    }

    #[test]
    fn test_submit_keeps_best_per_user() {
        let mut board = Leaderboard::new();
        assert_eq!(board.submit(&user("a"), 300), Submission::Inserted);
        assert_eq!(
            board.submit(&user("a"), 200),
            Submission::Kept { best: 300 }
        );
        assert_eq!(
            board.submit(&user("a"), 300),
            Submission::Kept { best: 300 }
        );
        assert_eq!(
            board.submit(&user("a"), 450),
            Submission::Improved { previous: 300 }
        );
        assert_eq!(board.len(), 1);
        assert_eq!(board.best_for("a"), Some(450));
    }

    #[test]
    fn test_sorted_descending() {
        let mut board = Leaderboard::new();
        board.submit(&user("a"), 100);
        board.submit(&user("b"), 500);
        board.submit(&user("c"), 300);
        board.submit(&user("a"), 900);

        let scores: Vec<u32> = board.top(10).iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![900, 500, 300]);
        assert_eq!(board.top_score(), Some(900));
        assert_eq!(board.rank_of("c"), Some(3));
        assert_eq!(board.top(2).len(), 2);
    }

    #[test]
    fn test_ties_keep_first_holder_ahead() {
        let mut board = Leaderboard::new();
        board.submit(&user("a"), 200);
        board.submit(&user("b"), 200);
        assert_eq!(board.rank_of("a"), Some(1));
        assert_eq!(board.rank_of("b"), Some(2));
    }

    #[test]
    fn test_entry_uses_display_name() {
        let mut board = Leaderboard::new();
        board.submit(&Identity::new("9"), 10);
        assert_eq!(board.top(1)[0].display_name, "user-9");
    }
}
