//! High score and leaderboard stores
//!
//! The game core never talks to storage directly; the driver runs these on its
//! behalf and feeds the results back as messages.
//!
//! Features:
//! - Local best score (`HighScoreStore`)
//! - Shared leaderboard with upsert-if-greater submissions (`LeaderboardService`)
//! - In-memory and JSON-file backends, files written via tmp + rename

pub mod file;
pub mod memory;

pub use file::{JsonHighScoreFile, JsonLeaderboardFile};
pub use memory::{MemoryHighScore, MemoryLeaderboard};

use thiserror::Error;

use crate::highscores::{LeaderboardEntry, Submission};
use crate::identity::Identity;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored data is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Local best score for this device
pub trait HighScoreStore {
    fn high_score(&self) -> Result<Option<u32>, StoreError>;
    fn set_high_score(&mut self, score: u32) -> Result<(), StoreError>;
}

/// Shared leaderboard
pub trait LeaderboardService {
    /// Record a score, keeping only the user's best
    fn submit_score(&mut self, user: &Identity, score: u32) -> Result<Submission, StoreError>;
    /// Top `limit` rows sorted descending by score
    fn fetch_top_scores(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, StoreError>;
}
