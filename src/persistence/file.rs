//! JSON file stores
//!
//! Writes go to a sibling `.tmp` file which is then renamed over the target,
//! so a crash mid-write never leaves a truncated store behind.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{HighScoreStore, LeaderboardService, StoreError};
use crate::highscores::{Leaderboard, LeaderboardEntry, Submission};
use crate::identity::Identity;

/// Read a JSON value; a missing file is `None`
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    match fs::read_to_string(path) {
        Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(value)?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Best score stored as a bare JSON number
#[derive(Debug, Clone)]
pub struct JsonHighScoreFile {
    path: PathBuf,
}

impl JsonHighScoreFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for JsonHighScoreFile {
    fn high_score(&self) -> Result<Option<u32>, StoreError> {
        read_json(&self.path)
    }

    fn set_high_score(&mut self, score: u32) -> Result<(), StoreError> {
        write_json(&self.path, &score)
    }
}

/// Leaderboard table persisted to a JSON file after every change
#[derive(Debug)]
pub struct JsonLeaderboardFile {
    path: PathBuf,
    table: Leaderboard,
}

impl JsonLeaderboardFile {
    /// Open an existing leaderboard file, or start empty if there is none
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let table: Leaderboard = read_json(&path)?.unwrap_or_default();
        log::info!("Loaded {} leaderboard entries from {}", table.len(), path.display());
        Ok(Self { path, table })
    }

    pub fn table(&self) -> &Leaderboard {
        &self.table
    }
}

impl LeaderboardService for JsonLeaderboardFile {
    fn submit_score(&mut self, user: &Identity, score: u32) -> Result<Submission, StoreError> {
        let outcome = self.table.submit(user, score);
        if !matches!(outcome, Submission::Kept { .. }) {
            write_json(&self.path, &self.table)?;
        }
        Ok(outcome)
    }

    fn fetch_top_scores(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, StoreError> {
        Ok(self.table.top(limit))
    }
}
