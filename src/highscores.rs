//! High score and leaderboard
//!
//! Persisted through a [`KeyValueStore`]: a running high score, and the top 5
//! final scores sorted descending.

use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::persistence::{HIGH_SCORE_KEY, KeyValueStore, LEADERBOARD_KEY, load_json, save_json};

/// Maximum number of leaderboard entries to keep
pub const MAX_LEADERBOARD_ENTRIES: usize = 5;

/// Top final scores, highest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Leaderboard {
    entries: Vec<u64>,
}

impl Leaderboard {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build from arbitrary scores, normalizing order and length
    pub fn from_scores(scores: impl IntoIterator<Item = u64>) -> Self {
        let mut board = Self {
            entries: scores.into_iter().collect(),
        };
        board.normalize();
        board
    }

    fn normalize(&mut self) {
        self.entries.sort_unstable_by(|a, b| b.cmp(a));
        self.entries.truncate(MAX_LEADERBOARD_ENTRIES);
    }

    /// Insert a final score. Returns its 1-indexed rank, or None if it fell off.
    pub fn record(&mut self, score: u64) -> Option<usize> {
        self.entries.push(score);
        self.normalize();
        self.entries
            .iter()
            .position(|&s| s == score)
            .map(|i| i + 1)
    }

    pub fn entries(&self) -> &[u64] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().copied()
    }

    /// Load from storage; missing or malformed data gives an empty board
    pub fn load(store: &impl KeyValueStore) -> Self {
        match load_json::<Vec<u64>>(store, LEADERBOARD_KEY) {
            Some(scores) => {
                log::info!("Loaded {} leaderboard entries", scores.len());
                Self::from_scores(scores)
            }
            None => {
                log::info!("No leaderboard found, starting fresh");
                Self::new()
            }
        }
    }

    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<(), StorageError> {
        save_json(store, LEADERBOARD_KEY, &self.entries)?;
        log::info!("Leaderboard saved ({} entries)", self.entries.len());
        Ok(())
    }
}

/// The running best score
pub struct HighScore;

impl HighScore {
    /// Load from storage; missing or malformed data reads as 0
    pub fn load(store: &impl KeyValueStore) -> u64 {
        load_json(store, HIGH_SCORE_KEY).unwrap_or(0)
    }

    pub fn save(store: &mut impl KeyValueStore, score: u64) -> Result<(), StorageError> {
        save_json(store, HIGH_SCORE_KEY, &score)
    }
}
