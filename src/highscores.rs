//! High score leaderboard system
//!
//! Persisted as JSON next to the settings file, tracks top 10 scores.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Player's score
    pub score: u64,
    /// Wave reached
    pub wave: u32,
    /// Unix timestamp (seconds) when achieved
    pub timestamp: u64,
}

/// High score leaderboard, sorted descending by score
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard. Any score makes
    /// the table while it has room; a full table requires beating the
    /// lowest entry.
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, score: u64, wave: u32, timestamp: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            score,
            wave,
            timestamp,
        };

        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load high scores from a JSON file. Missing or unreadable files
    /// yield an empty table.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<HighScores>(&json) {
                Ok(scores) => {
                    log::info!("loaded {} high scores", scores.entries.len());
                    scores
                }
                Err(e) => {
                    log::warn!("high score file is corrupt, starting fresh: {}", e);
                    Self::new()
                }
            },
            Err(_) => {
                log::info!("no high scores found, starting fresh");
                Self::new()
            }
        }
    }

    /// Save high scores to a JSON file. Failure is logged and ignored.
    pub fn save(&self, path: &Path) {
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(path, json) {
                    log::warn!("failed to save high scores: {}", e);
                } else {
                    log::info!("high scores saved ({} entries)", self.entries.len());
                }
            }
            Err(e) => log::warn!("failed to serialize high scores: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_score_qualifies_when_not_full() {
        let mut scores = HighScores::new();
        assert!(scores.qualifies(1));
        assert!(scores.qualifies(0));
        assert_eq!(scores.add_score(0, 1, 0), Some(1));
    }

    #[test]
    fn test_zero_score_does_not_displace_a_full_table() {
        let mut scores = HighScores::new();
        for i in 1..=MAX_HIGH_SCORES as u64 {
            scores.add_score(i * 100, 1, 0);
        }
        assert!(!scores.qualifies(0));
        assert_eq!(scores.add_score(0, 1, 0), None);
    }

    #[test]
    fn test_full_table_requires_beating_the_lowest() {
        let mut scores = HighScores::new();
        for i in 1..=MAX_HIGH_SCORES as u64 {
            scores.add_score(i * 100, 1, 0);
        }
        assert!(!scores.qualifies(100));
        assert!(scores.qualifies(101));
    }

    #[test]
    fn test_insert_keeps_descending_order() {
        let mut scores = HighScores::new();
        scores.add_score(500, 3, 0);
        scores.add_score(900, 5, 0);
        scores.add_score(700, 4, 0);

        let values: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(values, vec![900, 700, 500]);
        assert_eq!(scores.top_score(), Some(900));
    }

    #[test]
    fn test_rank_is_one_indexed() {
        let mut scores = HighScores::new();
        scores.add_score(900, 5, 0);
        assert_eq!(scores.potential_rank(1000), Some(1));
        assert_eq!(scores.potential_rank(800), Some(2));
        assert_eq!(scores.add_score(800, 4, 0), Some(2));
    }

    #[test]
    fn test_overflow_evicts_the_lowest() {
        let mut scores = HighScores::new();
        for i in 1..=MAX_HIGH_SCORES as u64 {
            scores.add_score(i * 100, 1, 0);
        }
        scores.add_score(550, 2, 0);
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        // 100 fell off the bottom
        assert_eq!(scores.entries.last().unwrap().score, 200);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let scores = HighScores::load(Path::new("/nonexistent/highscores.json"));
        assert!(scores.is_empty());
    }
}
