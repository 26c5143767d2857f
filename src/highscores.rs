//! Run leaderboard
//!
//! Keeps the top 10 finished runs for the lifetime of the process. Nothing is
//! written to disk.

use serde::{Deserialize, Serialize};

/// Maximum number of runs to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Run number within the session (1-based)
    pub run: u32,
    pub score: u64,
    /// World units travelled
    pub distance: f64,
    /// Difficulty level reached
    pub level: u32,
    /// Seconds survived
    pub elapsed_secs: f32,
}

/// Leaderboard sorted by descending score
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<RunRecord>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Would a finished run with `score` make the board?
    pub fn qualifies(&self, score: u64) -> bool {
        score > 0
            && (self.entries.len() < MAX_HIGH_SCORES
                || self.entries.iter().any(|entry| score > entry.score))
    }

    /// Insert a finished run. Returns its 1-based rank, or None if it missed
    /// the board.
    pub fn add_run(&mut self, record: RunRecord) -> Option<usize> {
        if !self.qualifies(record.score) {
            return None;
        }

        // Equal scores keep the earlier run ahead
        let index = self.entries.partition_point(|entry| entry.score >= record.score);
        self.entries.insert(index, record);
        self.entries.truncate(MAX_HIGH_SCORES);
        log::debug!("Leaderboard rank {} ({} entries)", index + 1, self.entries.len());

        Some(index + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(run: u32, score: u64) -> RunRecord {
        RunRecord {
            run,
            score,
            distance: score as f64,
            level: 0,
            elapsed_secs: 1.0,
        }
    }

    #[test]
    fn test_sorted_descending() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_run(record(1, 50)), Some(1));
        assert_eq!(scores.add_run(record(2, 80)), Some(1));
        assert_eq!(scores.add_run(record(3, 60)), Some(2));
        let order: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(order, vec![80, 60, 50]);
        assert_eq!(scores.top_score(), Some(80));
    }

    #[test]
    fn test_zero_score_never_qualifies() {
        let mut scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert_eq!(scores.add_run(record(1, 0)), None);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_capped_at_max() {
        let mut scores = HighScores::new();
        for i in 1..=15 {
            scores.add_run(record(i, u64::from(i) * 10));
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(60));
        assert!(!scores.qualifies(60));
        assert_eq!(scores.add_run(record(16, 60)), None);

        let mut bottom = scores.clone();
        assert_eq!(bottom.add_run(record(17, 61)), Some(10));
        assert_eq!(bottom.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.clone().add_run(record(18, 1000)), Some(1));
    }

    #[test]
    fn test_tie_keeps_earlier_run_first() {
        let mut scores = HighScores::new();
        scores.add_run(record(1, 40));
        assert_eq!(scores.add_run(record(2, 40)), Some(2));
        assert_eq!(scores.entries[0].run, 1);
    }
}
