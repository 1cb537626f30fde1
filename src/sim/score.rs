//! Score and pop counting

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreBoard {
    score: u64,
    pop_count: u64,
    /// Set when the session ends; every mutation is a no-op afterwards
    locked: bool,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn pop_count(&self) -> u64 {
        self.pop_count
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Add points, returning the new total (None once the session is over)
    pub fn add_score(&mut self, points: u64) -> Option<u64> {
        if self.locked {
            return None;
        }
        self.score += points;
        Some(self.score)
    }

    /// Count popped bubbles, returning the new total (None once the session is over)
    pub fn increment_pop_count(&mut self, pops: u64) -> Option<u64> {
        if self.locked {
            return None;
        }
        self.pop_count += pops;
        Some(self.pop_count)
    }

    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
