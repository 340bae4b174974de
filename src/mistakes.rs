//! Consecutive-mistake counters per (word, direction).

use std::collections::HashMap;

use crate::types::{Direction, WordId};

pub type MistakeKey = (WordId, Direction);

#[derive(Debug, Clone, Default)]
pub struct MistakeTracker {
    counts: HashMap<MistakeKey, u32>,
}

impl MistakeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(id: &WordId, direction: Direction) -> MistakeKey {
        (id.clone(), direction)
    }

    /// Record one more mistake and return the new streak length.
    pub fn increment(&mut self, id: &WordId, direction: Direction) -> u32 {
        let count = self.counts.entry(Self::key(id, direction)).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    pub fn reset(&mut self, id: &WordId, direction: Direction) {
        self.counts.remove(&Self::key(id, direction));
    }

    /// Clear both directions; a level change invalidates the whole history.
    pub fn reset_both(&mut self, id: &WordId) {
        for direction in Direction::BOTH {
            self.reset(id, direction);
        }
    }

    pub fn count(&self, id: &WordId, direction: Direction) -> u32 {
        self.counts
            .get(&Self::key(id, direction))
            .copied()
            .unwrap_or(0)
    }
}
