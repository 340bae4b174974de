//! Question Selector
//!
//! Picks the next word to ask and manages the asking direction.
//!
//! Selection:
//! - Candidate pool is LEARNING in NORMAL direction, ONE_WAY_MASTERED in
//!   REVERSE direction
//! - Candidates are ranked by incorrect answers (both directions summed),
//!   ties broken randomly, and the top [`CANDIDATE_WINDOW`] kept
//! - Ids asked in the last [`RECENT_QUEUE_LIMIT`] questions are avoided when
//!   an alternative exists
//! - The final pick is uniform over the surviving window
//!
//! Direction:
//! - NORMAL → REVERSE only while ONE_WAY_MASTERED is non-empty
//! - REVERSE → NORMAL on request, or automatically once ONE_WAY_MASTERED
//!   empties

use std::collections::VecDeque;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::catalog::WordCatalog;
use crate::stats::StatsLedger;
use crate::types::{
    Direction, Question, StatusChange, WordId, WordStatus, CANDIDATE_WINDOW, RECENT_QUEUE_LIMIT,
};

/// Outcome of one selection round
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub question: Option<Question>,
    /// Words moved NEW → LEARNING while looking for a candidate
    pub filled: Vec<StatusChange>,
}

#[derive(Debug, Clone)]
pub struct QuestionSelector {
    direction: Direction,
    recently_asked: VecDeque<WordId>,
    rng: ChaCha8Rng,
}

impl QuestionSelector {
    /// Create a selector seeded from the system clock
    pub fn new() -> Self {
        Self::with_seed_option(None)
    }

    /// Create a selector with a fixed seed (for testing)
    pub fn with_seed(seed: u64) -> Self {
        Self {
            direction: Direction::Normal,
            recently_asked: VecDeque::with_capacity(RECENT_QUEUE_LIMIT + 1),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn with_seed_option(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(42)
        });
        Self::with_seed(seed)
    }

    // ==================== Direction ====================

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Flip the asking direction. Switching to REVERSE is refused while no
    /// word is ONE_WAY_MASTERED. Returns the direction now in effect.
    pub fn toggle_direction(&mut self, catalog: &WordCatalog) -> Direction {
        let target = self.direction.opposite();
        self.set_direction(target, catalog);
        self.direction
    }

    /// Returns whether the requested direction is now in effect.
    pub fn set_direction(&mut self, target: Direction, catalog: &WordCatalog) -> bool {
        if target == Direction::Reverse && catalog.count(WordStatus::OneWayMastered) == 0 {
            tracing::debug!("No one-way mastered words, staying in NORMAL direction");
            self.direction = Direction::Normal;
            return false;
        }
        self.direction = target;
        true
    }

    pub fn recently_asked(&self) -> impl Iterator<Item = &WordId> + '_ {
        self.recently_asked.iter()
    }

    // ==================== Pool Maintenance ====================

    pub fn populate_pool(
        &mut self,
        catalog: &mut WordCatalog,
        max_learning: usize,
    ) -> Vec<StatusChange> {
        catalog.populate_learning_pool(max_learning, &mut self.rng)
    }

    // ==================== Selection ====================

    pub fn next_question(
        &mut self,
        catalog: &mut WordCatalog,
        stats: &StatsLedger,
        max_learning: usize,
    ) -> Selection {
        let mut selection = Selection::default();

        for attempt in 0..2 {
            if self.direction == Direction::Reverse
                && catalog.count(WordStatus::OneWayMastered) == 0
            {
                tracing::debug!("One-way mastered pool empty, reverting to NORMAL direction");
                self.direction = Direction::Normal;
            }

            let (pool_status, effective) = match self.direction {
                Direction::Normal => (WordStatus::Learning, Direction::Normal),
                Direction::Reverse if catalog.count(WordStatus::OneWayMastered) > 0 => {
                    (WordStatus::OneWayMastered, Direction::Reverse)
                }
                // Never ask an unlearned word from the target side.
                Direction::Reverse => (WordStatus::Learning, Direction::Normal),
            };

            if catalog.count(pool_status) == 0 {
                if catalog.all_mastered() {
                    tracing::debug!("All words mastered, no question");
                    return selection;
                }

                let only_new_left = catalog.count(WordStatus::Learning) == 0
                    && catalog.count(WordStatus::OneWayMastered) == 0
                    && catalog.count(WordStatus::New) > 0;
                if only_new_left && attempt == 0 {
                    let filled = self.populate_pool(catalog, max_learning);
                    selection.filled.extend(filled);
                    continue;
                }
                return selection;
            }

            let window = self.rank_candidates(catalog, pool_status, stats);
            let Some(id) = self.pick(&window) else {
                return selection;
            };
            let Some(pair) = catalog.get(&id) else {
                tracing::warn!(word_id = %id, "Selected id missing from catalog");
                return selection;
            };

            let question = Question {
                word: pair.prompt(effective).to_string(),
                id: id.clone(),
                direction: effective,
            };
            self.remember(id);
            tracing::debug!(
                word_id = %question.id,
                direction = effective.as_str(),
                candidates = window.len(),
                "Next question selected"
            );
            selection.question = Some(question);
            return selection;
        }

        selection
    }

    /// Top of the pool by incorrect count, ties in random order.
    fn rank_candidates(
        &mut self,
        catalog: &WordCatalog,
        pool_status: WordStatus,
        stats: &StatsLedger,
    ) -> Vec<WordId> {
        let incorrect = stats.incorrect_counts_by_word();
        let mut ranked: Vec<(WordId, u32)> = catalog
            .ids_with(pool_status)
            .iter()
            .map(|id| (id.clone(), incorrect.get(id).copied().unwrap_or(0)))
            .collect();

        ranked.shuffle(&mut self.rng);
        // stable sort keeps the shuffled order among equal counts
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(CANDIDATE_WINDOW);
        ranked.into_iter().map(|(id, _)| id).collect()
    }

    fn pick(&mut self, window: &[WordId]) -> Option<WordId> {
        let fresh: Vec<&WordId> = window
            .iter()
            .filter(|id| !self.recently_asked.contains(id))
            .collect();

        if fresh.is_empty() {
            window.choose(&mut self.rng).cloned()
        } else {
            fresh.choose(&mut self.rng).map(|id| (*id).clone())
        }
    }

    fn remember(&mut self, id: WordId) {
        self.recently_asked.push_back(id);
        while self.recently_asked.len() > RECENT_QUEUE_LIMIT {
            self.recently_asked.pop_front();
        }
    }
}

impl Default for QuestionSelector {
    fn default() -> Self {
        Self::new()
    }
}

// ==================== Tests ====================
