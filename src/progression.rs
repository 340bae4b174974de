//! Progression Rules
//!
//! Answer verification and the mastery state machine:
//!
//! ```text
//! NEW → LEARNING → ONE_WAY_MASTERED → MASTERED    (promotion)
//! NEW ← LEARNING ← ONE_WAY_MASTERED ← MASTERED    (demotion, one level)
//! ```
//!
//! - LEARNING → ONE_WAY_MASTERED once the NORMAL correct count reaches the
//!   threshold, and only on a NORMAL answer
//! - ONE_WAY_MASTERED → MASTERED once the REVERSE correct count reaches the
//!   threshold while the NORMAL count still does
//! - LEARNING → MASTERED directly when both counts already meet the threshold
//! - `max_consecutive_mistakes` wrong answers in a row in one direction demote
//!   by exactly one level; NEW is the floor
//!
//! NEW → LEARNING is not handled here; it happens through the learning pool.

use unicode_normalization::UnicodeNormalization;

use crate::catalog::WordCatalog;
use crate::config::DrillConfig;
use crate::error::{DrillError, DrillResult};
use crate::mistakes::MistakeTracker;
use crate::stats::StatsLedger;
use crate::types::{ChangeReason, Direction, StatusChange, WordId, WordStatus};

// ==================== Answer Verification ====================

/// Canonical form used for answer comparison: lowercase, accents removed,
/// punctuation and symbols dropped, whitespace collapsed.
pub fn normalize(input: &str) -> String {
    let stripped: String = input
        .to_lowercase()
        .nfd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Compare a learner answer with the stored answer after normalizing both.
pub fn verify(user_answer: &str, correct_answer: &str) -> bool {
    normalize(user_answer) == normalize(correct_answer)
}

/// Same as [`verify`], treating a missing answer as empty.
pub fn verify_optional(user_answer: Option<&str>, correct_answer: &str) -> bool {
    verify(user_answer.unwrap_or_default(), correct_answer)
}

// ==================== State Machine ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressionRules {
    mastery_threshold: u32,
    max_consecutive_mistakes: u32,
}

impl ProgressionRules {
    pub fn new(mastery_threshold: u32, max_consecutive_mistakes: u32) -> Self {
        Self {
            mastery_threshold: mastery_threshold.max(1),
            max_consecutive_mistakes: max_consecutive_mistakes.max(1),
        }
    }

    pub fn from_config(config: &DrillConfig) -> Self {
        Self::new(config.mastery_threshold, config.max_consecutive_mistakes)
    }

    pub fn mastery_threshold(&self) -> u32 {
        self.mastery_threshold
    }

    pub fn max_consecutive_mistakes(&self) -> u32 {
        self.max_consecutive_mistakes
    }

    /// Apply promotion rules after a correct answer in `direction`.
    ///
    /// The rules are evaluated in order against the status produced by the
    /// previous one, so a LEARNING word whose counts already satisfy both
    /// directions ends at MASTERED in one step.
    pub fn on_correct(
        &self,
        catalog: &mut WordCatalog,
        stats: &StatsLedger,
        id: &WordId,
        direction: Direction,
    ) -> DrillResult<Option<StatusChange>> {
        let from = catalog
            .status_of(id)
            .ok_or_else(|| DrillError::UnknownWord(id.clone()))?;

        let threshold = self.mastery_threshold;
        let normal_ok = stats.correct_count(id, Direction::Normal) >= threshold;
        let reverse_ok = stats.correct_count(id, Direction::Reverse) >= threshold;

        let step_up = |status: WordStatus| status.promoted().unwrap_or(status);
        let mut to = from;
        if to == WordStatus::Learning && direction == Direction::Normal && normal_ok {
            to = step_up(to);
        }
        if to == WordStatus::OneWayMastered && reverse_ok && normal_ok {
            to = step_up(to);
        }
        if to == WordStatus::Learning && normal_ok && reverse_ok {
            to = WordStatus::Mastered;
        }

        if to == from || !catalog.move_to(id, to) {
            return Ok(None);
        }

        tracing::info!(word_id = %id, from = %from, to = %to, "Word promoted");
        Ok(Some(StatusChange {
            word_id: id.clone(),
            from,
            to,
            reason: ChangeReason::Promotion,
        }))
    }

    /// Count a mistake and demote one level once the streak reaches the
    /// limit. Both direction counters are cleared on demotion.
    ///
    /// Demotion never refills the learning pool.
    pub fn on_mistake(
        &self,
        catalog: &mut WordCatalog,
        mistakes: &mut MistakeTracker,
        id: &WordId,
        direction: Direction,
    ) -> DrillResult<Option<StatusChange>> {
        let from = catalog
            .status_of(id)
            .ok_or_else(|| DrillError::UnknownWord(id.clone()))?;

        let streak = mistakes.increment(id, direction);
        if streak < self.max_consecutive_mistakes {
            return Ok(None);
        }

        let Some(to) = from.demoted() else {
            return Ok(None);
        };
        if !catalog.move_to(id, to) {
            return Ok(None);
        }
        mistakes.reset_both(id);

        tracing::info!(
            word_id = %id,
            direction = direction.as_str(),
            from = %from,
            to = %to,
            streak,
            "Word demoted"
        );
        Ok(Some(StatusChange {
            word_id: id.clone(),
            from,
            to,
            reason: ChangeReason::Demotion,
        }))
    }
}

impl Default for ProgressionRules {
    fn default() -> Self {
        Self::from_config(&DrillConfig::default())
    }
}

// ==================== Tests ====================
