//! Drill Engine
//!
//! Owns the whole session state and runs the answer transaction:
//! verify → record stats → promote or count the mistake → feedback → next
//! question. Public operations never return errors after construction; any
//! internal failure is reported as an [`AnswerOutcome::Error`] result.

use std::collections::VecDeque;
use std::time::Instant;

use serde_json::Value;

use crate::catalog::WordCatalog;
use crate::config::DrillConfig;
use crate::error::{DrillError, DrillResult};
use crate::mistakes::MistakeTracker;
use crate::progression::{verify_optional, ProgressionRules};
use crate::selector::QuestionSelector;
use crate::stats::{SessionSummary, StatsLedger};
use crate::types::{
    AnswerOutcome, AnswerResult, ChangeReason, Direction, ProgressSnapshot, Question,
    StatusChange, WordRecord, WordStatus, STATUS_HISTORY_LIMIT,
};

#[derive(Debug, Clone)]
struct IssuedQuestion {
    question: Question,
    issued_at: Instant,
}

#[derive(Debug)]
pub struct DrillEngine {
    config: DrillConfig,
    rules: ProgressionRules,
    catalog: WordCatalog,
    mistakes: MistakeTracker,
    stats: StatsLedger,
    selector: QuestionSelector,
    current: Option<IssuedQuestion>,
    status_history: VecDeque<StatusChange>,
}

impl DrillEngine {
    // ==================== Construction ====================

    pub fn new(records: Vec<WordRecord>, config: DrillConfig) -> DrillResult<Self> {
        Ok(Self::with_catalog(WordCatalog::from_records(records)?, config))
    }

    pub fn from_json(value: &Value, config: DrillConfig) -> DrillResult<Self> {
        Ok(Self::with_catalog(WordCatalog::from_json(value)?, config))
    }

    /// Start a session over an existing catalog and top up the learning pool.
    pub fn with_catalog(catalog: WordCatalog, config: DrillConfig) -> Self {
        let config = config.sanitized();
        let mut engine = Self {
            rules: ProgressionRules::from_config(&config),
            selector: QuestionSelector::with_seed_option(config.seed),
            catalog,
            mistakes: MistakeTracker::new(),
            stats: StatsLedger::new(),
            current: None,
            status_history: VecDeque::with_capacity(STATUS_HISTORY_LIMIT),
            config,
        };

        let filled = engine
            .selector
            .populate_pool(&mut engine.catalog, engine.config.max_learning_words);
        engine.push_changes(filled);
        engine
    }

    // ==================== Accessors ====================

    pub fn config(&self) -> &DrillConfig {
        &self.config
    }

    pub fn catalog(&self) -> &WordCatalog {
        &self.catalog
    }

    pub fn stats(&self) -> &StatsLedger {
        &self.stats
    }

    pub fn mistakes(&self) -> &MistakeTracker {
        &self.mistakes
    }

    pub fn direction(&self) -> Direction {
        self.selector.direction()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current.as_ref().map(|issued| &issued.question)
    }

    pub fn progress(&self) -> ProgressSnapshot {
        self.catalog.snapshot()
    }

    pub fn summary(&self) -> SessionSummary {
        self.stats.summary()
    }

    /// Status changes since the last drain, oldest first.
    pub fn status_history(&self) -> impl Iterator<Item = &StatusChange> + '_ {
        self.status_history.iter()
    }

    pub fn drain_status_changes(&mut self) -> Vec<StatusChange> {
        self.status_history.drain(..).collect()
    }

    // ==================== Session Operations ====================

    /// Flip between NORMAL and REVERSE. REVERSE is refused while no word is
    /// one-way mastered. Returns the direction now in effect.
    pub fn toggle_direction(&mut self) -> Direction {
        self.selector.toggle_direction(&self.catalog)
    }

    /// Pick and issue the next question; `None` when nothing can be asked.
    pub fn next_question(&mut self) -> Option<Question> {
        let selection = self.selector.next_question(
            &mut self.catalog,
            &self.stats,
            self.config.max_learning_words,
        );
        self.push_changes(selection.filled);

        self.current = selection.question.map(|question| IssuedQuestion {
            question,
            issued_at: Instant::now(),
        });
        self.current_question().cloned()
    }

    /// Grade an answer to the current question.
    ///
    /// Without an outstanding question a new one is drawn first. When
    /// `advance_to_next` is false the same word stays current, re-targeted
    /// if the answer changed its status.
    pub fn submit_answer(
        &mut self,
        user_answer: Option<&str>,
        advance_to_next: bool,
    ) -> AnswerResult {
        match self.process_answer(user_answer, advance_to_next) {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(error = %err, "Failed to process answer");
                AnswerResult::error(format!("Could not process answer: {err}"))
            }
        }
    }

    fn process_answer(
        &mut self,
        user_answer: Option<&str>,
        advance_to_next: bool,
    ) -> DrillResult<AnswerResult> {
        if self.current.is_none() && self.next_question().is_none() {
            return Ok(self.no_question_result());
        }
        let issued = self.current.clone().ok_or_else(|| {
            DrillError::Invariant("no current question after selection".to_string())
        })?;
        let id = issued.question.id;
        let direction = issued.question.direction;

        let expected = self.catalog.pair(&id)?.expected_answer(direction);
        let is_correct = verify_optional(user_answer, expected);
        let elapsed = issued.issued_at.elapsed().as_secs_f64();
        self.stats.record(is_correct, &id, direction, elapsed);

        let status_change = if is_correct {
            self.mistakes.reset(&id, direction);
            self.rules
                .on_correct(&mut self.catalog, &self.stats, &id, direction)?
        } else {
            self.rules
                .on_mistake(&mut self.catalog, &mut self.mistakes, &id, direction)?
        };

        if let Some(change) = &status_change {
            self.push_changes(vec![change.clone()]);
            if change.reason == ChangeReason::Promotion {
                let filled = self
                    .selector
                    .populate_pool(&mut self.catalog, self.config.max_learning_words);
                self.push_changes(filled);
            }
        }

        let pair = self.catalog.pair(&id)?;
        let (outcome, feedback) = if is_correct {
            (AnswerOutcome::Correct, "Correct!".to_string())
        } else {
            (
                AnswerOutcome::Incorrect,
                format!("Wrong. '{}' ↔ '{}'", pair.source_word, pair.target_word),
            )
        };
        let usage_examples = Some(pair.usage_examples());

        tracing::debug!(
            word_id = %id,
            direction = direction.as_str(),
            correct = is_correct,
            elapsed_secs = elapsed,
            "Answer processed"
        );

        let question_data = if advance_to_next {
            self.next_question()
        } else {
            self.keep_for_retry(status_change.as_ref().map(|change| change.to));
            None
        };

        Ok(AnswerResult {
            outcome,
            feedback,
            usage_examples,
            question_data,
            status_change,
        })
    }

    /// Keep the outstanding question for another attempt. After a status
    /// change it is re-issued in the direction its new status is asked in,
    /// or dropped when the word is no longer asked in any active direction.
    fn keep_for_retry(&mut self, new_status: Option<WordStatus>) {
        let Some(issued) = self.current.as_mut() else {
            return;
        };
        issued.issued_at = Instant::now();

        let Some(status) = new_status else {
            return;
        };
        let direction = match status {
            WordStatus::Learning => Some(Direction::Normal),
            WordStatus::OneWayMastered if self.selector.direction() == Direction::Reverse => {
                Some(Direction::Reverse)
            }
            _ => None,
        };
        let prompt = direction.and_then(|direction| {
            self.catalog
                .get(&issued.question.id)
                .map(|pair| (direction, pair.prompt(direction).to_string()))
        });

        match prompt {
            Some((direction, word)) => {
                issued.question.direction = direction;
                issued.question.word = word;
            }
            None => self.current = None,
        }
    }

    fn no_question_result(&self) -> AnswerResult {
        let mut result = AnswerResult::finished();
        if !self.catalog.all_mastered() {
            result.feedback = match self.direction() {
                Direction::Normal => {
                    "No words left to practice in this direction. Switch to reverse practice."
                        .to_string()
                }
                Direction::Reverse => "No words left to practice.".to_string(),
            };
        }
        result
    }

    fn push_changes(&mut self, changes: Vec<StatusChange>) {
        self.status_history.extend(changes);
        while self.status_history.len() > STATUS_HISTORY_LIMIT {
            self.status_history.pop_front();
        }
    }
}

// ==================== Tests ====================
