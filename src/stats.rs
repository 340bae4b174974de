//! Answer statistics
//!
//! Attempt/correct/incorrect counters per (word, direction), the elapsed time
//! of every answer, and the incorrect-only counters the selector ranks by.

use std::collections::HashMap;

use serde::Serialize;

use crate::types::{Direction, WordId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AttemptCounts {
    pub attempts: u32,
    pub correct: u32,
    pub incorrect: u32,
}

impl AttemptCounts {
    fn record(&mut self, is_correct: bool) {
        self.attempts += 1;
        if is_correct {
            self.correct += 1;
        } else {
            self.incorrect += 1;
        }
    }
}

/// Aggregate view over a whole session
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub attempts: u32,
    pub correct: u32,
    pub incorrect: u32,
    /// correct / attempts, 0 when nothing was answered
    pub accuracy: f64,
    pub mean_elapsed_secs: f64,
    pub median_elapsed_secs: f64,
}

#[derive(Debug, Clone, Default)]
pub struct StatsLedger {
    totals: AttemptCounts,
    elapsed_secs: Vec<f64>,
    buckets: HashMap<(WordId, Direction), AttemptCounts>,
    incorrect_counts: HashMap<(WordId, Direction), u32>,
}

impl StatsLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        is_correct: bool,
        id: &WordId,
        direction: Direction,
        elapsed_secs: f64,
    ) {
        self.totals.record(is_correct);
        self.elapsed_secs.push(sanitize_elapsed(elapsed_secs));
        self.buckets
            .entry((id.clone(), direction))
            .or_default()
            .record(is_correct);

        if !is_correct {
            *self
                .incorrect_counts
                .entry((id.clone(), direction))
                .or_insert(0) += 1;
        }
    }

    /// Incorrect answers per word, summed over both directions.
    pub fn incorrect_counts_by_word(&self) -> HashMap<WordId, u32> {
        let mut out: HashMap<WordId, u32> = HashMap::new();
        for ((id, _), count) in &self.incorrect_counts {
            *out.entry(id.clone()).or_insert(0) += count;
        }
        out
    }

    pub fn correct_count(&self, id: &WordId, direction: Direction) -> u32 {
        self.counts(id, direction).correct
    }

    pub fn counts(&self, id: &WordId, direction: Direction) -> AttemptCounts {
        self.buckets
            .get(&(id.clone(), direction))
            .copied()
            .unwrap_or_default()
    }

    pub fn totals(&self) -> AttemptCounts {
        self.totals
    }

    pub fn elapsed_history(&self) -> &[f64] {
        &self.elapsed_secs
    }

    pub fn summary(&self) -> SessionSummary {
        let accuracy = if self.totals.attempts > 0 {
            f64::from(self.totals.correct) / f64::from(self.totals.attempts)
        } else {
            0.0
        };

        SessionSummary {
            attempts: self.totals.attempts,
            correct: self.totals.correct,
            incorrect: self.totals.incorrect,
            accuracy,
            mean_elapsed_secs: mean(&self.elapsed_secs),
            median_elapsed_secs: median(&self.elapsed_secs),
        }
    }
}

fn sanitize_elapsed(secs: f64) -> f64 {
    if secs.is_finite() && secs > 0.0 {
        secs
    } else {
        0.0
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
