//! Word Catalog
//!
//! Owns every word pair of a session together with four disjoint status
//! partitions. The `status` field of a pair and its partition membership are
//! only ever written by [`WordCatalog::move_to`].
//!
//! Pairs are created once from external records; afterwards only their status
//! changes.

use std::collections::{BTreeSet, HashMap};

use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::Value;

use crate::error::{DrillError, DrillResult};
use crate::types::{
    ChangeReason, ProgressSnapshot, StatusChange, WordId, WordPair, WordRecord, WordStatus,
    DEFAULT_EXAMPLE,
};

#[derive(Debug, Clone)]
pub struct WordCatalog {
    pairs: HashMap<WordId, WordPair>,
    /// Insertion order of the external list
    order: Vec<WordId>,
    /// Indexed by `WordStatus::to_index`
    by_status: [BTreeSet<WordId>; 4],
}

impl WordCatalog {
    // ==================== Construction ====================

    /// Build a catalog from already-decoded records.
    ///
    /// Records missing an id or either word are skipped with a warning. Fails
    /// with `InvalidInput` when the list is empty or nothing valid remains.
    pub fn from_records(records: Vec<WordRecord>) -> DrillResult<Self> {
        if records.is_empty() {
            return Err(DrillError::InvalidInput("word list is empty".to_string()));
        }
        Self::build(records, 0)
    }

    /// Build a catalog from the raw JSON payload of the data layer.
    pub fn from_json(value: &Value) -> DrillResult<Self> {
        let items = value.as_array().ok_or_else(|| {
            DrillError::InvalidInput("expected a list of word records".to_string())
        })?;
        if items.is_empty() {
            return Err(DrillError::InvalidInput("word list is empty".to_string()));
        }

        let mut records = Vec::with_capacity(items.len());
        let mut malformed = 0usize;
        for (index, item) in items.iter().enumerate() {
            match serde_json::from_value::<WordRecord>(item.clone()) {
                Ok(record) => records.push(record),
                Err(err) => {
                    malformed += 1;
                    tracing::warn!(index, error = %err, "Skipping malformed word record");
                }
            }
        }

        Self::build(records, malformed)
    }

    pub fn from_json_str(raw: &str) -> DrillResult<Self> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|err| DrillError::InvalidInput(format!("word list is not valid JSON: {err}")))?;
        Self::from_json(&value)
    }

    fn build(records: Vec<WordRecord>, already_skipped: usize) -> DrillResult<Self> {
        let mut catalog = Self {
            pairs: HashMap::with_capacity(records.len()),
            order: Vec::with_capacity(records.len()),
            by_status: Default::default(),
        };
        let mut skipped = already_skipped;

        for (index, record) in records.into_iter().enumerate() {
            match validate_record(record) {
                Ok(pair) if catalog.pairs.contains_key(&pair.id) => {
                    skipped += 1;
                    tracing::warn!(index, word_id = %pair.id, "Skipping duplicate word id");
                }
                Ok(pair) => {
                    catalog.by_status[pair.status.to_index()].insert(pair.id.clone());
                    catalog.order.push(pair.id.clone());
                    catalog.pairs.insert(pair.id.clone(), pair);
                }
                Err(reason) => {
                    skipped += 1;
                    tracing::warn!(index, reason, "Skipping invalid word record");
                }
            }
        }

        if catalog.pairs.is_empty() {
            return Err(DrillError::InvalidInput(format!(
                "no valid word records ({skipped} skipped)"
            )));
        }

        debug_assert!(catalog.check_partitions().is_ok());
        tracing::debug!(words = catalog.pairs.len(), skipped, "Word catalog built");
        Ok(catalog)
    }

    // ==================== Queries ====================

    pub fn total_count(&self) -> usize {
        self.pairs.len()
    }

    pub fn get(&self, id: &WordId) -> Option<&WordPair> {
        self.pairs.get(id)
    }

    pub fn pair(&self, id: &WordId) -> DrillResult<&WordPair> {
        self.pairs
            .get(id)
            .ok_or_else(|| DrillError::UnknownWord(id.clone()))
    }

    pub fn status_of(&self, id: &WordId) -> Option<WordStatus> {
        self.pairs.get(id).map(|pair| pair.status)
    }

    pub fn ids_with(&self, status: WordStatus) -> &BTreeSet<WordId> {
        &self.by_status[status.to_index()]
    }

    pub fn count(&self, status: WordStatus) -> usize {
        self.by_status[status.to_index()].len()
    }

    pub fn all_mastered(&self) -> bool {
        self.count(WordStatus::Mastered) == self.pairs.len()
    }

    /// Pairs in the order they were supplied.
    pub fn iter(&self) -> impl Iterator<Item = &WordPair> + '_ {
        self.order.iter().filter_map(|id| self.pairs.get(id))
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            new: self.count(WordStatus::New),
            learning: self.count(WordStatus::Learning),
            one_way_mastered: self.count(WordStatus::OneWayMastered),
            mastered: self.count(WordStatus::Mastered),
            total: self.pairs.len(),
        }
    }

    // ==================== Mutation ====================

    /// Move a word to `new_status`. Returns whether anything changed.
    ///
    /// Unknown ids are logged and ignored; moving to the current status is a
    /// no-op.
    pub fn move_to(&mut self, id: &WordId, new_status: WordStatus) -> bool {
        let Some(pair) = self.pairs.get_mut(id) else {
            tracing::warn!(word_id = %id, "Cannot move unknown word");
            return false;
        };

        let old_status = pair.status;
        if old_status == new_status {
            return false;
        }

        self.by_status[old_status.to_index()].remove(id);
        self.by_status[new_status.to_index()].insert(id.clone());
        pair.status = new_status;

        debug_assert!(
            self.check_partitions().is_ok(),
            "partitions out of sync after moving {id}"
        );
        true
    }

    /// Move a word using an externally supplied status label.
    ///
    /// An unrecognized label leaves the word in its current partition.
    pub fn move_to_label(&mut self, id: &WordId, label: &str) -> bool {
        match WordStatus::from_label(label) {
            Some(status) => self.move_to(id, status),
            None => {
                let err = DrillError::InvalidStatus(label.to_string());
                tracing::warn!(word_id = %id, error = %err, "Rejected status change");
                false
            }
        }
    }

    /// Top up the learning partition from a random sample of new words.
    ///
    /// Moves `min(max_learning - |LEARNING|, |NEW|)` words and returns the
    /// resulting changes; empty when nothing moved.
    pub fn populate_learning_pool<R: Rng + ?Sized>(
        &mut self,
        max_learning: usize,
        rng: &mut R,
    ) -> Vec<StatusChange> {
        let gap = max_learning.saturating_sub(self.count(WordStatus::Learning));
        let available: Vec<WordId> = self.ids_with(WordStatus::New).iter().cloned().collect();
        let take = gap.min(available.len());
        if take == 0 {
            return Vec::new();
        }

        let chosen: Vec<WordId> = available.choose_multiple(rng, take).cloned().collect();
        let mut changes = Vec::with_capacity(chosen.len());
        for id in chosen {
            if self.move_to(&id, WordStatus::Learning) {
                changes.push(StatusChange {
                    word_id: id,
                    from: WordStatus::New,
                    to: WordStatus::Learning,
                    reason: ChangeReason::PoolFill,
                });
            }
        }

        tracing::info!(
            moved = changes.len(),
            learning = self.count(WordStatus::Learning),
            remaining_new = self.count(WordStatus::New),
            "Learning pool populated"
        );
        changes
    }

    // ==================== Invariants ====================

    /// Verify that the partitions are disjoint, cover every pair, and agree
    /// with each pair's `status` field.
    pub fn check_partitions(&self) -> DrillResult<()> {
        let mut seen = 0usize;
        for status in WordStatus::ALL {
            for id in self.ids_with(status) {
                seen += 1;
                match self.pairs.get(id) {
                    Some(pair) if pair.status == status => {}
                    Some(pair) => {
                        return Err(DrillError::Invariant(format!(
                            "{id} is in partition {status} but has status {}",
                            pair.status
                        )))
                    }
                    None => {
                        return Err(DrillError::Invariant(format!(
                            "{id} is in partition {status} but not in the catalog"
                        )))
                    }
                }
            }
        }

        if seen != self.pairs.len() {
            return Err(DrillError::Invariant(format!(
                "partitions hold {seen} ids for {} pairs",
                self.pairs.len()
            )));
        }
        Ok(())
    }
}

fn validate_record(record: WordRecord) -> Result<WordPair, &'static str> {
    let id = record.id.ok_or("missing id")?;
    let source_word = non_blank(record.source_word).ok_or("missing source word")?;
    let target_word = non_blank(record.target_word).ok_or("missing target word")?;

    let status = match record.status.as_deref() {
        None => WordStatus::New,
        Some(label) => WordStatus::from_label(label).unwrap_or_else(|| {
            tracing::warn!(word_id = %id, label, "Unrecognized status, defaulting to NEW");
            WordStatus::New
        }),
    };

    Ok(WordPair {
        id,
        source_word,
        target_word,
        source_example: non_blank(record.source_example)
            .unwrap_or_else(|| DEFAULT_EXAMPLE.to_string()),
        target_example: non_blank(record.target_example)
            .unwrap_or_else(|| DEFAULT_EXAMPLE.to_string()),
        source_language: record.source_language,
        target_language: record.target_language,
        status,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

// ==================== Tests ====================
