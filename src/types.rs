//! Common Types and Constants
//!
//! Shared data structures used across the drilling engine modules.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

// ==================== Constants ====================

/// Number of recently asked ids kept to avoid immediate repeats
pub const RECENT_QUEUE_LIMIT: usize = 7;

/// Number of top-ranked candidates considered for the final random pick
pub const CANDIDATE_WINDOW: usize = 10;

/// Placeholder used when a pair carries no usage example
pub const DEFAULT_EXAMPLE: &str = "no example available";

/// Maximum number of status changes retained by the engine
pub const STATUS_HISTORY_LIMIT: usize = 100;

// ==================== Identifiers ====================

/// Stable, opaque word identifier.
///
/// External data may carry ids as JSON strings or integers; both are kept in
/// their textual form so that `1` and `"1"` name the same word.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct WordId(String);

impl WordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for WordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for WordId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for WordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            Str(String),
        }

        match RawId::deserialize(deserializer)? {
            RawId::Int(n) => Ok(WordId(n.to_string())),
            RawId::Str(s) => Ok(WordId(s)),
        }
    }
}

// ==================== Direction ====================

/// Which side of a pair is shown as the prompt
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    /// Source word shown, target expected
    #[default]
    Normal,
    /// Target word shown, source expected
    Reverse,
}

impl Direction {
    pub const BOTH: [Direction; 2] = [Direction::Normal, Direction::Reverse];

    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Normal => "NORMAL",
            Direction::Reverse => "REVERSE",
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Direction::Normal => Direction::Reverse,
            Direction::Reverse => Direction::Normal,
        }
    }
}

// ==================== Word Status ====================

/// Mastery stage of a word pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WordStatus {
    #[serde(rename = "LEVEL_0")]
    New,
    #[serde(rename = "LEVEL_1")]
    Learning,
    #[serde(rename = "LEVEL_2")]
    OneWayMastered,
    #[serde(rename = "LEVEL_3")]
    Mastered,
}

impl WordStatus {
    pub const ALL: [WordStatus; 4] = [
        WordStatus::New,
        WordStatus::Learning,
        WordStatus::OneWayMastered,
        WordStatus::Mastered,
    ];

    /// Parse either the historical `LEVEL_n` label or the stage name.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "LEVEL_0" | "NEW" => Some(WordStatus::New),
            "LEVEL_1" | "LEARNING" => Some(WordStatus::Learning),
            "LEVEL_2" | "ONE_WAY_MASTERED" => Some(WordStatus::OneWayMastered),
            "LEVEL_3" | "MASTERED" => Some(WordStatus::Mastered),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            WordStatus::New => "LEVEL_0",
            WordStatus::Learning => "LEVEL_1",
            WordStatus::OneWayMastered => "LEVEL_2",
            WordStatus::Mastered => "LEVEL_3",
        }
    }

    pub const fn to_index(self) -> usize {
        match self {
            WordStatus::New => 0,
            WordStatus::Learning => 1,
            WordStatus::OneWayMastered => 2,
            WordStatus::Mastered => 3,
        }
    }

    /// Next stage up, `None` at the top.
    pub const fn promoted(self) -> Option<Self> {
        match self {
            WordStatus::New => Some(WordStatus::Learning),
            WordStatus::Learning => Some(WordStatus::OneWayMastered),
            WordStatus::OneWayMastered => Some(WordStatus::Mastered),
            WordStatus::Mastered => None,
        }
    }

    /// Next stage down, `None` at the floor.
    pub const fn demoted(self) -> Option<Self> {
        match self {
            WordStatus::New => None,
            WordStatus::Learning => Some(WordStatus::New),
            WordStatus::OneWayMastered => Some(WordStatus::Learning),
            WordStatus::Mastered => Some(WordStatus::OneWayMastered),
        }
    }
}

impl fmt::Display for WordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ==================== Word Pair ====================

/// One learning item.
///
/// `status` has no public setter; it only changes through
/// [`WordCatalog::move_to`](crate::catalog::WordCatalog::move_to), which keeps
/// it in lockstep with the partition sets.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordPair {
    pub id: WordId,
    pub source_word: String,
    pub target_word: String,
    pub source_example: String,
    pub target_example: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_language: Option<String>,
    pub(crate) status: WordStatus,
}

impl WordPair {
    pub fn status(&self) -> WordStatus {
        self.status
    }

    /// Word shown to the learner in `direction`
    pub fn prompt(&self, direction: Direction) -> &str {
        match direction {
            Direction::Normal => &self.source_word,
            Direction::Reverse => &self.target_word,
        }
    }

    /// Answer expected from the learner in `direction`
    pub fn expected_answer(&self, direction: Direction) -> &str {
        match direction {
            Direction::Normal => &self.target_word,
            Direction::Reverse => &self.source_word,
        }
    }

    pub fn usage_examples(&self) -> UsageExamples {
        UsageExamples {
            source: self.source_example.clone(),
            target: self.target_example.clone(),
        }
    }
}

/// Raw record as supplied by the data layer. Every field is optional so that
/// malformed entries can be skipped individually.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordRecord {
    #[serde(default)]
    pub id: Option<WordId>,
    #[serde(default)]
    pub source_word: Option<String>,
    #[serde(default)]
    pub target_word: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub source_example: Option<String>,
    #[serde(default)]
    pub target_example: Option<String>,
    #[serde(default)]
    pub source_language: Option<String>,
    #[serde(default)]
    pub target_language: Option<String>,
}

impl WordRecord {
    pub fn new(id: impl Into<WordId>, source_word: &str, target_word: &str) -> Self {
        Self {
            id: Some(id.into()),
            source_word: Some(source_word.to_string()),
            target_word: Some(target_word.to_string()),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: &str) -> Self {
        self.status = Some(status.to_string());
        self
    }

    pub fn with_examples(mut self, source: &str, target: &str) -> Self {
        self.source_example = Some(source.to_string());
        self.target_example = Some(target.to_string());
        self
    }
}

// ==================== Engine Outputs ====================

/// Question handed to the UI layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub word: String,
    pub id: WordId,
    /// Direction actually used for this question; may differ from the
    /// selector's persisted direction when the reverse pool is empty.
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageExamples {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeReason {
    PoolFill,
    Promotion,
    Demotion,
}

/// Mastery-change event emitted for the persistence layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub word_id: WordId,
    pub from: WordStatus,
    pub to: WordStatus,
    pub reason: ChangeReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerOutcome {
    Correct,
    Incorrect,
    Finished,
    Error,
}

/// Result of one `submit_answer` transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResult {
    pub outcome: AnswerOutcome,
    pub feedback: String,
    pub usage_examples: Option<UsageExamples>,
    pub question_data: Option<Question>,
    pub status_change: Option<StatusChange>,
}

impl AnswerResult {
    pub fn finished() -> Self {
        Self {
            outcome: AnswerOutcome::Finished,
            feedback: "Quiz finished. All words are mastered.".to_string(),
            usage_examples: None,
            question_data: None,
            status_change: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            outcome: AnswerOutcome::Error,
            feedback: message.into(),
            usage_examples: None,
            question_data: None,
            status_change: None,
        }
    }

    pub fn is_correct(&self) -> bool {
        self.outcome == AnswerOutcome::Correct
    }

    pub fn status_changed(&self) -> bool {
        self.status_change.is_some()
    }
}

/// Counts per status partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSnapshot {
    pub new: usize,
    pub learning: usize,
    pub one_way_mastered: usize,
    pub mastered: usize,
    pub total: usize,
}

impl ProgressSnapshot {
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.mastered == self.total
    }
}

// ==================== Tests ====================
