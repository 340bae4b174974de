//! # danci-drill - vocabulary drilling engine
//!
//! Decides which word pair to ask next, grades the learner's answer and moves
//! each pair through a four-stage mastery pipeline:
//!
//! `NEW → LEARNING → ONE_WAY_MASTERED → MASTERED`
//!
//! Words are promoted after enough correct answers in each direction and
//! demoted one level after repeated consecutive mistakes.
//!
//! ## Module structure
//!
//! - [`catalog`] - word pairs and their status partitions
//! - [`mistakes`] - consecutive-mistake counters per (word, direction)
//! - [`stats`] - attempt counters, elapsed times, difficulty ranking input
//! - [`selector`] - next-question selection and direction management
//! - [`progression`] - answer normalization and promotion/demotion rules
//! - [`engine`] - the session object tying everything together
//! - [`config`] - session tunables
//! - [`types`] - shared types and constants
//!
//! ## Example
//!
//! ```rust
//! use danci_drill::{DrillConfig, DrillEngine, WordRecord};
//!
//! let records = vec![
//!     WordRecord::new("1", "hello", "hola").with_status("LEVEL_1"),
//!     WordRecord::new("2", "cat", "gato"),
//! ];
//! let mut engine = DrillEngine::new(records, DrillConfig::default().with_seed(1)).unwrap();
//!
//! let question = engine.next_question().unwrap();
//! let expected = engine.catalog().get(&question.id).unwrap().target_word.clone();
//! let result = engine.submit_answer(Some(&expected), true);
//! assert!(result.is_correct());
//! ```

// ============================================================================
// Module declarations
// ============================================================================

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod mistakes;
pub mod progression;
pub mod selector;
pub mod stats;
pub mod types;

// ============================================================================
// Re-exports
// ============================================================================

pub use types::*;

pub use catalog::WordCatalog;
pub use config::DrillConfig;
pub use engine::DrillEngine;
pub use error::{DrillError, DrillResult};
pub use mistakes::MistakeTracker;
pub use progression::{normalize, verify, ProgressionRules};
pub use selector::{QuestionSelector, Selection};
pub use stats::{AttemptCounts, SessionSummary, StatsLedger};
