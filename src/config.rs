use serde::{Deserialize, Serialize};

/// Tunables of a drilling session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DrillConfig {
    /// Correct answers per direction needed to promote a word
    pub mastery_threshold: u32,
    /// Consecutive wrong answers in one direction that demote a word
    pub max_consecutive_mistakes: u32,
    /// Target size of the LEARNING partition
    pub max_learning_words: usize,
    /// Fixed RNG seed; `None` seeds from the system clock
    pub seed: Option<u64>,
    pub log_level: String,
}

impl Default for DrillConfig {
    fn default() -> Self {
        Self {
            mastery_threshold: 3,
            max_consecutive_mistakes: 3,
            max_learning_words: 5,
            seed: None,
            log_level: "info".to_string(),
        }
    }
}

impl DrillConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let mastery_threshold = env_parse("DRILL_MASTERY_THRESHOLD")
            .unwrap_or(defaults.mastery_threshold);
        let max_consecutive_mistakes = env_parse("DRILL_MAX_MISTAKES")
            .unwrap_or(defaults.max_consecutive_mistakes);
        let max_learning_words = env_parse("DRILL_MAX_LEARNING")
            .unwrap_or(defaults.max_learning_words);
        let seed = env_parse("DRILL_SEED");
        let log_level = std::env::var("RUST_LOG").unwrap_or(defaults.log_level);

        Self {
            mastery_threshold,
            max_consecutive_mistakes,
            max_learning_words,
            seed,
            log_level,
        }
        .sanitized()
    }

    /// Clamp thresholds and capacities to at least one.
    pub fn sanitized(mut self) -> Self {
        self.mastery_threshold = self.mastery_threshold.max(1);
        self.max_consecutive_mistakes = self.max_consecutive_mistakes.max(1);
        self.max_learning_words = self.max_learning_words.max(1);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<T>().ok())
}
