//! Property-Based Tests for the drilling engine
//!
//! Tests the following invariants:
//! - Partition invariant: status partitions stay disjoint and complete
//! - Promotion monotonicity: promotions only move one way up the ladder
//! - Demotion exactness: a mistake streak of the limit drops exactly one level
//! - Normalization idempotence

use proptest::prelude::*;

use danci_drill::{
    normalize, verify, ChangeReason, Direction, DrillConfig, DrillEngine, MistakeTracker,
    ProgressionRules, WordCatalog, WordId, WordRecord, WordStatus,
};

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_status_label() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("LEVEL_0"),
        Just("LEVEL_1"),
        Just("LEVEL_2"),
        Just("LEVEL_3"),
        Just("bogus"),
    ]
}

fn arb_records() -> impl Strategy<Value = Vec<WordRecord>> {
    prop::collection::vec(arb_status_label(), 1..12).prop_map(|labels| {
        labels
            .into_iter()
            .enumerate()
            .map(|(i, label)| {
                WordRecord::new(i.to_string(), &format!("src{i}"), &format!("tgt{i}"))
                    .with_status(label)
            })
            .collect()
    })
}

#[derive(Debug, Clone)]
enum Step {
    Correct,
    Wrong,
    Toggle,
}

fn arb_steps() -> impl Strategy<Value = Vec<Step>> {
    prop::collection::vec(
        prop_oneof![
            4 => Just(Step::Correct),
            3 => Just(Step::Wrong),
            1 => Just(Step::Toggle),
        ],
        0..80,
    )
}

fn arb_config() -> impl Strategy<Value = DrillConfig> {
    (1u32..=4, 1u32..=4, 1usize..=6, any::<u64>()).prop_map(
        |(mastery_threshold, max_consecutive_mistakes, max_learning_words, seed)| DrillConfig {
            mastery_threshold,
            max_consecutive_mistakes,
            max_learning_words,
            seed: Some(seed),
            ..DrillConfig::default()
        },
    )
}

fn arb_answer_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9áéíóúñüÁÉÍÓÚÑÜçÇ ,.!?¿¡'-]{0,30}"
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// PBT-1: partitions stay consistent through any answer sequence
    #[test]
    fn partitions_hold_for_random_sessions(
        records in arb_records(),
        config in arb_config(),
        steps in arb_steps(),
    ) {
        let total = records.len();
        let mut engine = DrillEngine::new(records, config).unwrap();
        prop_assert!(engine.catalog().check_partitions().is_ok());

        for step in steps {
            match step {
                Step::Toggle => {
                    engine.toggle_direction();
                }
                Step::Correct => {
                    if let Some(question) = engine.next_question() {
                        let pair = engine.catalog().get(&question.id).unwrap();
                        let answer = pair.expected_answer(question.direction).to_string();
                        let result = engine.submit_answer(Some(&answer), false);
                        prop_assert!(result.is_correct());
                    }
                }
                Step::Wrong => {
                    engine.submit_answer(Some("\u{1F600} definitely wrong"), true);
                }
            }
            prop_assert!(engine.catalog().check_partitions().is_ok());
            prop_assert_eq!(engine.progress().total, total);
        }
    }

    /// PBT-2: every recorded status change moves exactly one step in its
    /// direction, except the LEARNING → MASTERED fast path
    #[test]
    fn status_changes_follow_the_ladder(
        records in arb_records(),
        config in arb_config(),
        steps in arb_steps(),
    ) {
        let mut engine = DrillEngine::new(records, config).unwrap();
        for step in steps {
            match step {
                Step::Toggle => { engine.toggle_direction(); }
                Step::Correct => {
                    if let Some(question) = engine.next_question() {
                        let answer = engine
                            .catalog()
                            .get(&question.id)
                            .unwrap()
                            .expected_answer(question.direction)
                            .to_string();
                        engine.submit_answer(Some(&answer), false);
                    }
                }
                Step::Wrong => { engine.submit_answer(None, true); }
            }
        }

        for change in engine.drain_status_changes() {
            let from = change.from.to_index();
            let to = change.to.to_index();
            match change.reason {
                ChangeReason::PoolFill => {
                    prop_assert_eq!((change.from, change.to), (WordStatus::New, WordStatus::Learning));
                }
                ChangeReason::Promotion => {
                    prop_assert!(to > from);
                    prop_assert!(
                        to == from + 1
                            || (change.from == WordStatus::Learning && change.to == WordStatus::Mastered)
                    );
                }
                ChangeReason::Demotion => prop_assert_eq!(to + 1, from),
            }
        }
    }

    /// PBT-3: `limit` consecutive mistakes demote exactly one level and a
    /// correct answer in between restarts the streak
    #[test]
    fn demotion_is_exact(
        start in 1usize..4,
        limit in 1u32..6,
        reset_at in proptest::option::of(0u32..6),
        reverse in any::<bool>(),
    ) {
        let status = WordStatus::ALL[start];
        let mut catalog = WordCatalog::from_records(vec![
            WordRecord::new("w", "a", "b").with_status(status.label()),
        ]).unwrap();
        let rules = ProgressionRules::new(3, limit);
        let mut mistakes = MistakeTracker::new();
        let id = WordId::from("w");
        let direction = if reverse { Direction::Reverse } else { Direction::Normal };

        let mut streak = 0;
        for i in 0..limit {
            if reset_at == Some(i) && i > 0 {
                mistakes.reset(&id, direction);
                streak = 0;
            }
            rules.on_mistake(&mut catalog, &mut mistakes, &id, direction).unwrap();
            streak += 1;
        }

        if streak == limit {
            prop_assert_eq!(catalog.status_of(&id), status.demoted());
            prop_assert_eq!(mistakes.count(&id, direction), 0);
        } else {
            prop_assert_eq!(catalog.status_of(&id), Some(status));
            prop_assert_eq!(mistakes.count(&id, direction), streak);
        }
    }

    /// PBT-4: normalization is idempotent
    #[test]
    fn normalize_is_idempotent(text in arb_answer_text()) {
        let once = normalize(&text);
        prop_assert_eq!(normalize(&once), once.clone());
        prop_assert!(verify(&text, &once));
    }

    /// PBT-5: case, accents and punctuation never change the verdict
    #[test]
    fn verify_ignores_case_and_punctuation(word in "[a-z]{1,12}") {
        let shouted = format!("¡{}!", word.to_uppercase());
        prop_assert!(verify(&shouted, &word));
        let padded = format!("  {}. ", word);
        prop_assert!(verify(&padded, &word));
    }
}
