//! Integration tests for DrillEngine session scenarios.

mod common;

use danci_drill::{
    AnswerOutcome, ChangeReason, Direction, DrillConfig, DrillEngine, DrillError, WordCatalog,
    WordId, WordRecord, WordStatus,
};
use serde_json::json;

use common::{answer_correctly, config, hello_engine, spanish_records};

#[test]
fn full_mastery_cycle() {
    let mut engine = hello_engine("LEVEL_1");
    let id = WordId::from("1");

    for _ in 0..3 {
        let question = engine.next_question().expect("learning word available");
        assert_eq!(question.word, "hello");
        let result = engine.submit_answer(Some("hola"), false);
        assert_eq!(result.outcome, AnswerOutcome::Correct);
    }
    assert_eq!(engine.catalog().status_of(&id), Some(WordStatus::OneWayMastered));

    assert_eq!(engine.toggle_direction(), Direction::Reverse);
    for _ in 0..3 {
        let question = engine.next_question().expect("one-way word available");
        assert_eq!(question.word, "hola");
        assert_eq!(question.direction, Direction::Reverse);
        let result = engine.submit_answer(Some("hello"), false);
        assert_eq!(result.outcome, AnswerOutcome::Correct);
    }
    assert_eq!(engine.catalog().status_of(&id), Some(WordStatus::Mastered));

    for _ in 0..5 {
        assert!(engine.next_question().is_none());
    }
    assert!(engine.progress().is_complete());
}

#[test]
fn promotion_happens_on_threshold_answer() {
    let mut engine = hello_engine("LEVEL_1");
    engine.next_question();

    let first = engine.submit_answer(Some("HOLA!"), false);
    let second = engine.submit_answer(Some("hola"), false);
    let third = engine.submit_answer(Some(" Hóla "), true);

    assert!(!first.status_changed());
    assert!(!second.status_changed());
    let change = third.status_change.expect("promoted on third answer");
    assert_eq!(change.from, WordStatus::Learning);
    assert_eq!(change.to, WordStatus::OneWayMastered);
    assert_eq!(change.reason, ChangeReason::Promotion);
    // nothing left in the normal pool
    assert!(third.question_data.is_none());
}

#[test]
fn demotion_from_mastered() {
    let records = vec![
        WordRecord::new("1", "hello", "hola").with_status("LEVEL_3"),
        WordRecord::new("2", "cat", "gato").with_status("LEVEL_3"),
    ];
    let mut catalog = WordCatalog::from_records(records).unwrap();
    let rules = danci_drill::ProgressionRules::new(3, 3);
    let mut mistakes = danci_drill::MistakeTracker::new();
    let id = WordId::from("1");

    let mut last = None;
    for _ in 0..3 {
        last = rules
            .on_mistake(&mut catalog, &mut mistakes, &id, Direction::Reverse)
            .unwrap();
    }

    let change = last.expect("demoted after three mistakes");
    assert_eq!(change.to, WordStatus::OneWayMastered);
    assert_eq!(catalog.status_of(&id), Some(WordStatus::OneWayMastered));
    assert_eq!(mistakes.count(&id, Direction::Normal), 0);
    assert_eq!(mistakes.count(&id, Direction::Reverse), 0);
    assert_eq!(catalog.status_of(&WordId::from("2")), Some(WordStatus::Mastered));
}

#[test]
fn demotion_through_engine_in_reverse() {
    let mut engine = hello_engine("LEVEL_2");
    let id = WordId::from("1");
    engine.toggle_direction();
    engine.next_question().expect("reverse question");

    engine.submit_answer(Some("nope"), false);
    engine.submit_answer(Some("nope"), false);
    let result = engine.submit_answer(Some("nope"), true);

    assert_eq!(result.status_change.unwrap().to, WordStatus::Learning);
    assert_eq!(engine.mistakes().count(&id, Direction::Reverse), 0);
    // pool emptied so the selector falls back to NORMAL
    let next = result.question_data.expect("learning word asked again");
    assert_eq!(next.direction, Direction::Normal);
    assert_eq!(next.word, "hello");
    assert_eq!(engine.direction(), Direction::Normal);
}

#[test]
fn correct_answer_breaks_mistake_streak() {
    let mut engine = hello_engine("LEVEL_1");
    engine.next_question();
    let id = WordId::from("1");

    for answer in ["x", "y", "hola", "x", "y"] {
        engine.submit_answer(Some(answer), false);
    }
    assert_eq!(engine.catalog().status_of(&id), Some(WordStatus::Learning));
    assert_eq!(engine.mistakes().count(&id, Direction::Normal), 2);

    engine.submit_answer(Some("z"), false);
    assert_eq!(engine.catalog().status_of(&id), Some(WordStatus::New));
}

#[test]
fn quiz_completion_returns_none() {
    let records = vec![
        WordRecord::new("1", "hello", "hola").with_status("LEVEL_3"),
        WordRecord::new("2", "cat", "gato").with_status("MASTERED"),
    ];
    let mut engine = DrillEngine::new(records, config()).unwrap();
    assert!(engine.next_question().is_none());

    let result = engine.submit_answer(Some("hola"), true);
    assert_eq!(result.outcome, AnswerOutcome::Finished);
    assert_eq!(engine.stats().totals().attempts, 0);
}

#[test]
fn empty_and_invalid_construction() {
    let err = DrillEngine::new(Vec::new(), config()).unwrap_err();
    assert!(matches!(err, DrillError::InvalidInput(_)));

    let all_invalid = json!([{"id": 1}, {"sourceWord": "a", "targetWord": "b"}]);
    let err = DrillEngine::from_json(&all_invalid, config()).unwrap_err();
    assert!(matches!(err, DrillError::InvalidInput(_)));

    let err = DrillEngine::from_json(&json!("not a list"), config()).unwrap_err();
    assert!(matches!(err, DrillError::InvalidInput(_)));

    let engine = DrillEngine::from_json(
        &json!([
            {"id": 1, "sourceWord": "hello", "targetWord": "hola"},
            {"id": 2, "sourceWord": "cat"},
        ]),
        config(),
    )
    .unwrap();
    assert_eq!(engine.catalog().total_count(), 1);
}

#[test]
fn new_words_enter_learning_gradually() {
    let config = DrillConfig {
        mastery_threshold: 1,
        max_learning_words: 3,
        ..config()
    };
    let mut engine = DrillEngine::new(spanish_records(), config).unwrap();
    assert_eq!(engine.progress().learning, 3);
    assert_eq!(engine.progress().new, 5);

    // one correct answer promotes with threshold 1 and frees a slot
    answer_correctly(&mut engine).unwrap();
    engine.next_question();
    let progress = engine.progress();
    assert_eq!(progress.one_way_mastered, 1);
    assert_eq!(progress.learning, 3);
    assert_eq!(progress.new, 4);
}

#[test]
fn whole_deck_can_be_mastered() {
    let config = DrillConfig {
        mastery_threshold: 2,
        max_learning_words: 3,
        ..config()
    };
    let mut engine = DrillEngine::new(spanish_records(), config).unwrap();

    let mut rounds = 0;
    while !engine.progress().is_complete() {
        rounds += 1;
        assert!(rounds < 500, "session did not converge");

        if answer_correctly(&mut engine).is_none() {
            let direction = engine.toggle_direction();
            assert_eq!(direction, Direction::Reverse, "stuck with nothing to ask");
        }
        assert!(engine.catalog().check_partitions().is_ok());
    }

    assert!(engine.next_question().is_none());
    assert_eq!(engine.summary().incorrect, 0);
    let mastered = engine
        .status_history()
        .filter(|change| change.to == WordStatus::Mastered)
        .count();
    assert_eq!(mastered, 8);
}

#[test]
fn no_immediate_repeat_with_alternatives() {
    let records = vec![
        WordRecord::new("1", "hello", "hola").with_status("LEVEL_1"),
        WordRecord::new("2", "cat", "gato").with_status("LEVEL_1"),
    ];
    for seed in 0..25 {
        let mut engine =
            DrillEngine::new(records.clone(), DrillConfig::default().with_seed(seed)).unwrap();
        let first = engine.next_question().unwrap().id;
        let next = engine.submit_answer(Some("wrong"), true).question_data.unwrap();
        assert_ne!(next.id, first, "seed {seed} repeated the word just asked");
    }
}

#[test]
fn usage_examples_belong_to_answered_word() {
    let records = vec![
        WordRecord::new("1", "hello", "hola")
            .with_status("LEVEL_1")
            .with_examples("Hello!", "¡Hola!"),
        WordRecord::new("2", "cat", "gato").with_status("LEVEL_1"),
    ];
    let mut engine = DrillEngine::new(records, config()).unwrap();

    let question = engine.next_question().unwrap();
    let result = engine.submit_answer(Some("?"), true);
    let examples = result.usage_examples.unwrap();
    if question.id == WordId::from("1") {
        assert_eq!(examples.source, "Hello!");
        assert_eq!(examples.target, "¡Hola!");
    } else {
        assert_eq!(examples.source, danci_drill::DEFAULT_EXAMPLE);
    }
    assert_ne!(result.question_data.unwrap().id, question.id);
}

#[test]
fn answer_result_serializes_camel_case() {
    let mut engine = hello_engine("LEVEL_1");
    let result = engine.submit_answer(Some("hola"), true);
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["outcome"], "correct");
    assert_eq!(value["feedback"], "Correct!");
    assert!(value.get("usageExamples").is_some());
    assert!(value.get("questionData").is_some());
}
