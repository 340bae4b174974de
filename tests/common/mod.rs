#![allow(dead_code)]

use danci_drill::{DrillConfig, DrillEngine, WordId, WordRecord};

pub const SEED: u64 = 20240601;

pub fn config() -> DrillConfig {
    DrillConfig::default().with_seed(SEED)
}

pub fn hello_engine(status: &str) -> DrillEngine {
    DrillEngine::new(
        vec![WordRecord::new("1", "hello", "hola").with_status(status)],
        config(),
    )
    .expect("valid fixture")
}

pub fn spanish_records() -> Vec<WordRecord> {
    [
        ("1", "hello", "hola"),
        ("2", "goodbye", "adiós"),
        ("3", "thank you", "gracias"),
        ("4", "cat", "gato"),
        ("5", "dog", "perro"),
        ("6", "house", "casa"),
        ("7", "water", "agua"),
        ("8", "bread", "pan"),
    ]
    .into_iter()
    .map(|(id, source, target)| WordRecord::new(id, source, target))
    .collect()
}

/// Draw a fresh question and answer it correctly.
pub fn answer_correctly(engine: &mut DrillEngine) -> Option<WordId> {
    let question = engine.next_question()?;
    let pair = engine.catalog().get(&question.id)?;
    let answer = pair.expected_answer(question.direction).to_string();
    engine.submit_answer(Some(&answer), false);
    Some(question.id)
}
