use std::io::{self, BufRead, Write};

use danci_drill::config::DrillConfig;
use danci_drill::logging::init_tracing;
use danci_drill::{AnswerOutcome, Direction, DrillEngine, WordCatalog};

const USAGE: &str = "usage: danci-drill <words.json>";
const HELP: &str = "commands: :flip (toggle direction), :stats, :progress, :quit";

fn main() {
    let config = DrillConfig::from_env();
    init_tracing(&config.log_level);

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("{USAGE}");
        std::process::exit(2);
    };

    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::error!(error = %err, path = %path, "failed to read word list");
            std::process::exit(1);
        }
    };

    let catalog = match WordCatalog::from_json_str(&raw) {
        Ok(catalog) => catalog,
        Err(err) => {
            tracing::error!(error = %err, path = %path, "failed to load word list");
            std::process::exit(1);
        }
    };

    tracing::info!(words = catalog.total_count(), ?config, "drill session starting");
    let mut engine = DrillEngine::with_catalog(catalog, config);

    if let Err(err) = run(&mut engine) {
        tracing::error!(error = %err, "terminal session failed");
        std::process::exit(1);
    }

    match serde_json::to_string_pretty(&engine.drain_status_changes()) {
        Ok(changes) => println!("status changes:\n{changes}"),
        Err(err) => tracing::warn!(error = %err, "failed to serialize status changes"),
    }
}

fn run(engine: &mut DrillEngine) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();

    writeln!(stdout, "{HELP}")?;
    let mut question = engine.next_question();

    loop {
        let Some(current) = question.clone() else {
            if engine.progress().is_complete() {
                writeln!(stdout, "All words mastered.")?;
                return Ok(());
            }
            writeln!(stdout, "Nothing to ask in this direction. Try :flip or :quit.")?;
            match read_line(&mut lines, &mut stdout, "> ")? {
                Some(line) if line.trim() == ":flip" => {
                    let direction = engine.toggle_direction();
                    writeln!(stdout, "direction: {}", direction.as_str())?;
                    question = engine.next_question();
                }
                Some(line) if line.trim() == ":quit" => return Ok(()),
                Some(_) => {}
                None => return Ok(()),
            }
            continue;
        };

        let arrow = match current.direction {
            Direction::Normal => "→",
            Direction::Reverse => "←",
        };
        let prompt = format!("{} {arrow} ", current.word);
        let Some(line) = read_line(&mut lines, &mut stdout, &prompt)? else {
            return Ok(());
        };

        match line.trim() {
            ":quit" => return Ok(()),
            ":flip" => {
                let direction = engine.toggle_direction();
                writeln!(stdout, "direction: {}", direction.as_str())?;
                question = engine.next_question();
            }
            ":stats" => {
                let summary = engine.summary();
                writeln!(
                    stdout,
                    "answered {} | correct {} | accuracy {:.0}% | median {:.1}s",
                    summary.attempts,
                    summary.correct,
                    summary.accuracy * 100.0,
                    summary.median_elapsed_secs
                )?;
            }
            ":progress" => {
                let p = engine.progress();
                writeln!(
                    stdout,
                    "new {} | learning {} | one-way {} | mastered {} / {}",
                    p.new, p.learning, p.one_way_mastered, p.mastered, p.total
                )?;
            }
            answer => {
                let result = engine.submit_answer(Some(answer), true);
                writeln!(stdout, "{}", result.feedback)?;
                if result.outcome == AnswerOutcome::Incorrect {
                    if let Some(examples) = &result.usage_examples {
                        writeln!(stdout, "  {}\n  {}", examples.source, examples.target)?;
                    }
                }
                if let Some(change) = &result.status_change {
                    writeln!(stdout, "  [{} → {}]", change.from, change.to)?;
                }
                question = result.question_data;
            }
        }
    }
}

fn read_line(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    stdout: &mut impl Write,
    prompt: &str,
) -> io::Result<Option<String>> {
    write!(stdout, "{prompt}")?;
    stdout.flush()?;
    lines.next().transpose()
}
