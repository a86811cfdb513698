//! Command-line front end for HemoQuiz.
//!
//! Each round writes a board image (and the individual views) to the output
//! directory, then asks for an answer on stdin.
//!
//! # Usage
//!
//! ```bash
//! hemoquiz --output-dir out/
//! hemoquiz --image-dir slides/ --seed 42 --rounds 5
//! hemoquiz --config hemoquiz.json --font /path/to/DejaVuSans.ttf
//! ```

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use hemoquiz::acquisition::{ImageSource, source_from_config};
use hemoquiz::core::{ConfigValidator, QuizConfig, QuizError, load_config};
use hemoquiz::domain::{CellLabel, question_bank};
use hemoquiz::game::HemoQuiz;
use hemoquiz::utils::visualization::{BoardConfig, save_board};
use hemoquiz::utils::{init_tracing, save_views};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{error, info, warn};

/// Command-line arguments for the quiz.
#[derive(Parser)]
#[command(name = "hemoquiz")]
#[command(about = "HemoQuiz - identify white blood cells on smear slides")]
struct Args {
    /// JSON configuration file. Every field is optional.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory where boards and views are written.
    #[arg(long, default_value = "hemoquiz_out")]
    output_dir: PathBuf,

    /// Read slides from this directory instead of over HTTP.
    #[arg(long)]
    image_dir: Option<PathBuf>,

    /// Base URL for references that are not absolute URLs.
    #[arg(long)]
    base_url: Option<String>,

    /// Request timeout in seconds.
    #[arg(long)]
    timeout: Option<u64>,

    /// Table items tried before falling back to a synthetic slide.
    #[arg(long)]
    max_attempts: Option<usize>,

    /// Seed for item selection. Random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many answered rounds.
    #[arg(long)]
    rounds: Option<u32>,

    /// Font used for board captions. A system font is tried when omitted.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    log_level: String,
}

enum Command {
    Answer(CellLabel),
    Quit,
}

fn build_config(args: &Args) -> Result<QuizConfig, QuizError> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => QuizConfig::default(),
    };
    if let Some(base_url) = &args.base_url {
        config.acquisition.base_url = Some(base_url.clone());
    }
    if let Some(timeout) = args.timeout {
        config.acquisition.timeout_secs = timeout;
    }
    if let Some(max_attempts) = args.max_attempts {
        config.acquisition.max_attempts = max_attempts;
    }
    config.validate()?;
    Ok(config)
}

/// Reads one line from stdin; `None` at end of input.
fn read_line(prompt: &str) -> io::Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn parse_command(input: &str) -> Result<Command, QuizError> {
    if input.eq_ignore_ascii_case("q") {
        return Ok(Command::Quit);
    }
    if let Ok(number) = input.parse::<usize>() {
        return match number {
            1..=5 => Ok(Command::Answer(CellLabel::ALL[number - 1])),
            _ => Err(QuizError::invalid_input(format!("no choice numbered {number}"))),
        };
    }
    input.parse::<CellLabel>().map(Command::Answer)
}

fn ask_for_answer() -> io::Result<Option<Command>> {
    let choices: Vec<String> = CellLabel::ALL
        .iter()
        .enumerate()
        .map(|(i, label)| format!("{} {}", i + 1, label))
        .collect();
    println!("Opções: {}", choices.join("  |  "));

    loop {
        let Some(line) = read_line("Sua resposta (número, nome ou q): ")? else {
            return Ok(None);
        };
        match parse_command(&line) {
            Ok(command) => return Ok(Some(command)),
            Err(e) => println!("{e}"),
        }
    }
}

fn run<S: ImageSource>(
    quiz: &mut HemoQuiz<S, StdRng>,
    args: &Args,
    board_config: &BoardConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let max_failures = quiz.table().len() * 2;
    let mut failures = 0;
    let mut answered = 0;

    loop {
        let round = quiz.session().round();
        let views = match quiz.start_round() {
            Ok(views) => views.clone(),
            Err(e) => {
                failures += 1;
                error!(round, error = %e, "round could not be presented");
                if failures >= max_failures {
                    return Err(e.into());
                }
                quiz.skip()?;
                continue;
            }
        };
        failures = 0;

        if let Some(origin) = quiz.origin() {
            info!(round, origin = %origin, "slide origin");
        }
        if let Err(e) = save_views(&args.output_dir, round, &views) {
            warn!(round, error = %e, "failed to write views");
        }
        let board_path = args.output_dir.join(format!("round_{round:03}_board.png"));
        save_board(&board_path, &views, quiz.session(), board_config)?;
        println!("\nRodada {round}: veja {}", board_path.display());

        let label = match ask_for_answer()? {
            Some(Command::Answer(label)) => label,
            Some(Command::Quit) | None => break,
        };
        if let Some(outcome) = quiz.answer(label) {
            println!("{}", outcome.message);
            println!("{}", quiz.session().score().summary());
        }
        save_board(&board_path, &views, quiz.session(), board_config)?;
        answered += 1;

        if args.rounds.is_some_and(|limit| answered >= limit) {
            break;
        }
        match read_line("Enter para a próxima, q para sair: ")? {
            Some(line) if !line.eq_ignore_ascii_case("q") => {
                quiz.next()?;
            }
            _ => break,
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let config = build_config(&args)?;
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let board_config = match &args.font {
        Some(path) => BoardConfig::with_font_path(path)?,
        None => BoardConfig::with_system_font(),
    };

    let source = source_from_config(&config.acquisition, args.image_dir.as_deref());
    let mut quiz = HemoQuiz::new(source, &config, question_bank(), rng)?;
    info!(output_dir = %args.output_dir.display(), "HemoQuiz started");

    run(&mut quiz, &args, &board_config)?;

    let score = quiz.session().score();
    println!("\nFim de jogo. {}", score.summary());
    info!(correct = score.correct, incorrect = score.incorrect, "HemoQuiz finished");
    Ok(())
}
