//! Play command - human versus computer in the console
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_config(), play_session(), report_outcome()
//! - Level 3: human_turn(), computer_turn()
//! - Level 4: input parsing and board rendering

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Args;

use hounds_core::{label_grid, Algorithm, GameConfig, GameError, SearchResult, Session, Side};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Session settings JSON file; flags below override it
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Side you play (hare or hound)
    #[arg(long)]
    pub side: Option<Side>,

    /// Computer search algorithm (minimax or alpha-beta)
    #[arg(long)]
    pub algorithm: Option<Algorithm>,

    /// Computer search depth in plies
    #[arg(long)]
    pub depth: Option<u32>,

    /// Computer difficulty, 1-10
    #[arg(long)]
    pub difficulty: Option<u8>,

    /// Start position, rows separated by '/' (e.g. "#.D.#/D.H../#..D#")
    #[arg(long)]
    pub start: Option<String>,

    /// Side that moves first
    #[arg(long)]
    pub first: Option<Side>,
}

/// How a console session ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Outcome {
    Finished,
    Quit,
}

/// What the player typed
#[derive(Clone, Debug, PartialEq, Eq)]
enum Command {
    Exit,
    Help,
    Move { from: Option<String>, to: String },
    /// More words than a hound move needs
    TooManyLabels,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// 1. Build the session settings from file and flags
/// 2. Alternate human and computer turns until the game is decided
/// 3. Print the final report
pub fn run(args: PlayArgs) -> Result<()> {
    let config = load_config(&args)?;

    tracing::info!(
        "Starting game: human plays {}, computer uses {} depth {} difficulty {}",
        config.human_side,
        config.algorithm,
        config.depth,
        config.difficulty
    );

    let mut session = Session::from_config(&config)?;
    let started = Instant::now();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let outcome = play_session(&mut session, stdin.lock(), stdout.lock())?;

    report_outcome(&session, outcome, started.elapsed());

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// File settings with command-line overrides applied
fn load_config(args: &PlayArgs) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    if let Some(side) = args.side {
        config.human_side = side;
    }
    if let Some(algorithm) = args.algorithm {
        config.algorithm = algorithm;
    }
    if let Some(depth) = args.depth {
        config.depth = depth;
    }
    if let Some(difficulty) = args.difficulty {
        config.difficulty = difficulty;
    }
    if let Some(start) = &args.start {
        config.start = Some(start.clone());
    }
    if let Some(first) = args.first {
        config.first_to_move = first;
    }

    config.validate()?;
    Ok(config)
}

/// Drive the game loop until a winner or an exit request
fn play_session<R: BufRead, W: Write>(
    session: &mut Session,
    mut input: R,
    mut output: W,
) -> Result<Outcome> {
    writeln!(output, "Cell labels:\n{}", label_grid())?;
    print_board(session, &mut output)?;

    while !session.is_over() {
        if session.must_pass() {
            writeln!(output, "The {} cannot move and passes.", session.to_move())?;
            session.pass_turn()?;
            continue;
        }

        if session.is_human_turn() {
            if human_turn(session, &mut input, &mut output)? == Outcome::Quit {
                return Ok(Outcome::Quit);
            }
        } else {
            computer_turn(session, &mut output)?;
        }
        print_board(session, &mut output)?;
    }

    Ok(Outcome::Finished)
}

/// Final report: winner, scores, move counts and elapsed time
fn report_outcome(session: &Session, outcome: Outcome, elapsed: Duration) {
    println!("\n=== Game Over ===");
    match (outcome, session.result().winner()) {
        (Outcome::Quit, _) => println!("Game abandoned"),
        (Outcome::Finished, Some(side)) if side == session.human_side() => {
            println!("Winner: {} (you)", side)
        }
        (Outcome::Finished, Some(side)) => println!("Winner: {} (computer)", side),
        (Outcome::Finished, None) => println!("No winner"),
    }

    let (human, computer) = session.final_scores();
    println!("Your score:      {:.1}", human);
    println!("Computer score:  {:.1}", computer);
    println!("Your moves:      {}", session.human_moves());
    println!("Computer moves:  {}", session.computer_moves());
    println!("Elapsed:         {:.1}s", elapsed.as_secs_f64());
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Prompt until the human enters a legal move or asks to leave
fn human_turn<R: BufRead, W: Write>(
    session: &mut Session,
    input: &mut R,
    output: &mut W,
) -> Result<Outcome> {
    loop {
        write!(output, "{}", prompt(session.human_side()))?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(Outcome::Quit);
        }

        match parse_command(&line) {
            None => continue,
            Some(Command::Exit) => return Ok(Outcome::Quit),
            Some(Command::Help) => writeln!(output, "{}", label_grid())?,
            Some(Command::TooManyLabels) => {
                writeln!(output, "Enter one label for the hare or two for a hound")?
            }
            Some(Command::Move { from, to }) => {
                match session.apply_human_labels(from.as_deref(), &to) {
                    Ok(_) => return Ok(Outcome::Finished),
                    Err(err) => report_input_error(output, &err)?,
                }
            }
        }
    }
}

/// Let the search engine move and show what it played
fn computer_turn<W: Write>(session: &mut Session, output: &mut W) -> Result<()> {
    let side = session.computer_side();
    let started = Instant::now();
    let result = session.play_computer_move()?;

    tracing::debug!(
        "computer searched {} nodes ({} cutoffs) in {:?}",
        result.stats.nodes,
        result.stats.cutoffs,
        started.elapsed()
    );

    writeln!(output, "{}", describe_computer_move(side, &result, started.elapsed()))?;
    Ok(())
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn prompt(side: Side) -> &'static str {
    match side {
        Side::Hare => "Move the hare to (label, 'exit' to quit): ",
        Side::Hound => "Move a hound (from to, 'exit' to quit): ",
    }
}

/// One label moves the hare, two labels move a hound
fn parse_command(line: &str) -> Option<Command> {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        [] => None,
        [word] if word.eq_ignore_ascii_case("exit") || word.eq_ignore_ascii_case("quit") => {
            Some(Command::Exit)
        }
        [word] if word.eq_ignore_ascii_case("help") => Some(Command::Help),
        [to] => Some(Command::Move {
            from: None,
            to: to.to_string(),
        }),
        [from, to] => Some(Command::Move {
            from: Some(from.to_string()),
            to: to.to_string(),
        }),
        _ => Some(Command::TooManyLabels),
    }
}

/// Move, score, search time and node count of a computer turn
fn describe_computer_move(side: Side, result: &SearchResult, elapsed: Duration) -> String {
    match result.best_move {
        Some(mv) => format!(
            "Computer ({}) plays {} [score {:.2}, {:.1}ms, {} nodes]",
            side,
            mv,
            result.score,
            elapsed.as_secs_f64() * 1000.0,
            result.stats.nodes
        ),
        None => format!("Computer ({}) passes.", side),
    }
}

fn report_input_error<W: Write>(output: &mut W, err: &GameError) -> io::Result<()> {
    writeln!(output, "Invalid move: {}", err)
}

fn print_board<W: Write>(session: &Session, output: &mut W) -> io::Result<()> {
    writeln!(output, "\n{}", session.board())?;
    writeln!(output, "Vertical hound moves: {}\n", session.board().hound_vertical_streak())
}

// ============================================================================
// TESTS
// ============================================================================
