//! Match command - play games between two computer players
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_players(), play_match(), report_results()
//! - Level 3: play_single_game(), play_random_opening(), compute_match_statistics()
//! - Level 4: formatting utilities

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use hounds_core::{
    Algorithm, Board, Difficulty, GameResult, Move, SearchAI, SearchConfig, SearchStats, Side,
};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    /// Number of games to play
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Hounds search algorithm (minimax or alpha-beta)
    #[arg(long, default_value = "alpha-beta")]
    pub hound_algorithm: Algorithm,

    /// Hounds search depth
    #[arg(long, default_value = "4")]
    pub hound_depth: u32,

    /// Hounds difficulty, 1-10
    #[arg(long, default_value = "10")]
    pub hound_difficulty: u8,

    /// Hare search algorithm (minimax or alpha-beta)
    #[arg(long, default_value = "alpha-beta")]
    pub hare_algorithm: Algorithm,

    /// Hare search depth
    #[arg(long, default_value = "4")]
    pub hare_depth: u32,

    /// Hare difficulty, 1-10
    #[arg(long, default_value = "10")]
    pub hare_difficulty: u8,

    /// Side that moves first
    #[arg(long, default_value = "hound")]
    pub first: Side,

    /// Random plies played before the search takes over
    #[arg(long, default_value = "0")]
    pub random_opening: usize,

    /// Maximum plies per game, passes included
    #[arg(long, default_value = "200")]
    pub max_plies: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug)]
struct GameRecord {
    game_number: usize,
    result: GameResult,
    plies: usize,
    passes: usize,
    final_board: Board,
    moves: Vec<Move>,
    stats: SearchStats,
}

/// Aggregated match results
#[derive(Clone, Debug)]
struct MatchResults {
    games: Vec<GameRecord>,
    hare_wins: usize,
    hound_wins: usize,
    unfinished: usize,
    avg_plies: f32,
    stats: SearchStats,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
///
/// 1. Build both computer players
/// 2. Play the match (multiple games)
/// 3. Report results
pub fn run(args: MatchArgs, seed: Option<u64>) -> Result<()> {
    let (hound_ai, hare_ai) = build_players(&args)?;

    tracing::info!(
        "Starting match: hounds {} d{} vs hare {} d{} ({} games)",
        args.hound_algorithm,
        args.hound_depth,
        args.hare_algorithm,
        args.hare_depth,
        args.games
    );

    let results = play_match(&hound_ai, &hare_ai, &args, seed)?;

    report_results(&results, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Search engines for both sides
fn build_players(args: &MatchArgs) -> Result<(SearchAI, SearchAI)> {
    let hound = player(Side::Hound, args.hound_algorithm, args.hound_depth, args.hound_difficulty)?;
    let hare = player(Side::Hare, args.hare_algorithm, args.hare_depth, args.hare_difficulty)?;
    Ok((hound, hare))
}

/// Play all games in the match
fn play_match(
    hound_ai: &SearchAI,
    hare_ai: &SearchAI,
    args: &MatchArgs,
    seed: Option<u64>,
) -> Result<MatchResults> {
    let mut rng = create_rng(seed);
    let mut games = Vec::with_capacity(args.games);
    let progress = create_progress_bar(args.games as u64, args.json)?;

    for game_num in 0..args.games {
        let record = play_single_game(hound_ai, hare_ai, game_num + 1, args, &mut rng)?;

        tracing::debug!(
            "Game {}: {:?} ({} plies, {} nodes)",
            record.game_number,
            record.result,
            record.plies,
            record.stats.nodes
        );

        games.push(record);
        progress.inc(1);
    }
    progress.finish_and_clear();

    Ok(compute_match_statistics(games))
}

/// Report match results
fn report_results(results: &MatchResults, args: &MatchArgs) {
    if args.json {
        print_json_results(results);
    } else {
        print_text_results(results);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one game from the fixed start position
fn play_single_game(
    hound_ai: &SearchAI,
    hare_ai: &SearchAI,
    game_number: usize,
    args: &MatchArgs,
    rng: &mut ChaCha8Rng,
) -> Result<GameRecord> {
    let mut game = GameInProgress::new(Board::new_game(), args.first);
    play_random_opening(&mut game, args.random_opening.min(args.max_plies), rng)?;

    while !game.board.is_terminal() && game.plies < args.max_plies {
        let ai = match game.to_move {
            Side::Hound => hound_ai,
            Side::Hare => hare_ai,
        };
        let result = ai.search_from(&game.board, game.to_move);
        game.stats.merge(result.stats);

        match (result.best_move, result.board) {
            (Some(mv), Some(next)) => game.advance(mv, next),
            _ => game.pass(),
        }
    }

    Ok(GameRecord {
        game_number,
        result: game.board.result(),
        plies: game.plies,
        passes: game.passes,
        final_board: game.board,
        moves: game.moves,
        stats: game.stats,
    })
}

/// Uniformly random legal moves so repeated games diverge
fn play_random_opening(
    game: &mut GameInProgress,
    plies: usize,
    rng: &mut ChaCha8Rng,
) -> Result<()> {
    for _ in 0..plies {
        if game.board.is_terminal() {
            break;
        }
        match game.board.random_move(game.to_move, rng) {
            Some(mv) => {
                let next = game.board.apply_move(game.to_move, mv)?;
                game.advance(mv, next);
            }
            None => game.pass(),
        }
    }
    Ok(())
}

/// Compute aggregate statistics from game records
fn compute_match_statistics(games: Vec<GameRecord>) -> MatchResults {
    let hare_wins = games.iter().filter(|g| g.result == GameResult::HareWins).count();
    let hound_wins = games.iter().filter(|g| g.result == GameResult::HoundsWin).count();
    let unfinished = games.iter().filter(|g| g.result == GameResult::Ongoing).count();

    let total_plies: usize = games.iter().map(|g| g.plies).sum();
    let avg_plies = if games.is_empty() {
        0.0
    } else {
        total_plies as f32 / games.len() as f32
    };

    let mut stats = SearchStats::default();
    for game in &games {
        stats.merge(game.stats);
    }

    MatchResults {
        games,
        hare_wins,
        hound_wins,
        unfinished,
        avg_plies,
        stats,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Board, side to move and counters of a game being played
struct GameInProgress {
    board: Board,
    to_move: Side,
    plies: usize,
    passes: usize,
    moves: Vec<Move>,
    stats: SearchStats,
}

impl GameInProgress {
    fn new(board: Board, first_to_move: Side) -> Self {
        Self {
            board,
            to_move: first_to_move,
            plies: 0,
            passes: 0,
            moves: Vec::new(),
            stats: SearchStats::default(),
        }
    }

    fn advance(&mut self, mv: Move, next: Board) {
        self.board = next;
        self.moves.push(mv);
        self.plies += 1;
        self.to_move = self.to_move.opponent();
    }

    fn pass(&mut self) {
        self.passes += 1;
        self.plies += 1;
        self.to_move = self.to_move.opponent();
    }
}

fn player(side: Side, algorithm: Algorithm, depth: u32, level: u8) -> Result<SearchAI> {
    if depth == 0 {
        anyhow::bail!("{} search depth must be at least 1", side);
    }
    let config = SearchConfig {
        algorithm,
        depth,
        difficulty: Difficulty::new(level)?,
        computer: side,
    };
    Ok(SearchAI::new(config))
}

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn create_progress_bar(len: u64, hidden: bool) -> Result<ProgressBar> {
    if hidden {
        return Ok(ProgressBar::hidden());
    }
    let bar = ProgressBar::new(len);
    bar.set_style(ProgressStyle::with_template("{bar:40} {pos}/{len} games [{elapsed_precise}]")?);
    Ok(bar)
}

fn percent(count: usize, total: usize) -> f32 {
    if total > 0 {
        count as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

/// Print results as JSON
fn print_json_results(results: &MatchResults) {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        result: String,
        plies: usize,
        passes: usize,
        final_board: String,
        nodes: u64,
        moves: Vec<String>,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        total_games: usize,
        hare_wins: usize,
        hound_wins: usize,
        unfinished: usize,
        avg_plies: f32,
        hound_win_rate: f32,
        search: SearchStats,
        games: Vec<JsonGame>,
    }

    let total = results.games.len();
    let output = JsonOutput {
        total_games: total,
        hare_wins: results.hare_wins,
        hound_wins: results.hound_wins,
        unfinished: results.unfinished,
        avg_plies: results.avg_plies,
        hound_win_rate: percent(results.hound_wins, total) / 100.0,
        search: results.stats,
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                result: format!("{:?}", g.result),
                plies: g.plies,
                passes: g.passes,
                final_board: g.final_board.to_string().replace('\n', "/"),
                nodes: g.stats.nodes,
                moves: g.moves.iter().map(Move::to_string).collect(),
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text
fn print_text_results(results: &MatchResults) {
    let total = results.games.len();

    println!("\n=== Match Results ===");
    println!("Total games: {}", total);
    println!(
        "Hound wins:  {} ({:.1}%)",
        results.hound_wins,
        percent(results.hound_wins, total)
    );
    println!(
        "Hare wins:   {} ({:.1}%)",
        results.hare_wins,
        percent(results.hare_wins, total)
    );
    println!(
        "Unfinished:  {} ({:.1}%)",
        results.unfinished,
        percent(results.unfinished, total)
    );
    println!("Avg plies:   {:.1}", results.avg_plies);
    println!(
        "Nodes:       {} ({} cutoffs)",
        results.stats.nodes, results.stats.cutoffs
    );

    println!("\nGame details:");
    for game in &results.games {
        println!(
            "  Game {}: {:?} in {} plies ({} passes)",
            game.game_number, game.result, game.plies, game.passes
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> MatchArgs {
        MatchArgs {
            games: 2,
            hound_algorithm: Algorithm::AlphaBeta,
            hound_depth: 2,
            hound_difficulty: 10,
            hare_algorithm: Algorithm::Minimax,
            hare_depth: 2,
            hare_difficulty: 4,
            first: Side::Hound,
            random_opening: 0,
            max_plies: 60,
            json: true,
        }
    }

    fn record(game_number: usize, result: GameResult, plies: usize) -> GameRecord {
        GameRecord {
            game_number,
            result,
            plies,
            passes: 0,
            final_board: Board::new_game(),
            moves: vec![],
            stats: SearchStats {
                nodes: 10,
                leaves: 5,
                cutoffs: 1,
            },
        }
    }

    #[test]
    fn test_compute_match_statistics_empty() {
        let results = compute_match_statistics(vec![]);
        assert_eq!(results.hare_wins, 0);
        assert_eq!(results.hound_wins, 0);
        assert_eq!(results.unfinished, 0);
        assert_eq!(results.avg_plies, 0.0);
    }

    #[test]
    fn test_compute_match_statistics() {
        let games = vec![
            record(1, GameResult::HoundsWin, 10),
            record(2, GameResult::HareWins, 20),
            record(3, GameResult::HoundsWin, 30),
        ];

        let results = compute_match_statistics(games);
        assert_eq!(results.hound_wins, 2);
        assert_eq!(results.hare_wins, 1);
        assert_eq!(results.unfinished, 0);
        assert_eq!(results.avg_plies, 20.0);
        assert_eq!(results.stats.nodes, 30);
    }

    #[test]
    fn test_build_players_rejects_bad_settings() {
        assert!(build_players(&args()).is_ok());
        assert!(build_players(&MatchArgs {
            hare_difficulty: 11,
            ..args()
        })
        .is_err());
        assert!(build_players(&MatchArgs {
            hound_depth: 0,
            ..args()
        })
        .is_err());
    }

    #[test]
    fn test_single_game_respects_ply_limit() {
        let args = MatchArgs {
            max_plies: 6,
            ..args()
        };
        let (hound, hare) = build_players(&args).unwrap();
        let mut rng = create_rng(Some(7));

        let record = play_single_game(&hound, &hare, 1, &args, &mut rng).unwrap();
        assert!(record.plies <= 6);
        assert_eq!(record.moves.len() + record.passes, record.plies);
        assert!(record.stats.nodes > 0);
    }

    #[test]
    fn test_seeded_openings_repeat() {
        let args = MatchArgs {
            random_opening: 4,
            max_plies: 4,
            ..args()
        };
        let (hound, hare) = build_players(&args).unwrap();

        let first = play_single_game(&hound, &hare, 1, &args, &mut create_rng(Some(42))).unwrap();
        let second = play_single_game(&hound, &hare, 1, &args, &mut create_rng(Some(42))).unwrap();
        assert_eq!(first.moves, second.moves);
        assert_eq!(first.final_board, second.final_board);
    }

    #[test]
    fn test_random_opening_stops_at_ply_limit() {
        let args = MatchArgs {
            random_opening: 10,
            max_plies: 4,
            ..args()
        };
        let (hound, hare) = build_players(&args).unwrap();

        for seed in 0..5 {
            let mut rng = create_rng(Some(seed));
            let record = play_single_game(&hound, &hare, 1, &args, &mut rng).unwrap();
            assert!(record.plies <= 4, "seed {} played {} plies", seed, record.plies);
            assert!(record.moves.len() <= 4);
        }
    }

    #[test]
    fn test_create_rng_deterministic() {
        let mut rng1 = create_rng(Some(42));
        let mut rng2 = create_rng(Some(42));

        use rand::Rng;
        assert_eq!(rng1.gen::<u64>(), rng2.gen::<u64>());
    }
}
