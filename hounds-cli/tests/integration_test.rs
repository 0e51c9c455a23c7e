//! Integration tests for Hare and Hounds
//!
//! Tests the full stack: board rules, evaluation, both search algorithms,
//! the human session contract and position enumeration

use hounds_core::{
    board::Cell,
    game::{Board, GameResult, Move, Side, MAX_VERTICAL_STREAK},
    ai::{play_game, Algorithm, SearchAI, SearchConfig},
    eval::Difficulty,
    reachable_positions, summarize, GameConfig, GameError, Session,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Instant;

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn searcher(algorithm: Algorithm, depth: u32, level: u8, side: Side) -> SearchAI {
    SearchAI::new(SearchConfig {
        algorithm,
        depth,
        difficulty: Difficulty::new(level).unwrap(),
        computer: side,
    })
}

/// Positions visited by a seeded random game, each with the side to move
fn random_walk(seed: u64, plies: usize) -> Vec<(Board, Side)> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut board = Board::new_game();
    let mut to_move = Side::Hound;
    let mut visited = vec![(board, to_move)];

    for _ in 0..plies {
        if board.is_terminal() {
            break;
        }
        if let Some(mv) = board.random_move(to_move, &mut rng) {
            board = board.apply_move(to_move, mv).unwrap();
        }
        to_move = to_move.opponent();
        visited.push((board, to_move));
    }

    visited
}

// ============================================================================
// GAME LOGIC TESTS
// ============================================================================

#[test]
fn test_opening_moves() {
    let board = Board::new_game();

    assert_eq!(board.result(), GameResult::Ongoing);
    assert_eq!(board.legal_moves(Side::Hound).len(), 7);
    assert_eq!(board.legal_moves(Side::Hare).len(), 3);

    // Every generated move is accepted by the validator
    for side in [Side::Hound, Side::Hare] {
        for mv in board.legal_moves(side) {
            assert!(board.apply_move(side, mv).is_ok(), "{} {} rejected", side, mv);
        }
    }
}

#[test]
fn test_rejected_moves_leave_board_alone() {
    let board = Board::new_game();

    // hound jumping two columns
    let jump = Move::new(Cell::new(1, 0), Cell::new(1, 2));
    assert!(matches!(
        board.apply_move(Side::Hound, jump),
        Err(GameError::IllegalMove { .. })
    ));

    // hare moving onto a void corner
    let void = Move::new(Cell::new(1, 4), Cell::new(0, 4));
    assert!(board.apply_move(Side::Hare, void).is_err());

    assert_eq!(board, Board::new_game());
}

#[test]
fn test_vertical_streak_ends_game() {
    let board: Board = "#.D.#/.D.H./#.D.#".parse().unwrap();
    let stalled = board.with_streak(MAX_VERTICAL_STREAK - 1);
    assert_eq!(stalled.result(), GameResult::Ongoing);

    // a vertical hound move reaches the limit
    let vertical = stalled
        .legal_moves(Side::Hound)
        .into_iter()
        .find(|mv| mv.from.col == mv.to.col)
        .expect("a vertical hound move exists");
    let next = stalled.apply_move(Side::Hound, vertical).unwrap();
    assert_eq!(next.result(), GameResult::HareWins);
}

// ============================================================================
// SEARCH TESTS
// ============================================================================

#[test]
fn test_search_finds_move_for_both_sides() {
    let board = Board::new_game();

    for side in [Side::Hound, Side::Hare] {
        let ai = searcher(Algorithm::AlphaBeta, 3, 10, side);
        let mv = ai.best_move(&board);
        assert!(mv.is_some(), "{} should find a move", side);
        let mv = mv.unwrap();
        assert!(board.legal_moves(side).contains(&mv));
    }
}

#[test]
fn test_algorithms_agree_along_random_games() {
    for seed in 0..4 {
        for (board, to_move) in random_walk(seed, 12) {
            for level in [3, 9] {
                let minimax =
                    searcher(Algorithm::Minimax, 3, level, to_move).search_from(&board, to_move);
                let alpha_beta =
                    searcher(Algorithm::AlphaBeta, 3, level, to_move).search_from(&board, to_move);

                assert_eq!(minimax.score, alpha_beta.score, "seed {} board\n{}", seed, board);
                assert_eq!(minimax.best_move, alpha_beta.best_move);
                assert!(alpha_beta.stats.nodes <= minimax.stats.nodes);
            }
        }
    }
}

#[test]
fn test_full_game_terminates() {
    let hounds = searcher(Algorithm::AlphaBeta, 4, 10, Side::Hound);
    let hare = searcher(Algorithm::AlphaBeta, 3, 8, Side::Hare);

    let (final_board, history) = play_game(&hounds, &hare, Board::new_game(), Side::Hound, 200);

    assert!(!history.is_empty(), "Should have made moves");
    assert!(history.len() <= 200);
    println!(
        "Game ended: {:?} after {} plies\n{}",
        final_board.result(),
        history.len(),
        final_board
    );
}

#[test]
fn test_search_performance() {
    let board = Board::new_game();

    let start = Instant::now();
    let minimax = searcher(Algorithm::Minimax, 5, 10, Side::Hound).search(&board);
    let minimax_time = start.elapsed();

    let start = Instant::now();
    let alpha_beta = searcher(Algorithm::AlphaBeta, 5, 10, Side::Hound).search(&board);
    let alpha_beta_time = start.elapsed();

    println!("Depth 5 search from the opening:");
    println!("  minimax:    {} nodes in {:?}", minimax.stats.nodes, minimax_time);
    println!(
        "  alpha-beta: {} nodes, {} cutoffs in {:?}",
        alpha_beta.stats.nodes, alpha_beta.stats.cutoffs, alpha_beta_time
    );

    assert!(alpha_beta.stats.nodes < minimax.stats.nodes);
    assert_eq!(minimax.score, alpha_beta.score);
}

// ============================================================================
// SESSION TESTS
// ============================================================================

#[test]
fn test_session_against_random_human() {
    let config = GameConfig {
        human_side: Side::Hare,
        depth: 3,
        difficulty: 8,
        ..Default::default()
    };
    let mut session = Session::from_config(&config).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(11);

    let mut turns = 0;
    while !session.is_over() && turns < 200 {
        turns += 1;
        if session.must_pass() {
            session.pass_turn().unwrap();
        } else if session.is_human_turn() {
            let mv = session
                .board()
                .random_move(Side::Hare, &mut rng)
                .expect("hare has a move in an undecided position");
            session.apply_human_move(mv).unwrap();
        } else {
            session.play_computer_move().unwrap();
        }
    }

    let recorded = session.history().len() as u32;
    assert_eq!(recorded, session.human_moves() + session.computer_moves());
    assert!(session.computer_moves() > 0);

    let (human, computer) = session.final_scores();
    println!(
        "Session: {:?} after {} turns, scores hare {} / hounds {}",
        session.result(),
        turns,
        human,
        computer
    );
}

#[test]
fn test_session_from_json_config() {
    let config: GameConfig = serde_json::from_str(
        r#"{ "human_side": "hound", "algorithm": "minimax", "depth": 2, "difficulty": 5 }"#,
    )
    .unwrap();
    let mut session = Session::from_config(&config).unwrap();

    assert!(session.is_human_turn());
    assert_eq!(session.search_config().computer, Side::Hare);

    session.apply_human_labels(Some("1"), "5").unwrap();
    let reply = session.play_computer_move().unwrap();
    assert!(reply.best_move.is_some());
    assert_eq!(session.history().len(), 2);
}

// ============================================================================
// POSITION ENUMERATION
// ============================================================================

#[test]
fn test_reachable_positions_are_closed() {
    let positions = reachable_positions(Board::new_game(), Side::Hound);
    let summary = summarize(&positions);

    println!(
        "{} positions, {} hare wins, {} hound wins, {} stuck",
        summary.positions, summary.hare_wins, summary.hound_wins, summary.stuck
    );

    for (board, to_move) in &positions {
        assert!(board.hound_vertical_streak() <= MAX_VERTICAL_STREAK);
        if board.is_terminal() {
            continue;
        }
        for child in board.successors(*to_move) {
            assert!(positions.contains(&(child, to_move.opponent())));
        }
    }
}
