//! Hare and Hounds core - game engine and AI
//!
//! This crate provides the core game logic:
//! - Board geometry (3x5 grid with four void corners, cell labels)
//! - Game state, move generation and terminal detection
//! - Position evaluation at two difficulty tiers
//! - Minimax and alpha-beta search
//! - The session contract used by front ends

pub mod board;
pub mod error;
pub mod game;
pub mod eval;
pub mod ai;
pub mod config;
pub mod session;
pub mod explore;

// Re-exports for convenient access
pub use board::{Cell, DIRECTIONS, LABELED_CELLS, label_grid};
pub use error::{GameError, parse_label};
pub use game::{Board, GameResult, Move, Occupant, Side, MAX_VERTICAL_STREAK};
pub use eval::{Difficulty, HeuristicTier, Roles, score_estimation, side_score, WIN_VALUE};
pub use ai::{play_game, Algorithm, SearchAI, SearchConfig, SearchResult, SearchStats};
pub use config::GameConfig;
pub use session::{apply_human_move, check_terminal, compute_computer_move, new_game, Session};
pub use explore::{occupancy_invariant_holds, reachable_positions, summarize, ExploreSummary};
