//! Minimax and alpha-beta search

use crate::eval::{score_estimation, Difficulty, Roles};
use crate::game::{Board, GameResult, Move, Side};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Initial alpha-beta window at the root, wider than any reachable score
pub const ALPHA_BETA_WINDOW: f32 = 5000.0;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Search algorithm
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    Minimax,
    AlphaBeta,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Minimax => write!(f, "minimax"),
            Algorithm::AlphaBeta => write!(f, "alpha-beta"),
        }
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimax" | "1" => Ok(Algorithm::Minimax),
            "alpha-beta" | "alphabeta" | "ab" | "2" => Ok(Algorithm::AlphaBeta),
            other => Err(format!("unknown algorithm '{}'", other)),
        }
    }
}

/// Search configuration for one computer player
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    pub algorithm: Algorithm,
    /// Maximum depth in plies
    pub depth: u32,
    pub difficulty: Difficulty,
    /// Side the computer plays; it is the maximising side
    pub computer: Side,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::AlphaBeta,
            depth: 4,
            difficulty: Difficulty::default(),
            computer: Side::Hound,
        }
    }
}

impl SearchConfig {
    /// Minimax at given depth
    pub fn minimax(depth: u32) -> Self {
        Self {
            algorithm: Algorithm::Minimax,
            depth,
            ..Default::default()
        }
    }

    /// Alpha-beta at given depth
    pub fn alpha_beta(depth: u32) -> Self {
        Self {
            algorithm: Algorithm::AlphaBeta,
            depth,
            ..Default::default()
        }
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Set the side the computer plays
    pub fn playing(mut self, side: Side) -> Self {
        self.computer = side;
        self
    }

    pub fn roles(&self) -> Roles {
        Roles::computer_plays(self.computer)
    }
}

// ============================================================================
// RESULTS
// ============================================================================

/// Counters collected during one search
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Nodes entered, root included
    pub nodes: u64,
    /// Nodes scored by the evaluation function
    pub leaves: u64,
    /// Sibling loops stopped early by alpha-beta
    pub cutoffs: u64,
}

impl SearchStats {
    pub fn merge(&mut self, other: SearchStats) {
        self.nodes += other.nodes;
        self.leaves += other.leaves;
        self.cutoffs += other.cutoffs;
    }
}

/// Outcome of a root search
#[derive(Clone, Debug)]
pub struct SearchResult {
    /// Root score from the computer's point of view
    pub score: f32,
    /// Chosen move, `None` when the root is a leaf
    pub best_move: Option<Move>,
    /// Board after the chosen move
    pub board: Option<Board>,
    pub stats: SearchStats,
}

// ============================================================================
// SEARCH TREE
// ============================================================================

/// One node of the search tree, built per recursive call
#[derive(Clone, Copy, Debug)]
struct SearchNode {
    board: Board,
    to_move: Side,
    depth: u32,
}

impl SearchNode {
    fn child(&self, board: Board) -> Self {
        Self {
            board,
            to_move: self.to_move.opponent(),
            depth: self.depth.saturating_sub(1),
        }
    }
}

/// Score of an evaluated node and the child it picked
#[derive(Clone, Copy, Debug)]
struct Evaluated {
    score: f32,
    chosen: Option<(Move, Board)>,
}

enum Expansion {
    Leaf(Evaluated),
    Children(Vec<Move>),
}

/// Per-search state: roles, difficulty and counters. Boards are never shared.
struct Search {
    roles: Roles,
    difficulty: Difficulty,
    stats: SearchStats,
}

impl Search {
    fn new(roles: Roles, difficulty: Difficulty) -> Self {
        Self {
            roles,
            difficulty,
            stats: SearchStats::default(),
        }
    }

    fn evaluate(&mut self, node: &SearchNode) -> Evaluated {
        self.stats.leaves += 1;
        Evaluated {
            score: score_estimation(&node.board, self.roles, node.depth, self.difficulty),
            chosen: None,
        }
    }

    fn is_leaf(node: &SearchNode) -> bool {
        node.depth == 0 || node.board.result() != GameResult::Ongoing
    }

    /// A side with no moves in an undecided position is scored where it stands
    fn expand(&mut self, node: &SearchNode) -> Expansion {
        let moves = node.board.legal_moves(node.to_move);
        if moves.is_empty() {
            Expansion::Leaf(self.evaluate(node))
        } else {
            Expansion::Children(moves)
        }
    }

    fn minimax(&mut self, node: SearchNode) -> Evaluated {
        self.stats.nodes += 1;

        if Self::is_leaf(&node) {
            return self.evaluate(&node);
        }
        let moves = match self.expand(&node) {
            Expansion::Leaf(leaf) => return leaf,
            Expansion::Children(moves) => moves,
        };

        let maximizing = node.to_move == self.roles.max;
        let mut best: Option<(f32, Move, Board)> = None;

        for mv in moves {
            let child = node.board.play(node.to_move, mv);
            let score = self.minimax(node.child(child)).score;

            // Strict comparison keeps the first of equal children
            let improves = match best {
                None => true,
                Some((best_score, _, _)) if maximizing => score > best_score,
                Some((best_score, _, _)) => score < best_score,
            };
            if improves {
                best = Some((score, mv, child));
            }
        }

        match best {
            Some((score, mv, child)) => Evaluated {
                score,
                chosen: Some((mv, child)),
            },
            None => self.evaluate(&node),
        }
    }

    /// Returns `None` for a node entered with an empty window; the caller skips it
    fn alpha_beta(&mut self, node: SearchNode, mut alpha: f32, mut beta: f32) -> Option<Evaluated> {
        self.stats.nodes += 1;

        if Self::is_leaf(&node) {
            return Some(self.evaluate(&node));
        }
        if alpha > beta {
            return None;
        }
        let moves = match self.expand(&node) {
            Expansion::Leaf(leaf) => return Some(leaf),
            Expansion::Children(moves) => moves,
        };

        let maximizing = node.to_move == self.roles.max;
        let mut best_score = if maximizing {
            f32::NEG_INFINITY
        } else {
            f32::INFINITY
        };
        let mut chosen = None;

        for mv in moves {
            let child = node.board.play(node.to_move, mv);
            let Some(result) = self.alpha_beta(node.child(child), alpha, beta) else {
                continue;
            };
            let score = result.score;

            if maximizing {
                if score > best_score {
                    best_score = score;
                    chosen = Some((mv, child));
                }
                if score > alpha {
                    alpha = score;
                    if alpha >= beta {
                        self.stats.cutoffs += 1;
                        break;
                    }
                }
            } else {
                if score < best_score {
                    best_score = score;
                    chosen = Some((mv, child));
                }
                if score < beta {
                    beta = score;
                    if alpha >= beta {
                        self.stats.cutoffs += 1;
                        break;
                    }
                }
            }
        }

        Some(Evaluated {
            score: best_score,
            chosen,
        })
    }
}

// ============================================================================
// SEARCH AI
// ============================================================================

/// Computer player driven by minimax or alpha-beta
#[derive(Clone, Debug, Default)]
pub struct SearchAI {
    pub config: SearchConfig,
}

impl SearchAI {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    /// Search with the computer to move
    pub fn search(&self, board: &Board) -> SearchResult {
        self.search_from(board, self.config.computer)
    }

    /// Search with either side to move; scores stay in the computer's frame
    pub fn search_from(&self, board: &Board, to_move: Side) -> SearchResult {
        let root = SearchNode {
            board: *board,
            to_move,
            depth: self.config.depth,
        };
        let mut search = Search::new(self.config.roles(), self.config.difficulty);

        let evaluated = match self.config.algorithm {
            Algorithm::Minimax => search.minimax(root),
            Algorithm::AlphaBeta => search
                .alpha_beta(root, -ALPHA_BETA_WINDOW, ALPHA_BETA_WINDOW)
                .unwrap_or_else(|| search.evaluate(&root)),
        };

        tracing::debug!(
            "{} depth {}: score={:.3} nodes={} leaves={} cutoffs={}",
            self.config.algorithm,
            self.config.depth,
            evaluated.score,
            search.stats.nodes,
            search.stats.leaves,
            search.stats.cutoffs
        );

        SearchResult {
            score: evaluated.score,
            best_move: evaluated.chosen.map(|(mv, _)| mv),
            board: evaluated.chosen.map(|(_, child)| child),
            stats: search.stats,
        }
    }

    /// Best move for the computer, `None` if it has no move or the game is over
    pub fn best_move(&self, board: &Board) -> Option<Move> {
        self.search(board).best_move
    }

    /// Static evaluation at the configured difficulty
    pub fn evaluate(&self, board: &Board) -> f32 {
        score_estimation(board, self.config.roles(), 0, self.config.difficulty)
    }

    /// Minimax with the root children searched on the rayon pool.
    /// Same score and move as the sequential search.
    #[cfg(feature = "parallel")]
    pub fn search_parallel(&self, board: &Board, to_move: Side) -> SearchResult {
        use rayon::prelude::*;

        let root = SearchNode {
            board: *board,
            to_move,
            depth: self.config.depth,
        };
        let roles = self.config.roles();
        let difficulty = self.config.difficulty;

        let moves = board.legal_moves(to_move);
        if Search::is_leaf(&root) || moves.is_empty() {
            let mut search = Search::new(roles, difficulty);
            search.stats.nodes += 1;
            let leaf = search.evaluate(&root);
            return SearchResult {
                score: leaf.score,
                best_move: None,
                board: None,
                stats: search.stats,
            };
        }

        let children: Vec<(Move, Board, f32, SearchStats)> = moves
            .par_iter()
            .map(|&mv| {
                let child = board.play(to_move, mv);
                let mut search = Search::new(roles, difficulty);
                let score = search.minimax(root.child(child)).score;
                (mv, child, score, search.stats)
            })
            .collect();

        let maximizing = to_move == roles.max;
        let mut stats = SearchStats {
            nodes: 1,
            ..Default::default()
        };
        let mut best: Option<(f32, Move, Board)> = None;

        for (mv, child, score, child_stats) in children {
            stats.merge(child_stats);
            let improves = match best {
                None => true,
                Some((best_score, _, _)) if maximizing => score > best_score,
                Some((best_score, _, _)) => score < best_score,
            };
            if improves {
                best = Some((score, mv, child));
            }
        }

        SearchResult {
            score: best.map_or(f32::NAN, |(score, _, _)| score),
            best_move: best.map(|(_, mv, _)| mv),
            board: best.map(|(_, _, child)| child),
            stats,
        }
    }
}

// ============================================================================
// SELF-PLAY
// ============================================================================

/// Play a game between two computer players, the hounds moving as `hound_ai`
/// and the hare as `hare_ai`. A side without moves passes. Stops at a decided
/// position or after `max_plies`, passes included.
pub fn play_game(
    hound_ai: &SearchAI,
    hare_ai: &SearchAI,
    initial: Board,
    first_to_move: Side,
    max_plies: usize,
) -> (Board, Vec<Move>) {
    let mut board = initial;
    let mut to_move = first_to_move;
    let mut history = Vec::new();
    let mut plies = 0;

    while board.result() == GameResult::Ongoing && plies < max_plies {
        let ai = match to_move {
            Side::Hound => hound_ai,
            Side::Hare => hare_ai,
        };
        let result = ai.search_from(&board, to_move);
        if let (Some(mv), Some(next)) = (result.best_move, result.board) {
            history.push(mv);
            board = next;
        }
        plies += 1;
        to_move = to_move.opponent();
    }

    (board, history)
}

// ============================================================================
// TESTS
// ============================================================================
