//! Human-vs-computer session
//!
//! The functions at the top are the whole contract a front end needs:
//! start a game, validate a human move, ask the computer for its move and
//! check for a winner. [`Session`] wraps them with turn tracking for the
//! console loop.

use crate::ai::{Algorithm, SearchAI, SearchConfig, SearchResult};
use crate::board::Cell;
use crate::config::GameConfig;
use crate::error::{parse_label, GameError};
use crate::eval::{side_score, Difficulty, HeuristicTier};
use crate::game::{Board, GameResult, Move, Side};

// ============================================================================
// BOUNDARY FUNCTIONS
// ============================================================================

/// Fixed starting position
pub fn new_game() -> Board {
    Board::new_game()
}

/// Validate and apply a move typed by the human
pub fn apply_human_move(
    board: &Board,
    side: Side,
    from: Cell,
    to: Cell,
) -> Result<Board, GameError> {
    board.apply_move(side, Move::new(from, to))
}

/// Board chosen by the computer, `None` if `side` has no legal move or the
/// game is already decided
pub fn compute_computer_move(
    board: &Board,
    side: Side,
    algorithm: Algorithm,
    depth: u32,
    difficulty: Difficulty,
) -> Option<Board> {
    let config = SearchConfig {
        algorithm,
        depth,
        difficulty,
        computer: side,
    };
    SearchAI::new(config).search(board).board
}

/// Winner of the position, if any
pub fn check_terminal(board: &Board) -> Option<Side> {
    board.winner()
}

// ============================================================================
// SESSION
// ============================================================================

/// A game in progress between a human and the search engine
#[derive(Clone, Debug)]
pub struct Session {
    board: Board,
    to_move: Side,
    human: Side,
    ai: SearchAI,
    history: Vec<(Side, Move)>,
    human_moves: u32,
    computer_moves: u32,
}

impl Session {
    pub fn new(board: Board, first_to_move: Side, human: Side, search: SearchConfig) -> Self {
        Self {
            board,
            to_move: first_to_move,
            human,
            ai: SearchAI::new(search.playing(human.opponent())),
            history: Vec::new(),
            human_moves: 0,
            computer_moves: 0,
        }
    }

    pub fn from_config(config: &GameConfig) -> Result<Self, GameError> {
        Ok(Self::new(
            config.initial_board()?,
            config.first_to_move,
            config.human_side,
            config.search_config()?,
        ))
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Side {
        self.to_move
    }

    pub fn human_side(&self) -> Side {
        self.human
    }

    pub fn computer_side(&self) -> Side {
        self.human.opponent()
    }

    pub fn search_config(&self) -> &SearchConfig {
        &self.ai.config
    }

    pub fn history(&self) -> &[(Side, Move)] {
        &self.history
    }

    pub fn human_moves(&self) -> u32 {
        self.human_moves
    }

    pub fn computer_moves(&self) -> u32 {
        self.computer_moves
    }

    pub fn result(&self) -> GameResult {
        self.board.result()
    }

    pub fn is_over(&self) -> bool {
        self.board.is_terminal()
    }

    pub fn is_human_turn(&self) -> bool {
        self.to_move == self.human
    }

    /// Side to move has nothing to play in an undecided position
    pub fn must_pass(&self) -> bool {
        !self.is_over() && self.board.legal_moves(self.to_move).is_empty()
    }

    // ========================================================================
    // TURNS
    // ========================================================================

    fn check_turn(&self, side: Side) -> Result<(), GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        if self.to_move != side {
            return Err(GameError::NotYourTurn(side));
        }
        Ok(())
    }

    fn record(&mut self, side: Side, mv: Move, next: Board) {
        self.board = next;
        self.history.push((side, mv));
        self.to_move = side.opponent();
    }

    /// Apply a human move; the board is untouched on error
    pub fn apply_human_move(&mut self, mv: Move) -> Result<Board, GameError> {
        self.check_turn(self.human)?;
        let next = self.board.apply_move(self.human, mv)?;
        self.record(self.human, mv, next);
        self.human_moves += 1;
        Ok(next)
    }

    /// Apply a human move given as cell labels. The hare only needs a
    /// destination; a hound move also needs the label of the hound.
    pub fn apply_human_labels(&mut self, from: Option<&str>, to: &str) -> Result<Board, GameError> {
        let to = parse_label(to)?;
        let from = match (self.human, from) {
            (_, Some(label)) => parse_label(label)?,
            (Side::Hare, None) => self.board.hare(),
            (Side::Hound, None) => {
                return Err(GameError::NotYourPiece {
                    side: Side::Hound,
                    cell: to,
                })
            }
        };
        self.apply_human_move(Move::new(from, to))
    }

    /// Let the search engine move. A computer with no legal move passes.
    pub fn play_computer_move(&mut self) -> Result<SearchResult, GameError> {
        let computer = self.computer_side();
        self.check_turn(computer)?;

        let result = self.ai.search(&self.board);
        match (result.best_move, result.board) {
            (Some(mv), Some(next)) => {
                self.record(computer, mv, next);
                self.computer_moves += 1;
            }
            _ => self.to_move = computer.opponent(),
        }
        Ok(result)
    }

    /// Skip the turn of a side that cannot move
    pub fn pass_turn(&mut self) -> Result<(), GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        if !self.must_pass() {
            return Err(GameError::MustMove(self.to_move));
        }
        self.to_move = self.to_move.opponent();
        Ok(())
    }

    /// Grid-distance scores of (human, computer) for the final report
    pub fn final_scores(&self) -> (f32, f32) {
        (
            side_score(&self.board, self.human, HeuristicTier::Manhattan),
            side_score(&self.board, self.computer_side(), HeuristicTier::Manhattan),
        )
    }
}
