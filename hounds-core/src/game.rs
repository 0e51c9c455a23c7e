//! Game state and move generation

use crate::board::{
    Cell, COLUMNS, DIRECTIONS, HARE_FORBIDDEN_EDGES, HOUND_FORBIDDEN_EDGES, ROWS,
};
use crate::error::GameError;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Consecutive same-column hound moves that hand the game to the hare
pub const MAX_VERTICAL_STREAK: u8 = 10;

/// Number of hounds on the board
pub const HOUND_COUNT: usize = 3;

// ============================================================================
// CORE TYPES
// ============================================================================

/// The two sides of the game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Hound,
    Hare,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Hound => Side::Hare,
            Side::Hare => Side::Hound,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Hound => write!(f, "hound"),
            Side::Hare => write!(f, "hare"),
        }
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hound" | "hounds" => Ok(Side::Hound),
            "hare" => Ok(Side::Hare),
            other => Err(format!("unknown side '{}', expected 'hare' or 'hound'", other)),
        }
    }
}

/// What sits on a grid cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Occupant {
    Void,
    Empty,
    Hound,
    Hare,
}

impl Occupant {
    fn symbol(self) -> char {
        match self {
            Occupant::Void => '#',
            Occupant::Empty => '.',
            Occupant::Hound => 'D',
            Occupant::Hare => 'H',
        }
    }
}

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    Ongoing,
    HareWins,
    HoundsWin,
}

impl GameResult {
    /// Winning side, if any
    pub fn winner(self) -> Option<Side> {
        match self {
            GameResult::Ongoing => None,
            GameResult::HareWins => Some(Side::Hare),
            GameResult::HoundsWin => Some(Side::Hound),
        }
    }
}

/// A single step of one piece. For the hounds, `from` names the hound that moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Cell,
    pub to: Cell,
}

impl Move {
    pub const fn new(from: Cell, to: Cell) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.from.label(), self.to.label()) {
            (Some(a), Some(b)) => write!(f, "{} -> {}", a, b),
            _ => write!(f, "{} -> {}", self.from, self.to),
        }
    }
}

// ============================================================================
// BOARD
// ============================================================================

/// One position. A small `Copy` value: every move builds a new board.
///
/// Hounds are kept in row-major order so that equal positions compare equal
/// and move generation visits them in reading order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    hare: Cell,
    hounds: [Cell; HOUND_COUNT],
    hound_vertical_streak: u8,
}

impl Default for Board {
    fn default() -> Self {
        Self::new_game()
    }
}

impl Board {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Starting layout: hounds on the left edge, hare on the far right
    pub fn new_game() -> Self {
        Self {
            hare: Cell::new(1, 4),
            hounds: [Cell::new(0, 1), Cell::new(1, 0), Cell::new(2, 1)],
            hound_vertical_streak: 0,
        }
    }

    /// Build a board from piece positions, checking the occupancy invariant
    pub fn from_positions(
        hare: Cell,
        hounds: [Cell; HOUND_COUNT],
        hound_vertical_streak: u8,
    ) -> Result<Self, GameError> {
        for cell in hounds.iter().chain(std::iter::once(&hare)) {
            if !cell.is_valid() {
                return Err(GameError::InvalidPosition(format!(
                    "{} is not a playable cell",
                    cell
                )));
            }
        }

        let mut sorted = hounds;
        sorted.sort();
        let overlapping = sorted.windows(2).any(|w| w[0] == w[1]) || sorted.contains(&hare);
        if overlapping {
            return Err(GameError::InvalidPosition(
                "two pieces share a cell".to_string(),
            ));
        }

        Ok(Self {
            hare,
            hounds: sorted,
            hound_vertical_streak,
        })
    }

    /// Same position with a different vertical-move streak
    pub fn with_streak(mut self, hound_vertical_streak: u8) -> Self {
        self.hound_vertical_streak = hound_vertical_streak;
        self
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn hare(&self) -> Cell {
        self.hare
    }

    /// Hound positions in row-major order
    pub fn hounds(&self) -> [Cell; HOUND_COUNT] {
        self.hounds
    }

    pub fn hound_vertical_streak(&self) -> u8 {
        self.hound_vertical_streak
    }

    /// Occupant of any grid coordinate (off-grid reads as void)
    pub fn occupant(&self, cell: Cell) -> Occupant {
        if !cell.is_valid() {
            Occupant::Void
        } else if cell == self.hare {
            Occupant::Hare
        } else if self.hounds.contains(&cell) {
            Occupant::Hound
        } else {
            Occupant::Empty
        }
    }

    /// Which hound (0-2, reading order) stands on `cell`
    pub fn hound_index(&self, cell: Cell) -> Option<usize> {
        self.hounds.iter().position(|&h| h == cell)
    }

    fn pieces_of(&self, side: Side) -> &[Cell] {
        match side {
            Side::Hound => &self.hounds,
            Side::Hare => std::slice::from_ref(&self.hare),
        }
    }

    // ========================================================================
    // LEGALITY
    // ========================================================================

    /// Adjacency, occupancy and direction rules for a single step.
    /// Does not check that `from` holds a piece of `side`.
    pub fn is_legal_move(&self, side: Side, from: Cell, to: Cell) -> bool {
        let dr = to.row - from.row;
        let dc = to.col - from.col;

        if dr.abs() > 1 || dc.abs() > 1 {
            return false;
        }
        if !to.is_valid() || self.occupant(to) != Occupant::Empty {
            return false;
        }

        match side {
            Side::Hound => dc >= 0 && !HOUND_FORBIDDEN_EDGES.contains(&(from, to)),
            Side::Hare => !HARE_FORBIDDEN_EDGES.contains(&(from, to)),
        }
    }

    // ========================================================================
    // MOVE GENERATION
    // ========================================================================

    /// All legal moves for `side`, pieces in reading order, directions in table order
    pub fn legal_moves(&self, side: Side) -> Vec<Move> {
        let mut moves = Vec::new();

        for &from in self.pieces_of(side) {
            for &dir in &DIRECTIONS {
                let to = from.offset(dir);
                if self.is_legal_move(side, from, to) {
                    moves.push(Move::new(from, to));
                }
            }
        }

        moves
    }

    /// Successor boards, one per legal move, in `legal_moves` order
    pub fn successors(&self, side: Side) -> Vec<Board> {
        self.legal_moves(side)
            .into_iter()
            .map(|mv| self.play(side, mv))
            .collect()
    }

    /// Number of destinations open to the hare
    pub fn hare_mobility(&self) -> usize {
        DIRECTIONS
            .iter()
            .filter(|&&dir| self.is_legal_move(Side::Hare, self.hare, self.hare.offset(dir)))
            .count()
    }

    /// Pick a legal move uniformly at random
    pub fn random_move<R: Rng>(&self, side: Side, rng: &mut R) -> Option<Move> {
        self.legal_moves(side).choose(rng).copied()
    }

    // ========================================================================
    // APPLY MOVE
    // ========================================================================

    /// Validate and apply a move, return new board
    pub fn apply_move(&self, side: Side, mv: Move) -> Result<Board, GameError> {
        if !self.pieces_of(side).contains(&mv.from) {
            return Err(GameError::NotYourPiece {
                side,
                cell: mv.from,
            });
        }
        if !self.is_legal_move(side, mv.from, mv.to) {
            return Err(GameError::IllegalMove {
                side,
                from: mv.from,
                to: mv.to,
            });
        }
        Ok(self.play(side, mv))
    }

    /// Apply a move already known to be legal
    pub(crate) fn play(&self, side: Side, mv: Move) -> Board {
        let mut next = *self;

        match side {
            Side::Hare => next.hare = mv.to,
            Side::Hound => {
                if let Some(slot) = next.hounds.iter_mut().find(|h| **h == mv.from) {
                    *slot = mv.to;
                }
                next.hounds.sort();
                next.hound_vertical_streak = if mv.from.col == mv.to.col {
                    self.hound_vertical_streak.saturating_add(1)
                } else {
                    0
                };
            }
        }

        next
    }

    // ========================================================================
    // TERMINAL DETECTION
    // ========================================================================

    /// Terminal check, rules evaluated in order
    pub fn result(&self) -> GameResult {
        if self.hound_vertical_streak >= MAX_VERTICAL_STREAK {
            return GameResult::HareWins;
        }

        // Hare slipped past every hound; they can never come back
        if self.hounds.iter().all(|h| h.col > self.hare.col) {
            return GameResult::HareWins;
        }

        if self.hare_mobility() == 0 {
            return GameResult::HoundsWin;
        }

        GameResult::Ongoing
    }

    /// Winning side, if the position is terminal
    pub fn winner(&self) -> Option<Side> {
        self.result().winner()
    }

    pub fn is_terminal(&self) -> bool {
        self.result() != GameResult::Ongoing
    }
}

// ============================================================================
// TEXT FORMAT
// ============================================================================

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..ROWS {
            for col in 0..COLUMNS {
                write!(f, "{}", self.occupant(Cell::new(row, col)).symbol())?;
            }
            if row + 1 < ROWS {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Three rows of five characters: `D` hound, `H` hare, `.` empty, `#` void.
/// Rows may be separated by newlines or `/`.
impl FromStr for Board {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<&str> = s
            .split(|c: char| c == '\n' || c == '/')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        if rows.len() != ROWS as usize {
            return Err(GameError::InvalidPosition(format!(
                "expected {} rows, found {}",
                ROWS,
                rows.len()
            )));
        }

        let mut hare = None;
        let mut hounds = Vec::with_capacity(HOUND_COUNT);

        for (row, line) in rows.iter().enumerate() {
            let chars: Vec<char> = line.chars().collect();
            if chars.len() != COLUMNS as usize {
                return Err(GameError::InvalidPosition(format!(
                    "row {} has {} cells, expected {}",
                    row,
                    chars.len(),
                    COLUMNS
                )));
            }

            for (col, &ch) in chars.iter().enumerate() {
                let cell = Cell::new(row as i8, col as i8);
                match (ch, cell.is_void()) {
                    ('#', true) | ('.', false) => {}
                    ('D', false) => hounds.push(cell),
                    ('H', false) => {
                        if hare.replace(cell).is_some() {
                            return Err(GameError::InvalidPosition(
                                "more than one hare".to_string(),
                            ));
                        }
                    }
                    _ => {
                        return Err(GameError::InvalidPosition(format!(
                            "unexpected '{}' at {}",
                            ch, cell
                        )))
                    }
                }
            }
        }

        let hare = hare.ok_or_else(|| GameError::InvalidPosition("no hare".to_string()))?;
        let hounds: [Cell; HOUND_COUNT] = hounds.try_into().map_err(|found: Vec<Cell>| {
            GameError::InvalidPosition(format!(
                "expected {} hounds, found {}",
                HOUND_COUNT,
                found.len()
            ))
        })?;

        Board::from_positions(hare, hounds, 0)
    }
}

// ============================================================================
// TESTS
// ============================================================================
