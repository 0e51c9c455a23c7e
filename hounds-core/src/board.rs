//! Board geometry: the 3x5 grid, its four void corners and the cell labels

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of grid rows
pub const ROWS: i8 = 3;

/// Number of grid columns
pub const COLUMNS: i8 = 5;

/// Number of playable cells
pub const CELL_COUNT: usize = 11;

/// Grid coordinates (row, column)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: i8,
    pub col: i8,
}

impl Cell {
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    /// Check if this cell lies inside the 3x5 grid
    pub fn in_bounds(&self) -> bool {
        (0..ROWS).contains(&self.row) && (0..COLUMNS).contains(&self.col)
    }

    /// Check if this cell is one of the four unreachable corners
    pub fn is_void(&self) -> bool {
        VOID_CORNERS.contains(self)
    }

    /// Check if this cell is a playable cell of the cross
    pub fn is_valid(&self) -> bool {
        self.in_bounds() && !self.is_void()
    }

    /// Cell reached by applying a (row, column) offset
    pub fn offset(&self, (dr, dc): (i8, i8)) -> Cell {
        Cell::new(self.row + dr, self.col + dc)
    }

    /// Straight-line distance
    pub fn euclidean_distance(&self, other: Cell) -> f32 {
        let dr = (self.row - other.row) as f32;
        let dc = (self.col - other.col) as f32;
        (dr * dr + dc * dc).sqrt()
    }

    /// Grid (city-block) distance
    pub fn manhattan_distance(&self, other: Cell) -> i8 {
        (self.row - other.row).abs() + (self.col - other.col).abs()
    }

    /// Label used for textual input (0-10), `None` for void or off-grid cells
    pub fn label(&self) -> Option<u8> {
        LABELED_CELLS
            .iter()
            .position(|c| c == self)
            .map(|i| i as u8)
    }

    /// Cell carrying the given label
    pub fn from_label(label: u8) -> Option<Cell> {
        LABELED_CELLS.get(label as usize).copied()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Direction vectors (drow, dcol)
/// Index: 0=N, 1=NE, 2=E, 3=SE, 4=S, 5=SW, 6=W, 7=NW
pub const DIRECTIONS: [(i8, i8); 8] = [
    (-1, 0),  // N
    (-1, 1),  // NE
    (0, 1),   // E
    (1, 1),   // SE
    (1, 0),   // S
    (1, -1),  // SW
    (0, -1),  // W
    (-1, -1), // NW
];

/// Corners of the grid that are not part of the board
pub const VOID_CORNERS: [Cell; 4] = [
    Cell::new(0, 0),
    Cell::new(2, 0),
    Cell::new(0, 4),
    Cell::new(2, 4),
];

/// Playable cells in label order (column by column, top to bottom)
pub const LABELED_CELLS: [Cell; CELL_COUNT] = [
    Cell::new(1, 0),
    Cell::new(0, 1),
    Cell::new(1, 1),
    Cell::new(2, 1),
    Cell::new(0, 2),
    Cell::new(1, 2),
    Cell::new(2, 2),
    Cell::new(0, 3),
    Cell::new(1, 3),
    Cell::new(2, 3),
    Cell::new(1, 4),
];

/// Diagonals that look adjacent on the grid but are not edges of the board.
/// Hounds never move backward, so only the forward direction is listed.
pub const HOUND_FORBIDDEN_EDGES: [(Cell, Cell); 4] = [
    (Cell::new(1, 1), Cell::new(0, 2)),
    (Cell::new(1, 1), Cell::new(2, 2)),
    (Cell::new(0, 2), Cell::new(1, 3)),
    (Cell::new(2, 2), Cell::new(1, 3)),
];

/// The hare moves both ways, so it also loses the reverse edges
pub const HARE_FORBIDDEN_EDGES: [(Cell, Cell); 8] = [
    (Cell::new(1, 1), Cell::new(0, 2)),
    (Cell::new(1, 1), Cell::new(2, 2)),
    (Cell::new(0, 2), Cell::new(1, 3)),
    (Cell::new(2, 2), Cell::new(1, 3)),
    (Cell::new(0, 2), Cell::new(1, 1)),
    (Cell::new(2, 2), Cell::new(1, 1)),
    (Cell::new(1, 3), Cell::new(0, 2)),
    (Cell::new(1, 3), Cell::new(2, 2)),
];

/// Label grid as shown to the player, void corners blank
pub fn label_grid() -> String {
    let mut out = String::new();
    for row in 0..ROWS {
        for col in 0..COLUMNS {
            match Cell::new(row, col).label() {
                Some(label) => out.push_str(&format!("{:>3}", label)),
                None => out.push_str("  ."),
            }
        }
        out.push('\n');
    }
    out
}
