//! Position evaluation

use crate::board::Cell;
use crate::error::GameError;
use crate::game::{Board, Side};
use serde::{Deserialize, Serialize};

/// Base score of a decided position; remaining depth is added on top
pub const WIN_VALUE: f32 = 999.0;

/// Hare bonus for each hound it has already passed
const PASSED_HOUND_BONUS: f32 = 5.0;

/// Highest difficulty that still uses the straight-line evaluation
const EUCLIDEAN_MAX_DIFFICULTY: u8 = 6;

// ============================================================================
// DIFFICULTY
// ============================================================================

/// Which distance drives the evaluation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeuristicTier {
    /// Straight-line distance, difficulty 1-6
    Euclidean,
    /// Grid distance plus a hound-spread penalty, difficulty 7-10
    Manhattan,
}

/// Difficulty level in 1..=10
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(level: u8) -> Result<Self, GameError> {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Ok(Self(level))
        } else {
            Err(GameError::InvalidDifficulty(level))
        }
    }

    pub fn level(self) -> u8 {
        self.0
    }

    pub fn tier(self) -> HeuristicTier {
        if self.0 <= EUCLIDEAN_MAX_DIFFICULTY {
            HeuristicTier::Euclidean
        } else {
            HeuristicTier::Manhattan
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self(Self::MAX)
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = GameError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

impl From<Difficulty> for u8 {
    fn from(d: Difficulty) -> u8 {
        d.0
    }
}

// ============================================================================
// ROLES
// ============================================================================

/// Search polarity: the computer maximises, the human minimises
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roles {
    pub max: Side,
    pub min: Side,
}

impl Roles {
    /// Roles for a computer playing `side`
    pub fn computer_plays(side: Side) -> Self {
        Self {
            max: side,
            min: side.opponent(),
        }
    }

    /// Same board seen from the other chair
    pub fn swapped(self) -> Self {
        Self {
            max: self.min,
            min: self.max,
        }
    }
}

// ============================================================================
// HEURISTICS
// ============================================================================

/// Hare's view: reward distance from hounds still ahead, flat bonus for hounds passed
fn hare_score(board: &Board, distance: impl Fn(Cell, Cell) -> f32) -> f32 {
    let hare = board.hare();

    board
        .hounds()
        .iter()
        .map(|&hound| {
            let d = distance(hound, hare);
            if hare.col > hound.col {
                d - 1.0
            } else if hare.col == hound.col {
                d
            } else {
                PASSED_HOUND_BONUS
            }
        })
        .sum()
}

fn mean_distance_to_hare(board: &Board, distance: impl Fn(Cell, Cell) -> f32) -> f32 {
    let hare = board.hare();
    let hounds = board.hounds();
    hounds.iter().map(|&h| distance(h, hare)).sum::<f32>() / hounds.len() as f32
}

/// Sum of distances over every pair of hounds
fn hound_spread(board: &Board) -> f32 {
    let [a, b, c] = board.hounds();
    (a.manhattan_distance(b) + a.manhattan_distance(c) + b.manhattan_distance(c)) as f32
}

fn euclidean(a: Cell, b: Cell) -> f32 {
    a.euclidean_distance(b)
}

fn manhattan(a: Cell, b: Cell) -> f32 {
    a.manhattan_distance(b) as f32
}

/// Raw heuristic of one side at the given tier
pub fn side_score(board: &Board, side: Side, tier: HeuristicTier) -> f32 {
    match (tier, side) {
        (HeuristicTier::Euclidean, Side::Hare) => hare_score(board, euclidean),
        (HeuristicTier::Euclidean, Side::Hound) => mean_distance_to_hare(board, euclidean),
        (HeuristicTier::Manhattan, Side::Hare) => hare_score(board, manhattan),
        // Penalise loose hounds: bunched hounds close the lanes
        (HeuristicTier::Manhattan, Side::Hound) => {
            mean_distance_to_hare(board, manhattan) - hound_spread(board)
        }
    }
}

/// Max's heuristic minus Min's heuristic
pub fn heuristic(board: &Board, roles: Roles, tier: HeuristicTier) -> f32 {
    side_score(board, roles.max, tier) - side_score(board, roles.min, tier)
}

/// Evaluate a position for the search.
///
/// Decided positions score `WIN_VALUE + depth` for Max and the mirror for Min,
/// so faster wins and slower losses are preferred.
pub fn score_estimation(board: &Board, roles: Roles, depth: u32, difficulty: Difficulty) -> f32 {
    match board.winner() {
        Some(side) if side == roles.max => WIN_VALUE + depth as f32,
        Some(_) => -WIN_VALUE - depth as f32,
        None => heuristic(board, roles, difficulty.tier()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(text: &str) -> Board {
        text.parse().unwrap()
    }

    fn difficulty(level: u8) -> Difficulty {
        Difficulty::new(level).unwrap()
    }

    #[test]
    fn test_difficulty_range() {
        assert!(Difficulty::new(0).is_err());
        assert!(Difficulty::new(11).is_err());
        assert_eq!(difficulty(1).tier(), HeuristicTier::Euclidean);
        assert_eq!(difficulty(6).tier(), HeuristicTier::Euclidean);
        assert_eq!(difficulty(7).tier(), HeuristicTier::Manhattan);
        assert_eq!(difficulty(10).tier(), HeuristicTier::Manhattan);
    }

    #[test]
    fn test_euclidean_initial_scores() {
        let game = Board::new_game();
        let root10 = 10f32.sqrt();

        let hare = side_score(&game, Side::Hare, HeuristicTier::Euclidean);
        assert!((hare - (2.0 * (root10 - 1.0) + 3.0)).abs() < 1e-5);

        let hound = side_score(&game, Side::Hound, HeuristicTier::Euclidean);
        assert!((hound - (2.0 * root10 + 4.0) / 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_manhattan_initial_scores() {
        let game = Board::new_game();
        assert_eq!(side_score(&game, Side::Hare, HeuristicTier::Manhattan), 9.0);
        // mean distance 4, pairwise spread 2 + 2 + 2
        assert_eq!(side_score(&game, Side::Hound, HeuristicTier::Manhattan), -2.0);

        let roles = Roles::computer_plays(Side::Hare);
        assert_eq!(heuristic(&game, roles, HeuristicTier::Manhattan), 11.0);
    }

    #[test]
    fn test_passed_hound_bonus() {
        // hare at column 2: one hound behind, one level, one ahead
        let game = board("#D.D#\n..H..\n#.D.#");
        let hare = side_score(&game, Side::Hare, HeuristicTier::Manhattan);
        // (0,1): 2 - 1, (2,2): 1, (0,3): bonus 5
        assert_eq!(hare, 1.0 + 1.0 + 5.0);
    }

    #[test]
    fn test_terminal_scores() {
        let trapped = board("#..D#\n...DH\n#..D#");
        let hounds = Roles::computer_plays(Side::Hound);
        assert_eq!(score_estimation(&trapped, hounds, 3, difficulty(5)), WIN_VALUE + 3.0);
        assert_eq!(
            score_estimation(&trapped, hounds.swapped(), 3, difficulty(5)),
            -WIN_VALUE - 3.0
        );

        let stalled = Board::new_game().with_streak(10);
        assert_eq!(score_estimation(&stalled, hounds, 0, difficulty(9)), -WIN_VALUE);
    }

    #[test]
    fn test_scores_antisymmetric() {
        let boards = [
            Board::new_game(),
            board("#.D.#\nD.H..\n#..D#"),
            board("#D.D#\n..H..\n#.D.#"),
            board("#..D#\n...DH\n#..D#"),
        ];

        for game in boards {
            for level in [2, 6, 7, 10] {
                for depth in [0, 3] {
                    let as_hound = score_estimation(
                        &game,
                        Roles::computer_plays(Side::Hound),
                        depth,
                        difficulty(level),
                    );
                    let as_hare = score_estimation(
                        &game,
                        Roles::computer_plays(Side::Hare),
                        depth,
                        difficulty(level),
                    );
                    assert_eq!(as_hound, -as_hare);
                }
            }
        }
    }

    #[test]
    fn test_difficulty_serde() {
        let d: Difficulty = serde_json::from_str("7").unwrap();
        assert_eq!(d.level(), 7);
        assert!(serde_json::from_str::<Difficulty>("0").is_err());
        assert_eq!(serde_json::to_string(&d).unwrap(), "7");
    }
}
