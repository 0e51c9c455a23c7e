//! Breadth-first enumeration of every reachable position

use crate::game::{Board, GameResult, Side};
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::collections::VecDeque;

/// A position together with the side to move
pub type Position = (Board, Side);

/// Counts over a set of reachable positions
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ExploreSummary {
    pub positions: usize,
    pub hare_wins: usize,
    pub hound_wins: usize,
    /// Undecided positions where the side to move has no legal move
    pub stuck: usize,
    pub max_streak: u8,
    /// Positions breaking the occupancy invariant, expected to be zero
    pub invariant_violations: usize,
}

/// Pieces on playable cells, hounds sorted and distinct, hare on its own cell
pub fn occupancy_invariant_holds(board: &Board) -> bool {
    let hounds = board.hounds();
    hounds.iter().all(|h| h.is_valid())
        && board.hare().is_valid()
        && hounds.windows(2).all(|w| w[0] < w[1])
        && !hounds.contains(&board.hare())
}

/// Every position reachable from `start`. Decided positions are not expanded;
/// a side without moves passes the turn.
pub fn reachable_positions(start: Board, first_to_move: Side) -> FxHashSet<Position> {
    let mut seen = FxHashSet::default();
    let mut queue = VecDeque::new();

    seen.insert((start, first_to_move));
    queue.push_back((start, first_to_move));

    while let Some((board, to_move)) = queue.pop_front() {
        if board.is_terminal() {
            continue;
        }

        let successors = board.successors(to_move);
        let next: Vec<Position> = if successors.is_empty() {
            vec![(board, to_move.opponent())]
        } else {
            successors
                .into_iter()
                .map(|child| (child, to_move.opponent()))
                .collect()
        };

        for position in next {
            if seen.insert(position) {
                queue.push_back(position);
            }
        }
    }

    seen
}

/// Tally results and stuck positions
pub fn summarize(positions: &FxHashSet<Position>) -> ExploreSummary {
    let mut summary = ExploreSummary {
        positions: positions.len(),
        ..Default::default()
    };

    for (board, to_move) in positions {
        if !occupancy_invariant_holds(board) {
            summary.invariant_violations += 1;
        }
        match board.result() {
            GameResult::HareWins => summary.hare_wins += 1,
            GameResult::HoundsWin => summary.hound_wins += 1,
            GameResult::Ongoing => {
                if board.legal_moves(*to_move).is_empty() {
                    summary.stuck += 1;
                }
            }
        }
        summary.max_streak = summary.max_streak.max(board.hound_vertical_streak());
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::MAX_VERTICAL_STREAK;

    #[test]
    fn test_reachable_positions_keep_invariant() {
        let positions = reachable_positions(Board::new_game(), Side::Hound);
        assert!(positions.contains(&(Board::new_game(), Side::Hound)));

        for (board, _) in &positions {
            assert!(occupancy_invariant_holds(board), "broken position\n{}", board);
        }
    }

    #[test]
    fn test_summary_counts() {
        let positions = reachable_positions(Board::new_game(), Side::Hound);
        let summary = summarize(&positions);

        assert_eq!(summary.positions, positions.len());
        assert!(summary.hare_wins > 0);
        assert!(summary.hound_wins > 0);
        assert!(summary.max_streak <= MAX_VERTICAL_STREAK);
        assert_eq!(summary.invariant_violations, 0);
        assert!(summary.hare_wins + summary.hound_wins < summary.positions);
    }

    #[test]
    fn test_terminal_start_is_not_expanded() {
        let trapped: Board = "#..D#\n...DH\n#..D#".parse().unwrap();
        let positions = reachable_positions(trapped, Side::Hare);
        assert_eq!(positions.len(), 1);
    }
}
