//! Error types returned by the game core

use crate::board::Cell;
use crate::game::Side;

/// Recoverable errors: the caller re-prompts or reports, the core never retries
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("{side} cannot move from {from} to {to}")]
    IllegalMove { side: Side, from: Cell, to: Cell },

    #[error("there is no {side} at {cell}")]
    NotYourPiece { side: Side, cell: Cell },

    #[error("'{0}' is not a cell label, choose between 0 and 10")]
    OutOfRangeInput(String),

    #[error("difficulty {0} is out of range (expected 1-10)")]
    InvalidDifficulty(u8),

    #[error("search depth must be at least 1, got {0}")]
    InvalidDepth(u32),

    #[error("invalid position: {0}")]
    InvalidPosition(String),

    #[error("the game is already over")]
    GameOver,

    #[error("it is not the {0}'s turn")]
    NotYourTurn(Side),

    #[error("the {0} still has legal moves and cannot pass")]
    MustMove(Side),
}

/// Parse a cell label typed by the player
pub fn parse_label(input: &str) -> Result<Cell, GameError> {
    let trimmed = input.trim();
    trimmed
        .parse::<u8>()
        .ok()
        .and_then(Cell::from_label)
        .ok_or_else(|| GameError::OutOfRangeInput(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_label() {
        assert_eq!(parse_label("0"), Ok(Cell::new(1, 0)));
        assert_eq!(parse_label(" 10\n"), Ok(Cell::new(1, 4)));
    }

    #[test]
    fn test_parse_label_rejects_bad_input() {
        assert_eq!(parse_label("11"), Err(GameError::OutOfRangeInput("11".into())));
        assert_eq!(parse_label("-1"), Err(GameError::OutOfRangeInput("-1".into())));
        assert_eq!(parse_label("hare"), Err(GameError::OutOfRangeInput("hare".into())));
        assert!(parse_label("").is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = GameError::IllegalMove {
            side: Side::Hound,
            from: Cell::new(1, 1),
            to: Cell::new(1, 0),
        };
        assert_eq!(err.to_string(), "hound cannot move from (1, 1) to (1, 0)");
    }
}
