//! GameConfig - settings for a human-vs-computer session

use crate::ai::{Algorithm, SearchConfig};
use crate::error::GameError;
use crate::eval::Difficulty;
use crate::game::{Board, Side};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Session settings. Every field has a default, so a JSON file may set any subset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side played by the human; the computer takes the other one
    pub human_side: Side,
    pub algorithm: Algorithm,
    /// Search depth in plies
    pub depth: u32,
    /// 1-6 plays the straight-line evaluation, 7-10 the grid one
    pub difficulty: u8,
    /// Optional start position in the text board format
    pub start: Option<String>,
    pub first_to_move: Side,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            human_side: Side::Hare,
            algorithm: Algorithm::AlphaBeta,
            depth: 4,
            difficulty: 7,
            start: None,
            first_to_move: Side::Hound,
        }
    }
}

impl GameConfig {
    /// Load from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: GameConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field that has a restricted range
    pub fn validate(&self) -> Result<(), GameError> {
        self.search_config()?;
        self.initial_board()?;
        Ok(())
    }

    pub fn computer_side(&self) -> Side {
        self.human_side.opponent()
    }

    pub fn difficulty(&self) -> Result<Difficulty, GameError> {
        Difficulty::new(self.difficulty)
    }

    /// Search settings for the computer player
    pub fn search_config(&self) -> Result<SearchConfig, GameError> {
        if self.depth == 0 {
            return Err(GameError::InvalidDepth(self.depth));
        }
        Ok(SearchConfig {
            algorithm: self.algorithm,
            depth: self.depth,
            difficulty: self.difficulty()?,
            computer: self.computer_side(),
        })
    }

    pub fn initial_board(&self) -> Result<Board, GameError> {
        match &self.start {
            Some(text) => text.parse(),
            None => Ok(Board::new_game()),
        }
    }
}
