//! User-tunable game settings, validated before they reach the controller.

use std::{fs, io, path::Path};

use oxo_engine::Mark;
use serde::{Deserialize, Serialize};

pub const MIN_BOARD_SIZE: usize = 3;
pub const MAX_BOARD_SIZE: usize = 11;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum PreferencesError {
    #[display(
        "board size {size} is out of range: only odd sizes from {}x{} to {}x{} are supported",
        MIN_BOARD_SIZE,
        MIN_BOARD_SIZE,
        MAX_BOARD_SIZE,
        MAX_BOARD_SIZE
    )]
    BoardSizeOutOfRange { size: usize },
    #[display("board size {size} must be odd")]
    EvenBoardSize { size: usize },
    #[display("the human side must be O or X, not empty")]
    EmptyHumanSide,
}

/// Failure to read preferences from a JSON config file.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum PreferencesLoadError {
    #[display("cannot read preferences file: {_0}")]
    Io(io::Error),
    #[display("preferences file is not valid JSON: {_0}")]
    Parse(serde_json::Error),
    #[display("{_0}")]
    Invalid(PreferencesError),
}

/// Settings the front end passes in when starting a game: how big the
/// board is, and which side the human plays in single-player mode.
///
/// Validation is fail-fast: a `GamePreferences` value always holds an odd
/// board size within the supported range and a playable human side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GamePreferences {
    board_size: usize,
    human_side: Mark,
}

impl Default for GamePreferences {
    /// 3x3 board, human plays O.
    fn default() -> Self {
        Self {
            board_size: MIN_BOARD_SIZE,
            human_side: Mark::O,
        }
    }
}

impl GamePreferences {
    pub fn new(board_size: usize, human_side: Mark) -> Result<Self, PreferencesError> {
        let mut preferences = Self::default();
        preferences.set_board_size(board_size)?;
        preferences.set_human_side(human_side)?;
        Ok(preferences)
    }

    #[must_use]
    pub fn board_size(&self) -> usize {
        self.board_size
    }

    #[must_use]
    pub fn human_side(&self) -> Mark {
        self.human_side
    }

    pub fn set_board_size(&mut self, size: usize) -> Result<(), PreferencesError> {
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
            return Err(PreferencesError::BoardSizeOutOfRange { size });
        }
        if size % 2 == 0 {
            return Err(PreferencesError::EvenBoardSize { size });
        }
        self.board_size = size;
        Ok(())
    }

    pub fn set_human_side(&mut self, side: Mark) -> Result<(), PreferencesError> {
        if side.is_empty() {
            return Err(PreferencesError::EmptyHumanSide);
        }
        self.human_side = side;
        Ok(())
    }

    /// Parses preferences from a JSON document such as
    /// `{"board_size": 5, "human_side": "X"}`. Missing fields fall back to
    /// the defaults; values are validated as usual.
    pub fn from_json(json: &str) -> Result<Self, PreferencesLoadError> {
        let raw: RawPreferences = serde_json::from_str(json)?;
        Ok(Self::new(raw.board_size, raw.human_side)?)
    }

    /// Loads preferences from a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PreferencesLoadError> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPreferences {
    #[serde(default = "default_board_size")]
    board_size: usize,
    #[serde(default = "default_human_side")]
    human_side: Mark,
}

fn default_board_size() -> usize {
    MIN_BOARD_SIZE
}

fn default_human_side() -> Mark {
    Mark::O
}
