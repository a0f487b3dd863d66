use serde::{Deserialize, Serialize};

/// A player's mark on the board.
///
/// `Empty` is the initial state of every cell and doubles as the
/// "no winner yet" result of [`Board::find_winner`](super::Board::find_winner).
/// It is never a playable side.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    derive_more::Display,
    derive_more::FromStr,
    Serialize,
    Deserialize,
)]
pub enum Mark {
    /// No mark placed.
    #[default]
    #[display(".")]
    Empty,
    /// The side that moves first.
    O,
    X,
}

impl Mark {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Mark::Empty
    }

    /// Returns the opposing side. `Empty` has no opponent and maps to itself.
    #[must_use]
    pub fn opponent(self) -> Self {
        match self {
            Mark::Empty => Mark::Empty,
            Mark::O => Mark::X,
            Mark::X => Mark::O,
        }
    }
}

/// A single square of the grid.
///
/// Write-once: after a non-empty mark lands, every later write is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    held_by: Mark,
}

impl Cell {
    #[must_use]
    pub fn state(self) -> Mark {
        self.held_by
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.held_by.is_empty()
    }

    /// Fills the cell, returning whether the write took effect.
    ///
    /// A write on an occupied cell leaves it untouched and returns `false`.
    /// Writing `Empty` is a sentinel no-op, never an erase.
    pub fn fill(&mut self, mark: Mark) -> bool {
        if mark.is_empty() || !self.is_empty() {
            return false;
        }
        self.held_by = mark;
        true
    }
}
