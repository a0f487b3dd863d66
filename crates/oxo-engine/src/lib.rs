pub use self::core::*;

pub mod core;

/// Coordinates addressed a square outside the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("({row}, {column}) is out of bounds for a {side}x{side} board")]
pub struct OutOfBoundsError {
    pub row: usize,
    pub column: usize,
    pub side: usize,
}

/// A line cursor was asked to jump past the end of its series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("line index {index} is out of bounds for a series of {lines} lines")]
pub struct LineIndexError {
    pub index: usize,
    pub lines: usize,
}
