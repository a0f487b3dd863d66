use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::OutOfBoundsError;

use super::{
    cell::{Cell, Mark},
    cursor::{AxisMotion, CellCursor, LineCursor},
    line_state::LineState,
};

/// One of the two full-length diagonals.
///
/// The series index of a diagonal (as reported by the diagonal
/// [`LineCursor`]) is 0 for `Ulbr` and 1 for `Urbl`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Diagonal {
    /// Upper-left to bottom-right.
    Ulbr,
    /// Upper-right to bottom-left.
    Urbl,
}

impl Diagonal {
    pub const COUNT: usize = 2;

    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Diagonal::Ulbr => 0,
            Diagonal::Urbl => 1,
        }
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Diagonal::Ulbr),
            1 => Some(Diagonal::Urbl),
            _ => None,
        }
    }

    #[must_use]
    pub fn line_kind(self) -> LineKind {
        match self {
            Diagonal::Ulbr => LineKind::DiagonalUlbr,
            Diagonal::Urbl => LineKind::DiagonalUrbl,
        }
    }
}

/// Identifies one family of capturable lines.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, Serialize, Deserialize,
)]
pub enum LineKind {
    #[display("row")]
    Row,
    #[display("column")]
    Column,
    #[display("main diagonal")]
    DiagonalUlbr,
    #[display("anti-diagonal")]
    DiagonalUrbl,
}

/// The line that produced the most recent win, cached by
/// [`Board::find_winner`] so reporting it needs no second scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinLine {
    pub kind: LineKind,
    pub index: usize,
}

/// The grid of squares both players move on, together with the per-line
/// tallies that make win detection cheap.
///
/// A board is created once per game with a fixed side length and mutated
/// in place until the game ends. Squares are write-once: a move on an
/// occupied square is rejected, never overwritten. The board is the sole
/// authority on occupancy and on win detection; players and analyzers only
/// ever borrow read-only cursors over it.
#[derive(Debug, Clone)]
pub struct Board {
    side: usize,
    dirty_count: usize,
    hotspot: (usize, usize),
    grid: Vec<Cell>,
    next_mark: Mark,
    row_states: Vec<LineState>,
    column_states: Vec<LineState>,
    diagonal_states: [LineState; Diagonal::COUNT],
    win_cache: Option<WinLine>,
}

impl Board {
    /// Creates an empty `side` x `side` board with O to move.
    ///
    /// Side-length validation (odd, within the supported range) is the
    /// caller's concern; the board itself only requires `side >= 1`.
    #[must_use]
    pub fn new(side: usize) -> Self {
        debug_assert!(side >= 1, "a board needs at least one square");
        Self {
            side,
            dirty_count: 0,
            hotspot: (0, 0),
            grid: vec![Cell::default(); side * side],
            next_mark: Mark::O,
            row_states: vec![LineState::default(); side],
            column_states: vec![LineState::default(); side],
            diagonal_states: [LineState::default(); Diagonal::COUNT],
            win_cache: None,
        }
    }

    #[must_use]
    pub fn side(&self) -> usize {
        self.side
    }

    #[must_use]
    pub fn area(&self) -> usize {
        self.side * self.side
    }

    /// Number of squares still empty.
    #[must_use]
    pub fn empty_area(&self) -> usize {
        self.area() - self.dirty_count
    }

    /// Coordinates of the most recently placed mark.
    #[must_use]
    pub fn hotspot(&self) -> (usize, usize) {
        self.hotspot
    }

    /// The side whose turn it is to move.
    #[must_use]
    pub fn next_mark(&self) -> Mark {
        self.next_mark
    }

    pub fn state(&self, row: usize, column: usize) -> Result<Mark, OutOfBoundsError> {
        self.check_bounds(row, column)?;
        Ok(self.grid[self.cell_index(row, column)].state())
    }

    /// Iterates all squares in row-major order as `(row, column, mark)`.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Mark)> + '_ {
        self.grid
            .iter()
            .enumerate()
            .map(|(i, cell)| (i / self.side, i % self.side, cell.state()))
    }

    /// The diagonals passing through the given square: at most two, in
    /// series order (ULBR before URBL).
    #[must_use]
    pub fn diagonals_through(&self, row: usize, column: usize) -> ArrayVec<Diagonal, 2> {
        let mut diagonals = ArrayVec::new();
        if row == column {
            diagonals.push(Diagonal::Ulbr);
        }
        if row + column == self.side - 1 {
            diagonals.push(Diagonal::Urbl);
        }
        diagonals
    }

    /// Places a mark, returning whether the write took effect.
    ///
    /// On success the square is filled (write-once), the row, column and any
    /// diagonal tallies are incremented, the hotspot moves to `(row, column)`
    /// and the turn flips to the opposite side. A move on an occupied square
    /// is rejected with `Ok(false)` and no mutation; callers must check the
    /// result instead of assuming success. Placing `Empty` is a sentinel
    /// no-op.
    pub fn set_state(
        &mut self,
        mark: Mark,
        row: usize,
        column: usize,
    ) -> Result<bool, OutOfBoundsError> {
        self.check_bounds(row, column)?;
        if mark.is_empty() {
            debug!(row, column, "ignoring empty sentinel write");
            return Ok(false);
        }

        let index = self.cell_index(row, column);
        if !self.grid[index].fill(mark) {
            warn!(row, column, "move rejected: square is already filled");
            return Ok(false);
        }

        self.dirty_count += 1;
        self.hotspot = (row, column);
        self.next_mark = mark.opponent();

        self.row_states[row].fill(mark);
        self.column_states[column].fill(mark);
        for diagonal in self.diagonals_through(row, column) {
            self.diagonal_states[diagonal.index()].fill(mark);
        }

        Ok(true)
    }

    /// Scans all rows, then all columns, then the two diagonals (ULBR
    /// before URBL) and returns the first side found to fully own a line.
    ///
    /// The scan order is part of the contract: when several lines complete
    /// at once, the first in that order is the one reported. On a hit the
    /// winning line is cached and retrievable via [`Board::winning_line`].
    /// Returns `Empty` while nobody has won.
    pub fn find_winner(&mut self) -> Mark {
        for (index, state) in self.row_states.iter().enumerate() {
            if let Some(winner) = state.winner(self.side) {
                self.win_cache = Some(WinLine {
                    kind: LineKind::Row,
                    index,
                });
                return winner;
            }
        }

        for (index, state) in self.column_states.iter().enumerate() {
            if let Some(winner) = state.winner(self.side) {
                self.win_cache = Some(WinLine {
                    kind: LineKind::Column,
                    index,
                });
                return winner;
            }
        }

        for (index, state) in self.diagonal_states.iter().enumerate() {
            if let Some(winner) = state.winner(self.side) {
                let diagonal = Diagonal::from_index(index).unwrap_or(Diagonal::Ulbr);
                self.win_cache = Some(WinLine {
                    kind: diagonal.line_kind(),
                    index,
                });
                return winner;
            }
        }

        Mark::Empty
    }

    /// The line reported by the last successful [`Board::find_winner`] scan.
    #[must_use]
    pub fn winning_line(&self) -> Option<WinLine> {
        self.win_cache
    }

    /// Cursor over the row tallies, starting at row 0.
    #[must_use]
    pub fn row_cursor(&self) -> LineCursor<'_> {
        LineCursor::new(&self.row_states, self.side)
    }

    /// Cursor over the column tallies, starting at column 0.
    #[must_use]
    pub fn column_cursor(&self) -> LineCursor<'_> {
        LineCursor::new(&self.column_states, self.side)
    }

    /// Cursor over the two diagonal tallies, ULBR first.
    #[must_use]
    pub fn diagonal_cursor(&self) -> LineCursor<'_> {
        LineCursor::new(&self.diagonal_states, self.side)
    }

    /// Cell cursor walking row `row` left to right.
    #[must_use]
    pub fn row_cells(&self, row: usize) -> CellCursor<'_> {
        CellCursor::new(self, row, 0, AxisMotion::Fixed, AxisMotion::Forward)
    }

    /// Cell cursor walking column `column` top to bottom.
    #[must_use]
    pub fn column_cells(&self, column: usize) -> CellCursor<'_> {
        CellCursor::new(self, 0, column, AxisMotion::Forward, AxisMotion::Fixed)
    }

    /// Cell cursor walking the given diagonal from its top end.
    #[must_use]
    pub fn diagonal_cells(&self, diagonal: Diagonal) -> CellCursor<'_> {
        match diagonal {
            Diagonal::Ulbr => {
                CellCursor::new(self, 0, 0, AxisMotion::Forward, AxisMotion::Forward)
            }
            Diagonal::Urbl => CellCursor::new(
                self,
                0,
                self.side - 1,
                AxisMotion::Forward,
                AxisMotion::Backward,
            ),
        }
    }

    fn cell_index(&self, row: usize, column: usize) -> usize {
        row * self.side + column
    }

    fn check_bounds(&self, row: usize, column: usize) -> Result<(), OutOfBoundsError> {
        if row >= self.side || column >= self.side {
            return Err(OutOfBoundsError {
                row,
                column,
                side: self.side,
            });
        }
        Ok(())
    }
}
