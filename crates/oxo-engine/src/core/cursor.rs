use crate::LineIndexError;

use super::{board::Board, cell::Mark, line_state::LineState};

/// Read-only cursor over one series of line tallies (all rows, all columns,
/// or the two diagonals).
///
/// A cursor is a borrow of the board's tally slice plus an index, never a
/// pointer into anything mutable, so it stays valid for as long as the
/// borrow does. It supports jumping to an arbitrary line and stepping
/// forward or back through the series.
#[derive(Debug, Clone)]
pub struct LineCursor<'a> {
    states: &'a [LineState],
    line_len: usize,
    index: usize,
}

impl<'a> LineCursor<'a> {
    pub(crate) fn new(states: &'a [LineState], line_len: usize) -> Self {
        Self {
            states,
            line_len,
            index: 0,
        }
    }

    /// Index of the current line within its series.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of squares on every line of this series.
    #[must_use]
    pub fn line_len(&self) -> usize {
        self.line_len
    }

    /// Number of lines in the series.
    #[must_use]
    pub fn series_len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn o_filled(&self) -> usize {
        self.state().o_filled()
    }

    #[must_use]
    pub fn x_filled(&self) -> usize {
        self.state().x_filled()
    }

    #[must_use]
    pub fn filled(&self) -> usize {
        self.state().filled()
    }

    #[must_use]
    pub fn filled_for(&self, side: Mark) -> usize {
        self.state().filled_for(side)
    }

    /// Whether the current line carries any mark of the observer's opponent.
    #[must_use]
    pub fn is_dirty_for(&self, observer: Mark) -> bool {
        self.state().is_dirty_for(observer)
    }

    /// Jumps to an arbitrary line of the series.
    pub fn jump(&mut self, index: usize) -> Result<(), LineIndexError> {
        if index >= self.states.len() {
            return Err(LineIndexError {
                index,
                lines: self.states.len(),
            });
        }
        self.index = index;
        Ok(())
    }

    /// Steps to the next line; returns `false` (without moving) when the
    /// current line is already the last.
    pub fn advance(&mut self) -> bool {
        if self.index + 1 >= self.states.len() {
            return false;
        }
        self.index += 1;
        true
    }

    /// Steps to the previous line; returns `false` (without moving) when
    /// the current line is the first.
    pub fn retreat(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    fn state(&self) -> LineState {
        self.states[self.index]
    }
}

/// Direction of travel along one grid axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisMotion {
    /// The coordinate never changes (row walks fix the row, column walks
    /// fix the column).
    Fixed,
    #[default]
    Forward,
    Backward,
}

/// Cursor over individual squares along a row, column, or either diagonal.
///
/// The walked line is selected by the starting position and the per-axis
/// motion: fixing the row walks a row, fixing the column walks a column,
/// and moving both axes walks a diagonal (backward column motion gives the
/// URBL diagonal). A step is atomic: the cursor only moves when every
/// non-fixed axis can move, so a diagonal walk never degenerates into a
/// row or column walk at the board edge.
#[derive(Debug, Clone)]
pub struct CellCursor<'a> {
    board: &'a Board,
    row: usize,
    column: usize,
    row_motion: AxisMotion,
    column_motion: AxisMotion,
}

impl<'a> CellCursor<'a> {
    /// Positions a cursor on `(row, column)` with the given per-axis
    /// motion. The starting square must be on the board.
    #[must_use]
    pub fn new(
        board: &'a Board,
        row: usize,
        column: usize,
        row_motion: AxisMotion,
        column_motion: AxisMotion,
    ) -> Self {
        debug_assert!(row < board.side() && column < board.side());
        Self {
            board,
            row,
            column,
            row_motion,
            column_motion,
        }
    }

    #[must_use]
    pub fn row(&self) -> usize {
        self.row
    }

    #[must_use]
    pub fn column(&self) -> usize {
        self.column
    }

    /// State of the square the cursor stands on.
    #[must_use]
    pub fn state(&self) -> Mark {
        // The position is in bounds by construction and never leaves the board.
        self.board
            .state(self.row, self.column)
            .unwrap_or(Mark::Empty)
    }

    /// Moves to the adjacent square along the configured direction.
    ///
    /// Returns `false` and stays put when any moving axis has reached the
    /// board edge, i.e. the walked line is exhausted.
    pub fn step(&mut self) -> bool {
        let side = self.board.side();
        let Some(row) = Self::shift(self.row, self.row_motion, side) else {
            return false;
        };
        let Some(column) = Self::shift(self.column, self.column_motion, side) else {
            return false;
        };
        self.row = row;
        self.column = column;
        true
    }

    /// Advances until the cursor stands on an empty square, starting with
    /// the current one. Returns `None` when the walk exhausts the line
    /// without finding one.
    #[must_use]
    pub fn closest_empty(mut self) -> Option<Self> {
        loop {
            if self.state().is_empty() {
                return Some(self);
            }
            if !self.step() {
                return None;
            }
        }
    }

    fn shift(coordinate: usize, motion: AxisMotion, side: usize) -> Option<usize> {
        match motion {
            AxisMotion::Fixed => Some(coordinate),
            AxisMotion::Forward => (coordinate + 1 < side).then_some(coordinate + 1),
            AxisMotion::Backward => coordinate.checked_sub(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{super::board::Diagonal, *};

    fn board_with(moves: &[(Mark, usize, usize)]) -> Board {
        let mut board = Board::new(3);
        for &(mark, row, column) in moves {
            assert!(board.set_state(mark, row, column).unwrap());
        }
        board
    }

    #[test]
    fn test_line_cursor_jump_and_step() {
        let board = Board::new(5);
        let mut rows = board.row_cursor();
        assert_eq!(rows.index(), 0);
        assert_eq!(rows.line_len(), 5);
        assert_eq!(rows.series_len(), 5);

        assert!(rows.jump(4).is_ok());
        assert!(!rows.advance());
        assert!(rows.retreat());
        assert_eq!(rows.index(), 3);

        assert_eq!(
            rows.jump(5),
            Err(LineIndexError { index: 5, lines: 5 })
        );
        assert_eq!(rows.index(), 3);
    }

    #[test]
    fn test_diagonal_series_has_two_lines() {
        let board = Board::new(5);
        let mut diagonals = board.diagonal_cursor();
        assert_eq!(diagonals.series_len(), 2);
        assert_eq!(diagonals.line_len(), 5);
        assert!(diagonals.advance());
        assert!(!diagonals.advance());
    }

    #[test]
    fn test_row_walk_visits_whole_row() {
        let board = board_with(&[(Mark::O, 1, 0), (Mark::X, 1, 2)]);
        let mut cursor = board.row_cells(1);
        let mut seen = vec![cursor.state()];
        while cursor.step() {
            seen.push(cursor.state());
        }
        assert_eq!(seen, vec![Mark::O, Mark::Empty, Mark::X]);
        assert_eq!(cursor.row(), 1);
    }

    #[test]
    fn test_column_walk_visits_whole_column() {
        let board = board_with(&[(Mark::X, 0, 2), (Mark::O, 2, 2)]);
        let mut cursor = board.column_cells(2);
        let mut seen = vec![cursor.state()];
        while cursor.step() {
            seen.push(cursor.state());
        }
        assert_eq!(seen, vec![Mark::X, Mark::Empty, Mark::O]);
        assert_eq!(cursor.column(), 2);
    }

    #[test]
    fn test_diagonal_walks() {
        let board = board_with(&[(Mark::O, 0, 0), (Mark::X, 2, 0)]);

        let mut ulbr = board.diagonal_cells(Diagonal::Ulbr);
        let mut positions = vec![(ulbr.row(), ulbr.column())];
        while ulbr.step() {
            positions.push((ulbr.row(), ulbr.column()));
        }
        assert_eq!(positions, vec![(0, 0), (1, 1), (2, 2)]);

        let mut urbl = board.diagonal_cells(Diagonal::Urbl);
        let mut positions = vec![(urbl.row(), urbl.column())];
        while urbl.step() {
            positions.push((urbl.row(), urbl.column()));
        }
        assert_eq!(positions, vec![(0, 2), (1, 1), (2, 0)]);
    }

    #[test]
    fn test_closest_empty_finds_first_gap() {
        let board = board_with(&[(Mark::O, 0, 0), (Mark::X, 0, 1)]);
        let found = board.row_cells(0).closest_empty().unwrap();
        assert_eq!((found.row(), found.column()), (0, 2));
    }

    #[test]
    fn test_closest_empty_on_full_line_is_none() {
        let board = board_with(&[(Mark::O, 0, 0), (Mark::X, 0, 1), (Mark::O, 0, 2)]);
        assert!(board.row_cells(0).closest_empty().is_none());
    }

    #[test]
    fn test_closest_empty_stays_put_on_empty_start() {
        let board = Board::new(3);
        let found = board.column_cells(1).closest_empty().unwrap();
        assert_eq!((found.row(), found.column()), (0, 1));
    }
}
