//! Read-only strategic analysis over a board snapshot.
//!
//! Nothing here mutates the board: the analyzer and its helpers work purely
//! through the line and cell cursors the board lends out.

use oxo_engine::{Board, CellCursor, Diagonal, LineCursor, Mark};

use crate::EmptyObserverError;

/// The most capturable lines any one square can sit on: its row, its
/// column, and up to two diagonals.
pub const MAX_CLEAN_LINES: usize = 4;

/// How one empty square relates to the clean lines passing through it,
/// seen from one observer's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRelations {
    row: usize,
    column: usize,
    row_clean: bool,
    column_clean: bool,
    diagonals_clean: usize,
    diagonals_count: usize,
}

impl CellRelations {
    #[must_use]
    pub fn row(&self) -> usize {
        self.row
    }

    #[must_use]
    pub fn column(&self) -> usize {
        self.column
    }

    /// Whether the square's row holds no opponent mark.
    #[must_use]
    pub fn is_row_clean(&self) -> bool {
        self.row_clean
    }

    /// Whether the square's column holds no opponent mark.
    #[must_use]
    pub fn is_column_clean(&self) -> bool {
        self.column_clean
    }

    /// Diagonals through the square that hold no opponent mark.
    #[must_use]
    pub fn diagonals_clean(&self) -> usize {
        self.diagonals_clean
    }

    /// Diagonals the square sits on at all (0 to 2).
    #[must_use]
    pub fn diagonals_count(&self) -> usize {
        self.diagonals_count
    }

    /// Total capturable lines through the square that are clean for the
    /// observer. Bounded by [`MAX_CLEAN_LINES`].
    #[must_use]
    pub fn total_clean(&self) -> usize {
        usize::from(self.row_clean) + usize::from(self.column_clean) + self.diagonals_clean
    }
}

/// Catalogue of the board's empty squares, bucketed by how many clean
/// lines pass through each, for one observer side.
///
/// The greedy opponent does not consult this ranking today; it exists for
/// richer heuristics built on the same snapshot.
#[derive(Debug)]
pub struct BoardAnalyzer {
    observer: Mark,
    table: [Vec<CellRelations>; MAX_CLEAN_LINES + 1],
}

impl BoardAnalyzer {
    /// Builds the relation table for every empty square of `board`, as
    /// seen by `observer`.
    pub fn build(board: &Board, observer: Mark) -> Result<Self, EmptyObserverError> {
        if observer.is_empty() {
            return Err(EmptyObserverError);
        }

        let mut table: [Vec<CellRelations>; MAX_CLEAN_LINES + 1] = Default::default();
        let mut rows = board.row_cursor();
        let mut columns = board.column_cursor();
        let mut diagonals = board.diagonal_cursor();

        for (row, column, mark) in board.cells() {
            if !mark.is_empty() {
                continue;
            }
            // cells() only yields on-board coordinates, so the jumps succeed.
            if rows.jump(row).is_err() || columns.jump(column).is_err() {
                continue;
            }

            let mut diagonals_count = 0;
            let mut diagonals_clean = 0;
            for diagonal in board.diagonals_through(row, column) {
                diagonals_count += 1;
                if diagonals.jump(diagonal.index()).is_ok() && !diagonals.is_dirty_for(observer) {
                    diagonals_clean += 1;
                }
            }

            let relations = CellRelations {
                row,
                column,
                row_clean: !rows.is_dirty_for(observer),
                column_clean: !columns.is_dirty_for(observer),
                diagonals_clean,
                diagonals_count,
            };
            table[relations.total_clean()].push(relations);
        }

        Ok(Self { observer, table })
    }

    #[must_use]
    pub fn observer(&self) -> Mark {
        self.observer
    }

    /// Empty squares sitting on exactly `clean_lines` clean lines, in
    /// row-major order.
    #[must_use]
    pub fn bucket(&self, clean_lines: usize) -> &[CellRelations] {
        self.table.get(clean_lines).map_or(&[], Vec::as_slice)
    }

    /// All catalogued squares, most exposed first.
    pub fn ranked(&self) -> impl Iterator<Item = &CellRelations> {
        self.table.iter().rev().flatten()
    }
}

/// Walks the line series forward from the cursor's current position and
/// stops on the first line the observer can capture with a single move:
/// clean for the observer and with exactly one empty square left.
///
/// Returns the cursor parked on that line, or `None` when the series is
/// exhausted. The observer must be a playing side.
pub fn find_capturable_line<'a>(
    mut cursor: LineCursor<'a>,
    observer: Mark,
) -> Result<Option<LineCursor<'a>>, EmptyObserverError> {
    if observer.is_empty() {
        return Err(EmptyObserverError);
    }

    loop {
        if !cursor.is_dirty_for(observer) && cursor.filled_for(observer) == cursor.line_len() - 1 {
            return Ok(Some(cursor));
        }
        if !cursor.advance() {
            return Ok(None);
        }
    }
}

/// Cell cursor walking row `row` of `board`.
#[must_use]
pub fn row_finder(board: &Board, row: usize) -> CellCursor<'_> {
    board.row_cells(row)
}

/// Cell cursor walking column `column` of `board`.
#[must_use]
pub fn column_finder(board: &Board, column: usize) -> CellCursor<'_> {
    board.column_cells(column)
}

/// Cell cursor walking the given diagonal of `board` from its top end.
#[must_use]
pub fn diagonal_finder(board: &Board, diagonal: Diagonal) -> CellCursor<'_> {
    board.diagonal_cells(diagonal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(side: usize, moves: &[(Mark, usize, usize)]) -> Board {
        let mut board = Board::new(side);
        for &(mark, row, column) in moves {
            assert!(board.set_state(mark, row, column).unwrap());
        }
        board
    }

    #[test]
    fn test_empty_observer_is_rejected() {
        let board = Board::new(3);
        assert_eq!(
            BoardAnalyzer::build(&board, Mark::Empty).unwrap_err(),
            EmptyObserverError
        );
        assert_eq!(
            find_capturable_line(board.row_cursor(), Mark::Empty).unwrap_err(),
            EmptyObserverError
        );
    }

    #[test]
    fn test_fresh_board_buckets_by_line_exposure() {
        let board = Board::new(3);
        let analyzer = BoardAnalyzer::build(&board, Mark::O).unwrap();

        // Center sits on four clean lines, corners on three, edges on two.
        assert_eq!(analyzer.bucket(4).len(), 1);
        assert_eq!(analyzer.bucket(3).len(), 4);
        assert_eq!(analyzer.bucket(2).len(), 4);
        assert!(analyzer.bucket(1).is_empty());
        assert!(analyzer.bucket(0).is_empty());

        let center = analyzer.bucket(4)[0];
        assert_eq!((center.row(), center.column()), (1, 1));
        assert_eq!(center.diagonals_count(), 2);
        assert_eq!(center.diagonals_clean(), 2);
    }

    #[test]
    fn test_opponent_marks_dirty_their_lines() {
        let board = board_with(3, &[(Mark::X, 0, 0)]);
        let analyzer = BoardAnalyzer::build(&board, Mark::O).unwrap();

        // (0,1) lost its row; (2,2) lost the ULBR diagonal.
        let edge = analyzer
            .ranked()
            .find(|r| (r.row(), r.column()) == (0, 1))
            .unwrap();
        assert!(!edge.is_row_clean());
        assert!(edge.is_column_clean());

        let corner = analyzer
            .ranked()
            .find(|r| (r.row(), r.column()) == (2, 2))
            .unwrap();
        assert_eq!(corner.diagonals_count(), 1);
        assert_eq!(corner.diagonals_clean(), 0);
    }

    #[test]
    fn test_ranked_yields_most_exposed_first() {
        let board = Board::new(3);
        let analyzer = BoardAnalyzer::build(&board, Mark::X).unwrap();
        let first = analyzer.ranked().next().unwrap();
        assert_eq!(first.total_clean(), 4);
    }

    #[test]
    fn test_capturable_row_is_found() {
        let board = board_with(3, &[(Mark::O, 1, 0), (Mark::O, 1, 2)]);

        let found = find_capturable_line(board.row_cursor(), Mark::O)
            .unwrap()
            .unwrap();
        assert_eq!(found.index(), 1);

        // The same line is dirty for X, so X finds nothing.
        assert!(
            find_capturable_line(board.row_cursor(), Mark::X)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_capturable_search_resumes_from_cursor_position() {
        let board = board_with(
            3,
            &[
                (Mark::O, 0, 0),
                (Mark::O, 0, 1),
                (Mark::O, 2, 0),
                (Mark::O, 2, 2),
            ],
        );

        let mut cursor = board.row_cursor();
        cursor.jump(1).unwrap();
        let found = find_capturable_line(cursor, Mark::O).unwrap().unwrap();
        // Row 0 is behind the cursor; row 2 is the first hit from row 1 on.
        assert_eq!(found.index(), 2);
    }

    #[test]
    fn test_capturable_needs_exactly_one_gap() {
        // Two empty squares on the line: not capturable yet.
        let board = board_with(5, &[(Mark::X, 0, 0), (Mark::X, 0, 1), (Mark::X, 0, 2)]);
        assert!(
            find_capturable_line(board.row_cursor(), Mark::X)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_capturable_diagonal() {
        let board = board_with(3, &[(Mark::X, 0, 2), (Mark::X, 2, 0)]);
        let found = find_capturable_line(board.diagonal_cursor(), Mark::X)
            .unwrap()
            .unwrap();
        assert_eq!(found.index(), Diagonal::Urbl.index());

        let cell = diagonal_finder(&board, Diagonal::Urbl)
            .closest_empty()
            .unwrap();
        assert_eq!((cell.row(), cell.column()), (1, 1));
    }
}
