//! The heuristic computer opponent.

use oxo_engine::{Board, Diagonal, Mark};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use tracing::debug;

use crate::{
    NoMoveError,
    analyzer::{column_finder, diagonal_finder, find_capturable_line, row_finder},
};

/// Seed for the opponent's random-fallback generator. The same seed
/// reproduces the same sequence of fallback moves, which keeps games
/// replayable under test.
pub type MoveSeed = [u8; 16];

/// Greedy three-stage opponent: take a winning move if one exists, else
/// block the opponent's winning move, else play a uniformly random empty
/// square. It keeps a private history of every move it selected.
#[derive(Debug, Clone)]
pub struct ComputerPlayer {
    mark: Mark,
    rng: Pcg32,
    moves: Vec<(usize, usize)>,
}

impl ComputerPlayer {
    /// Creates an opponent playing `mark`, seeded from the system RNG.
    /// `mark` must be a playing side.
    #[must_use]
    pub fn new(mark: Mark) -> Self {
        Self::with_seed(mark, rand::rng().random())
    }

    /// Creates an opponent with a fixed fallback seed.
    #[must_use]
    pub fn with_seed(mark: Mark, seed: MoveSeed) -> Self {
        debug_assert!(!mark.is_empty(), "the computer needs a playing side");
        Self {
            mark,
            rng: Pcg32::from_seed(seed),
            moves: Vec::new(),
        }
    }

    #[must_use]
    pub fn mark(&self) -> Mark {
        self.mark
    }

    /// Every move this player has selected so far, oldest first.
    #[must_use]
    pub fn moves(&self) -> &[(usize, usize)] {
        &self.moves
    }

    /// Selects the next move for this side and appends it to the move
    /// history. The caller applies it to the board and reports the result.
    ///
    /// Fails only when the board has no empty square left, which the
    /// turn coordinator rules out by detecting draws first.
    pub fn choose_move(&mut self, board: &Board) -> Result<(usize, usize), NoMoveError> {
        let chosen = Self::victory_for(board, self.mark)
            .or_else(|| Self::victory_for(board, self.mark.opponent()))
            .or_else(|| self.random_move(board))
            .ok_or(NoMoveError)?;
        self.moves.push(chosen);
        Ok(chosen)
    }

    /// A move that completes a capturable line for `observer`, searching
    /// rows, then columns, then diagonals.
    fn victory_for(board: &Board, observer: Mark) -> Option<(usize, usize)> {
        if observer.is_empty() {
            return None;
        }
        let capturable = |cursor| find_capturable_line(cursor, observer).ok().flatten();

        if let Some(line) = capturable(board.row_cursor()) {
            let row = line.index();
            let cell = row_finder(board, row).closest_empty()?;
            debug!(side = %observer, row, column = cell.column(), "capturable row");
            return Some((row, cell.column()));
        }

        if let Some(line) = capturable(board.column_cursor()) {
            let column = line.index();
            let cell = column_finder(board, column).closest_empty()?;
            debug!(side = %observer, row = cell.row(), column, "capturable column");
            return Some((cell.row(), column));
        }

        if let Some(line) = capturable(board.diagonal_cursor()) {
            let diagonal = Diagonal::from_index(line.index())?;
            let cell = diagonal_finder(board, diagonal).closest_empty()?;
            debug!(
                side = %observer,
                row = cell.row(),
                column = cell.column(),
                "capturable diagonal"
            );
            return Some((cell.row(), cell.column()));
        }

        None
    }

    /// A uniformly random empty square: draw an index below the empty
    /// count, then scan row-major to the matching empty square.
    fn random_move(&mut self, board: &Board) -> Option<(usize, usize)> {
        let empty = board.empty_area();
        if empty == 0 {
            return None;
        }
        let target = self.rng.random_range(0..empty);
        debug!(target, empty, "falling back to a random move");
        board
            .cells()
            .filter(|&(_, _, mark)| mark.is_empty())
            .nth(target)
            .map(|(row, column, _)| (row, column))
    }
}
