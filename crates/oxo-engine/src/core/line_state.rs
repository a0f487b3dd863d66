use super::Mark;

/// Running tally of O and X marks on one capturable line (a row, column,
/// or full-length diagonal).
///
/// Maintained incrementally by [`Board::set_state`](super::Board::set_state)
/// so win and block checks cost O(1) per line instead of rescanning cells.
/// Invariant: `o_filled + x_filled` never exceeds the line length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineState {
    o_filled: usize,
    x_filled: usize,
}

impl LineState {
    #[must_use]
    pub fn o_filled(self) -> usize {
        self.o_filled
    }

    #[must_use]
    pub fn x_filled(self) -> usize {
        self.x_filled
    }

    #[must_use]
    pub fn filled(self) -> usize {
        self.o_filled + self.x_filled
    }

    /// Marks placed by the given side. `Empty` owns no marks.
    #[must_use]
    pub fn filled_for(self, side: Mark) -> usize {
        match side {
            Mark::O => self.o_filled,
            Mark::X => self.x_filled,
            Mark::Empty => 0,
        }
    }

    /// A line is pure while at most one side has marks on it. A pure and
    /// fully filled line is a win; a mixed full line is dead.
    #[must_use]
    pub fn is_pure(self) -> bool {
        self.o_filled == 0 || self.x_filled == 0
    }

    /// Whether either side has filled the whole line.
    #[must_use]
    pub fn is_captured(self, line_len: usize) -> bool {
        self.o_filled == line_len || self.x_filled == line_len
    }

    /// The side that fully owns the line, if any.
    #[must_use]
    pub fn winner(self, line_len: usize) -> Option<Mark> {
        if self.o_filled == line_len {
            Some(Mark::O)
        } else if self.x_filled == line_len {
            Some(Mark::X)
        } else {
            None
        }
    }

    /// Whether the line already carries marks of the observer's opponent,
    /// making it worthless for the observer.
    #[must_use]
    pub fn is_dirty_for(self, observer: Mark) -> bool {
        match observer {
            Mark::O => self.x_filled > 0,
            Mark::X => self.o_filled > 0,
            Mark::Empty => false,
        }
    }

    pub(crate) fn fill(&mut self, mark: Mark) {
        match mark {
            Mark::O => self.o_filled += 1,
            Mark::X => self.x_filled += 1,
            Mark::Empty => {}
        }
    }
}
