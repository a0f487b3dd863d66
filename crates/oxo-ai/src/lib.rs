pub use self::{analyzer::*, computer::*};

pub mod analyzer;
pub mod computer;

/// `Empty` was passed where a playing side is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("the observing side must be O or X, not empty")]
pub struct EmptyObserverError;

/// The board has no empty square left to play.
///
/// The controller treats a full board as a draw before handing the turn to
/// the computer, so hitting this error indicates broken draw handling in
/// the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("no empty square is left to play")]
pub struct NoMoveError;
