use oxo_ai::ComputerPlayer;
use oxo_engine::Mark;

/// A human seat: moves arrive from outside through
/// [`GameController::play_at`](crate::GameController::play_at).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HumanPlayer {
    mark: Mark,
}

impl HumanPlayer {
    #[must_use]
    pub fn new(mark: Mark) -> Self {
        Self { mark }
    }

    #[must_use]
    pub fn mark(&self) -> Mark {
        self.mark
    }
}

/// Who produces the moves for one side of the board.
#[derive(Debug, derive_more::IsVariant)]
pub enum PlayerSlot {
    Human(HumanPlayer),
    Computer(ComputerPlayer),
}

impl PlayerSlot {
    #[must_use]
    pub fn human(mark: Mark) -> Self {
        PlayerSlot::Human(HumanPlayer::new(mark))
    }

    #[must_use]
    pub fn computer(mark: Mark) -> Self {
        PlayerSlot::Computer(ComputerPlayer::new(mark))
    }

    /// The side this seat plays.
    #[must_use]
    pub fn mark(&self) -> Mark {
        match self {
            PlayerSlot::Human(human) => human.mark(),
            PlayerSlot::Computer(computer) => computer.mark(),
        }
    }

    #[must_use]
    pub fn as_human(&self) -> Option<&HumanPlayer> {
        match self {
            PlayerSlot::Human(human) => Some(human),
            PlayerSlot::Computer(_) => None,
        }
    }

    pub(crate) fn as_computer_mut(&mut self) -> Option<&mut ComputerPlayer> {
        match self {
            PlayerSlot::Human(_) => None,
            PlayerSlot::Computer(computer) => Some(computer),
        }
    }
}
