//! Game orchestration: turn order, move fan-out, end-of-game detection and
//! background scheduling of computer moves.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, mpsc::SyncSender};

use oxo_engine::{Board, Mark, OutOfBoundsError, WinLine};
use tracing::{debug, error};

use crate::{GamePreferences, HumanPlayer, PlayerSlot, worker::MoveWorker};

/// Where the game stands. Starts as `InProgress` and transitions exactly
/// once to one of the terminal phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum GamePhase {
    InProgress,
    Won(Mark),
    Drawn,
    Cancelled,
}

/// Terminal notification delivered to game listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Won { winner: Mark, line: WinLine },
    Drawn,
    Cancelled,
}

/// Called after every applied move with the mover and its square.
pub type MoveHandler = Box<dyn FnMut(Mark, usize, usize) + Send>;
/// Called once when the game reaches a terminal phase.
pub type GameListener = Box<dyn FnMut(GameEvent) + Send>;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum PlayError {
    #[display("{_0}")]
    OutOfBounds(OutOfBoundsError),
    #[display("square ({row}, {column}) is already occupied")]
    SquareOccupied { row: usize, column: usize },
    #[display("it is not a human player's turn")]
    NotHumanTurn,
    #[display("the game is already over")]
    GameOver,
}

impl From<OutOfBoundsError> for PlayError {
    fn from(err: OutOfBoundsError) -> Self {
        PlayError::OutOfBounds(err)
    }
}

/// The shared game state behind the controller's mutex.
pub(crate) struct GameInner {
    board: Board,
    o: PlayerSlot,
    x: PlayerSlot,
    phase: GamePhase,
    move_handlers: Vec<MoveHandler>,
    game_listeners: Vec<GameListener>,
    schedule_tx: Option<SyncSender<()>>,
}

impl GameInner {
    fn slot(&self, side: Mark) -> Option<&PlayerSlot> {
        match side {
            Mark::O => Some(&self.o),
            Mark::X => Some(&self.x),
            Mark::Empty => None,
        }
    }

    /// Post-move bookkeeping shared by human and computer moves: fan the
    /// move out to handlers, settle the game if it just ended, otherwise
    /// hand the turn over (queueing a computer reply if one is due).
    fn notify_move(&mut self, mover: Mark, row: usize, column: usize) {
        debug!(%mover, row, column, "move applied");
        for handler in &mut self.move_handlers {
            handler(mover, row, column);
        }

        let winner = self.board.find_winner();
        if !winner.is_empty()
            && let Some(line) = self.board.winning_line()
        {
            self.finish(GamePhase::Won(winner), GameEvent::Won { winner, line });
            return;
        }
        if self.board.empty_area() == 0 {
            self.finish(GamePhase::Drawn, GameEvent::Drawn);
            return;
        }
        if self
            .slot(self.board.next_mark())
            .is_some_and(PlayerSlot::is_computer)
        {
            self.schedule_computer();
        }
    }

    fn finish(&mut self, phase: GamePhase, event: GameEvent) {
        debug!(?event, "game finished");
        self.phase = phase;
        for listener in &mut self.game_listeners {
            listener(event);
        }
    }

    fn schedule_computer(&self) {
        if let Some(tx) = &self.schedule_tx {
            let _ = tx.try_send(());
        }
    }

    /// Runs on the worker thread. Lets the computer holding the turn pick
    /// a square, applies it, and runs the usual post-move bookkeeping.
    pub(crate) fn play_computer_turn(&mut self) {
        if !self.phase.is_in_progress() {
            return;
        }
        let side = self.board.next_mark();
        let (slot, board) = match side {
            Mark::O => (&mut self.o, &self.board),
            Mark::X => (&mut self.x, &self.board),
            Mark::Empty => return,
        };
        let Some(computer) = slot.as_computer_mut() else {
            return;
        };
        let (row, column) = match computer.choose_move(board) {
            Ok(chosen) => chosen,
            Err(err) => {
                // Unreachable while draws are settled before the turn is
                // handed over; halt the game rather than crash the worker.
                error!(%err, "computer has no square to play");
                self.finish(GamePhase::Cancelled, GameEvent::Cancelled);
                return;
            }
        };
        match self.board.set_state(side, row, column) {
            Ok(true) => self.notify_move(side, row, column),
            Ok(false) | Err(_) => {
                error!(row, column, "computed move was rejected by the board");
                self.finish(GamePhase::Cancelled, GameEvent::Cancelled);
            }
        }
    }
}

/// Runs one game of tic-tac-toe between two seats, each either a human fed
/// through [`play_at`](Self::play_at) or a computer whose replies are
/// computed on a background thread.
///
/// Handlers and listeners run with the game lock held, on whichever thread
/// applied the move. They must not call back into the controller.
pub struct GameController {
    inner: Arc<Mutex<GameInner>>,
    worker: MoveWorker,
}

fn lock(inner: &Mutex<GameInner>) -> MutexGuard<'_, GameInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

impl GameController {
    /// Both seats human. O moves first.
    #[must_use]
    pub fn two_player(preferences: &GamePreferences) -> Self {
        Self::with_players(
            preferences.board_size(),
            PlayerSlot::human(Mark::O),
            PlayerSlot::human(Mark::X),
        )
    }

    /// One human seat on the side the preferences name, the computer on
    /// the other. If the computer holds O, its opening move is queued
    /// immediately.
    #[must_use]
    pub fn single_player(preferences: &GamePreferences) -> Self {
        let (o, x) = if preferences.human_side() == Mark::O {
            (PlayerSlot::human(Mark::O), PlayerSlot::computer(Mark::X))
        } else {
            (PlayerSlot::computer(Mark::O), PlayerSlot::human(Mark::X))
        };
        Self::with_players(preferences.board_size(), o, x)
    }

    fn with_players(board_size: usize, o: PlayerSlot, x: PlayerSlot) -> Self {
        let computer_opens = o.is_computer();
        let inner = Arc::new(Mutex::new(GameInner {
            board: Board::new(board_size),
            o,
            x,
            phase: GamePhase::InProgress,
            move_handlers: Vec::new(),
            game_listeners: Vec::new(),
            schedule_tx: None,
        }));
        let worker = MoveWorker::spawn(Arc::clone(&inner));
        lock(&inner).schedule_tx = worker.sender();
        let controller = Self { inner, worker };
        if computer_opens {
            controller.worker.schedule();
        }
        controller
    }

    #[must_use]
    pub fn board_size(&self) -> usize {
        lock(&self.inner).board.side()
    }

    /// The mark occupying a square, or `Mark::Empty` for a free one.
    pub fn state(&self, row: usize, column: usize) -> Result<Mark, OutOfBoundsError> {
        lock(&self.inner).board.state(row, column)
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        lock(&self.inner).phase
    }

    /// The side whose move comes next, regardless of who plays it.
    #[must_use]
    pub fn next_turn(&self) -> Mark {
        lock(&self.inner).board.next_mark()
    }

    /// The human seat the game is waiting on, if the game is in progress
    /// and the side to move is human.
    #[must_use]
    pub fn awaited_human(&self) -> Option<HumanPlayer> {
        let game = lock(&self.inner);
        if !game.phase.is_in_progress() {
            return None;
        }
        game.slot(game.board.next_mark())
            .and_then(PlayerSlot::as_human)
            .copied()
    }

    #[must_use]
    pub fn is_single_player(&self) -> bool {
        let game = lock(&self.inner);
        game.o.is_computer() || game.x.is_computer()
    }

    pub fn add_move_handler(&self, handler: impl FnMut(Mark, usize, usize) + Send + 'static) {
        lock(&self.inner).move_handlers.push(Box::new(handler));
    }

    pub fn add_game_listener(&self, listener: impl FnMut(GameEvent) + Send + 'static) {
        lock(&self.inner).game_listeners.push(Box::new(listener));
    }

    /// Plays the side to move onto `(row, column)` on behalf of a human.
    ///
    /// Rejected if the game is over, if a computer holds the turn, or if
    /// the square is occupied or out of bounds. A rejected move leaves the
    /// game untouched.
    pub fn play_at(&self, row: usize, column: usize) -> Result<(), PlayError> {
        let mut game = lock(&self.inner);
        if !game.phase.is_in_progress() {
            return Err(PlayError::GameOver);
        }
        let side = game.board.next_mark();
        if !game.slot(side).is_some_and(PlayerSlot::is_human) {
            return Err(PlayError::NotHumanTurn);
        }
        if !game.board.set_state(side, row, column)? {
            return Err(PlayError::SquareOccupied { row, column });
        }
        game.notify_move(side, row, column);
        Ok(())
    }

    /// Cancels an in-progress game and stops the background worker. Called
    /// automatically on drop; calling it again is a no-op.
    pub fn close(&mut self) {
        {
            let mut game = lock(&self.inner);
            game.schedule_tx = None;
            if game.phase.is_in_progress() {
                game.finish(GamePhase::Cancelled, GameEvent::Cancelled);
            }
        }
        self.worker.shutdown();
    }
}

impl Drop for GameController {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::mpsc,
        time::Duration,
    };

    use oxo_engine::LineKind;

    use super::*;

    const REPLY_TIMEOUT: Duration = Duration::from_secs(5);

    fn event_channel(controller: &GameController) -> mpsc::Receiver<GameEvent> {
        let (tx, rx) = mpsc::channel();
        controller.add_game_listener(move |event| {
            let _ = tx.send(event);
        });
        rx
    }

    fn move_channel(controller: &GameController) -> mpsc::Receiver<(Mark, usize, usize)> {
        let (tx, rx) = mpsc::channel();
        controller.add_move_handler(move |mark, row, column| {
            let _ = tx.send((mark, row, column));
        });
        rx
    }

    #[test]
    fn test_two_player_row_win() {
        let mut controller = GameController::two_player(&GamePreferences::default());
        let events = event_channel(&controller);
        assert_eq!(controller.next_turn(), Mark::O);
        assert!(controller.awaited_human().is_some());
        assert!(!controller.is_single_player());

        // O takes the top row while X wanders the middle.
        for (row, column) in [(0, 0), (1, 1), (0, 1), (2, 2), (0, 2)] {
            controller.play_at(row, column).unwrap();
        }
        assert_eq!(controller.phase(), GamePhase::Won(Mark::O));
        let event = events.try_recv().unwrap();
        assert_eq!(
            event,
            GameEvent::Won {
                winner: Mark::O,
                line: WinLine {
                    kind: LineKind::Row,
                    index: 0,
                },
            }
        );
        assert!(events.try_recv().is_err());
        assert!(controller.awaited_human().is_none());

        // No more moves once the game is settled.
        assert!(matches!(controller.play_at(2, 0), Err(PlayError::GameOver)));

        // Closing a finished game emits nothing further.
        controller.close();
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_two_player_draw() {
        let controller = GameController::two_player(&GamePreferences::default());
        let events = event_channel(&controller);

        // Fills the board as O O X / X X O / O X O with no line captured.
        let moves = [
            (0, 0),
            (0, 2),
            (0, 1),
            (1, 0),
            (1, 2),
            (1, 1),
            (2, 0),
            (2, 1),
            (2, 2),
        ];
        for (row, column) in moves {
            controller.play_at(row, column).unwrap();
        }
        assert_eq!(controller.phase(), GamePhase::Drawn);
        assert_eq!(events.try_recv().unwrap(), GameEvent::Drawn);
    }

    #[test]
    fn test_rejected_moves_leave_the_game_untouched() {
        let controller = GameController::two_player(&GamePreferences::default());
        controller.play_at(1, 1).unwrap();

        assert!(matches!(
            controller.play_at(1, 1),
            Err(PlayError::SquareOccupied { row: 1, column: 1 })
        ));
        assert!(matches!(
            controller.play_at(3, 0),
            Err(PlayError::OutOfBounds(_))
        ));
        // Still X's turn after both rejections.
        assert_eq!(controller.next_turn(), Mark::X);
        assert_eq!(controller.state(1, 1).unwrap(), Mark::O);
    }

    #[test]
    fn test_move_handlers_see_every_move() {
        let controller = GameController::two_player(&GamePreferences::default());
        let moves = move_channel(&controller);

        controller.play_at(0, 0).unwrap();
        controller.play_at(1, 1).unwrap();
        assert_eq!(moves.try_recv().unwrap(), (Mark::O, 0, 0));
        assert_eq!(moves.try_recv().unwrap(), (Mark::X, 1, 1));
    }

    #[test]
    fn test_single_player_computer_replies() {
        let preferences = GamePreferences::new(3, Mark::O).unwrap();
        let controller = GameController::single_player(&preferences);
        let moves = move_channel(&controller);
        assert!(controller.is_single_player());
        assert_eq!(controller.awaited_human().unwrap().mark(), Mark::O);

        controller.play_at(0, 0).unwrap();
        assert_eq!(moves.recv_timeout(REPLY_TIMEOUT).unwrap(), (Mark::O, 0, 0));
        let (mark, row, column) = moves.recv_timeout(REPLY_TIMEOUT).unwrap();
        assert_eq!(mark, Mark::X);
        assert_eq!(controller.state(row, column).unwrap(), Mark::X);
        // Back to the human.
        assert_eq!(controller.awaited_human().unwrap().mark(), Mark::O);
    }

    #[test]
    fn test_computer_opens_when_human_plays_x() {
        let preferences = GamePreferences::new(3, Mark::X).unwrap();
        let controller = GameController::single_player(&preferences);
        let moves = move_channel(&controller);

        // The human cannot move until the computer's opening lands, but the
        // opening may already have been applied before the handler was
        // registered, so poll the board rather than the channel alone.
        let opening = moves.recv_timeout(REPLY_TIMEOUT);
        if let Ok((mark, row, column)) = opening {
            assert_eq!(mark, Mark::O);
            assert_eq!(controller.state(row, column).unwrap(), Mark::O);
        }
        assert_eq!(controller.next_turn(), Mark::X);
        assert_eq!(controller.awaited_human().unwrap().mark(), Mark::X);
    }

    #[test]
    fn test_close_cancels_and_is_idempotent() {
        let mut controller = GameController::two_player(&GamePreferences::default());
        let events = event_channel(&controller);
        controller.play_at(0, 0).unwrap();

        controller.close();
        assert_eq!(controller.phase(), GamePhase::Cancelled);
        assert_eq!(events.try_recv().unwrap(), GameEvent::Cancelled);

        controller.close();
        assert!(events.try_recv().is_err());
        assert!(matches!(controller.play_at(1, 1), Err(PlayError::GameOver)));
    }
}
