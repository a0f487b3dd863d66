use std::{
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicBool, Ordering},
        mpsc::{self, Receiver, RecvTimeoutError, SyncSender},
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use tracing::warn;

use crate::controller::GameInner;

/// How long `shutdown` waits for the worker thread to quiesce.
const QUIESCE_TIMEOUT: Duration = Duration::from_millis(100);

/// Single-slot background executor for computer moves.
///
/// The queue holds at most one pending task and a single thread drains it,
/// so at most one computer-move computation is ever in flight and board
/// mutations never race. An applied move is a single cell write and is
/// never torn, so cancellation simply stops picking up new tasks.
#[derive(Debug)]
pub(crate) struct MoveWorker {
    cancelled: Arc<AtomicBool>,
    tx: Option<SyncSender<()>>,
    done_rx: Receiver<()>,
    handle: Option<JoinHandle<()>>,
}

impl MoveWorker {
    pub(crate) fn spawn(inner: Arc<Mutex<GameInner>>) -> Self {
        let (tx, rx) = mpsc::sync_channel(1);
        let (done_tx, done_rx) = mpsc::channel();
        let cancelled = Arc::new(AtomicBool::new(false));
        let worker_cancelled = Arc::clone(&cancelled);
        let handle = thread::spawn(move || {
            while rx.recv().is_ok() {
                if worker_cancelled.load(Ordering::Acquire) {
                    break;
                }
                let mut game = inner.lock().unwrap_or_else(PoisonError::into_inner);
                game.play_computer_turn();
            }
            let _ = done_tx.send(());
        });
        Self {
            cancelled,
            tx: Some(tx),
            done_rx,
            handle: Some(handle),
        }
    }

    /// A sender the game state keeps so move completion can queue the
    /// computer's reply. `try_send` on a full slot is a no-op, which is
    /// exactly the at-most-one-outstanding-task semantics.
    pub(crate) fn sender(&self) -> Option<SyncSender<()>> {
        self.tx.clone()
    }

    /// Queues one computer turn, unless one is already pending.
    pub(crate) fn schedule(&self) {
        if let Some(tx) = &self.tx {
            let _ = tx.try_send(());
        }
    }

    /// Cooperative shutdown: flag cancellation, close the queue, then wait
    /// briefly for the thread to drain. Safe to call more than once.
    pub(crate) fn shutdown(&mut self) {
        self.cancelled.store(true, Ordering::Release);
        self.tx = None;
        let Some(handle) = self.handle.take() else {
            return;
        };
        match self.done_rx.recv_timeout(QUIESCE_TIMEOUT) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                let _ = handle.join();
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!("move worker did not quiesce in time, detaching");
            }
        }
    }
}
