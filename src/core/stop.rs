//! Channel-based stop broadcast.
//!
//! A [`StopHandle`] owns the only sender of a zero-capacity channel that never
//! carries a message. Stopping drops the sender, which disconnects every
//! cloned [`StopToken`] at once. Waiters block on the channel itself, so there
//! is no window between "check the flag" and "start waiting" in which a stop
//! could be missed.

use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use parking_lot::Mutex;

/// Create a connected stop handle and token.
pub fn stop_pair() -> (StopHandle, StopToken) {
    let (tx, rx) = channel::bounded::<()>(0);
    (
        StopHandle {
            tx: Mutex::new(Some(tx)),
        },
        StopToken { rx },
    )
}

/// Owner side of a stop broadcast.
#[derive(Debug)]
pub struct StopHandle {
    tx: Mutex<Option<Sender<()>>>,
}

impl StopHandle {
    /// Signal every token. Idempotent.
    pub fn stop(&self) {
        self.tx.lock().take();
    }

    pub fn is_stopped(&self) -> bool {
        self.tx.lock().is_none()
    }
}

impl Drop for StopHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Observer side of a stop broadcast. Cheap to clone.
#[derive(Debug, Clone)]
pub struct StopToken {
    rx: Receiver<()>,
}

impl StopToken {
    /// Non-blocking check.
    pub fn is_stopped(&self) -> bool {
        matches!(self.rx.try_recv(), Err(TryRecvError::Disconnected))
    }

    /// Sleep for up to `timeout`, waking early on stop.
    ///
    /// Returns `true` if stop was signalled.
    pub fn wait(&self, timeout: Duration) -> bool {
        matches!(
            self.rx.recv_timeout(timeout),
            Err(RecvTimeoutError::Disconnected)
        )
    }

    /// Underlying receiver, for use in `crossbeam::select!`.
    ///
    /// Receiving on it only ever yields `Err` once stop was signalled.
    pub fn receiver(&self) -> &Receiver<()> {
        &self.rx
    }
}
