//! Foreground transition source.
//!
//! Polls a [`ForegroundProbe`] and reports edges: the callback runs only when
//! the tracked process gains or loses input focus, never while the state is
//! unchanged.

mod probe;

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::core::{StopHandle, StopToken, invoke_guarded, stop_pair};
pub use probe::{AlwaysForeground, CommandProbe, ForegroundProbe};

/// Default poll interval.
pub const FOCUS_POLL_MS: u64 = 100;

/// Edge detector over a stream of level samples.
///
/// Starts "not foreground", so a process that is focused on the first sample
/// produces a `true` edge.
#[derive(Debug, Default)]
pub struct FocusTracker {
    last: bool,
}

impl FocusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one sample; returns the new state on a transition.
    pub fn observe(&mut self, is_foreground: bool) -> Option<bool> {
        if is_foreground == self.last {
            return None;
        }
        self.last = is_foreground;
        Some(is_foreground)
    }
}

/// A running focus-poll session.
pub struct FocusWatcher {
    stop: StopHandle,
    thread: Option<JoinHandle<()>>,
}

impl FocusWatcher {
    /// Start polling for focus transitions of `pid`.
    pub fn spawn<F>(
        pid: u32,
        probe: Arc<dyn ForegroundProbe>,
        interval: Duration,
        on_focus_changed: F,
    ) -> std::io::Result<Self>
    where
        F: Fn(bool) -> anyhow::Result<()> + Send + 'static,
    {
        let (stop, token) = stop_pair();
        let thread = thread::Builder::new()
            .name("mcdk-focus".into())
            .spawn(move || poll_loop(pid, probe, interval, token, on_focus_changed))?;

        Ok(Self {
            stop,
            thread: Some(thread),
        })
    }

    /// Signal the loop and join it. Idempotent.
    pub fn stop(&mut self) {
        self.stop.stop();
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            crate::log!("focus"; "focus thread panicked");
        }
    }
}

impl Drop for FocusWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

fn poll_loop<F>(
    pid: u32,
    probe: Arc<dyn ForegroundProbe>,
    interval: Duration,
    stop: StopToken,
    on_focus_changed: F,
) where
    F: Fn(bool) -> anyhow::Result<()>,
{
    let mut tracker = FocusTracker::new();

    loop {
        if let Some(focused) = tracker.observe(probe.is_foreground(pid)) {
            if stop.is_stopped() {
                break;
            }
            crate::debug!("focus"; "pid {} foreground: {}", pid, focused);
            invoke_guarded("focus", || on_focus_changed(focused));
        }
        if stop.wait(interval) {
            break;
        }
    }
}
