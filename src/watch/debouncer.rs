use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;

/// Default per-path debounce window.
pub const DEBOUNCE_MS: u64 = 100;

/// Map size above which stale entries are pruned.
pub(super) const PRUNE_THRESHOLD: usize = 256;

/// Pure per-path debouncer: only handles timing.
///
/// An event for a path is accepted when no event for that path was accepted
/// within the last `window`. The clock is passed in so callers and tests
/// control time.
pub(super) struct Debouncer {
    window: Duration,
    /// Path → time of the last accepted event
    pub(super) last_accepted: FxHashMap<PathBuf, Instant>,
}

impl Debouncer {
    pub(super) fn new(window: Duration) -> Self {
        Self {
            window,
            last_accepted: FxHashMap::default(),
        }
    }

    /// Decide whether an event for `path` at `now` passes the window.
    pub(super) fn accept(&mut self, path: &Path, now: Instant) -> bool {
        if let Some(last) = self.last_accepted.get_mut(path) {
            if now.saturating_duration_since(*last) < self.window {
                return false;
            }
            *last = now;
            return true;
        }

        if self.last_accepted.len() >= PRUNE_THRESHOLD {
            self.prune(now);
        }
        self.last_accepted.insert(path.to_path_buf(), now);
        true
    }

    /// Forget paths whose window has fully elapsed.
    ///
    /// A forgotten path is accepted on its next event, which is what the
    /// window would have decided anyway, so pruning is invisible to callers.
    pub(super) fn prune(&mut self, now: Instant) {
        let window = self.window;
        self.last_accepted
            .retain(|_, last| now.saturating_duration_since(*last) < window);
    }
}
