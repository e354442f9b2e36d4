//! Debounced change source.
//!
//! Watches a set of directories recursively and reports each written source
//! file at most once per debounce window.
//!
//! Architecture:
//! ```text
//! notify → channel → watch thread → EventFilter → Debouncer → on_change(path)
//!                         ↑
//!                    StopToken
//! ```

mod debouncer;
mod filter;
mod watch_roots;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam::channel;
use notify::RecommendedWatcher;

use crate::core::{StopHandle, StopToken, invoke_guarded, stop_pair};
use debouncer::Debouncer;
pub use debouncer::DEBOUNCE_MS;
use filter::EventFilter;
use watch_roots::attach_roots;

/// Watch session settings.
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Minimum gap between two accepted events for the same path.
    pub debounce: Duration,
    /// Source extensions (without dot); empty = every file.
    pub extensions: Vec<String>,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEBOUNCE_MS),
            extensions: Vec::new(),
        }
    }
}

/// A running watch session.
pub struct ChangeWatcher {
    roots: Vec<PathBuf>,
    stop: StopHandle,
    thread: Option<JoinHandle<()>>,
}

impl ChangeWatcher {
    /// Start watching `dirs`.
    ///
    /// Returns `Ok(None)` when none of the directories could be watched.
    /// `Err` is reserved for failure to create the OS watcher itself.
    pub fn spawn<F>(dirs: &[PathBuf], options: WatchOptions, on_change: F) -> notify::Result<Option<Self>>
    where
        F: Fn(&Path) -> anyhow::Result<()> + Send + 'static,
    {
        let (event_tx, event_rx) = channel::unbounded();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = event_tx.send(res);
        })?;

        let roots = attach_roots(&mut watcher, dirs);
        if roots.is_empty() {
            return Ok(None);
        }

        let (stop, token) = stop_pair();
        let thread = thread::Builder::new()
            .name("mcdk-watch".into())
            .spawn(move || watch_loop(watcher, event_rx, token, options, on_change))
            .map_err(notify::Error::io)?;

        Ok(Some(Self {
            roots,
            stop,
            thread: Some(thread),
        }))
    }

    /// Directories actually being watched.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Signal the loop and wait for it to release its handles. Idempotent.
    pub fn stop(&mut self) {
        self.stop.stop();
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            crate::log!("watch"; "watch thread panicked");
        }
    }
}

impl Drop for ChangeWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

fn watch_loop<F>(
    watcher: RecommendedWatcher,
    events: channel::Receiver<notify::Result<notify::Event>>,
    stop: StopToken,
    options: WatchOptions,
    on_change: F,
) where
    F: Fn(&Path) -> anyhow::Result<()>,
{
    let filter = EventFilter::new(&options.extensions);
    let mut debouncer = Debouncer::new(options.debounce);

    loop {
        channel::select! {
            recv(stop.receiver()) -> _ => break,
            recv(events) -> msg => match msg {
                Ok(Ok(event)) => {
                    crate::debug!("watch"; "raw notify: {:?} {:?}", event.kind, event.paths);
                    let now = Instant::now();
                    for path in filter.written_paths(&event) {
                        if debouncer.accept(path, now) && !stop.is_stopped() {
                            invoke_guarded("change", || on_change(path));
                        }
                    }
                }
                Ok(Err(e)) => crate::log!("watch"; "notify error: {}", e),
                Err(_) => break,
            },
        }
    }

    // Release the OS handles before the thread reports completion
    drop(watcher);
    crate::debug!("watch"; "stopped");
}
