use std::path::PathBuf;

use rustc_hash::FxHashSet;

/// Decides when accumulated changes may be delivered.
///
/// Two flags drive it: `need_update` (something changed since the last fire)
/// and `is_foreground` (the child owns input focus). A fire happens at the
/// moment either flag becomes true while the other already is.
#[derive(Debug, Default)]
pub struct ReloadGate {
    need_update: bool,
    is_foreground: bool,
    pending: FxHashSet<PathBuf>,
}

impl ReloadGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a changed file. Returns the paths to reload if this fires.
    pub fn file_changed(&mut self, path: PathBuf) -> Option<Vec<PathBuf>> {
        self.pending.insert(path);
        self.need_update = true;
        self.is_foreground.then(|| self.fire())
    }

    /// Record a focus transition. Returns the paths to reload if this fires.
    pub fn focus_changed(&mut self, is_foreground: bool) -> Option<Vec<PathBuf>> {
        self.is_foreground = is_foreground;
        (is_foreground && self.need_update).then(|| self.fire())
    }

    pub fn need_update(&self) -> bool {
        self.need_update
    }

    pub fn is_foreground(&self) -> bool {
        self.is_foreground
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    fn fire(&mut self) -> Vec<PathBuf> {
        self.need_update = false;
        let mut paths: Vec<_> = self.pending.drain().collect();
        paths.sort();
        paths
    }
}
