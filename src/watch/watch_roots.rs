use std::path::PathBuf;

use notify::{RecursiveMode, Watcher};

/// Attach every usable directory to `watcher`.
///
/// Missing paths and non-directories are skipped silently; a directory the
/// OS refuses to watch is logged and dropped. Returns the attached roots.
pub(super) fn attach_roots<W: Watcher>(watcher: &mut W, dirs: &[PathBuf]) -> Vec<PathBuf> {
    let mut attached = Vec::with_capacity(dirs.len());

    for dir in dirs {
        if !dir.is_dir() {
            crate::debug!("watch"; "skip (not a directory): {}", dir.display());
            continue;
        }

        let dir = std::path::absolute(dir).unwrap_or_else(|_| dir.clone());
        if attached.contains(&dir) {
            continue;
        }

        match watcher.watch(&dir, RecursiveMode::Recursive) {
            Ok(()) => attached.push(dir),
            Err(e) => crate::log!("watch"; "cannot watch {}: {}", dir.display(), e),
        }
    }

    attached
}
