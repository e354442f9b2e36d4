use std::path::{Path, PathBuf};

use notify::EventKind;
use notify::event::ModifyKind;

/// Decides which raw notify events count as source writes.
#[derive(Debug, Clone, Default)]
pub(super) struct EventFilter {
    /// Lowercase extensions without the dot; empty accepts every file.
    extensions: Vec<String>,
}

impl EventFilter {
    pub(super) fn new(extensions: &[String]) -> Self {
        Self {
            extensions: extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    /// Paths of `event` that represent a write to a watched source file.
    pub(super) fn written_paths<'a>(
        &'a self,
        event: &'a notify::Event,
    ) -> impl Iterator<Item = &'a PathBuf> + 'a {
        let is_write = match event.kind {
            // Metadata-only changes (mtime/atime/chmod) are not writes
            EventKind::Modify(ModifyKind::Metadata(_)) => false,
            EventKind::Modify(_) => true,
            // Atomic-save editors replace the file instead of writing it
            EventKind::Create(notify::event::CreateKind::Folder) => false,
            EventKind::Create(_) => true,
            _ => false,
        };

        event
            .paths
            .iter()
            .filter(move |path| is_write && self.matches(path))
    }

    fn matches(&self, path: &Path) -> bool {
        if is_temp_file(path) {
            return false;
        }
        if self.extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .is_some_and(|e| self.extensions.contains(&e))
    }
}

/// Check if path is a temp/backup file (editor artifacts).
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}
