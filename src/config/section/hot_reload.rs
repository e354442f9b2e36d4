//! `[hot_reload]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [hot_reload]
//! enabled = true
//! mod_dirs = ["./", { path = "../shared_lib", hot_reload = false }]
//! marker = "manifest.json"     # file marking the root of a module tree
//! extensions = ["py"]          # source files that trigger a reload
//! debounce_ms = 100
//! focus_poll_ms = 100
//! focus_gate = true            # only reload while the game window is focused
//! # focus_command = ["xdotool", "getactivewindow", "getwindowpid"]
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A mod directory entry: either a bare path or a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModDirEntry {
    Path(PathBuf),
    Detailed {
        path: PathBuf,
        #[serde(default = "default_true")]
        hot_reload: bool,
    },
}

impl ModDirEntry {
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::Path(path) | Self::Detailed { path, .. } => path,
        }
    }

    pub fn hot_reload(&self) -> bool {
        match self {
            Self::Path(_) => true,
            Self::Detailed { hot_reload, .. } => *hot_reload,
        }
    }

    pub(crate) fn set_path(&mut self, new: PathBuf) {
        match self {
            Self::Path(path) | Self::Detailed { path, .. } => *path = new,
        }
    }
}

/// Hot reload settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HotReloadConfig {
    /// Master switch. Also controls the debug channel server.
    pub enabled: bool,

    /// Directories holding mod sources.
    pub mod_dirs: Vec<ModDirEntry>,

    /// File name marking the root of a module tree.
    pub marker: String,

    /// Source file extensions (without dot). Empty = every file.
    pub extensions: Vec<String>,

    /// Per-file debounce window in milliseconds.
    pub debounce_ms: u64,

    /// Foreground poll interval in milliseconds.
    pub focus_poll_ms: u64,

    /// Hold reloads until the child owns input focus.
    pub focus_gate: bool,

    /// Command printing the foreground process id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus_command: Option<Vec<String>>,
}

impl Default for HotReloadConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            mod_dirs: vec![ModDirEntry::Path(PathBuf::from("./"))],
            marker: "manifest.json".into(),
            extensions: vec!["py".into()],
            debounce_ms: crate::watch::DEBOUNCE_MS,
            focus_poll_ms: crate::focus::FOCUS_POLL_MS,
            focus_gate: true,
            focus_command: None,
        }
    }
}

impl HotReloadConfig {
    /// Directories that participate in hot reload.
    pub fn watched_dirs(&self) -> Vec<PathBuf> {
        self.mod_dirs
            .iter()
            .filter(|entry| entry.hot_reload())
            .map(|entry| entry.path().clone())
            .collect()
    }
}

fn default_true() -> bool {
    true
}
