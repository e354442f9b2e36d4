//! Hot-reload coordinator.
//!
//! Joins the two event sources and decides when the child is told to reload:
//!
//! ```text
//! ChangeWatcher ──file_changed──┐
//!                               ├─► ReloadGate ─► ModuleResolver ─► action(&[module])
//! FocusWatcher ──focus_changed──┘
//! ```
//!
//! The gate and the pending path set live behind one lock. A fire drains the
//! set and resolves module names while that lock is held, so two triggers
//! arriving together never share or lose pending paths.

mod error;
mod gate;
mod module;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::config::HotReloadConfig;
use crate::focus::{AlwaysForeground, CommandProbe, FocusWatcher, ForegroundProbe};
use crate::watch::{ChangeWatcher, WatchOptions};
pub use error::ReloadError;
pub use gate::ReloadGate;
pub use module::{FileMarker, MarkerLocator, ModuleResolver};

/// Receives the dotted module names of each fired reload.
pub type ReloadAction = Box<dyn Fn(&[String]) -> anyhow::Result<()> + Send + Sync>;

/// Everything the coordinator needs besides the process id.
pub struct ReloadSettings {
    pub dirs: Vec<PathBuf>,
    pub extensions: Vec<String>,
    pub debounce: Duration,
    pub focus_poll: Duration,
    pub probe: Arc<dyn ForegroundProbe>,
}

impl ReloadSettings {
    pub fn from_config(config: &HotReloadConfig) -> Self {
        Self {
            dirs: config.watched_dirs(),
            extensions: config.extensions.clone(),
            debounce: Duration::from_millis(config.debounce_ms),
            focus_poll: Duration::from_millis(config.focus_poll_ms),
            probe: select_probe(config),
        }
    }
}

/// Pick the foreground backend for `config`.
///
/// Without any usable backend every edit reloads right away, which is
/// announced once here.
pub fn select_probe(config: &HotReloadConfig) -> Arc<dyn ForegroundProbe> {
    if !config.focus_gate {
        return Arc::new(AlwaysForeground);
    }
    if let Some(cmd) = &config.focus_command {
        return match CommandProbe::from_slice(cmd) {
            Some(probe) => Arc::new(probe),
            None => {
                crate::log!("focus"; "`focus_command` is empty, reloading without focus gating");
                Arc::new(AlwaysForeground)
            }
        };
    }
    match CommandProbe::platform_default() {
        Some(probe) => Arc::new(probe),
        None => {
            crate::log!("focus"; "no foreground query available, reloading without focus gating");
            Arc::new(AlwaysForeground)
        }
    }
}

struct Shared {
    gate: Mutex<ReloadGate>,
    resolver: ModuleResolver,
    action: ReloadAction,
}

impl Shared {
    fn on_file_changed(&self, path: &Path) -> anyhow::Result<()> {
        crate::log!("reload"; "changed: {}", path.display());
        let modules = {
            let mut gate = self.gate.lock();
            gate.file_changed(path.to_path_buf())
                .map(|paths| self.resolve(&paths))
        };
        self.deliver(modules)
    }

    fn on_focus_changed(&self, is_foreground: bool) -> anyhow::Result<()> {
        let modules = {
            let mut gate = self.gate.lock();
            gate.focus_changed(is_foreground)
                .map(|paths| self.resolve(&paths))
        };
        self.deliver(modules)
    }

    fn resolve(&self, paths: &[PathBuf]) -> Vec<String> {
        let mut modules = Vec::with_capacity(paths.len());
        for path in paths {
            match self.resolver.module_name(path) {
                Some(name) if !modules.contains(&name) => modules.push(name),
                Some(_) => {}
                None => crate::debug!("reload"; "no module for {}", path.display()),
            }
        }
        modules
    }

    fn deliver(&self, modules: Option<Vec<String>>) -> anyhow::Result<()> {
        match modules {
            Some(modules) if !modules.is_empty() => {
                crate::log!("reload"; "reloading {} module(s): {}", modules.len(), modules.join(", "));
                (self.action)(&modules)
            }
            _ => Ok(()),
        }
    }
}

/// Drives one watch session and one focus session for a child process.
pub struct HotReloadCoordinator {
    settings: ReloadSettings,
    shared: Arc<Shared>,
    watcher: Option<ChangeWatcher>,
    focus: Option<FocusWatcher>,
}

impl HotReloadCoordinator {
    pub fn new(
        settings: ReloadSettings,
        locator: impl MarkerLocator + 'static,
        action: ReloadAction,
    ) -> Self {
        let resolver = ModuleResolver::new(locator, &settings.dirs, &settings.extensions);
        Self {
            settings,
            shared: Arc::new(Shared {
                gate: Mutex::new(ReloadGate::new()),
                resolver,
                action,
            }),
            watcher: None,
            focus: None,
        }
    }

    /// Start watching for `pid`. No-op if already running.
    ///
    /// Either source failing leaves the coordinator fully stopped.
    pub fn start(&mut self, pid: u32) -> Result<(), ReloadError> {
        if self.is_running() {
            return Ok(());
        }

        let options = WatchOptions {
            debounce: self.settings.debounce,
            extensions: self.settings.extensions.clone(),
        };
        let shared = Arc::clone(&self.shared);
        let watcher = ChangeWatcher::spawn(&self.settings.dirs, options, move |path| {
            shared.on_file_changed(path)
        })?
        .ok_or(ReloadError::NoWatchableDirectory)?;

        for root in watcher.roots() {
            crate::log!("watch"; "watching {}", root.display());
        }

        let shared = Arc::clone(&self.shared);
        let focus = FocusWatcher::spawn(
            pid,
            Arc::clone(&self.settings.probe),
            self.settings.focus_poll,
            move |is_foreground| shared.on_focus_changed(is_foreground),
        )
        .map_err(ReloadError::Focus)?;

        self.watcher = Some(watcher);
        self.focus = Some(focus);
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.watcher.is_some()
    }

    /// Stop both sources and join them. Idempotent.
    pub fn stop(&mut self) {
        if let Some(mut watcher) = self.watcher.take() {
            watcher.stop();
        }
        if let Some(mut focus) = self.focus.take() {
            focus.stop();
        }
    }
}

impl Drop for HotReloadCoordinator {
    fn drop(&mut self) {
        self.stop();
    }
}
