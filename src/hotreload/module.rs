//! Changed file path → dotted module name.

use std::path::{Component, Path, PathBuf};

use rustc_hash::FxHashSet;

/// Reports whether a directory is the root of a module tree.
pub trait MarkerLocator: Send + Sync {
    fn has_marker(&self, dir: &Path) -> bool;
}

/// Looks for a named marker file (e.g. `manifest.json`).
#[derive(Debug, Clone)]
pub struct FileMarker {
    name: String,
}

impl FileMarker {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl MarkerLocator for FileMarker {
    fn has_marker(&self, dir: &Path) -> bool {
        dir.join(&self.name).exists()
    }
}

/// Resolves module names relative to the nearest marker directory.
pub struct ModuleResolver {
    locator: Box<dyn MarkerLocator>,
    /// Watched mod directories; the upward search never enters one.
    boundaries: FxHashSet<PathBuf>,
    /// Lowercase extensions stripped from the last segment.
    extensions: Vec<String>,
}

impl ModuleResolver {
    pub fn new(locator: impl MarkerLocator + 'static, boundaries: &[PathBuf], extensions: &[String]) -> Self {
        Self {
            locator: Box::new(locator),
            boundaries: boundaries
                .iter()
                .map(|dir| std::path::absolute(dir).unwrap_or_else(|_| dir.clone()))
                .collect(),
            extensions: extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    /// Dotted module name for `file`, or `None` if no marker directory is
    /// found before reaching a boundary or the filesystem root.
    ///
    /// With `pkg/manifest.json` present, `pkg/mod/a.py` resolves to `mod.a`.
    pub fn module_name(&self, file: &Path) -> Option<String> {
        let root = self.find_marker_dir(file)?;
        let rel = file.strip_prefix(&root).ok()?;

        let mut parts: Vec<String> = rel
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();

        let last = parts.last_mut()?;
        if let Some(stem) = self.strip_extension(last) {
            *last = stem;
        }
        Some(parts.join("."))
    }

    fn find_marker_dir(&self, file: &Path) -> Option<PathBuf> {
        let mut cur = file.parent()?;
        loop {
            if self.boundaries.contains(cur) {
                return None;
            }
            if self.locator.has_marker(cur) {
                return Some(cur.to_path_buf());
            }
            cur = cur.parent()?;
        }
    }

    fn strip_extension(&self, name: &str) -> Option<String> {
        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() {
            return None;
        }
        let ext = ext.to_ascii_lowercase();
        (self.extensions.is_empty() || self.extensions.contains(&ext)).then(|| stem.to_string())
    }
}
