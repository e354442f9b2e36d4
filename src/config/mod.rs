//! Session configuration management for `mcdk.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── game       # [game]
//! │   ├── hot_reload # [hot_reload]
//! │   ├── output     # [output]
//! │   └── debugger   # [debugger]
//! ├── env.rs         # Environment variable overrides
//! ├── error.rs       # ConfigError
//! └── mod.rs         # DevConfig (this file)
//! ```
//!
//! The session core treats a loaded [`DevConfig`] as a read-only value.

pub mod env;
mod error;
pub mod section;
mod util;

pub use env::{EnvOverrides, IPC_PORT_VAR};
pub use error::ConfigError;
pub use section::{DebuggerConfig, GameConfig, HotReloadConfig, ModDirEntry, OutputConfig};

use util::{find_config_file, resolve_against};

use crate::{
    cli::{Cli, RunArgs},
    log,
};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config file name.
pub const CONFIG_FILE: &str = "mcdk.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing mcdk.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DevConfig {
    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Child process launch settings
    #[serde(default)]
    pub game: GameConfig,

    /// Hot reload settings
    #[serde(default)]
    pub hot_reload: HotReloadConfig,

    /// Child output presentation
    #[serde(default)]
    pub output: OutputConfig,

    /// External debugger attach
    #[serde(default)]
    pub debugger: DebuggerConfig,
}

impl DevConfig {
    /// Load configuration for the `run` command.
    ///
    /// Searches upward from cwd for the config file. A missing file is only
    /// acceptable when the executable is given on the command line.
    pub fn load(cli: &Cli, args: &RunArgs) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let (mut config, root) = match find_config_file(&cli.config) {
            Some(path) => {
                crate::debug!("config"; "using {}", path.display());
                let root = path.parent().map(Path::to_path_buf).unwrap_or_else(|| cwd.clone());
                (Self::from_path(&path)?, root)
            }
            None if args.exe.is_some() => (Self::default(), cwd),
            None => bail!(
                "Config file '{}' not found. Run 'mcdk init' to create one.",
                cli.config.display()
            ),
        };

        config.apply_run_args(args);
        config.finalize(&root, EnvOverrides::from_env());
        config.validate()?;
        Ok(config)
    }

    /// Load and parse a config file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            log!(
                "config";
                "ignoring unknown fields in {}: {}",
                path.display(),
                ignored.join(", ")
            );
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Apply `mcdk run` command-line overrides.
    pub fn apply_run_args(&mut self, args: &RunArgs) {
        if let Some(exe) = &args.exe {
            self.game.executable = exe.clone();
        }
        if args.no_hot_reload {
            self.hot_reload.enabled = false;
        }
        self.game.args.extend(args.child_args.iter().cloned());
    }

    /// Resolve relative paths against `root` and fold in environment overrides.
    pub fn finalize(&mut self, root: &Path, env: EnvOverrides) {
        self.root = root.to_path_buf();

        if !self.game.executable.as_os_str().is_empty() {
            self.game.executable = resolve_executable(root, &self.game.executable);
        }
        if let Some(dir) = &self.game.working_dir {
            self.game.working_dir = Some(resolve_against(root, dir));
        }
        for entry in &mut self.hot_reload.mod_dirs {
            let resolved = resolve_against(root, entry.path());
            entry.set_path(resolved);
        }

        if let Some(port) = env.debugger_port {
            self.debugger.enabled = true;
            self.debugger.port = port;
        }
        if env.subprocess_mode {
            self.hot_reload.enabled = false;
        }
    }

    /// Validate values that cannot be expressed in the schema.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.game.executable.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "`game.executable` is not set".into(),
            ));
        }
        if self.hot_reload.marker.trim().is_empty() {
            return Err(ConfigError::Validation(
                "`hot_reload.marker` must not be empty".into(),
            ));
        }
        if self.hot_reload.debounce_ms == 0 || self.hot_reload.focus_poll_ms == 0 {
            return Err(ConfigError::Validation(
                "`hot_reload.debounce_ms` and `hot_reload.focus_poll_ms` must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Render a default config file for `mcdk init`.
    pub fn default_toml() -> Result<String> {
        toml::to_string_pretty(&Self::default()).context("Failed to serialize default config")
    }
}

/// Bare program names (`python3`) are looked up on PATH at spawn time;
/// anything containing a separator is resolved against the project root.
fn resolve_executable(root: &Path, exe: &Path) -> PathBuf {
    if exe.components().count() == 1 && !exe.is_absolute() {
        exe.to_path_buf()
    } else {
        resolve_against(root, exe)
    }
}

/// Parse config content for tests, asserting there are no unknown fields.
#[cfg(test)]
pub fn test_parse_config(extra: &str) -> DevConfig {
    let (parsed, ignored) = DevConfig::parse_with_ignored(extra).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
