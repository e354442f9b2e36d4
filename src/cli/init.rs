//! `mcdk init`: write a default config file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::config::{CONFIG_FILE, DevConfig};
use crate::log;

/// Write `mcdk.toml` into `dir`, refusing to overwrite an existing one.
pub fn init_config(dir: &Path) -> Result<()> {
    let path = dir.join(CONFIG_FILE);
    if path.exists() {
        bail!("{} already exists", path.display());
    }

    let content = DevConfig::default_toml()?;
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    log!("init"; "created {}", path.display());
    Ok(())
}
