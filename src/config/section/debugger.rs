//! `[debugger]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [debugger]
//! enabled = true
//! port = 5632
//! command = "mcdbg"    # launched as `mcdbg --pid <pid> --port <port>`
//! ```

use serde::{Deserialize, Serialize};

/// External debugger attach settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebuggerConfig {
    pub enabled: bool,
    pub port: u16,
    pub command: String,
}

impl Default for DebuggerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: 5632,
            command: "mcdbg".into(),
        }
    }
}
