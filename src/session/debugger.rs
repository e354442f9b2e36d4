//! External debugger attach.

use std::process::{Child, Command, Stdio};

use anyhow::{Context, Result};

use crate::config::DebuggerConfig;

/// Launch the configured debugger against `pid`.
///
/// The debugger runs detached from our pipes; its lifetime is its own.
pub fn attach(config: &DebuggerConfig, pid: u32) -> Result<Child> {
    Command::new(&config.command)
        .args(["--pid", &pid.to_string(), "--port", &config.port.to_string()])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| {
            format!(
                "Failed to start debugger `{}`; make sure it is on PATH",
                config.command
            )
        })
}

/// Reap the debugger if it already exited; otherwise leave it running.
pub fn release(mut child: Child) {
    match child.try_wait() {
        Ok(Some(status)) => crate::debug!("debugger"; "exited with {}", status),
        Ok(None) => crate::debug!("debugger"; "still running (pid {})", child.id()),
        Err(e) => crate::debug!("debugger"; "status unavailable: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_debugger_is_error() {
        let config = DebuggerConfig {
            enabled: true,
            port: 5632,
            command: "/nonexistent/mcdbg".into(),
        };
        let err = attach(&config, 1).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/mcdbg"));
    }

    #[cfg(unix)]
    #[test]
    fn test_attach_spawns_command() {
        let config = DebuggerConfig {
            enabled: true,
            port: 7000,
            command: "true".into(),
        };
        let mut child = attach(&config, 42).unwrap();
        assert!(child.wait().unwrap().success());
    }
}
