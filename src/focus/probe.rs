//! Foreground-owner queries.
//!
//! The only platform capability the focus watcher needs is "which process
//! owns input focus right now". Backends implement [`ForegroundProbe`].

use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Upper bound for one foreground query before the command is killed.
const QUERY_TIMEOUT: Duration = Duration::from_millis(500);

const QUERY_POLL: Duration = Duration::from_millis(5);

/// Reports the process id that currently owns input focus.
pub trait ForegroundProbe: Send + Sync {
    /// `None` when the owner cannot be determined.
    fn foreground_pid(&self) -> Option<u32>;

    /// Whether `pid` owns focus. Query failures count as "not foreground".
    fn is_foreground(&self, pid: u32) -> bool {
        self.foreground_pid() == Some(pid)
    }
}

/// Treats the tracked process as permanently focused.
///
/// Used when focus gating is disabled or no backend is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysForeground;

impl ForegroundProbe for AlwaysForeground {
    fn foreground_pid(&self) -> Option<u32> {
        None
    }

    fn is_foreground(&self, _pid: u32) -> bool {
        true
    }
}

/// Runs an external command that prints the foreground pid on stdout.
#[derive(Debug, Clone)]
pub struct CommandProbe {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandProbe {
    /// Build from a command array (e.g. `["xdotool", "getactivewindow", "getwindowpid"]`).
    pub fn from_slice(cmd: &[String]) -> Option<Self> {
        let (program, args) = cmd.split_first()?;
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
            timeout: QUERY_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Platform default, if its tool is installed.
    pub fn platform_default() -> Option<Self> {
        #[cfg(all(unix, not(target_os = "macos")))]
        {
            which::which("xdotool").ok().map(|path| Self {
                program: path.to_string_lossy().into_owned(),
                args: vec!["getactivewindow".to_string(), "getwindowpid".to_string()],
                timeout: QUERY_TIMEOUT,
            })
        }
        #[cfg(not(all(unix, not(target_os = "macos"))))]
        {
            None
        }
    }
}

impl ForegroundProbe for CommandProbe {
    fn foreground_pid(&self) -> Option<u32> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .ok()?;

        // A hung backend must not stall the focus poll thread.
        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if Instant::now() < deadline => thread::sleep(QUERY_POLL),
                Ok(None) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    crate::debug!("focus"; "`{}` timed out after {:?}", self.program, self.timeout);
                    return None;
                }
                Err(_) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return None;
                }
            }
        };
        if !status.success() {
            return None;
        }

        let mut stdout = String::new();
        child.stdout.take()?.read_to_string(&mut stdout).ok()?;
        parse_pid(&stdout)
    }
}

/// First whitespace-separated token that parses as a pid.
fn parse_pid(text: &str) -> Option<u32> {
    text.split_whitespace().find_map(|tok| tok.parse().ok())
}
