//! Launch supervisor and output multiplexer.
//!
//! Startup order:
//!
//! 1. debug channel server (its port goes into the child's environment)
//! 2. child process with piped stdout/stderr
//! 3. one reader thread per pipe
//! 4. optional debugger attach
//! 5. hot-reload coordinator bound to the child's pid
//!
//! Teardown runs in reverse once the child exits: coordinator, server,
//! debugger, then the readers are joined. Producers stop before the line
//! consumers go away.

mod classify;
mod debugger;
mod launch;
mod reader;
mod sink;

use std::process::{Child, ExitStatus};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::config::{DevConfig, IPC_PORT_VAR};
use crate::hotreload::{FileMarker, HotReloadCoordinator, ReloadAction, ReloadSettings};
use crate::ipc::{DebugServer, Message};
use crate::{core, debug, log};
pub use classify::{LineClass, StderrRewriter, StdoutClassifier};
pub use launch::Launch;
pub use reader::{LineBuffer, spawn_reader};
pub use sink::{ConsoleSink, LineSink};

/// Child exit poll interval.
const WAIT_POLL: Duration = Duration::from_millis(50);

/// Run one development session until the child exits.
///
/// Setup failures (bind, spawn, pipes) are returned before any watcher
/// starts. A hot-reload start failure only disables hot reload.
pub fn run_session(config: &DevConfig, sink: Arc<dyn LineSink>) -> Result<ExitStatus> {
    let server = Arc::new(DebugServer::new());
    let port = if config.hot_reload.enabled {
        let port = server
            .start()
            .context("Failed to start debug channel server")?;
        log!("ipc"; "debug channel listening on 127.0.0.1:{}", port);
        Some(port)
    } else {
        None
    };

    let mut launch = Launch::from_config(&config.game);
    if config.game.working_dir.is_none() && !config.root.as_os_str().is_empty() {
        launch = launch.cwd(&config.root);
    }
    if let Some(port) = port {
        launch = launch.env(IPC_PORT_VAR, port.to_string());
    }

    let mut child = launch.spawn()?;
    let pid = child.id();
    log!("serve"; "started {} (pid {})", launch.program_name(), pid);

    let readers = match spawn_readers(config, &mut child, &sink) {
        Ok(readers) => readers,
        Err(e) => {
            let _ = child.kill();
            let _ = child.wait();
            return Err(e);
        }
    };

    let debugger = if config.debugger.enabled {
        match debugger::attach(&config.debugger, pid) {
            Ok(handle) => {
                log!("debugger"; "attached on port {}", config.debugger.port);
                Some(handle)
            }
            Err(e) => {
                log!("debugger"; "warning: {:#}", e);
                None
            }
        }
    } else {
        None
    };

    let mut coordinator = config.hot_reload.enabled.then(|| {
        let mut coordinator = HotReloadCoordinator::new(
            ReloadSettings::from_config(&config.hot_reload),
            FileMarker::new(&config.hot_reload.marker),
            reload_action(Arc::clone(&server)),
        );
        if let Err(e) = coordinator.start(pid) {
            log!("reload"; "hot reload disabled: {}", e);
        }
        coordinator
    });

    let status = wait_child(&mut child);
    if status.is_err() {
        // Readers only finish once the child's pipes close
        let _ = child.kill();
        let _ = child.wait();
    }

    if let Some(coordinator) = coordinator.as_mut() {
        coordinator.stop();
    }
    server.stop();
    if let Some(handle) = debugger {
        debugger::release(handle);
    }
    for reader in readers {
        if reader.join().is_err() {
            log!("serve"; "output reader panicked");
        }
    }

    let status = status?;
    log!("serve"; "process exited with {}", status);
    Ok(status)
}

/// Send each fired module list to every debug client as a reload message.
fn reload_action(server: Arc<DebugServer>) -> ReloadAction {
    Box::new(move |modules: &[String]| {
        let msg = Message::reload_modules(modules);
        let delivered = server
            .send_message(msg.kind, &msg.payload)
            .context("Failed to send reload message")?;
        if delivered == 0 {
            log!("reload"; "no debug client connected, reload skipped");
        }
        Ok(())
    })
}

fn spawn_readers(
    config: &DevConfig,
    child: &mut Child,
    sink: &Arc<dyn LineSink>,
) -> Result<[JoinHandle<()>; 2]> {
    let stdout = child.stdout.take().context("Child stdout is not piped")?;
    let stderr = child.stderr.take().context("Child stderr is not piped")?;
    let required = config.output.required_marker().map(str::to_string);

    let classifier = StdoutClassifier::from_config(&config.output);
    let out_sink = Arc::clone(sink);
    let out = spawn_reader("stdout", stdout, LineBuffer::new(required.clone()), move |line| {
        if let Some(class) = classifier.classify(line) {
            out_sink.emit(class, line);
        }
    })
    .context("Failed to start stdout reader")?;

    let rewriter = StderrRewriter::from_extensions(&config.hot_reload.extensions);
    let err_sink = Arc::clone(sink);
    let err = spawn_reader("stderr", stderr, LineBuffer::new(required), move |line| {
        let (class, text) = rewriter.classify(line);
        err_sink.emit(class, &text);
    })
    .context("Failed to start stderr reader")?;

    Ok([out, err])
}

/// Block until the child exits, killing it on a shutdown request.
fn wait_child(child: &mut Child) -> Result<ExitStatus> {
    loop {
        if let Some(status) = child.try_wait().context("Failed to query child status")? {
            return Ok(status);
        }
        if core::is_shutdown() {
            debug!("serve"; "shutdown requested, killing pid {}", child.id());
            let _ = child.kill();
            return child.wait().context("Failed to wait for child");
        }
        thread::sleep(WAIT_POLL);
    }
}

#[cfg(test)]
mod tests;
