//! `mcdk run`: launch and supervise one session.

use std::process::ExitStatus;
use std::sync::Arc;

use anyhow::Result;

use super::{Cli, RunArgs};
use crate::config::DevConfig;
use crate::session::{ConsoleSink, run_session};

/// Load config, run the session, and return the child's exit status.
pub fn run(cli: &Cli, args: &RunArgs) -> Result<ExitStatus> {
    let config = DevConfig::load(cli, args)?;
    crate::debug!("config"; "root: {}", config.root.display());
    if !config.hot_reload.enabled {
        crate::log!("serve"; "hot reload disabled");
    }
    run_session(&config, Arc::new(ConsoleSink))
}
