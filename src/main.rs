//! mcdk - launch a game, stream its logs, hot-reload mods on save.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use mcdk::cli::{self, Cli, Commands};
use mcdk::{core, log, logger};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    match &cli.command {
        Commands::Init => {
            let cwd = std::env::current_dir()?;
            cli::init::init_config(&cwd)
        }
        Commands::Run { args } => {
            let status = cli::run::run(&cli, args)?;
            if status.success() {
                return Ok(());
            }
            let code = status.code().unwrap_or(if core::is_shutdown() { 130 } else { 1 });
            log!("serve"; "exit code {}", code);
            std::process::exit(code);
        }
    }
}
