//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Game development session controller
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: mcdk.toml)
    #[arg(short = 'C', long, global = true, default_value = "mcdk.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Launch the game and supervise the session
    #[command(visible_alias = "r")]
    Run {
        #[command(flatten)]
        args: RunArgs,
    },

    /// Write a default mcdk.toml into the current directory
    #[command(visible_alias = "i")]
    Init,
}

/// `run` command arguments.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Launch without the file watcher and debug channel
    #[arg(long)]
    pub no_hot_reload: bool,

    /// Override `game.executable`
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub exe: Option<PathBuf>,

    /// Extra arguments passed to the game (after `--`)
    #[arg(last = true, value_name = "ARGS")]
    pub child_args: Vec<String>,
}
