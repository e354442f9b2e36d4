//! Configuration section definitions.

mod debugger;
mod game;
mod hot_reload;
mod output;

pub use debugger::DebuggerConfig;
pub use game::GameConfig;
pub use hot_reload::{HotReloadConfig, ModDirEntry};
pub use output::OutputConfig;
