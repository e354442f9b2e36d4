//! `[game]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [game]
//! executable = "C:/MCStudioDownload/game/Minecraft.Windows.exe"
//! args = ["chatExtension=false"]
//! working_dir = "./run"        # optional, defaults to the project root
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Child process launch settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Path to the executable to launch.
    pub executable: PathBuf,

    /// Arguments passed to the executable.
    pub args: Vec<String>,

    /// Working directory of the child.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::config::test_parse_config;

    #[test]
    fn test_game_config() {
        let config = test_parse_config(
            "[game]\nexecutable = \"/opt/game/bin\"\nargs = [\"a=1\", \"b\"]\nworking_dir = \"run\"",
        );
        assert_eq!(config.game.executable, PathBuf::from("/opt/game/bin"));
        assert_eq!(config.game.args, vec!["a=1", "b"]);
        assert_eq!(config.game.working_dir, Some(PathBuf::from("run")));
    }

    #[test]
    fn test_game_config_defaults() {
        let config = test_parse_config("");
        assert!(config.game.executable.as_os_str().is_empty());
        assert!(config.game.args.is_empty());
        assert!(config.game.working_dir.is_none());
    }
}
