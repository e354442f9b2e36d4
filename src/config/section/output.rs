//! `[output]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [output]
//! filter = true                 # only show lines containing filter_marker
//! filter_marker = "[Python] "
//! noise = [" [INFO][Engine] "]  # stdout lines containing these are dropped
//! ```

use serde::{Deserialize, Serialize};

/// Child output presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub filter: bool,
    pub filter_marker: String,
    pub noise: Vec<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            filter: false,
            filter_marker: "[Python] ".into(),
            noise: vec![" [INFO][Engine] ".into()],
        }
    }
}

impl OutputConfig {
    /// Marker a line must contain to be shown, if filtering is on.
    pub fn required_marker(&self) -> Option<&str> {
        self.filter.then_some(self.filter_marker.as_str())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_output_defaults() {
        let config = test_parse_config("");
        assert!(!config.output.filter);
        assert_eq!(config.output.required_marker(), None);
        assert_eq!(config.output.noise, vec![" [INFO][Engine] "]);
    }

    #[test]
    fn test_output_filter_on() {
        let config = test_parse_config("[output]\nfilter = true\nfilter_marker = \"[Py]\"");
        assert_eq!(config.output.required_marker(), Some("[Py]"));
    }
}
