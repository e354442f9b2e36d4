//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from reading or checking `mcdk.toml`
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("malformed config file")]
    Toml(#[from] toml::de::Error),

    #[error("invalid setting: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_names_path() {
        let err = ConfigError::Io(
            PathBuf::from("/proj/mcdk.toml"),
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert_eq!(err.to_string(), "cannot read `/proj/mcdk.toml`");
        assert!(std::error::Error::source(&err).is_some());
    }
}
