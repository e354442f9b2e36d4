use thiserror::Error;

/// Errors raised while starting the hot-reload coordinator.
#[derive(Debug, Error)]
pub enum ReloadError {
    #[error("none of the configured mod directories can be watched")]
    NoWatchableDirectory,

    #[error("failed to create file watcher: {0}")]
    Notify(#[from] notify::Error),

    #[error("failed to start focus watcher: {0}")]
    Focus(#[source] std::io::Error),
}
