//! Error types for configuration and stream decoding.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid endpoint url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("max_data_points must be greater than zero")]
    ZeroCapacity,
    #[error("reconnect delay must be greater than zero")]
    ZeroReconnectDelay,
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Reasons a single stream message is dropped. Never fatal to the connection.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("malformed metrics payload: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("binary frame is not valid UTF-8")]
    NotText,
}
