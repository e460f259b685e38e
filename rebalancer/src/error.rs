//! Error types for the benchmark runner.

use std::path::PathBuf;

use orderbatch::RebalanceError;

/// All errors that can occur during a runner invocation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error(transparent)]
    Rebalance(#[from] RebalanceError),

    #[error("strategies disagree: {0}")]
    Mismatch(String),

    #[error("audit log error: {0}")]
    Audit(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
