//! Error types for dispatch.

use std::path::PathBuf;

use fileferry_wire::WireError;

/// Errors produced on the per-file send path.
///
/// These never escape a worker: each one is logged and the worker moves
/// on to the next file.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("wire error: {0}")]
    Wire(#[from] WireError),

    #[error("file name is not valid UTF-8: {}", .0.display())]
    InvalidFileName(PathBuf),

    #[error("cancelled")]
    Cancelled,
}

/// Configuration validation failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("worker count must be positive")]
    ZeroWorkers,

    #[error("receiver host cannot be empty")]
    EmptyHost,

    #[error("receiver port must be in 1..=65535")]
    InvalidPort,

    #[error("at least one source folder must be specified")]
    NoFolders,

    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
}
