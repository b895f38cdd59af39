//! Bounded folder dispatch over TCP.
//!
//! A fixed-size pool of workers, one per source folder, each streaming
//! that folder's regular files to a remote receiver: one connection and
//! one wire frame per file (see `fileferry-wire`). Folders are assigned
//! to workers 1:1 up front; a worker that finishes early never picks up
//! another worker's files. Workers share nothing mutable, so the pool's
//! join barrier is the only synchronization in the system.

pub mod config;
pub mod error;
pub mod pool;
pub mod worker;

// Re-export primary types for convenience.
pub use config::DispatchConfig;
pub use error::{ConfigError, DispatchError};
pub use pool::{DISPATCH_WAIT_CEILING, DispatchPool, DispatchReport};
pub use worker::{FolderWorker, WorkerReport};
