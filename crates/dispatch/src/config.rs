//! Validated dispatch configuration.
//!
//! The pool consumes this as its sole entry point. How the values are
//! collected (config file, flags, prompts) is the caller's concern; the
//! rules below are what dispatch relies on.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::ConfigError;

/// Configuration for one dispatch run.
#[derive(Debug, Clone, Deserialize)]
pub struct DispatchConfig {
    /// Requested number of concurrent folder workers.
    pub workers: usize,

    /// Receiver hostname or IP address.
    pub receiver_host: String,

    /// Receiver TCP port.
    pub receiver_port: u16,

    /// Source folders, assigned to workers 1:1 in order.
    pub folders: Vec<PathBuf>,
}

impl DispatchConfig {
    /// Checks the rules the dispatch pool relies on: a positive worker
    /// count, a non-empty host, a non-zero port, and at least one
    /// source folder, each an existing directory.
    ///
    /// Host and port are not validated beyond these rules; a hostname
    /// that does not resolve surfaces later as per-file connect
    /// failures.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        if self.receiver_host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if self.receiver_port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        if self.folders.is_empty() {
            return Err(ConfigError::NoFolders);
        }
        for folder in &self.folders {
            if !folder.is_dir() {
                return Err(ConfigError::NotADirectory(folder.clone()));
            }
        }
        Ok(())
    }

    /// Effective worker count: the requested count clamped to the
    /// number of folders. Never more workers than folders.
    pub fn effective_workers(&self) -> usize {
        self.workers.min(self.folders.len())
    }

    /// Receiver address in `host:port` form.
    pub fn receiver_addr(&self) -> String {
        format!("{}:{}", self.receiver_host, self.receiver_port)
    }
}
