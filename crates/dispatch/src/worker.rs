//! Folder worker: streams every regular file in one folder to the
//! receiver.
//!
//! One TCP connection per file, never reused. The socket, its buffered
//! writer and the source file handle are dropped together on every exit
//! path, so a failed transfer poisons only that one file.

use std::path::{Path, PathBuf};

use fileferry_wire::{FrameHeader, write_frame};
use tokio::io::BufWriter;
use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::DispatchError;

/// Per-folder counters handed back to the dispatch pool.
#[derive(Debug, Clone)]
pub struct WorkerReport {
    /// Folder this worker was bound to.
    pub folder: PathBuf,
    /// Files fully sent.
    pub sent: usize,
    /// Files skipped after a stat, connect or transfer failure.
    pub skipped: usize,
}

/// A worker bound to exactly one source folder.
pub struct FolderWorker {
    folder: PathBuf,
    receiver_addr: String,
    cancel: CancellationToken,
}

impl FolderWorker {
    pub fn new(folder: PathBuf, receiver_addr: String, cancel: CancellationToken) -> Self {
        Self {
            folder,
            receiver_addr,
            cancel,
        }
    }

    /// Processes the folder end-to-end.
    ///
    /// Regular files are sent one at a time, in whatever order the
    /// directory enumeration yields; subdirectories are never descended
    /// into. Per-file failures are logged and skipped. A failure of the
    /// enumeration itself terminates the worker with whatever it
    /// managed so far.
    pub async fn run(self) -> WorkerReport {
        let mut report = WorkerReport {
            folder: self.folder.clone(),
            sent: 0,
            skipped: 0,
        };

        let mut entries = match tokio::fs::read_dir(&self.folder).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(folder = %self.folder.display(), error = %e, "failed to list folder");
                return report;
            }
        };

        loop {
            if self.cancel.is_cancelled() {
                debug!(folder = %self.folder.display(), "worker cancelled");
                break;
            }

            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    warn!(folder = %self.folder.display(), error = %e, "folder enumeration failed");
                    break;
                }
            };

            let path = entry.path();

            // Follows symlinks, like the size query itself.
            let metadata = match tokio::fs::metadata(&path).await {
                Ok(m) => m,
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "failed to stat file, skipping");
                    report.skipped += 1;
                    continue;
                }
            };
            if !metadata.is_file() {
                continue;
            }

            match self.send_file(&path, metadata.len()).await {
                Ok(()) => {
                    debug!(file = %path.display(), size = metadata.len(), "file sent");
                    report.sent += 1;
                }
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "failed to send file, skipping");
                    report.skipped += 1;
                }
            }
        }

        info!(
            folder = %self.folder.display(),
            sent = report.sent,
            skipped = report.skipped,
            "folder complete"
        );
        report
    }

    /// Sends one file over a fresh connection.
    ///
    /// The size was measured before this call and is not re-checked; a
    /// file shrinking underneath the transfer surfaces as an
    /// unexpected-EOF wire error on this file only.
    async fn send_file(&self, path: &Path, file_size: u64) -> Result<(), DispatchError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| DispatchError::InvalidFileName(path.to_path_buf()))?;

        // One connection per file, opened only after the size query.
        // No explicit connect timeout; the OS default applies.
        let stream = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(DispatchError::Cancelled),
            result = TcpStream::connect(self.receiver_addr.as_str()) => result?,
        };

        let mut source = tokio::fs::File::open(path).await?;
        let mut writer = BufWriter::new(stream);

        let header = FrameHeader {
            file_name: file_name.into(),
            file_size: file_size as i64,
        };
        write_frame(&mut writer, &header, &mut source).await?;

        Ok(())
    }
}
