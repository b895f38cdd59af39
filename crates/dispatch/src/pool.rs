//! Dispatch pool: a fixed set of folder workers and the barrier that
//! awaits them.

use std::time::Duration;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::DispatchConfig;
use crate::error::ConfigError;
use crate::worker::{FolderWorker, WorkerReport};

/// Hard ceiling on how long one dispatch run may take.
pub const DISPATCH_WAIT_CEILING: Duration = Duration::from_secs(60 * 60);

/// Outcome of one dispatch run.
#[derive(Debug)]
pub struct DispatchReport {
    /// Reports from the workers that finished before the ceiling.
    pub workers: Vec<WorkerReport>,
    /// Whether the ceiling elapsed and still-running workers were
    /// abandoned.
    pub timed_out: bool,
}

/// Runs a bounded number of folder workers concurrently and waits for
/// collective completion.
pub struct DispatchPool {
    config: DispatchConfig,
    wait_ceiling: Duration,
    cancel: CancellationToken,
}

impl DispatchPool {
    /// Creates a pool over the given configuration, validating it
    /// first so the dispatch invariants hold by construction.
    pub fn new(config: DispatchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            wait_ceiling: DISPATCH_WAIT_CEILING,
            cancel: CancellationToken::new(),
        })
    }

    /// Overrides the completion ceiling. Mainly for tests; the default
    /// is [`DISPATCH_WAIT_CEILING`].
    pub fn with_wait_ceiling(mut self, ceiling: Duration) -> Self {
        self.wait_ceiling = ceiling;
        self
    }

    /// Returns a token that cancels the run's workers when fired.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Starts one worker per assigned folder and blocks until all have
    /// terminated or the ceiling elapses, whichever comes first.
    ///
    /// The requested worker count is clamped to the number of folders;
    /// folder `i` goes to worker `i`, and leftover folders are dropped
    /// for this run, not re-queued. If the ceiling fires, remaining
    /// workers are abandoned mid-flight and the run still reports as
    /// finished.
    pub async fn dispatch(&self) -> DispatchReport {
        let worker_count = self.config.effective_workers();
        let receiver_addr = self.config.receiver_addr();
        info!(
            workers = worker_count,
            folders = self.config.folders.len(),
            receiver = %receiver_addr,
            "dispatch started"
        );

        let mut tasks = JoinSet::new();
        for folder in self.config.folders.iter().take(worker_count) {
            let worker =
                FolderWorker::new(folder.clone(), receiver_addr.clone(), self.cancel.clone());
            tasks.spawn(worker.run());
        }

        let mut workers = Vec::with_capacity(worker_count);
        let all_finished = async {
            while let Some(joined) = tasks.join_next().await {
                match joined {
                    Ok(report) => workers.push(report),
                    Err(e) => warn!(error = %e, "worker task failed"),
                }
            }
        };
        let timed_out = tokio::time::timeout(self.wait_ceiling, all_finished)
            .await
            .is_err();

        if timed_out {
            warn!(
                ceiling_secs = self.wait_ceiling.as_secs(),
                "wait ceiling elapsed, abandoning remaining workers"
            );
            self.cancel.cancel();
            tasks.abort_all();
        }

        let sent: usize = workers.iter().map(|w| w.sent).sum();
        let skipped: usize = workers.iter().map(|w| w.skipped).sum();
        info!(sent, skipped, timed_out, "dispatch finished");

        DispatchReport { workers, timed_out }
    }
}
