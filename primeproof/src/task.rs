//! Background proof attempts
//!
//! A search runs on its own thread and reports through a oneshot channel, so
//! callers can await it, block on it, or cancel it.

use crate::search::CancellationToken;
use crate::session::ProofSession;
use crate::{ProofError, ProofReport, ProofResult};
use std::thread::{self, JoinHandle};
use tokio::sync::oneshot;
use tracing::debug;

/// Handle to a proof running on a background thread
#[must_use = "dropping the task detaches the search; cancel it to stop it"]
pub struct ProofTask {
    cancel: CancellationToken,
    receiver: oneshot::Receiver<ProofResult<ProofReport>>,
    handle: JoinHandle<()>,
}

impl ProofTask {
    pub(crate) fn spawn(mut session: ProofSession) -> ProofResult<Self> {
        let cancel = session.cancellation_token();
        let (sender, receiver) = oneshot::channel();

        let handle = thread::Builder::new()
            .name("primeproof-search".to_string())
            .spawn(move || {
                let result = session.run();
                if sender.send(result).is_err() {
                    debug!("Proof task finished after its handle was dropped");
                }
            })
            .map_err(|e| ProofError::Engine(format!("Failed to spawn search thread: {}", e)))?;

        Ok(Self {
            cancel,
            receiver,
            handle,
        })
    }

    /// Ask the search to stop at its next frontier pop
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the report without blocking the async runtime
    pub async fn wait(self) -> ProofResult<ProofReport> {
        self.receiver.await.map_err(|_| worker_lost())?
    }

    /// Block the current thread until the report is available
    ///
    /// Must not be called from within an async runtime; use
    /// [`ProofTask::wait`] there.
    pub fn wait_blocking(self) -> ProofResult<ProofReport> {
        self.receiver.blocking_recv().map_err(|_| worker_lost())?
    }
}

fn worker_lost() -> ProofError {
    ProofError::Engine("Search thread exited without reporting a result".to_string())
}
