//! Cancellable delayed execution on the tokio runtime.

use std::{future::Future, time::Duration};
use tokio::{task::JoinHandle, time::Instant};

/// Handle to a job started by [`schedule_after`].
///
/// Dropping the handle leaves the job running; call [`CancelHandle::cancel`] to stop it.
#[derive(Debug)]
pub struct CancelHandle {
    task: JoinHandle<()>,
}

impl CancelHandle {
    /// Abort the job. Has no effect if it already finished.
    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Run `job` once `delay` has elapsed, unless cancelled first.
///
/// The delay counts from this call, not from when the spawned task first runs.
/// Must be called from within a tokio runtime.
pub fn schedule_after<F>(delay: Duration, job: F) -> CancelHandle
where
    F: Future<Output = ()> + Send + 'static,
{
    let deadline = Instant::now() + delay;
    let task = tokio::spawn(async move {
        tokio::time::sleep_until(deadline).await;
        job.await;
    });

    CancelHandle { task }
}
