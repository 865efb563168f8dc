//! Ordered concurrent execution of encoding jobs.
//!
//! One tokio task per job. Each task owns its [`EncodeJob`] outright —
//! dispatch moves the job into the task, so there is no shared staging
//! state to lock. Computation runs fully concurrently; only the emission
//! of each [`JobOutcome`] is serialized, through an [`OrderedGate`], so
//! the sink observes outcomes in strict input order no matter which job
//! finishes first.
//!
//! Known limitation, kept deliberately: a worker that never completes
//! (e.g. a hung remote exchange) stalls every job with a higher index.
//! There is no per-job timeout at this layer.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::error::ShannonError;
use crate::gate::OrderedGate;
use crate::job::{EncodeJob, EncodedLine, JobOutcome};

/// Runs a batch of jobs concurrently and emits their outcomes in input
/// order. Stateless across runs; a runner is consumed by [`run`].
///
/// [`run`]: OrderedJobRunner::run
pub struct OrderedJobRunner;

impl OrderedJobRunner {
    /// Dispatch every job to its own task, applying `work` to produce the
    /// encoded result (locally or via a remote authority), and send each
    /// [`JobOutcome`] into `sink` in index order.
    ///
    /// A job whose `work` fails still takes its turn and emits an error
    /// outcome, so its slot is preserved. Returns once every worker has
    /// been joined.
    ///
    /// # Panics
    ///
    /// Re-raises any worker panic. The only panic source inside a worker
    /// is an ordering-barrier violation, which invalidates the guarantee
    /// for the whole run.
    pub async fn run<F, Fut>(
        jobs: Vec<EncodeJob>,
        work: F,
        sink: mpsc::Sender<JobOutcome>,
    ) -> Result<(), ShannonError>
    where
        F: Fn(EncodeJob) -> Fut + Clone + Send + 'static,
        Fut: Future<Output = Result<EncodedLine, ShannonError>> + Send + 'static,
    {
        let gate = Arc::new(OrderedGate::new());
        let mut handles = Vec::with_capacity(jobs.len());

        for job in jobs {
            let gate = Arc::clone(&gate);
            let sink = sink.clone();
            let work = work.clone();

            handles.push(tokio::spawn(async move {
                let index = job.index;
                let line = job.line.clone();

                let result = work(job).await;
                debug!(index, ok = result.is_ok(), "job computed, waiting for turn");

                gate.wait_for_turn(index).await;
                // If the consumer is gone there is nobody left to observe
                // ordering; still advance so sibling workers can drain.
                let _ = sink.send(JobOutcome { index, line, result }).await;
                gate.advance();
            }));
        }

        for handle in handles {
            if let Err(e) = handle.await {
                if e.is_panic() {
                    std::panic::resume_unwind(e.into_panic());
                }
                return Err(ShannonError::WorkerAborted);
            }
        }
        Ok(())
    }
}
