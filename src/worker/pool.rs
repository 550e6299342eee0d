//! Worker pool management.
//!
//! Workers are driven in rounds: the pool hands every worker the same task,
//! then blocks until every worker has reported back.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender};
use tracing::{debug, error};

use crate::crypto::CryptoError;

use super::cpu::{CpuWorker, SearchTask, VanityResult};

/// Failures that end a search. None of them are retried.
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("Pool needs at least one worker")]
    NoWorkers,

    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Worker {worker_id} hit an invalid key: {source}")]
    Crypto {
        worker_id: usize,
        #[source]
        source: CryptoError,
    },

    #[error("Worker {worker_id} panicked: {message}")]
    WorkerPanicked { worker_id: usize, message: String },

    #[error("Worker {0} is no longer running")]
    WorkerGone(usize),

    #[error("All workers exited before reporting")]
    Disconnected,
}

/// One worker's answer for one round.
#[derive(Debug)]
pub struct WorkerReport {
    pub worker_id: usize,
    pub outcome: Result<Option<VanityResult>, PoolError>,
}

/// A fixed set of worker threads executing synchronous rounds.
pub struct WorkerPool {
    /// Number of workers
    num_workers: usize,
    /// One job channel per worker, so each gets exactly one task per round
    job_txs: Vec<Sender<Arc<SearchTask>>>,
    /// Channel receiver for reports
    report_rx: Receiver<WorkerReport>,
    /// Worker thread handles (Option to allow taking during join)
    handles: Option<Vec<JoinHandle<()>>>,
}

impl WorkerPool {
    /// Spawns `num_workers` worker threads.
    pub fn new(num_workers: usize) -> Result<Self, PoolError> {
        if num_workers == 0 {
            return Err(PoolError::NoWorkers);
        }

        let (report_tx, report_rx) = bounded(num_workers);
        let mut job_txs = Vec::with_capacity(num_workers);
        let mut handles = Vec::with_capacity(num_workers);

        for id in 0..num_workers {
            let (job_tx, job_rx) = bounded::<Arc<SearchTask>>(1);
            let report_tx = report_tx.clone();

            let handle = thread::Builder::new()
                .name(format!("deploy-vanity-worker-{}", id))
                .spawn(move || CpuWorker::new(id).run(job_rx, report_tx))?;

            job_txs.push(job_tx);
            handles.push(handle);
        }

        // Only workers hold senders, so recv fails once they are all gone
        drop(report_tx);
        debug!(workers = num_workers, "worker pool started");

        Ok(Self {
            num_workers,
            job_txs,
            report_rx,
            handles: Some(handles),
        })
    }

    /// Runs one round: dispatches `task` to every worker and waits for all
    /// of them to finish.
    ///
    /// Returns every match found this round, in collection order. Any worker
    /// failure fails the round, but only after all reports are in.
    pub fn run_round(&self, task: &Arc<SearchTask>) -> Result<Vec<VanityResult>, PoolError> {
        let mut pending = 0;
        let mut failure = None;

        for (id, job_tx) in self.job_txs.iter().enumerate() {
            if job_tx.send(Arc::clone(task)).is_err() {
                failure.get_or_insert(PoolError::WorkerGone(id));
            } else {
                pending += 1;
            }
        }

        let mut found = Vec::new();
        for _ in 0..pending {
            let report = self.report_rx.recv().map_err(|_| PoolError::Disconnected)?;
            match report.outcome {
                Ok(Some(result)) => found.push(result),
                Ok(None) => {}
                Err(e) => {
                    error!(worker = report.worker_id, error = %e, "worker failed");
                    failure.get_or_insert(e);
                }
            }
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(found),
        }
    }

    /// Returns the number of workers.
    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Stops all workers and waits for them to exit.
    pub fn join(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        // Closing the job channels ends each worker's loop
        self.job_txs.clear();
        if let Some(handles) = self.handles.take() {
            for handle in handles {
                let _ = handle.join();
            }
            debug!(workers = self.num_workers, "worker pool stopped");
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}
