//! Round-based search coordinator.
//!
//! The coordinator loops `dispatch -> collect -> (found | report -> dispatch)`.
//! Every round costs exactly `iterations * workers` candidates, so progress
//! is counted in whole rounds.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::worker::{PoolError, SearchTask, VanityResult, WorkerPool};

/// Default interval between progress reports.
pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Throughput snapshot, recomputed after each round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressStats {
    /// Rounds completed
    pub rounds: u64,
    /// Candidates tried across all workers
    pub iterations: u64,
    /// Wall-clock time since the search started
    pub elapsed: Duration,
}

impl ProgressStats {
    /// Returns candidates per second.
    pub fn rate(&self) -> f64 {
        let elapsed = self.elapsed.as_secs_f64();
        if elapsed > 0.0 {
            self.iterations as f64 / elapsed
        } else {
            0.0
        }
    }
}

/// Circuit breakers checked between rounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Limits {
    /// Stop once this much wall-clock time has passed
    pub max_time: Option<Duration>,
    /// Stop once this many candidates have been tried
    pub max_attempts: Option<u64>,
}

/// Why a search ended without a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Interrupted,
    TimeLimit,
    AttemptLimit,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Interrupted => write!(f, "interrupted"),
            StopReason::TimeLimit => write!(f, "time limit reached"),
            StopReason::AttemptLimit => write!(f, "attempt limit reached"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error("Search stopped ({reason}) after {} iterations", .stats.iterations)]
    Stopped {
        reason: StopReason,
        stats: ProgressStats,
    },
}

/// A successful search.
#[derive(Debug, Clone)]
pub struct Found {
    pub result: VanityResult,
    pub stats: ProgressStats,
}

/// Coordinator-local round bookkeeping.
struct RoundClock {
    started: Instant,
    last_report: Instant,
    rounds: u64,
    per_round: u64,
}

impl RoundClock {
    fn start(per_round: u64) -> Self {
        let now = Instant::now();
        Self {
            started: now,
            last_report: now,
            rounds: 0,
            per_round,
        }
    }

    fn stats(&self) -> ProgressStats {
        ProgressStats {
            rounds: self.rounds,
            iterations: self.rounds.saturating_mul(self.per_round),
            elapsed: self.started.elapsed(),
        }
    }

    /// Returns true at most once per `interval`.
    fn report_due(&mut self, interval: Duration) -> bool {
        let now = Instant::now();
        if now.duration_since(self.last_report) >= interval {
            self.last_report = now;
            true
        } else {
            false
        }
    }
}

/// Drives a [`WorkerPool`] in rounds until a worker finds a match.
pub struct Searcher {
    pool: WorkerPool,
    task: Arc<SearchTask>,
    report_interval: Duration,
    limits: Limits,
    stop_flag: Arc<AtomicBool>,
}

impl Searcher {
    /// Spawns `num_workers` workers that will all run `task`.
    pub fn new(task: SearchTask, num_workers: usize) -> Result<Self, PoolError> {
        Ok(Self {
            pool: WorkerPool::new(num_workers)?,
            task: Arc::new(task),
            report_interval: DEFAULT_REPORT_INTERVAL,
            limits: Limits::default(),
            stop_flag: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Sets the minimum time between progress reports.
    pub fn with_report_interval(mut self, interval: Duration) -> Self {
        self.report_interval = interval;
        self
    }

    /// Sets the between-round circuit breakers.
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Returns a clone of the stop flag for external use (e.g., signal handlers).
    pub fn stop_flag_clone(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    /// Returns the number of workers.
    pub fn num_workers(&self) -> usize {
        self.pool.num_workers()
    }

    /// Returns the task every worker runs.
    pub fn task(&self) -> &SearchTask {
        &self.task
    }

    /// Candidates tried per round across the whole pool.
    pub fn iterations_per_round(&self) -> u64 {
        self.task
            .iterations
            .saturating_mul(self.pool.num_workers() as u64)
    }

    /// Runs rounds until a match is found, a limit trips, or a worker fails.
    ///
    /// `on_progress` is called after unsuccessful rounds, at most once per
    /// report interval. The pool is shut down before this returns.
    pub fn run<F>(self, mut on_progress: F) -> Result<Found, SearchError>
    where
        F: FnMut(&ProgressStats),
    {
        let mut clock = RoundClock::start(self.iterations_per_round());
        info!(
            workers = self.pool.num_workers(),
            per_round = clock.per_round,
            prefix = %self.task.prefix,
            "search started"
        );

        loop {
            if let Some(reason) = self.stop_reason(&clock.stats()) {
                let stats = clock.stats();
                warn!(%reason, iterations = stats.iterations, "search stopped");
                return Err(SearchError::Stopped { reason, stats });
            }

            let found = self.pool.run_round(&self.task)?;
            clock.rounds += 1;
            let stats = clock.stats();
            debug!(
                round = stats.rounds,
                iterations = stats.iterations,
                matches = found.len(),
                "round complete"
            );

            if let Some(result) = found.into_iter().next() {
                info!(
                    rounds = stats.rounds,
                    iterations = stats.iterations,
                    rate = stats.rate() as u64,
                    contract = %result.contract,
                    "match found"
                );
                self.pool.join();
                return Ok(Found { result, stats });
            }

            if clock.report_due(self.report_interval) {
                on_progress(&stats);
            }
        }
    }

    fn stop_reason(&self, stats: &ProgressStats) -> Option<StopReason> {
        if self.stop_flag.load(Ordering::Relaxed) {
            return Some(StopReason::Interrupted);
        }
        if matches!(self.limits.max_time, Some(max) if stats.elapsed >= max) {
            return Some(StopReason::TimeLimit);
        }
        if matches!(self.limits.max_attempts, Some(max) if stats.iterations >= max) {
            return Some(StopReason::AttemptLimit);
        }
        None
    }
}
