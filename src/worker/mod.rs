//! Worker pool for parallel vanity contract address search.
//!
//! This module provides:
//! - The per-thread search loop over freshly drawn keys or salts
//! - A fixed pool of worker threads driven in synchronous rounds

mod cpu;
mod pool;

pub use cpu::{CpuWorker, SearchMode, SearchTask, VanityResult, BATCH_SIZE};
pub use pool::{PoolError, WorkerPool, WorkerReport};
