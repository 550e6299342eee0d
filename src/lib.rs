//! # deploy_vanity
//!
//! Vanity contract address search for CREATE and CREATE2 deployments.
//!
//! ## Architecture
//!
//! - `crypto`: Sender and contract address derivation
//! - `matcher`: Two-stage checksum prefix matching
//! - `worker`: Per-thread search loop and the worker pool
//! - `search`: Round-based coordinator and progress accounting
//! - `config`: Runtime configuration

pub mod config;
pub mod crypto;
pub mod matcher;
pub mod search;
pub mod worker;

pub use config::{Config, ConfigError};
pub use crypto::{Address, CryptoError, DeploymentParams, LegacyNonce};
pub use matcher::{Prefix, PrefixError};
pub use search::{Found, Limits, ProgressStats, SearchError, Searcher, StopReason};
pub use worker::{PoolError, SearchMode, SearchTask, VanityResult, WorkerPool};
