//! CPU-based worker for vanity contract address search.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use rand::rngs::ThreadRng;
use rand::RngCore;
use secp256k1::{Secp256k1, SignOnly};

use crate::crypto::{sender_address, Address, CryptoError, DeploymentParams, LegacyNonce};
use crate::matcher::Prefix;

use super::pool::{PoolError, WorkerReport};

/// Candidates drawn from the RNG per fill.
pub const BATCH_SIZE: usize = 1000;

/// What a candidate stands for and how the contract address is derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchMode {
    /// Candidates are secret keys; the contract is the sender's CREATE at `nonce`.
    Create { nonce: LegacyNonce },
    /// Candidates are salts for a CREATE2 deployment by `deployer`.
    Create2 {
        deployer: Address,
        init_code_hash: [u8; 32],
    },
    /// Fails every chunk, by panicking or with an invalid key.
    #[cfg(test)]
    Fail { panic: bool },
}

impl SearchMode {
    /// Default per-worker iteration budget for one round.
    pub fn default_iterations(&self) -> u64 {
        match self {
            SearchMode::Create { .. } => 1_000_000,
            SearchMode::Create2 { .. } => 100_000,
            #[cfg(test)]
            SearchMode::Fail { .. } => 1,
        }
    }

    /// Label for what each candidate is.
    pub fn secret_label(&self) -> &'static str {
        match self {
            SearchMode::Create { .. } => "Private Key",
            SearchMode::Create2 { .. } => "Salt",
            #[cfg(test)]
            SearchMode::Fail { .. } => "None",
        }
    }
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchMode::Create { nonce } => write!(f, "CREATE (nonce {})", nonce),
            SearchMode::Create2 { deployer, .. } => write!(f, "CREATE2 (deployer {})", deployer),
            #[cfg(test)]
            SearchMode::Fail { .. } => write!(f, "failing"),
        }
    }
}

/// Immutable work description handed to every worker each round.
#[derive(Debug, Clone)]
pub struct SearchTask {
    pub mode: SearchMode,
    pub prefix: Prefix,
    /// Candidates each worker tries per round
    pub iterations: u64,
}

/// Result of a successful vanity search.
#[derive(Clone)]
pub struct VanityResult {
    /// The private key (CREATE) or salt (CREATE2)
    pub secret: [u8; 32],
    /// The deployer derived from the private key (CREATE only)
    pub sender: Option<Address>,
    /// The matching contract address
    pub contract: Address,
    /// The ID of the worker that found this result
    pub worker_id: usize,
}

impl VanityResult {
    /// Returns the secret as 0x-prefixed hex.
    pub fn secret_hex(&self) -> String {
        format!("0x{}", hex::encode(self.secret))
    }
}

impl std::fmt::Debug for VanityResult {
    // Keeps the secret out of debug output.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VanityResult")
            .field("sender", &self.sender)
            .field("contract", &self.contract)
            .field("worker_id", &self.worker_id)
            .finish_non_exhaustive()
    }
}

/// A CPU worker that draws candidates and tests derived contract addresses.
///
/// Each worker owns its RNG and secp256k1 context; nothing is shared.
pub struct CpuWorker {
    /// Worker ID
    id: usize,
    /// Signing context reused across candidates
    secp: Secp256k1<SignOnly>,
    /// Thread-local CSPRNG
    rng: ThreadRng,
    /// Randomness for one batch of candidates
    buffer: Vec<u8>,
}

impl CpuWorker {
    /// Creates a new CPU worker. Must be called on the thread that runs it.
    pub fn new(id: usize) -> Self {
        Self {
            id,
            secp: Secp256k1::signing_only(),
            rng: rand::thread_rng(),
            buffer: vec![0u8; 32 * BATCH_SIZE],
        }
    }

    /// Searches up to `task.iterations` fresh candidates.
    ///
    /// Returns the first match, or `None` once the budget is spent.
    pub fn search_chunk(
        &mut self,
        task: &SearchTask,
    ) -> Result<Option<VanityResult>, CryptoError> {
        #[cfg(test)]
        if let SearchMode::Fail { panic } = task.mode {
            assert!(!panic, "worker {} failed on purpose", self.id);
            return Err(CryptoError::InvalidSecretKey);
        }

        let mut remaining = task.iterations;

        while remaining > 0 {
            let batch = remaining.min(BATCH_SIZE as u64) as usize;
            let bytes = &mut self.buffer[..32 * batch];
            self.rng.fill_bytes(bytes);

            for chunk in bytes.chunks_exact(32) {
                let mut secret = [0u8; 32];
                secret.copy_from_slice(chunk);

                let (sender, contract) = match &task.mode {
                    SearchMode::Create { nonce } => {
                        let sender = sender_address(&self.secp, &secret)?;
                        let params = DeploymentParams::Legacy { nonce: *nonce };
                        (Some(sender), params.contract_address(&sender))
                    }
                    SearchMode::Create2 {
                        deployer,
                        init_code_hash,
                    } => {
                        let params = DeploymentParams::Create2 {
                            salt: secret,
                            init_code_hash: *init_code_hash,
                        };
                        (None, params.contract_address(deployer))
                    }
                    #[cfg(test)]
                    SearchMode::Fail { .. } => unreachable!(),
                };

                if task.prefix.matches(&contract) {
                    return Ok(Some(VanityResult {
                        secret,
                        sender,
                        contract,
                        worker_id: self.id,
                    }));
                }
            }

            remaining -= batch as u64;
        }

        Ok(None)
    }

    /// Runs the worker loop.
    ///
    /// Takes one task per round from `jobs` and answers with exactly one
    /// report, until the job channel closes or the pool stops listening.
    pub fn run(mut self, jobs: Receiver<Arc<SearchTask>>, reports: Sender<WorkerReport>) {
        for task in jobs.iter() {
            let attempt = panic::catch_unwind(AssertUnwindSafe(|| self.search_chunk(&task)));
            let outcome = match attempt {
                Ok(Ok(found)) => Ok(found),
                Ok(Err(source)) => Err(PoolError::Crypto {
                    worker_id: self.id,
                    source,
                }),
                Err(payload) => Err(PoolError::WorkerPanicked {
                    worker_id: self.id,
                    message: panic_message(payload.as_ref()),
                }),
            };

            let report = WorkerReport {
                worker_id: self.id,
                outcome,
            };
            if reports.send(report).is_err() {
                break;
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
