//! Runtime configuration for the vanity contract address search.

use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::crypto::{keccak256, Address, AddressParseError, LegacyNonce};
use crate::matcher::{Prefix, PrefixError};
use crate::search::Limits;
use crate::worker::{SearchMode, SearchTask};

/// Vanity Contract Address Search
///
/// Brute-forces deployer keys (CREATE) or salts (CREATE2) until the
/// deployed contract's checksum address starts with the given prefix.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    #[command(subcommand)]
    pub mode: ModeArgs,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ModeArgs {
    /// Search for a deployer private key whose CREATE address matches
    Create {
        #[command(flatten)]
        search: SearchArgs,

        /// Nonce of the deploying transaction (0-127)
        #[arg(long, default_value = "0")]
        nonce: u8,
    },

    /// Search for a CREATE2 salt for a fixed deployer and init code
    Create2 {
        #[command(flatten)]
        search: SearchArgs,

        /// Deployer (factory) address, 20 bytes hex with or without 0x
        #[arg(short, long)]
        deployer: String,

        /// keccak256 of the init code, 32 bytes hex
        #[arg(long, required_unless_present = "init_code", conflicts_with = "init_code")]
        init_code_hash: Option<String>,

        /// Raw init code hex; hashed with keccak256
        #[arg(long)]
        init_code: Option<String>,
    },
}

/// Options shared by both modes.
#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Checksum prefix to search for (hex, 0x optional, letter case is matched exactly)
    #[arg(short, long)]
    pub prefix: String,

    /// Number of worker threads (default: number of CPU cores)
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,

    /// Candidates per worker per round (default depends on mode)
    #[arg(short = 'i', long)]
    pub iterations: Option<u64>,

    /// Progress report interval in seconds
    #[arg(short = 'r', long, default_value = "1")]
    pub report_interval: u64,

    /// Stop after this many seconds (0 = unlimited)
    #[arg(long, default_value = "0")]
    pub max_time: u64,

    /// Stop after this many candidates (0 = unlimited)
    #[arg(long, default_value = "0")]
    pub max_attempts: u64,
}

impl Config {
    /// Returns the options shared by both modes.
    pub fn search_args(&self) -> &SearchArgs {
        match &self.mode {
            ModeArgs::Create { search, .. } | ModeArgs::Create2 { search, .. } => search,
        }
    }

    /// Returns the number of workers, defaulting to CPU count.
    pub fn worker_count(&self) -> usize {
        self.search_args().workers.unwrap_or_else(num_cpus::get)
    }

    /// Parses the requested prefix.
    pub fn prefix(&self) -> Result<Prefix, ConfigError> {
        Ok(Prefix::parse(&self.search_args().prefix)?)
    }

    /// Builds the search mode from the subcommand arguments.
    pub fn search_mode(&self) -> Result<SearchMode, ConfigError> {
        match &self.mode {
            ModeArgs::Create { nonce, .. } => {
                let nonce = LegacyNonce::new(*nonce)
                    .map_err(|e| ConfigError::InvalidConfig(e.to_string()))?;
                Ok(SearchMode::Create { nonce })
            }
            ModeArgs::Create2 {
                deployer,
                init_code_hash,
                init_code,
                ..
            } => {
                let deployer: Address = deployer.parse()?;
                let init_code_hash = match (init_code_hash, init_code) {
                    (Some(hash), _) => {
                        let bytes = decode_hex("init_code_hash", hash)?;
                        bytes.try_into().map_err(|_| {
                            ConfigError::InvalidConfig(
                                "init_code_hash must be 32 bytes (64 hex chars)".into(),
                            )
                        })?
                    }
                    (None, Some(code)) => keccak256(&decode_hex("init_code", code)?),
                    (None, None) => {
                        return Err(ConfigError::InvalidConfig(
                            "one of init_code_hash or init_code is required".into(),
                        ))
                    }
                };
                Ok(SearchMode::Create2 {
                    deployer,
                    init_code_hash,
                })
            }
        }
    }

    /// Builds the task every worker runs each round.
    pub fn search_task(&self) -> Result<SearchTask, ConfigError> {
        let args = self.search_args();
        if self.worker_count() == 0 {
            return Err(ConfigError::InvalidConfig("workers must be at least 1".into()));
        }

        let prefix = self.prefix()?;
        let mode = self.search_mode()?;
        let iterations = args
            .iterations
            .unwrap_or_else(|| mode.default_iterations());
        if iterations == 0 {
            return Err(ConfigError::InvalidConfig(
                "iterations must be at least 1".into(),
            ));
        }

        Ok(SearchTask {
            mode,
            prefix,
            iterations,
        })
    }

    /// Returns the progress report interval.
    pub fn report_interval(&self) -> Duration {
        Duration::from_secs(self.search_args().report_interval)
    }

    /// Returns the between-round limits; zero means unlimited.
    pub fn limits(&self) -> Limits {
        let args = self.search_args();
        Limits {
            max_time: (args.max_time > 0).then(|| Duration::from_secs(args.max_time)),
            max_attempts: (args.max_attempts > 0).then_some(args.max_attempts),
        }
    }
}

fn decode_hex(field: &str, value: &str) -> Result<Vec<u8>, ConfigError> {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(digits)
        .map_err(|e| ConfigError::InvalidConfig(format!("{} is not valid hex: {}", field, e)))
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    InvalidPrefix(#[from] PrefixError),
    #[error("Invalid deployer address: {0}")]
    InvalidDeployer(#[from] AddressParseError),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEPLOYER: &str = "0x4e59b44847b379578588920cA78FbF26c0B4956C";
    const INIT_CODE_HASH: &str = "3ba2837b92a48b70fada56d28bb24dd6bc2931085d07026c06e5977ac5fe3d07";

    fn parse(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("deploy_vanity").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_create_defaults() {
        let config = parse(&["create", "-p", "FFFF00"]);
        let task = config.search_task().unwrap();
        assert_eq!(
            task.mode,
            SearchMode::Create {
                nonce: LegacyNonce::ZERO
            }
        );
        assert_eq!(task.prefix.to_string(), "0xFFFF00");
        assert_eq!(task.iterations, 1_000_000);
        assert_eq!(config.report_interval(), Duration::from_secs(1));
        assert_eq!(config.limits(), Limits::default());
    }

    #[test]
    fn test_create2_with_hash() {
        let config = parse(&[
            "create2",
            "-p",
            "0xFFFF00",
            "--deployer",
            DEPLOYER,
            "--init-code-hash",
            INIT_CODE_HASH,
            "-w",
            "3",
            "--max-time",
            "60",
        ]);
        let task = config.search_task().unwrap();
        let SearchMode::Create2 {
            deployer,
            init_code_hash,
        } = task.mode
        else {
            panic!("expected CREATE2 mode");
        };
        assert_eq!(deployer.to_checksum(), DEPLOYER);
        assert_eq!(hex::encode(init_code_hash), INIT_CODE_HASH);
        assert_eq!(task.iterations, 100_000);
        assert_eq!(config.worker_count(), 3);
        assert_eq!(config.limits().max_time, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_create2_hashes_init_code() {
        let config = parse(&[
            "create2",
            "-p",
            "00",
            "--deployer",
            DEPLOYER,
            "--init-code",
            "0x00",
        ]);
        match config.search_mode().unwrap() {
            SearchMode::Create2 { init_code_hash, .. } => {
                assert_eq!(init_code_hash, keccak256(&[0x00]))
            }
            other => panic!("unexpected mode {:?}", other),
        }
    }

    #[test]
    fn test_create2_requires_init_code() {
        let result = Config::try_parse_from([
            "deploy_vanity",
            "create2",
            "-p",
            "00",
            "--deployer",
            DEPLOYER,
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_pattern() {
        let config = parse(&["create", "-p", "xyz"]);
        assert!(matches!(
            config.search_task(),
            Err(ConfigError::InvalidPrefix(_))
        ));
    }

    #[test]
    fn test_invalid_deployer() {
        let config = parse(&[
            "create2",
            "-p",
            "00",
            "--deployer",
            "0x1234",
            "--init-code-hash",
            INIT_CODE_HASH,
        ]);
        assert!(matches!(
            config.search_task(),
            Err(ConfigError::InvalidDeployer(_))
        ));
    }

    #[test]
    fn test_short_init_code_hash() {
        let config = parse(&[
            "create2",
            "-p",
            "00",
            "--deployer",
            DEPLOYER,
            "--init-code-hash",
            "abcd",
        ]);
        assert!(matches!(
            config.search_task(),
            Err(ConfigError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_multibyte_nonce_rejected() {
        let config = parse(&["create", "-p", "00", "--nonce", "128"]);
        assert!(matches!(
            config.search_task(),
            Err(ConfigError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_zero_workers_and_iterations_rejected() {
        assert!(parse(&["create", "-p", "00", "-w", "0"]).search_task().is_err());
        assert!(parse(&["create", "-p", "00", "-i", "0"]).search_task().is_err());
    }

    #[test]
    fn test_search_options_follow_the_subcommand() {
        assert!(Config::try_parse_from(["deploy_vanity", "create", "-p", "FF"]).is_ok());
        assert!(Config::try_parse_from(["deploy_vanity", "-p", "FF", "create"]).is_err());
    }
}
