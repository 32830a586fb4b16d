//! Configuration management module.
//!
//! Handles loading configuration from environment variables (and a `.env`
//! file when present). Each command loads only the sections it needs, so a
//! missing key is reported before any network activity.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use alloy::primitives::{Address, U256};

use crate::{
    error::{AppError, Result},
    ethereum::{address::parse_address, constants::WETH_ADDRESS, DEFAULT_GAS_LIMIT},
    retry::{RetryPolicy, DEFAULT_DELAY, DEFAULT_RETRIES},
    types::{parse_units, FundingTarget, ETHER_DECIMALS},
};

/// Default liquidator target, in whole WETH.
pub const DEFAULT_LIQUIDATOR_TARGET: &str = "1000";

/// Default borrower target, in whole WETH.
pub const DEFAULT_BORROWER_TARGET: &str = "200";

/// Default HTTP request timeout.
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(30);

/// Default receipt polling interval.
pub const DEFAULT_RECEIPT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Default time to wait for a receipt.
pub const DEFAULT_RECEIPT_TIMEOUT: Duration = Duration::from_secs(120);

/// ABI directory shipped with the crate.
pub fn default_abi_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("abi")
}

/// Load `.env` if present. Existing environment variables take precedence.
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct Config {
    /// Logging level (default: info).
    pub log_level: String,
    /// Directory holding `<name>.json` ABI files.
    pub abi_dir: PathBuf,
    /// Attempts per RPC read.
    pub retries: u32,
    /// Pause between attempts.
    pub retry_delay: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `LOG_LEVEL`: Logging level (default: info)
    /// - `ABI_DIR`: ABI directory (default: `abi/` in the crate root)
    /// - `RETRIES`: attempts per RPC read (default: 3)
    /// - `RETRY_DELAY_MS`: pause between attempts (default: 200)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let abi_dir =
            optional(&lookup, "ABI_DIR").map(PathBuf::from).unwrap_or_else(default_abi_dir);

        let retries = parse_or(&lookup, "RETRIES", DEFAULT_RETRIES)?;
        let retry_delay = lookup("RETRY_DELAY_MS")
            .map(|v| parse_number::<u64>("RETRY_DELAY_MS", &v).map(Duration::from_millis))
            .transpose()?
            .unwrap_or(DEFAULT_DELAY);

        Ok(Self { log_level, abi_dir, retries, retry_delay })
    }

    /// Retry policy for RPC reads; only transient errors are retried.
    pub fn retry_policy(&self) -> Result<RetryPolicy> {
        Ok(RetryPolicy::new(self.retries, self.retry_delay)?.transient_only())
    }
}

/// Node connection settings.
#[derive(Clone)]
pub struct RpcConfig {
    /// Ethereum JSON-RPC endpoint URL.
    pub rpc_url: String,
    /// Optional WebSocket endpoint.
    pub ws_url: Option<String>,
    /// Optional private key whose balance the check command reports.
    pub private_key: Option<String>,
    /// HTTP request timeout.
    pub timeout: Duration,
    /// Interval between receipt polls.
    pub receipt_poll_interval: Duration,
    /// How long to wait for a receipt.
    pub receipt_timeout: Duration,
}

impl RpcConfig {
    /// Required environment variables:
    /// - `RPC_URL`: Ethereum JSON-RPC endpoint
    ///
    /// Optional environment variables:
    /// - `RPC_WS_URL`, `PRIVATE_KEY`, `RPC_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load connection settings through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let rpc_url = require(&lookup, "RPC_URL")?;
        let ws_url = optional(&lookup, "RPC_WS_URL");
        let private_key = optional(&lookup, "PRIVATE_KEY");
        let timeout = lookup("RPC_TIMEOUT_SECS")
            .map(|v| parse_number::<u64>("RPC_TIMEOUT_SECS", &v).map(Duration::from_secs))
            .transpose()?
            .unwrap_or(DEFAULT_RPC_TIMEOUT);

        Ok(Self {
            rpc_url,
            ws_url,
            private_key,
            timeout,
            receipt_poll_interval: DEFAULT_RECEIPT_POLL_INTERVAL,
            receipt_timeout: DEFAULT_RECEIPT_TIMEOUT,
        })
    }
}

impl std::fmt::Debug for RpcConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcConfig")
            .field("rpc_url", &self.rpc_url)
            .field("ws_url", &self.ws_url)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Settings for the WETH seeding run.
#[derive(Clone)]
pub struct SeedConfig {
    /// Liquidator account.
    pub liquidator: Address,
    /// First borrower account.
    pub borrower: Address,
    /// Funding account key (hex).
    pub funding_private_key: String,
    /// Liquidator target in wei.
    pub liquidator_target: U256,
    /// Borrower target in wei.
    pub borrower_target: U256,
    /// WETH contract.
    pub weth_address: Address,
    /// Gas limit for each funding transaction.
    pub gas_limit: u64,
}

impl SeedConfig {
    /// Required environment variables:
    /// - `LIQUIDATOR_ADDRESS`, `BORROWER_1`, `FUNDING_PRIVATE_KEY`
    ///
    /// Optional environment variables:
    /// - `LIQ_WETH_TARGET` (default: 1000), `BORROWER_WETH_TARGET` (default: 200)
    /// - `WETH_ADDRESS` (default: mainnet WETH), `GAS_LIMIT` (default: 200000)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load seeding settings through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let liquidator_raw = require(&lookup, "LIQUIDATOR_ADDRESS")?;
        let borrower_raw = require(&lookup, "BORROWER_1")?;
        let funding_private_key = require(&lookup, "FUNDING_PRIVATE_KEY")?;

        let liquidator = parse_address(&liquidator_raw)?;
        let borrower = parse_address(&borrower_raw)?;

        let liquidator_target = target(&lookup, "LIQ_WETH_TARGET", DEFAULT_LIQUIDATOR_TARGET)?;
        let borrower_target = target(&lookup, "BORROWER_WETH_TARGET", DEFAULT_BORROWER_TARGET)?;

        let weth_address = optional(&lookup, "WETH_ADDRESS")
            .map(|raw| parse_address(&raw))
            .transpose()?
            .unwrap_or(WETH_ADDRESS);

        let gas_limit = parse_or(&lookup, "GAS_LIMIT", DEFAULT_GAS_LIMIT)?;

        Ok(Self {
            liquidator,
            borrower,
            funding_private_key,
            liquidator_target,
            borrower_target,
            weth_address,
            gas_limit,
        })
    }

    /// Accounts to fund, in processing order.
    pub fn targets(&self) -> Vec<FundingTarget> {
        vec![
            FundingTarget::new("Liquidator", self.liquidator, self.liquidator_target),
            FundingTarget::new("Borrower 1", self.borrower, self.borrower_target),
        ]
    }
}

impl std::fmt::Debug for SeedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedConfig")
            .field("liquidator", &self.liquidator)
            .field("borrower", &self.borrower)
            .field("liquidator_target", &self.liquidator_target)
            .field("borrower_target", &self.borrower_target)
            .field("weth_address", &self.weth_address)
            .field("gas_limit", &self.gas_limit)
            .finish_non_exhaustive()
    }
}

/// Settings for the SDK smoke test.
#[derive(Debug, Clone)]
pub struct SmokeConfig {
    /// Token to bind with the erc20 ABI.
    pub weth_address: String,
    /// Account whose balance is read.
    pub test_account: String,
}

impl SmokeConfig {
    /// Required environment variables:
    /// - `LIQUIDATOR_ADDRESS`
    ///
    /// Optional environment variables:
    /// - `WETH_ADDRESS` (default: mainnet WETH)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load smoke-test settings through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let test_account = require(&lookup, "LIQUIDATOR_ADDRESS")?;
        let weth_address = optional(&lookup, "WETH_ADDRESS")
            .unwrap_or_else(|| WETH_ADDRESS.to_checksum(None));
        Ok(Self { weth_address, test_account })
    }
}

fn optional(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|v| !v.trim().is_empty())
}

fn require(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    optional(lookup, key).ok_or_else(|| AppError::Config(format!("{} is not set", key)))
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse::<T>().map_err(|e| AppError::Config(format!("{} is invalid: {}", key, e)))
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match optional(lookup, key) {
        Some(value) => parse_number(key, &value),
        None => Ok(default),
    }
}

fn target(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> Result<U256> {
    let raw = optional(lookup, key).unwrap_or_else(|| default.to_string());
    parse_units(&raw, ETHER_DECIMALS)
        .map_err(|e| AppError::Config(format!("{} is invalid: {}", key, e)))
}
