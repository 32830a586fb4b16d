//! Ethereum network constants.

use alloy::primitives::{address, Address};

/// Anvil / Hardhat local chain ID.
pub const ANVIL_CHAIN_ID: u64 = 31337;

/// Wrapped Ether (WETH) address on Ethereum Mainnet (and its forks).
pub const WETH_ADDRESS: Address = address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");

/// Gas limit for each funding transaction.
pub const DEFAULT_GAS_LIMIT: u64 = 200_000;
