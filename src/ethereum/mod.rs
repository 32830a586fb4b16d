//! Ethereum interaction module.
//!
//! Contains the RPC client, address helpers, wallet management, and contract bindings.

pub mod address;
pub mod client;
pub mod constants;
pub mod contracts;
pub mod wallet;

pub use address::{parse_address, to_checksum, validate_address};
pub use client::{wait_for_receipt, ChainClient, EthProvider, EthereumClient};
pub use constants::DEFAULT_GAS_LIMIT;
pub use wallet::WalletManager;
