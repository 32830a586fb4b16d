//! Fork Seeder Library
//!
//! A thin SDK for Ethereum JSON-RPC nodes, typically Anvil mainnet forks.
//! Provides chain checks, ABI loading, checksummed addresses, retrying RPC
//! reads, and WETH top-ups of test accounts.
//!
//! # Features
//!
//! - **Chain Checks**: connectivity, chain ID, block number, key balance
//! - **ABI Store**: named ABI files memoized per process, dynamic contract calls
//! - **Retry**: fixed-delay retry of transient RPC failures
//! - **Seeding**: wrap ETH and transfer WETH until each account reaches its target
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use fork_seeder::{config::{RpcConfig, SeedConfig}, ethereum::{EthereumClient, WalletManager}};
//! use fork_seeder::services::Seeder;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let seed = SeedConfig::from_env()?;
//!     let client = EthereumClient::connect(&RpcConfig::from_env()?).await?;
//!     let wallet = WalletManager::from_private_key(&seed.funding_private_key)?;
//!     let seeder = Seeder::new(Arc::new(client), wallet, seed.weth_address, Default::default());
//!     println!("{}", seeder.run(&seed.targets()).await?);
//!     Ok(())
//! }
//! ```

pub mod abi;
pub mod config;
pub mod error;
pub mod ethereum;
pub mod retry;
pub mod services;
pub mod types;

pub use abi::{AbiStore, ContractBinding};
pub use config::Config;
pub use error::{AppError, Result};
pub use ethereum::constants::*;
pub use retry::{safe_call, RetryPolicy, Retryable};
