//! Reports printed by the check and smoke commands.

use std::fmt;

use alloy::primitives::{Address, U256};

use super::token::{format_ether, format_units};

/// Native balance of the configured key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountBalance {
    /// Address derived from the key.
    pub address: Address,
    /// Balance in wei.
    pub balance: U256,
}

/// Result of the connectivity check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainReport {
    /// RPC endpoint.
    pub rpc_url: String,
    /// Chain ID reported by the node.
    pub chain_id: u64,
    /// Latest block.
    pub block_number: u64,
    /// Present when a private key is configured.
    pub account: Option<AccountBalance>,
    /// Chain ID seen over the WebSocket endpoint, when one is configured.
    pub ws: Option<Result<u64, String>>,
}

impl fmt::Display for ChainReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Connected: true ({})", self.rpc_url)?;
        writeln!(f, "Chain ID: {}", self.chain_id)?;
        writeln!(f, "Block: {}", self.block_number)?;
        if let Some(account) = &self.account {
            writeln!(f, "Address: {}", account.address)?;
            writeln!(f, "Balance (wei): {}", account.balance)?;
            writeln!(f, "Balance (ETH): {}", format_ether(account.balance))?;
        }
        match &self.ws {
            Some(Ok(chain_id)) => writeln!(f, "WebSocket connected: true (chain {})", chain_id)?,
            Some(Err(err)) => writeln!(f, "WebSocket connected: false ({})", err)?,
            None => {}
        }
        Ok(())
    }
}

/// Outcome of loading one ABI by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbiLoadResult {
    /// Logical ABI name.
    pub name: String,
    /// Number of entries, or the load error.
    pub entries: Result<usize, String>,
}

impl fmt::Display for AbiLoadResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.entries {
            Ok(n) => write!(f, "  {}: loaded ({} entries)", self.name, n),
            Err(err) => write!(f, "  {}: ERROR -> {}", self.name, err),
        }
    }
}

/// Result of the SDK smoke test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmokeReport {
    /// Token contract.
    pub token: Address,
    /// Account whose balance was read.
    pub account: Address,
    /// Token decimals.
    pub decimals: u8,
    /// Raw balance.
    pub balance: U256,
}

impl SmokeReport {
    /// Balance scaled by the token decimals.
    pub fn human_balance(&self) -> String {
        format_units(self.balance, self.decimals)
    }
}

impl fmt::Display for SmokeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Token address: {}", self.token)?;
        writeln!(f, "Token decimals: {}", self.decimals)?;
        writeln!(f, "Balance of {}:", self.account)?;
        writeln!(f, "  raw (wei): {}", self.balance)?;
        writeln!(f, "  human   : {}", self.human_balance())
    }
}
