//! Balance query service.

use alloy::primitives::{Address, U256};
use std::sync::Arc;

use crate::{
    error::Result,
    ethereum::{contracts::Weth, ChainClient},
    retry::{safe_call, RetryPolicy},
};

/// Service for querying native and WETH balances, retrying transient failures.
#[derive(Clone)]
pub struct BalanceService {
    client: Arc<dyn ChainClient>,
    policy: RetryPolicy,
}

impl BalanceService {
    /// Create a new balance service.
    pub fn new(client: Arc<dyn ChainClient>, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    /// Native ETH balance in wei.
    pub async fn eth_balance(&self, address: Address) -> Result<U256> {
        tracing::debug!(address = %address, "Querying ETH balance");
        safe_call(&self.policy, || self.client.balance(address)).await
    }

    /// WETH balance in wei.
    pub async fn weth_balance(&self, weth: Weth, owner: Address) -> Result<U256> {
        tracing::debug!(owner = %owner, token = %weth.address(), "Querying WETH balance");
        safe_call(&self.policy, || weth.balance_of(self.client.as_ref(), owner)).await
    }
}
