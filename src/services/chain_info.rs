//! Chain connectivity check.

use crate::{
    error::Result,
    ethereum::{ChainClient, WalletManager},
    retry::{safe_call, RetryPolicy},
    services::BalanceService,
    types::{AccountBalance, ChainReport},
};

/// Report chain ID, latest block, and (when a key is configured) its native balance.
pub async fn check_chain(
    client: &dyn ChainClient,
    balances: &BalanceService,
    rpc_url: &str,
    wallet: Option<&WalletManager>,
    policy: &RetryPolicy,
) -> Result<ChainReport> {
    let chain_id = safe_call(policy, || client.chain_id()).await?;
    let block_number = safe_call(policy, || client.block_number()).await?;

    let account = match wallet {
        Some(wallet) => {
            let address = wallet.address();
            let balance = balances.eth_balance(address).await?;
            Some(AccountBalance { address, balance })
        }
        None => None,
    };

    Ok(ChainReport { rpc_url: rpc_url.to_string(), chain_id, block_number, account, ws: None })
}
