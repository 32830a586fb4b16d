//! Ethereum RPC client.

use std::sync::Arc;
use std::time::Duration;

use alloy::{
    network::Ethereum,
    primitives::{Address, Bytes, TxHash, U256},
    providers::{Provider, ProviderBuilder, RootProvider},
    rpc::{client::RpcClient, types::TransactionRequest},
    transports::{
        http::{reqwest, Http},
        ws::WsConnect,
    },
};
use async_trait::async_trait;
use tokio::time::{sleep, Instant};

use crate::{
    config::RpcConfig,
    error::{AppError, Result},
    retry::{safe_call, RetryPolicy},
    types::TxReceipt,
};

/// Root provider shared by the HTTP and WebSocket transports.
pub type EthProvider = RootProvider<Ethereum>;

/// Node operations consumed by this crate.
///
/// Implemented by [`EthereumClient`] for real nodes; tests substitute an
/// in-memory node.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// `eth_chainId`.
    async fn chain_id(&self) -> Result<u64>;

    /// `eth_blockNumber`.
    async fn block_number(&self) -> Result<u64>;

    /// `eth_getBalance` at the latest block.
    async fn balance(&self, address: Address) -> Result<U256>;

    /// `eth_getTransactionCount` (the next nonce).
    async fn transaction_count(&self, address: Address) -> Result<u64>;

    /// `eth_gasPrice`.
    async fn gas_price(&self) -> Result<u128>;

    /// `eth_call` against the latest block.
    async fn call(&self, tx: &TransactionRequest) -> Result<Bytes>;

    /// `eth_sendRawTransaction`.
    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<TxHash>;

    /// `eth_getTransactionReceipt`; `None` while the transaction is pending.
    async fn transaction_receipt(&self, hash: TxHash) -> Result<Option<TxReceipt>>;
}

/// Ethereum RPC client, connected and validated at construction.
#[derive(Clone)]
pub struct EthereumClient {
    /// The underlying provider.
    provider: Arc<EthProvider>,
    /// RPC URL for logging.
    rpc_url: String,
    /// Chain ID observed when connecting.
    chain_id: u64,
}

impl EthereumClient {
    /// Connect to the HTTP endpoint in `config` and verify the node answers.
    ///
    /// A malformed URL is a configuration error; an unreachable node is a
    /// connection error. Neither is retried.
    pub async fn connect(config: &RpcConfig) -> Result<Self> {
        let url = config
            .rpc_url
            .parse()
            .map_err(|_| AppError::Config(format!("Invalid RPC URL: {}", config.rpc_url)))?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        let transport = Http::with_client(http, url);
        let is_local = transport.guess_local();
        let provider = RootProvider::<Ethereum>::new(RpcClient::new(transport, is_local));

        Self::validate(provider, &config.rpc_url).await
    }

    /// Connect to a WebSocket endpoint and verify the node answers.
    pub async fn connect_ws(ws_url: &str) -> Result<Self> {
        let provider = ProviderBuilder::new()
            .connect_ws(WsConnect::new(ws_url))
            .await
            .map_err(|e| AppError::Connection(format!("Could not connect to {}: {}", ws_url, e)))?
            .root()
            .clone();

        Self::validate(provider, ws_url).await
    }

    async fn validate(provider: EthProvider, rpc_url: &str) -> Result<Self> {
        let chain_id = provider.get_chain_id().await.map_err(|e| {
            AppError::Connection(format!("Could not connect to {}: {}", rpc_url, e))
        })?;

        tracing::info!(chain_id = chain_id, rpc_url = %rpc_url, "Connected to Ethereum node");

        Ok(Self { provider: Arc::new(provider), rpc_url: rpc_url.to_string(), chain_id })
    }

    /// Endpoint this client is connected to.
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Chain ID observed when connecting.
    pub fn connected_chain_id(&self) -> u64 {
        self.chain_id
    }
}

impl std::fmt::Debug for EthereumClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EthereumClient")
            .field("rpc_url", &self.rpc_url)
            .field("chain_id", &self.chain_id)
            .finish()
    }
}

#[async_trait]
impl ChainClient for EthereumClient {
    async fn chain_id(&self) -> Result<u64> {
        Ok(self.provider.get_chain_id().await?)
    }

    async fn block_number(&self) -> Result<u64> {
        Ok(self.provider.get_block_number().await?)
    }

    async fn balance(&self, address: Address) -> Result<U256> {
        Ok(self.provider.get_balance(address).await?)
    }

    async fn transaction_count(&self, address: Address) -> Result<u64> {
        Ok(self.provider.get_transaction_count(address).await?)
    }

    async fn gas_price(&self) -> Result<u128> {
        Ok(self.provider.get_gas_price().await?)
    }

    async fn call(&self, tx: &TransactionRequest) -> Result<Bytes> {
        Ok(self.provider.call(tx.clone()).await?)
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<TxHash> {
        let pending = self.provider.send_raw_transaction(raw).await?;
        Ok(*pending.tx_hash())
    }

    async fn transaction_receipt(&self, hash: TxHash) -> Result<Option<TxReceipt>> {
        let receipt = self.provider.get_transaction_receipt(hash).await?;
        Ok(receipt.map(|r| TxReceipt {
            hash: r.transaction_hash,
            success: r.status(),
            block_number: r.block_number,
            gas_used: r.gas_used,
        }))
    }
}

/// Poll for the receipt of `hash` until it is available or `timeout` elapses.
///
/// Each poll goes through `policy`; an error is returned only once a single
/// poll has exhausted it. The transaction itself is never resubmitted.
pub async fn wait_for_receipt(
    client: &dyn ChainClient,
    hash: TxHash,
    policy: &RetryPolicy,
    poll_interval: Duration,
    timeout: Duration,
) -> Result<TxReceipt> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(receipt) = safe_call(policy, || client.transaction_receipt(hash)).await? {
            tracing::debug!(tx = %hash, success = receipt.success, "Receipt received");
            return Ok(receipt);
        }
        if Instant::now() >= deadline {
            return Err(AppError::PendingTransaction(format!(
                "timed out after {:?} waiting for receipt of {}",
                timeout, hash
            )));
        }
        sleep(poll_interval).await;
    }
}
