//! Common utilities for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::{
    consensus::{Transaction, TxEnvelope},
    eips::eip2718::Decodable2718,
    primitives::{Address, Bytes, TxHash, TxKind, U256},
    rpc::types::TransactionRequest,
    sol_types::{SolCall, SolValue},
};
use async_trait::async_trait;

use fork_seeder::{
    config::RpcConfig,
    ethereum::{contracts::IWETH, ChainClient, EthereumClient, WalletManager},
    services::Seeder,
    types::{parse_units, TxReceipt},
    AppError, Result, RetryPolicy, ANVIL_CHAIN_ID, WETH_ADDRESS,
};

/// First Anvil dev account.
pub const FUNDING_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Whole WETH amount in wei.
pub fn weth(amount: &str) -> U256 {
    parse_units(amount, 18).unwrap()
}

/// A broadcast transaction as seen by the fake node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentTx {
    Deposit { nonce: u64, value: U256, success: bool },
    Transfer { nonce: u64, to: Address, amount: U256, success: bool },
}

#[derive(Default)]
struct State {
    eth: HashMap<Address, U256>,
    weth: HashMap<Address, U256>,
    nonces: HashMap<Address, u64>,
    receipts: HashMap<TxHash, TxReceipt>,
    sent: Vec<SentTx>,
    block: u64,
    calls: usize,
    failing_calls: u32,
    failing_nonce_reads: u32,
    failing_gas_price_reads: u32,
    failing_receipt_polls: u32,
    reverting_deposits: u32,
    reverting_transfers: u32,
}

/// In-memory node with WETH9 semantics for the funding account.
///
/// Transactions are mined instantly; receipts are available as soon as the
/// raw transaction is accepted.
pub struct FakeNode {
    funder: Address,
    state: Mutex<State>,
}

impl FakeNode {
    pub fn new(funder: Address) -> Self {
        let mut state = State { block: 19_000_000, ..Default::default() };
        state.eth.insert(funder, weth("1000000"));
        Self { funder, state: Mutex::new(state) }
    }

    /// Set the WETH balance of `owner`.
    pub fn with_weth(self, owner: Address, balance: U256) -> Self {
        self.state.lock().unwrap().weth.insert(owner, balance);
        self
    }

    /// The next `n` `eth_call`s fail with a transient RPC error.
    pub fn fail_next_calls(&self, n: u32) {
        self.state.lock().unwrap().failing_calls = n;
    }

    /// The next `n` `eth_getTransactionCount`s fail with a transient transport error.
    pub fn fail_next_nonce_reads(&self, n: u32) {
        self.state.lock().unwrap().failing_nonce_reads = n;
    }

    /// The next `n` `eth_gasPrice`s fail with a transient transport error.
    pub fn fail_next_gas_price_reads(&self, n: u32) {
        self.state.lock().unwrap().failing_gas_price_reads = n;
    }

    /// The next `n` receipt polls fail with a transient transport error.
    pub fn fail_next_receipt_polls(&self, n: u32) {
        self.state.lock().unwrap().failing_receipt_polls = n;
    }

    /// The next `n` deposits revert.
    pub fn revert_next_deposits(&self, n: u32) {
        self.state.lock().unwrap().reverting_deposits = n;
    }

    /// The next `n` transfers revert.
    pub fn revert_next_transfers(&self, n: u32) {
        self.state.lock().unwrap().reverting_transfers = n;
    }

    pub fn weth_balance(&self, owner: Address) -> U256 {
        self.state.lock().unwrap().weth.get(&owner).copied().unwrap_or_default()
    }

    pub fn sent(&self) -> Vec<SentTx> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().calls
    }

    fn execute(&self, state: &mut State, envelope: &TxEnvelope) -> std::result::Result<bool, AppError> {
        if envelope.to() != Some(WETH_ADDRESS) {
            return Ok(false);
        }

        let input = envelope.input();
        if input.len() < 4 {
            return Ok(false);
        }

        let nonce = envelope.nonce();
        let value = envelope.value();

        if input[..4] == IWETH::depositCall::SELECTOR {
            let funded = state.eth.get(&self.funder).copied().unwrap_or_default();
            let success = if state.reverting_deposits > 0 {
                state.reverting_deposits -= 1;
                false
            } else {
                funded >= value
            };
            if success {
                state.eth.insert(self.funder, funded - value);
                *state.weth.entry(self.funder).or_default() += value;
            }
            state.sent.push(SentTx::Deposit { nonce, value, success });
            return Ok(success);
        }

        if input[..4] == IWETH::transferCall::SELECTOR {
            let call = IWETH::transferCall::abi_decode(input).map_err(|e| AppError::Rpc(e.to_string()))?;
            let held = state.weth.get(&self.funder).copied().unwrap_or_default();
            let success = if state.reverting_transfers > 0 {
                state.reverting_transfers -= 1;
                false
            } else {
                held >= call.amount
            };
            if success {
                state.weth.insert(self.funder, held - call.amount);
                *state.weth.entry(call.to).or_default() += call.amount;
            }
            state.sent.push(SentTx::Transfer { nonce, to: call.to, amount: call.amount, success });
            return Ok(success);
        }

        Ok(false)
    }
}

#[async_trait]
impl ChainClient for FakeNode {
    async fn chain_id(&self) -> Result<u64> {
        Ok(ANVIL_CHAIN_ID)
    }

    async fn block_number(&self) -> Result<u64> {
        Ok(self.state.lock().unwrap().block)
    }

    async fn balance(&self, address: Address) -> Result<U256> {
        Ok(self.state.lock().unwrap().eth.get(&address).copied().unwrap_or_default())
    }

    async fn transaction_count(&self, address: Address) -> Result<u64> {
        let mut state = self.state.lock().unwrap();
        take_failure(&mut state.failing_nonce_reads)?;
        Ok(state.nonces.get(&address).copied().unwrap_or_default())
    }

    async fn gas_price(&self) -> Result<u128> {
        take_failure(&mut self.state.lock().unwrap().failing_gas_price_reads)?;
        Ok(1_000_000_000)
    }

    async fn call(&self, tx: &TransactionRequest) -> Result<Bytes> {
        let mut state = self.state.lock().unwrap();
        state.calls += 1;

        if state.failing_calls > 0 {
            state.failing_calls -= 1;
            return Err(AppError::Rpc("connection reset".into()));
        }

        if tx.to != Some(TxKind::Call(WETH_ADDRESS)) {
            return Err(AppError::Rpc("execution reverted".into()));
        }

        let input = tx.input.input().cloned().unwrap_or_default();
        if input.len() >= 4 && input[..4] == IWETH::balanceOfCall::SELECTOR {
            let call =
                IWETH::balanceOfCall::abi_decode(&input).map_err(|e| AppError::Rpc(e.to_string()))?;
            let balance = state.weth.get(&call.account).copied().unwrap_or_default();
            return Ok(balance.abi_encode().into());
        }
        if input.len() >= 4 && input[..4] == IWETH::decimalsCall::SELECTOR {
            return Ok(<alloy::sol_types::sol_data::Uint<8> as alloy::sol_types::SolType>::abi_encode(&18u8).into());
        }

        Err(AppError::Rpc("execution reverted".into()))
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<TxHash> {
        let envelope =
            TxEnvelope::decode_2718(&mut &raw[..]).map_err(|e| AppError::Rpc(e.to_string()))?;
        let hash = *envelope.tx_hash();

        let mut state = self.state.lock().unwrap();
        let expected = state.nonces.get(&self.funder).copied().unwrap_or_default();
        if envelope.nonce() != expected {
            return Err(AppError::Rpc(format!(
                "nonce mismatch: expected {}, got {}",
                expected,
                envelope.nonce()
            )));
        }
        if envelope.chain_id() != Some(ANVIL_CHAIN_ID) {
            return Err(AppError::Rpc("invalid chain id".into()));
        }
        state.nonces.insert(self.funder, expected + 1);

        let success = self.execute(&mut state, &envelope)?;
        state.block += 1;
        let block_number = Some(state.block);
        state.receipts.insert(hash, TxReceipt { hash, success, block_number, gas_used: 50_000 });

        Ok(hash)
    }

    async fn transaction_receipt(&self, hash: TxHash) -> Result<Option<TxReceipt>> {
        let mut state = self.state.lock().unwrap();
        take_failure(&mut state.failing_receipt_polls)?;
        Ok(state.receipts.get(&hash).copied())
    }
}

fn take_failure(remaining: &mut u32) -> Result<()> {
    if *remaining > 0 {
        *remaining -= 1;
        return Err(AppError::Transport("connection reset".into()));
    }
    Ok(())
}

/// Funding wallet for the fake node.
pub fn funding_wallet() -> WalletManager {
    WalletManager::from_private_key(FUNDING_KEY).unwrap()
}

/// Retry policy without pauses.
pub fn fast_policy() -> RetryPolicy {
    RetryPolicy::new(3, Duration::ZERO).unwrap().transient_only()
}

/// Seeder wired to `node` with fast polling.
pub fn seeder(node: &Arc<FakeNode>) -> Seeder {
    Seeder::new(node.clone(), funding_wallet(), WETH_ADDRESS, fast_policy())
        .with_receipt_polling(Duration::from_millis(1), Duration::from_secs(1))
}

/// Connect to the node in `RPC_URL`, if configured.
pub async fn connect_from_env() -> Option<EthereumClient> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let config = RpcConfig::from_env().ok()?;
    EthereumClient::connect(&config).await.ok()
}

/// Skip test if no node is reachable (missing env vars).
#[macro_export]
macro_rules! skip_if_no_node {
    () => {
        match common::connect_from_env().await {
            Some(client) => client,
            None => {
                eprintln!("Skipping test: RPC_URL not set or node unreachable");
                return;
            }
        }
    };
}
