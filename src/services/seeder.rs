//! WETH top-up of test accounts.
//!
//! For each [`FundingTarget`], in order:
//!
//! 1. read the recipient's WETH balance;
//! 2. skip it when already at or above target;
//! 3. wrap exactly the shortfall in the funding account (`deposit`);
//! 4. transfer it to the recipient.
//!
//! Each transaction uses a freshly read nonce and is awaited to a terminal
//! receipt before the next one is built, so the single funding account never
//! has two transactions in flight. Reads and receipt polls are retried under
//! the configured policy; broadcast transactions are not.

use std::sync::Arc;
use std::time::Duration;

use alloy::{
    network::TransactionBuilder,
    primitives::{Address, TxHash, U256},
    rpc::types::TransactionRequest,
};
use tracing::{info, warn};

use crate::{
    config::{DEFAULT_RECEIPT_POLL_INTERVAL, DEFAULT_RECEIPT_TIMEOUT},
    error::{AppError, Result},
    ethereum::{contracts::Weth, wait_for_receipt, ChainClient, WalletManager, DEFAULT_GAS_LIMIT},
    retry::{safe_call, RetryPolicy},
    services::BalanceService,
    types::{
        format_ether, AccountOutcome, AccountStatus, FinalBalance, FundingStage, FundingTarget,
        SeedReport, TxReceipt,
    },
};

/// A funding step that did not complete.
#[derive(Debug)]
struct StepFailure {
    tx: Option<TxHash>,
    error: AppError,
}

impl StepFailure {
    fn before_broadcast(error: AppError) -> Self {
        Self { tx: None, error }
    }
}

/// Tops up WETH balances from a single funding account.
pub struct Seeder {
    client: Arc<dyn ChainClient>,
    balances: BalanceService,
    wallet: WalletManager,
    weth: Weth,
    policy: RetryPolicy,
    gas_limit: u64,
    receipt_poll_interval: Duration,
    receipt_timeout: Duration,
}

impl Seeder {
    /// Create a seeder funding from `wallet` through the WETH contract at `weth_address`.
    pub fn new(
        client: Arc<dyn ChainClient>,
        wallet: WalletManager,
        weth_address: Address,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            balances: BalanceService::new(client.clone(), policy.clone()),
            client,
            wallet,
            weth: Weth::new(weth_address),
            policy,
            gas_limit: DEFAULT_GAS_LIMIT,
            receipt_poll_interval: DEFAULT_RECEIPT_POLL_INTERVAL,
            receipt_timeout: DEFAULT_RECEIPT_TIMEOUT,
        }
    }

    /// Gas limit for each funding transaction.
    #[must_use]
    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    /// Receipt polling interval and timeout.
    #[must_use]
    pub fn with_receipt_polling(mut self, poll_interval: Duration, timeout: Duration) -> Self {
        self.receipt_poll_interval = poll_interval;
        self.receipt_timeout = timeout;
        self
    }

    /// Funding account address.
    pub fn funder(&self) -> Address {
        self.wallet.address()
    }

    /// Process every target in order, then re-read all final balances.
    ///
    /// Per-account failures are recorded in the report and do not stop the
    /// run. Only failing to read the chain ID or block number is fatal.
    pub async fn run(&self, targets: &[FundingTarget]) -> Result<SeedReport> {
        let chain_id = safe_call(&self.policy, || self.client.chain_id()).await?;
        let block_number = safe_call(&self.policy, || self.client.block_number()).await?;

        info!(
            chain_id = chain_id,
            block = block_number,
            funder = %self.funder(),
            weth = %self.weth.address(),
            accounts = targets.len(),
            "Starting WETH top-up"
        );

        let mut outcomes = Vec::with_capacity(targets.len());
        for target in targets {
            outcomes.push(self.seed_account(target, chain_id).await);
        }

        let mut final_balances = Vec::with_capacity(targets.len());
        for target in targets {
            let balance = self
                .balances
                .weth_balance(self.weth, target.recipient)
                .await
                .map_err(|e| e.to_string());
            final_balances.push(FinalBalance {
                label: target.label.clone(),
                address: target.recipient,
                balance,
            });
        }

        Ok(SeedReport { chain_id, block_number, funder: self.funder(), outcomes, final_balances })
    }

    async fn seed_account(&self, target: &FundingTarget, chain_id: u64) -> AccountOutcome {
        let outcome = |shortfall: U256, status: AccountStatus| AccountOutcome {
            label: target.label.clone(),
            recipient: target.recipient,
            shortfall,
            status,
        };

        let current = match self.balances.weth_balance(self.weth, target.recipient).await {
            Ok(balance) => balance,
            Err(error) => {
                warn!(account = %target.label, error = %error, "Could not read WETH balance");
                return outcome(
                    U256::ZERO,
                    AccountStatus::Failed {
                        stage: FundingStage::BalanceRead,
                        tx: None,
                        reason: error.to_string(),
                    },
                );
            }
        };

        let shortfall = target.shortfall(current);
        if shortfall.is_zero() {
            info!(
                account = %target.label,
                balance = %format_ether(current),
                "Already at or above target, skipping"
            );
            return outcome(shortfall, AccountStatus::Skipped);
        }

        info!(
            account = %target.label,
            recipient = %target.recipient,
            shortfall = %format_ether(shortfall),
            "Topping up WETH"
        );

        let funder = self.funder();
        let deposit = self.weth.deposit_request(funder, shortfall);
        let deposit = match self.submit(FundingStage::Deposit, deposit, chain_id).await {
            Ok(receipt) => receipt.hash,
            Err(failure) => return outcome(shortfall, failed(FundingStage::Deposit, failure)),
        };

        let transfer = self.weth.transfer_request(funder, target.recipient, shortfall);
        let transfer = match self.submit(FundingStage::Transfer, transfer, chain_id).await {
            Ok(receipt) => receipt.hash,
            Err(failure) => return outcome(shortfall, failed(FundingStage::Transfer, failure)),
        };

        outcome(shortfall, AccountStatus::Completed { deposit, transfer })
    }

    /// Sign, broadcast once, and await a successful receipt.
    async fn submit(
        &self,
        stage: FundingStage,
        tx: TransactionRequest,
        chain_id: u64,
    ) -> std::result::Result<TxReceipt, StepFailure> {
        let funder = self.funder();

        let nonce = safe_call(&self.policy, || self.client.transaction_count(funder))
            .await
            .map_err(StepFailure::before_broadcast)?;
        let gas_price = safe_call(&self.policy, || self.client.gas_price())
            .await
            .map_err(StepFailure::before_broadcast)?;

        let tx = tx
            .with_nonce(nonce)
            .with_gas_limit(self.gas_limit)
            .with_gas_price(gas_price)
            .with_chain_id(chain_id);

        let raw = self.wallet.sign_transaction(tx).await.map_err(StepFailure::before_broadcast)?;
        let hash = self
            .client
            .send_raw_transaction(&raw)
            .await
            .map_err(StepFailure::before_broadcast)?;
        info!(stage = %stage, tx = %hash, nonce = nonce, "Transaction submitted");

        let receipt = wait_for_receipt(
            self.client.as_ref(),
            hash,
            &self.policy,
            self.receipt_poll_interval,
            self.receipt_timeout,
        )
        .await
        .map_err(|error| StepFailure { tx: Some(hash), error })?;

        info!(stage = %stage, tx = %hash, status = receipt.status_code(), "Transaction mined");

        if !receipt.success {
            return Err(StepFailure { tx: Some(hash), error: AppError::TransactionFailed(hash) });
        }
        Ok(receipt)
    }
}

fn failed(stage: FundingStage, failure: StepFailure) -> AccountStatus {
    warn!(stage = %stage, tx = ?failure.tx, error = %failure.error, "Funding step failed");
    AccountStatus::Failed { stage, tx: failure.tx, reason: failure.error.to_string() }
}
