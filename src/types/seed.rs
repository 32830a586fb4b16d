//! Seeding run types.

use std::fmt;

use alloy::primitives::{Address, TxHash, U256};

use super::token::format_ether;

/// An account that should hold at least `target` wrapped ETH.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundingTarget {
    /// Display label (e.g. "Liquidator").
    pub label: String,
    /// Account to fund.
    pub recipient: Address,
    /// Target balance in wei.
    pub target: U256,
}

impl FundingTarget {
    /// Create a funding target.
    pub fn new(label: impl Into<String>, recipient: Address, target: U256) -> Self {
        Self { label: label.into(), recipient, target }
    }

    /// Amount needed to reach the target, floored at zero.
    pub fn shortfall(&self, current: U256) -> U256 {
        self.target.saturating_sub(current)
    }
}

/// Step of the funding sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FundingStage {
    /// Reading the current balance.
    BalanceRead,
    /// Wrapping ETH in the funding account.
    Deposit,
    /// Sending WETH to the recipient.
    Transfer,
}

impl fmt::Display for FundingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FundingStage::BalanceRead => write!(f, "balance read"),
            FundingStage::Deposit => write!(f, "WETH deposit"),
            FundingStage::Transfer => write!(f, "WETH transfer"),
        }
    }
}

/// Terminal state of one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountStatus {
    /// Already at or above target.
    Skipped,
    /// Both transactions succeeded.
    Completed {
        /// Deposit transaction.
        deposit: TxHash,
        /// Transfer transaction.
        transfer: TxHash,
    },
    /// The sequence stopped at `stage`.
    Failed {
        /// Step that failed.
        stage: FundingStage,
        /// Hash of the failed transaction, if one was broadcast.
        tx: Option<TxHash>,
        /// Failure description.
        reason: String,
    },
}

/// Per-account result of a seeding run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountOutcome {
    /// Display label.
    pub label: String,
    /// Funded account.
    pub recipient: Address,
    /// Computed shortfall in wei (zero when the balance could not be read).
    pub shortfall: U256,
    /// Terminal state.
    pub status: AccountStatus,
}

impl AccountOutcome {
    /// Whether the account ended in a failure state.
    pub fn is_failed(&self) -> bool {
        matches!(self.status, AccountStatus::Failed { .. })
    }
}

/// Balance re-read after processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalBalance {
    /// Display label.
    pub label: String,
    /// Account.
    pub address: Address,
    /// WETH balance in wei, or the read error.
    pub balance: Result<U256, String>,
}

/// Summary of a seeding run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    /// Chain the run was against.
    pub chain_id: u64,
    /// Block number at start.
    pub block_number: u64,
    /// Funding account.
    pub funder: Address,
    /// One entry per target, in processing order.
    pub outcomes: Vec<AccountOutcome>,
    /// One entry per target, read after all targets were processed.
    pub final_balances: Vec<FinalBalance>,
}

impl SeedReport {
    /// Number of accounts that ended in a failure state.
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }
}

impl fmt::Display for SeedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Chain ID: {}", self.chain_id)?;
        writeln!(f, "Block: {}", self.block_number)?;
        writeln!(f, "Funding account: {}", self.funder)?;

        for outcome in &self.outcomes {
            match &outcome.status {
                AccountStatus::Skipped => {
                    writeln!(f, "{} already at or above target, skipping", outcome.label)?
                }
                AccountStatus::Completed { deposit, transfer } => {
                    writeln!(
                        f,
                        "Topped up {} ({}) by {} WETH",
                        outcome.label,
                        outcome.recipient,
                        format_ether(outcome.shortfall)
                    )?;
                    writeln!(f, "  WETH deposit tx: {}", deposit)?;
                    writeln!(f, "  WETH transfer tx: {}", transfer)?;
                }
                AccountStatus::Failed { stage, tx, reason } => {
                    writeln!(
                        f,
                        "Top-up of {} ({}) failed at {}: {}",
                        outcome.label, outcome.recipient, stage, reason
                    )?;
                    if let Some(tx) = tx {
                        writeln!(f, "  {} tx: {}", stage, tx)?;
                    }
                }
            }
        }

        writeln!(f)?;
        writeln!(f, "Final balances:")?;
        for entry in &self.final_balances {
            match &entry.balance {
                Ok(balance) => {
                    writeln!(f, "{} WETH (wei): {}", entry.label, balance)?;
                    writeln!(f, "{} WETH (ETH): {}", entry.label, format_ether(*balance))?;
                }
                Err(err) => writeln!(f, "{} WETH: unavailable ({})", entry.label, err)?,
            }
        }
        Ok(())
    }
}
