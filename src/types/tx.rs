//! Transaction receipt types.

use alloy::primitives::TxHash;

/// Terminal state of a mined transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxReceipt {
    /// Transaction hash.
    pub hash: TxHash,
    /// Execution status (false means reverted).
    pub success: bool,
    /// Block the transaction was included in.
    pub block_number: Option<u64>,
    /// Gas consumed.
    pub gas_used: u64,
}

impl TxReceipt {
    /// Status as reported by the node (1 = success, 0 = failure).
    pub fn status_code(&self) -> u8 {
        u8::from(self.success)
    }
}
