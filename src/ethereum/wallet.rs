//! Wallet management.

use alloy::{
    network::{eip2718::Encodable2718, EthereumWallet, TransactionBuilder},
    primitives::{Address, Bytes},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
};

use crate::error::{AppError, Result};

/// Local signer for the funding account.
#[derive(Clone)]
pub struct WalletManager {
    /// Network wallet used to build signed envelopes.
    wallet: EthereumWallet,
    /// Wallet address.
    address: Address,
}

impl WalletManager {
    /// Create a wallet manager from a private key string.
    pub fn from_private_key(private_key: &str) -> Result<Self> {
        // Remove 0x prefix if present
        let key = private_key.trim();
        let key = key.strip_prefix("0x").unwrap_or(key);

        let signer: PrivateKeySigner =
            key.parse().map_err(|e: alloy::signers::local::LocalSignerError| {
                AppError::Wallet(e.to_string())
            })?;

        let address = signer.address();
        let wallet = EthereumWallet::from(signer);

        tracing::info!(address = %address, "Wallet initialized");

        Ok(Self { wallet, address })
    }

    /// Get the wallet address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Sign a fully populated request and return its EIP-2718 encoding.
    ///
    /// The request must carry nonce, gas limit, gas price and chain id.
    pub async fn sign_transaction(&self, tx: TransactionRequest) -> Result<Bytes> {
        let envelope = tx.with_from(self.address).build(&self.wallet).await?;
        Ok(envelope.encoded_2718().into())
    }
}

impl std::fmt::Debug for WalletManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletManager").field("address", &self.address).finish()
    }
}
