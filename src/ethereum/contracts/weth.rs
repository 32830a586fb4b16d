//! Wrapped Ether contract bindings.

use alloy::{
    primitives::{Address, Bytes, U256},
    rpc::types::TransactionRequest,
    sol,
    sol_types::SolCall,
};

use crate::{ethereum::ChainClient, error::Result};

// Minimal WETH9 interface
sol! {
    interface IWETH {
        function deposit() external payable;
        function balanceOf(address account) external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
        function decimals() external view returns (uint8);
    }
}

/// Read-only handle plus request builders for a WETH contract.
#[derive(Debug, Clone, Copy)]
pub struct Weth {
    address: Address,
}

impl Weth {
    /// Bind to the contract at `address`.
    pub fn new(address: Address) -> Self {
        Self { address }
    }

    /// Contract address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Query `balanceOf(owner)`.
    pub async fn balance_of(&self, client: &dyn ChainClient, owner: Address) -> Result<U256> {
        let data = IWETH::balanceOfCall { account: owner }.abi_encode();
        let tx = TransactionRequest::default().to(self.address).input(Bytes::from(data).into());
        let output = client.call(&tx).await?;
        Ok(IWETH::balanceOfCall::abi_decode_returns(&output)?)
    }

    /// Unsigned `deposit()` call carrying `value` wei from `from`.
    pub fn deposit_request(&self, from: Address, value: U256) -> TransactionRequest {
        TransactionRequest::default()
            .from(from)
            .to(self.address)
            .value(value)
            .input(Bytes::from(IWETH::depositCall {}.abi_encode()).into())
    }

    /// Unsigned `transfer(to, amount)` call from `from`.
    pub fn transfer_request(&self, from: Address, to: Address, amount: U256) -> TransactionRequest {
        TransactionRequest::default()
            .from(from)
            .to(self.address)
            .input(Bytes::from(IWETH::transferCall { to, amount }.abi_encode()).into())
    }
}
