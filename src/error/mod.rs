//! Error types and handling module.
//!
//! Defines all application-specific error types and conversions.

use std::path::PathBuf;

use alloy::primitives::TxHash;
use thiserror::Error;

use crate::retry::Retryable;

/// Application-wide error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The node could not be reached when the connection was established.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Ethereum RPC errors.
    #[error("Ethereum RPC error: {0}")]
    Rpc(String),

    /// Transport errors.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Invalid Ethereum address.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Malformed ABI document or ABI encoding failure.
    #[error("ABI error: {0}")]
    Abi(String),

    /// No ABI file for the requested name.
    #[error("ABI file not found: {}", .0.display())]
    AbiNotFound(PathBuf),

    /// Wallet-related errors.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Pending transaction error.
    #[error("Pending transaction error: {0}")]
    PendingTransaction(String),

    /// Transaction was mined but reverted.
    #[error("Transaction {0} failed on-chain")]
    TransactionFailed(TxHash),

    /// Filesystem errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Retryable for AppError {
    fn is_retryable(&self) -> bool {
        matches!(self, AppError::Rpc(_) | AppError::Transport(_) | AppError::Connection(_))
    }
}

impl From<alloy::transports::TransportError> for AppError {
    fn from(err: alloy::transports::TransportError) -> Self {
        AppError::Transport(err.to_string())
    }
}

impl From<alloy::contract::Error> for AppError {
    fn from(err: alloy::contract::Error) -> Self {
        AppError::Rpc(err.to_string())
    }
}

impl From<alloy::signers::local::LocalSignerError> for AppError {
    fn from(err: alloy::signers::local::LocalSignerError) -> Self {
        AppError::Wallet(err.to_string())
    }
}

impl From<alloy::hex::FromHexError> for AppError {
    fn from(err: alloy::hex::FromHexError) -> Self {
        AppError::Parse(err.to_string())
    }
}

impl From<alloy::dyn_abi::Error> for AppError {
    fn from(err: alloy::dyn_abi::Error) -> Self {
        AppError::Abi(err.to_string())
    }
}

impl From<alloy::sol_types::Error> for AppError {
    fn from(err: alloy::sol_types::Error) -> Self {
        AppError::Abi(err.to_string())
    }
}

impl From<alloy::network::TransactionBuilderError<alloy::network::Ethereum>> for AppError {
    fn from(err: alloy::network::TransactionBuilderError<alloy::network::Ethereum>) -> Self {
        AppError::Wallet(err.to_string())
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(err: std::num::ParseIntError) -> Self {
        AppError::Parse(err.to_string())
    }
}

/// Result type alias using AppError.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_config_display() {
        let err = AppError::Config("RPC_URL is not set".to_string());
        assert_eq!(err.to_string(), "Configuration error: RPC_URL is not set");
    }

    #[test]
    fn test_app_error_connection_display() {
        let err = AppError::Connection("http://127.0.0.1:8545".to_string());
        assert_eq!(err.to_string(), "Connection error: http://127.0.0.1:8545");
    }

    #[test]
    fn test_app_error_rpc_display() {
        let err = AppError::Rpc("Connection timeout".to_string());
        assert_eq!(err.to_string(), "Ethereum RPC error: Connection timeout");
    }

    #[test]
    fn test_app_error_invalid_address_display() {
        let err = AppError::InvalidAddress("0xinvalid".to_string());
        assert_eq!(err.to_string(), "Invalid address: 0xinvalid");
    }

    #[test]
    fn test_app_error_abi_not_found_display() {
        let err = AppError::AbiNotFound(PathBuf::from("abi/missing.json"));
        assert_eq!(err.to_string(), "ABI file not found: abi/missing.json");
    }

    #[test]
    fn test_app_error_transaction_failed_display() {
        let err = AppError::TransactionFailed(TxHash::ZERO);
        assert!(err.to_string().contains("failed on-chain"));
    }

    #[test]
    fn test_transient_errors_are_retryable() {
        assert!(AppError::Rpc("rate limited".into()).is_retryable());
        assert!(AppError::Transport("reset by peer".into()).is_retryable());
        assert!(AppError::Connection("refused".into()).is_retryable());
    }

    #[test]
    fn test_validation_and_config_errors_are_not_retryable() {
        assert!(!AppError::InvalidAddress("0x12".into()).is_retryable());
        assert!(!AppError::Config("missing".into()).is_retryable());
        assert!(!AppError::Abi("bad".into()).is_retryable());
        assert!(!AppError::TransactionFailed(TxHash::ZERO).is_retryable());
    }

    #[test]
    fn test_from_parse_int_error() {
        let parse_result: std::result::Result<i32, _> = "not_a_number".parse();
        let parse_err = parse_result.unwrap_err();
        let app_err: AppError = parse_err.into();

        match app_err {
            AppError::Parse(msg) => assert!(msg.contains("invalid")),
            _ => panic!("Expected Parse error"),
        }
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
    }

    #[test]
    fn test_app_error_debug_trait() {
        let err = AppError::Config("test".to_string());
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("Config"));
    }
}
