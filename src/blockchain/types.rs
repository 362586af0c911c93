//! Chain-specific types and error definitions.

use alloy::primitives::{Address, TxHash};
use serde::Serialize;
use thiserror::Error;

use crate::multibox::codec::CodecError;

/// Errors that can occur during Multibox operations.
#[derive(Debug, Error)]
pub enum MultiboxError {
    /// RPC connection or request failed, including node-reported reverts.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} ms")]
    Timeout(u64),

    /// Invalid private key format or signing failure.
    #[error("Signing error: {0}")]
    Signing(String),

    /// Call data or return data could not be ABI encoded/decoded.
    #[error("ABI error: {0}")]
    Abi(String),

    /// Malformed hash token.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Contract artifact could not be read or parsed.
    #[error("Artifact error: {0}")]
    Artifact(String),

    /// Transaction was not confirmed within expected time.
    #[error("Transaction {tx_hash} not confirmed after {timeout_secs} seconds")]
    ConfirmationTimeout { tx_hash: TxHash, timeout_secs: u64 },

    /// Configuration rejected at construction.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for Multibox operations.
pub type MultiboxResult<T> = Result<T, MultiboxError>;

/// The parts of a transaction receipt the client inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptSummary {
    /// Block the transaction was included in.
    pub block_number: Option<u64>,
    /// `true` if execution succeeded.
    pub success: bool,
    /// Address of the contract created by the transaction, if any.
    pub contract_address: Option<Address>,
}

/// Transaction confirmation status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConfirmationStatus {
    /// Transaction is confirmed with required block depth.
    Confirmed {
        block_number: u64,
        /// Address of the contract created by this transaction, if any.
        contract_address: Option<Address>,
    },
    /// Transaction was mined but reverted.
    Reverted { block_number: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MultiboxError::Timeout(2000);
        assert_eq!(err.to_string(), "RPC timeout after 2000 ms");

        let err = MultiboxError::Signing("Invalid private key format".to_string());
        assert!(err.to_string().contains("Invalid private key"));
    }

    #[test]
    fn test_codec_error_is_transparent() {
        let err: MultiboxError = CodecError::InvalidLength {
            field: "address",
            expected: 42,
            actual: 10,
        }
        .into();
        assert_eq!(err.to_string(), "address must be 42 characters, got 10");
    }

    #[test]
    fn test_confirmation_status_json() {
        let status = ConfirmationStatus::Reverted { block_number: 7 };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["status"], "reverted");
        assert_eq!(json["block_number"], 7);
    }
}
