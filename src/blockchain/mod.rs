//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Caller-supplied account (private key, subdomain)
//!     → wallet.rs (key parsing, signing wallet)
//!     → transaction.rs (build, sign, broadcast, optional confirm)
//!     → client.rs (RPC connection with timeouts)
//! ```
//!
//! # Security Constraints
//! - Never log private keys or sensitive data
//! - All RPC calls are bounded by the configured timeout
//! - No retries: every failure reaches the caller

pub mod client;
pub mod transaction;
pub mod types;
pub mod wallet;

#[cfg(test)]
pub(crate) mod fake;

pub use client::{BlockchainClient, ContractBinding};
pub use transaction::{TxBuilder, TxTarget};
pub use types::{ConfirmationStatus, MultiboxError, MultiboxResult, ReceiptSummary};
pub use wallet::Account;
