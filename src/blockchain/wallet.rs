//! Caller-supplied accounts and transaction signing keys.
//!
//! # Security
//! - Keys are never logged or serialized
//! - The CLI loads keys ONLY from environment variables
//! - Accounts are never persisted by the client

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;

use crate::blockchain::types::{MultiboxError, MultiboxResult};

/// Environment variable name for the private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "MULTIBOX_PRIVATE_KEY";

/// A signing account together with the ENS subdomain label it owns.
#[derive(Clone)]
pub struct Account {
    signer: PrivateKeySigner,
    subdomain: String,
}

impl Account {
    /// Create an account from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    /// * `subdomain` - Subdomain label owned by this account
    pub fn from_private_key(private_key_hex: &str, subdomain: &str) -> MultiboxResult<Self> {
        let key_hex = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| MultiboxError::Signing(format!("Invalid private key format: {}", e)))?;

        tracing::debug!(
            address = %signer.address(),
            subdomain = subdomain,
            "Account loaded"
        );

        Ok(Self {
            signer,
            subdomain: subdomain.to_string(),
        })
    }

    /// Create an account and check that the key controls `address`.
    pub fn with_address(
        address: &str,
        private_key_hex: &str,
        subdomain: &str,
    ) -> MultiboxResult<Self> {
        let expected: Address = crate::multibox::codec::parse_address(address)?;
        let account = Self::from_private_key(private_key_hex, subdomain)?;
        if account.address() != expected {
            return Err(MultiboxError::Signing(format!(
                "Private key controls {}, not {}",
                account.address(),
                expected
            )));
        }
        Ok(account)
    }

    /// Load the signing key from `MULTIBOX_PRIVATE_KEY`.
    pub fn from_env(subdomain: &str) -> MultiboxResult<Self> {
        let private_key = std::env::var(PRIVATE_KEY_ENV_VAR).map_err(|_| {
            MultiboxError::Signing(format!(
                "Environment variable {} not set",
                PRIVATE_KEY_ENV_VAR
            ))
        })?;

        Self::from_private_key(&private_key, subdomain)
    }

    /// Get the account's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Get the subdomain label owned by this account.
    pub fn subdomain(&self) -> &str {
        &self.subdomain
    }

    /// Wallet used to sign transaction requests from this account.
    pub fn wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address())
            .field("subdomain", &self.subdomain)
            .finish()
    }
}
