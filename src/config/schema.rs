//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the Multibox client.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// JSON-RPC endpoint URL of the node.
    pub eth_gateway: String,

    /// Gas price in gwei (decimal, converted to wei at construction).
    pub gas_price_gwei: f64,

    /// Chain ID for EIP-155 signing. Fetched from the node when absent.
    pub chain_id: Option<u64>,

    /// Per-call RPC timeout in milliseconds.
    pub rpc_timeout_ms: u64,

    /// Path to the compiled Multibox contract artifact (`{abi, bytecode}` JSON).
    pub artifact_path: String,

    /// ENS settings used to derive subdomain name-hashes.
    pub ens: EnsConfig,

    /// Settings for the explicit confirmation API.
    pub confirmation: ConfirmationConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            eth_gateway: "http://localhost:8545".to_string(),
            gas_price_gwei: 1.0,
            chain_id: None,
            rpc_timeout_ms: 2000,
            artifact_path: "abi/Multibox.json".to_string(),
            ens: EnsConfig::default(),
            confirmation: ConfirmationConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// ENS configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EnsConfig {
    /// Root domain subdomains are registered under (e.g. "datafund.eth").
    pub domain: String,
}

impl Default for EnsConfig {
    fn default() -> Self {
        Self {
            domain: "datafund.eth".to_string(),
        }
    }
}

/// Confirmation polling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfirmationConfig {
    /// Number of block confirmations required for finality.
    pub blocks: u32,

    /// Receipt polling interval in milliseconds.
    pub poll_interval_ms: u64,

    /// Maximum time to wait for confirmation in seconds.
    pub timeout_secs: u64,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            blocks: 1,
            poll_interval_ms: 2000,
            timeout_secs: 120,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
