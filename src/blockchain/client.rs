//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoint
//! - Read-only contract calls and raw transaction broadcast
//! - Query chain state needed for signing (chain id, pending nonce)
//! - Bound every request by the timeout fixed at construction

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use tokio::time::timeout;

use crate::blockchain::types::{MultiboxError, MultiboxResult, ReceiptSummary};

/// The RPC capability the Multibox client needs from a node.
///
/// Implemented over HTTP by [`BlockchainClient`]; tests substitute fakes.
#[async_trait]
pub trait ContractBinding: Send + Sync {
    /// `eth_chainId`
    async fn chain_id(&self) -> MultiboxResult<u64>;

    /// `eth_getTransactionCount` at the pending block.
    async fn pending_transaction_count(&self, address: Address) -> MultiboxResult<u64>;

    /// Read-only `eth_call` of `data` against the contract at `to`.
    async fn call(&self, to: Address, data: Bytes) -> MultiboxResult<Bytes>;

    /// Submit a signed, EIP-2718 encoded transaction.
    ///
    /// Resolves with the hash the node acknowledged; does not wait for inclusion.
    async fn send_raw_transaction(&self, raw: Bytes) -> MultiboxResult<TxHash>;

    /// Receipt of a mined transaction, or `None` while it is pending.
    async fn transaction_receipt(&self, tx_hash: TxHash)
        -> MultiboxResult<Option<ReceiptSummary>>;

    /// `eth_blockNumber`
    async fn block_number(&self) -> MultiboxResult<u64>;
}

/// HTTP JSON-RPC binding backed by an alloy provider.
#[derive(Clone)]
pub struct BlockchainClient {
    provider: Arc<dyn Provider + Send + Sync>,
    rpc_url: String,
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a new blockchain client.
    ///
    /// No request is made here; connection problems surface on first use.
    ///
    /// # Arguments
    /// * `rpc_url` - JSON-RPC endpoint URL
    /// * `timeout_ms` - Per-request timeout in milliseconds
    pub fn new(rpc_url: &str, timeout_ms: u64) -> MultiboxResult<Self> {
        let url: url::Url = rpc_url
            .parse()
            .map_err(|e| MultiboxError::Config(format!("Invalid RPC URL '{}': {}", rpc_url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(MultiboxError::Config(format!(
                "Unsupported RPC URL scheme '{}' in '{}'",
                url.scheme(),
                rpc_url
            )));
        }

        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect_http(url);

        tracing::info!(
            rpc_url = %rpc_url,
            timeout_ms = timeout_ms,
            "Blockchain client initialized"
        );

        Ok(Self {
            provider: Arc::new(provider),
            rpc_url: rpc_url.to_string(),
            timeout_duration: Duration::from_millis(timeout_ms),
        })
    }

    async fn request<T, E, F>(&self, method: &'static str, fut: F) -> MultiboxResult<T>
    where
        F: IntoFuture<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        match timeout(self.timeout_duration, fut.into_future()).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => {
                tracing::warn!(method = method, error = %e, "RPC error");
                Err(MultiboxError::Rpc(format!("{}: {}", method, e)))
            }
            Err(_) => {
                tracing::warn!(method = method, "RPC timeout");
                Err(MultiboxError::Timeout(self.timeout_duration.as_millis() as u64))
            }
        }
    }
}

#[async_trait]
impl ContractBinding for BlockchainClient {
    async fn chain_id(&self) -> MultiboxResult<u64> {
        self.request("eth_chainId", self.provider.get_chain_id()).await
    }

    async fn pending_transaction_count(&self, address: Address) -> MultiboxResult<u64> {
        self.request(
            "eth_getTransactionCount",
            self.provider.get_transaction_count(address).pending(),
        )
        .await
    }

    async fn call(&self, to: Address, data: Bytes) -> MultiboxResult<Bytes> {
        let tx = TransactionRequest::default().with_to(to).with_input(data);
        self.request("eth_call", self.provider.call(tx)).await
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> MultiboxResult<TxHash> {
        let pending = self
            .request(
                "eth_sendRawTransaction",
                self.provider.send_raw_transaction(&raw),
            )
            .await?;
        Ok(*pending.tx_hash())
    }

    async fn transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> MultiboxResult<Option<ReceiptSummary>> {
        let receipt = self
            .request(
                "eth_getTransactionReceipt",
                self.provider.get_transaction_receipt(tx_hash),
            )
            .await?;
        Ok(receipt.map(|r| ReceiptSummary {
            block_number: r.block_number,
            success: r.status(),
            contract_address: r.contract_address,
        }))
    }

    async fn block_number(&self) -> MultiboxResult<u64> {
        self.request("eth_blockNumber", self.provider.get_block_number())
            .await
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.rpc_url)
            .field("timeout_ms", &self.timeout_duration.as_millis())
            .finish()
    }
}
