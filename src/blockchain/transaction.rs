//! Transaction building, signing, and confirmation monitoring.
//!
//! # Responsibilities
//! - Build legacy transactions with a fixed gas limit and configured gas price
//! - Sign with the caller's key and broadcast the raw payload
//! - Resolve on the node's hash acknowledgment
//! - Optionally poll for confirmation, as a separate explicit call

use std::time::Duration;

use alloy::eips::eip2718::Encodable2718;
use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::rpc::types::TransactionRequest;
use tokio::time::{interval, timeout};

use crate::blockchain::client::ContractBinding;
use crate::blockchain::types::{ConfirmationStatus, MultiboxError, MultiboxResult};
use crate::blockchain::wallet::Account;
use crate::config::ConfirmationConfig;

/// Destination of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxTarget {
    /// Contract creation; the data is the deployment bytecode.
    Create,
    /// Call into an existing contract.
    Call(Address),
}

/// Builds, signs and broadcasts transactions through a [`ContractBinding`].
pub struct TxBuilder<'a, B: ContractBinding + ?Sized> {
    binding: &'a B,
    gas_price: u128,
    chain_id: Option<u64>,
}

impl<'a, B: ContractBinding + ?Sized> TxBuilder<'a, B> {
    /// Create a new transaction builder.
    ///
    /// # Arguments
    /// * `binding` - RPC capability used to fill and submit transactions
    /// * `gas_price` - Gas price in wei
    /// * `chain_id` - Configured chain ID; fetched from the node when `None`
    pub fn new(binding: &'a B, gas_price: u128, chain_id: Option<u64>) -> Self {
        Self {
            binding,
            gas_price,
            chain_id,
        }
    }

    /// Build an unsigned legacy transaction request.
    pub fn build(
        &self,
        from: Address,
        target: TxTarget,
        data: Bytes,
        gas_limit: u64,
        nonce: u64,
        chain_id: u64,
    ) -> TransactionRequest {
        let tx = TransactionRequest::default()
            .with_from(from)
            .with_gas_limit(gas_limit)
            .with_gas_price(self.gas_price)
            .with_nonce(nonce)
            .with_chain_id(chain_id);

        match target {
            TxTarget::Create => tx.with_deploy_code(data),
            TxTarget::Call(to) => tx.with_to(to).with_input(data),
        }
    }

    /// Sign a transaction request, returning the EIP-2718 encoded payload.
    pub async fn sign(&self, account: &Account, tx: TransactionRequest) -> MultiboxResult<Bytes> {
        let envelope = tx
            .build(&account.wallet())
            .await
            .map_err(|e| MultiboxError::Signing(format!("Signing failed: {}", e)))?;
        Ok(Bytes::from(envelope.encoded_2718()))
    }

    /// Build, sign and broadcast a transaction from `account`.
    ///
    /// When `nonce` is `None` the sender's pending transaction count is used.
    /// Resolves as soon as the node acknowledges the hash; the transaction may
    /// still be pending, dropped or reverted afterwards.
    pub async fn send(
        &self,
        account: &Account,
        target: TxTarget,
        data: Bytes,
        gas_limit: u64,
        nonce: Option<u64>,
    ) -> MultiboxResult<TxHash> {
        let from = account.address();
        let chain_id = match self.chain_id {
            Some(id) => id,
            None => self.binding.chain_id().await?,
        };
        let nonce = match nonce {
            Some(n) => n,
            None => self.binding.pending_transaction_count(from).await?,
        };

        let tx = self.build(from, target, data, gas_limit, nonce, chain_id);
        let raw = self.sign(account, tx).await?;
        let tx_hash = self.binding.send_raw_transaction(raw).await?;

        tracing::info!(
            tx_hash = %tx_hash,
            from = %from,
            nonce = nonce,
            gas_limit = gas_limit,
            "Transaction submitted"
        );

        Ok(tx_hash)
    }

    /// Wait for a transaction to be confirmed.
    ///
    /// Inclusion counts as the first confirmation.
    pub async fn wait_for_confirmation(
        &self,
        tx_hash: TxHash,
        config: &ConfirmationConfig,
    ) -> MultiboxResult<ConfirmationStatus> {
        let required_confirmations = config.blocks.max(1) as u64;
        let poll_interval = Duration::from_millis(config.poll_interval_ms);

        let result = timeout(Duration::from_secs(config.timeout_secs), async {
            let mut ticker = interval(poll_interval);

            loop {
                ticker.tick().await;

                let receipt = match self.binding.transaction_receipt(tx_hash).await? {
                    Some(r) => r,
                    None => {
                        tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                        continue;
                    }
                };

                let current_block = self.binding.block_number().await?;
                let tx_block = receipt.block_number.unwrap_or(current_block);

                if !receipt.success {
                    return Ok(ConfirmationStatus::Reverted {
                        block_number: tx_block,
                    });
                }

                let confirmations = current_block.saturating_sub(tx_block) + 1;
                if confirmations >= required_confirmations {
                    return Ok(ConfirmationStatus::Confirmed {
                        block_number: tx_block,
                        contract_address: receipt.contract_address,
                    });
                }

                tracing::debug!(
                    tx_hash = %tx_hash,
                    confirmations = confirmations,
                    required = required_confirmations,
                    "Waiting for confirmations"
                );
            }
        })
        .await;

        match result {
            Ok(status) => status,
            Err(_) => Err(MultiboxError::ConfirmationTimeout {
                tx_hash,
                timeout_secs: config.timeout_secs,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::fake::{FakeBinding, TEST_PRIVATE_KEY};
    use crate::blockchain::types::ReceiptSummary;
    use alloy::consensus::{Transaction, TxEnvelope};
    use alloy::eips::eip2718::Decodable2718;
    use alloy::primitives::{address, keccak256, TxKind};

    fn account() -> Account {
        Account::from_private_key(TEST_PRIVATE_KEY, "alice").unwrap()
    }

    fn fast_confirmation() -> ConfirmationConfig {
        ConfirmationConfig {
            blocks: 2,
            poll_interval_ms: 5,
            timeout_secs: 1,
        }
    }

    #[tokio::test]
    async fn test_send_signs_legacy_transaction() {
        let binding = FakeBinding::new(31337);
        let builder = TxBuilder::new(&binding, 3_000_000_000, Some(5));
        let to = address!("00000000000000000000000000000000000000aa");

        let hash = builder
            .send(
                &account(),
                TxTarget::Call(to),
                Bytes::from_static(b"\x01\x02"),
                60_000,
                Some(9),
            )
            .await
            .unwrap();

        let raw = binding.sent().pop().unwrap();
        assert_eq!(hash, keccak256(&raw));

        let envelope = TxEnvelope::decode_2718(&mut &raw[..]).unwrap();
        assert!(envelope.is_legacy());
        assert_eq!(envelope.kind(), TxKind::Call(to));
        assert_eq!(envelope.gas_limit(), 60_000);
        assert_eq!(envelope.gas_price(), Some(3_000_000_000));
        assert_eq!(envelope.nonce(), 9);
        assert_eq!(envelope.chain_id(), Some(5));
        assert_eq!(envelope.input(), &Bytes::from_static(b"\x01\x02"));

        // Configured chain id and explicit nonce need no lookups.
        assert_eq!(binding.chain_id_queries(), 0);
        assert_eq!(binding.nonce_queries(), 0);
    }

    #[tokio::test]
    async fn test_send_fills_chain_id_and_nonce() {
        let binding = FakeBinding::new(31337).with_pending_nonce(4);
        let builder = TxBuilder::new(&binding, 1, None);

        builder
            .send(&account(), TxTarget::Create, Bytes::from_static(b"\x60\x80"), 100_000, None)
            .await
            .unwrap();

        let raw = binding.sent().pop().unwrap();
        let envelope = TxEnvelope::decode_2718(&mut &raw[..]).unwrap();
        assert_eq!(envelope.kind(), TxKind::Create);
        assert_eq!(envelope.chain_id(), Some(31337));
        assert_eq!(envelope.nonce(), 4);
        assert_eq!(binding.chain_id_queries(), 1);
        assert_eq!(binding.nonce_queries(), 1);
    }

    #[tokio::test]
    async fn test_send_propagates_node_rejection() {
        let binding = FakeBinding::new(1).failing_sends("nonce too low");
        let builder = TxBuilder::new(&binding, 1, Some(1));

        let err = builder
            .send(&account(), TxTarget::Create, Bytes::new(), 21_000, Some(0))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("nonce too low"));
    }

    #[tokio::test]
    async fn test_wait_for_confirmation() {
        let created = address!("5fbdb2315678afecb367f032d93f642f64180aa3");
        let binding = FakeBinding::new(1)
            .with_block_number(11)
            .with_receipts(vec![
                None,
                Some(ReceiptSummary {
                    block_number: Some(10),
                    success: true,
                    contract_address: Some(created),
                }),
            ]);
        let builder = TxBuilder::new(&binding, 1, Some(1));

        let status = builder
            .wait_for_confirmation(TxHash::ZERO, &fast_confirmation())
            .await
            .unwrap();
        assert_eq!(
            status,
            ConfirmationStatus::Confirmed {
                block_number: 10,
                contract_address: Some(created),
            }
        );
    }

    #[tokio::test]
    async fn test_wait_for_confirmation_reverted() {
        let binding = FakeBinding::new(1).with_block_number(3).with_receipts(vec![Some(
            ReceiptSummary {
                block_number: Some(3),
                success: false,
                contract_address: None,
            },
        )]);
        let builder = TxBuilder::new(&binding, 1, Some(1));

        let status = builder
            .wait_for_confirmation(TxHash::ZERO, &fast_confirmation())
            .await
            .unwrap();
        assert_eq!(status, ConfirmationStatus::Reverted { block_number: 3 });
    }

    #[tokio::test]
    async fn test_wait_for_confirmation_timeout() {
        let binding = FakeBinding::new(1);
        let builder = TxBuilder::new(&binding, 1, Some(1));

        let err = builder
            .wait_for_confirmation(TxHash::ZERO, &fast_confirmation())
            .await
            .unwrap_err();
        assert!(matches!(err, MultiboxError::ConfirmationTimeout { .. }));
    }
}
