//! In-memory [`ContractBinding`] for unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use alloy::primitives::{keccak256, Address, Bytes, TxHash};
use async_trait::async_trait;

use crate::blockchain::client::ContractBinding;
use crate::blockchain::types::{MultiboxError, MultiboxResult, ReceiptSummary};

// Well-known test private key (Anvil's first account)
pub(crate) const TEST_PRIVATE_KEY: &str =
    "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Records every call and raw transaction; answers with canned values.
///
/// Broadcasts are acknowledged with `keccak256(raw)`, as a node would.
pub(crate) struct FakeBinding {
    chain_id: u64,
    pending_nonce: u64,
    block_number: u64,
    call_response: Bytes,
    send_error: Option<String>,
    receipts: Mutex<VecDeque<Option<ReceiptSummary>>>,
    calls: Mutex<Vec<(Address, Bytes)>>,
    sent: Mutex<Vec<Bytes>>,
    chain_id_queries: AtomicUsize,
    nonce_queries: AtomicUsize,
}

impl FakeBinding {
    pub(crate) fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            pending_nonce: 0,
            block_number: 0,
            call_response: Bytes::new(),
            send_error: None,
            receipts: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
            chain_id_queries: AtomicUsize::new(0),
            nonce_queries: AtomicUsize::new(0),
        }
    }

    pub(crate) fn with_pending_nonce(mut self, nonce: u64) -> Self {
        self.pending_nonce = nonce;
        self
    }

    pub(crate) fn with_block_number(mut self, block: u64) -> Self {
        self.block_number = block;
        self
    }

    pub(crate) fn with_call_response(mut self, response: Vec<u8>) -> Self {
        self.call_response = Bytes::from(response);
        self
    }

    pub(crate) fn with_receipts(self, receipts: Vec<Option<ReceiptSummary>>) -> Self {
        *self.receipts.lock().unwrap() = receipts.into();
        self
    }

    pub(crate) fn failing_sends(mut self, message: &str) -> Self {
        self.send_error = Some(message.to_string());
        self
    }

    pub(crate) fn calls(&self) -> Vec<(Address, Bytes)> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn sent(&self) -> Vec<Bytes> {
        self.sent.lock().unwrap().clone()
    }

    pub(crate) fn chain_id_queries(&self) -> usize {
        self.chain_id_queries.load(Ordering::SeqCst)
    }

    pub(crate) fn nonce_queries(&self) -> usize {
        self.nonce_queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContractBinding for FakeBinding {
    async fn chain_id(&self) -> MultiboxResult<u64> {
        self.chain_id_queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.chain_id)
    }

    async fn pending_transaction_count(&self, _address: Address) -> MultiboxResult<u64> {
        self.nonce_queries.fetch_add(1, Ordering::SeqCst);
        Ok(self.pending_nonce)
    }

    async fn call(&self, to: Address, data: Bytes) -> MultiboxResult<Bytes> {
        self.calls.lock().unwrap().push((to, data));
        Ok(self.call_response.clone())
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> MultiboxResult<TxHash> {
        if let Some(message) = &self.send_error {
            return Err(MultiboxError::Rpc(message.clone()));
        }
        let hash = keccak256(&raw);
        self.sent.lock().unwrap().push(raw);
        Ok(hash)
    }

    async fn transaction_receipt(
        &self,
        _tx_hash: TxHash,
    ) -> MultiboxResult<Option<ReceiptSummary>> {
        Ok(self.receipts.lock().unwrap().pop_front().flatten())
    }

    async fn block_number(&self) -> MultiboxResult<u64> {
        Ok(self.block_number)
    }
}
