//! Multibox client: deployment, request creation and request lookups.

use alloy::primitives::{Address, Bytes, TxHash, B256};
use alloy::sol_types::SolCall;

use crate::blockchain::client::{BlockchainClient, ContractBinding};
use crate::blockchain::transaction::{TxBuilder, TxTarget};
use crate::blockchain::types::{ConfirmationStatus, MultiboxError, MultiboxResult};
use crate::blockchain::wallet::Account;
use crate::config::validation::gwei_to_wei;
use crate::config::ClientConfig;
use crate::multibox::codec::{encode_feed_location_hash, FeedLocationHash};
use crate::multibox::contract::{Multibox, MultiboxArtifact, MultiboxRequest};
use crate::multibox::namehash::{EnsNameHasher, NameHasher};

/// Gas limit of the contract-creation transaction.
pub const DEPLOY_GAS_LIMIT: u64 = 1_500_000;

/// Gas limit of a `newRequest` transaction.
pub const NEW_REQUEST_GAS_LIMIT: u64 = 510_000;

/// Address a deployment from `deployer` with `nonce` will create.
pub fn predict_multibox_address(deployer: Address, nonce: u64) -> Address {
    deployer.create(nonce)
}

/// Client for Multibox contracts behind one RPC endpoint.
///
/// Mutating operations resolve once the node acknowledges the transaction
/// hash. They do not wait for inclusion; use
/// [`wait_for_confirmation`](Self::wait_for_confirmation) for that.
///
/// Nonces are not sequenced: concurrent transactions from one account must be
/// serialized by the caller.
pub struct MultiboxClient<B = BlockchainClient, H = EnsNameHasher> {
    binding: B,
    hasher: H,
    artifact: Option<MultiboxArtifact>,
    config: ClientConfig,
    gas_price: u128,
}

impl MultiboxClient {
    /// Create a client talking HTTP JSON-RPC to `config.eth_gateway`.
    pub fn connect(config: ClientConfig) -> MultiboxResult<Self> {
        let binding = BlockchainClient::new(&config.eth_gateway, config.rpc_timeout_ms)?;
        Self::with_binding(config, binding, EnsNameHasher)
    }
}

impl<B: ContractBinding, H: NameHasher> MultiboxClient<B, H> {
    /// Create a client over an explicit binding and name hasher.
    pub fn with_binding(config: ClientConfig, binding: B, hasher: H) -> MultiboxResult<Self> {
        let gas_price =
            gwei_to_wei(config.gas_price_gwei).map_err(|e| MultiboxError::Config(e.to_string()))?;

        Ok(Self {
            binding,
            hasher,
            artifact: None,
            config,
            gas_price,
        })
    }

    /// Attach the compiled contract used by [`deploy_multibox`](Self::deploy_multibox).
    pub fn with_artifact(mut self, artifact: MultiboxArtifact) -> Self {
        self.artifact = Some(artifact);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Gas price in wei applied to every transaction.
    pub fn gas_price(&self) -> u128 {
        self.gas_price
    }

    pub fn binding(&self) -> &B {
        &self.binding
    }

    /// Name-hash of `<label>.<root domain>`.
    pub fn subdomain_name_hash(&self, label: &str) -> B256 {
        self.hasher.name_hash(&format!("{}.{}", label, self.config.ens.domain))
    }

    /// Feed-location hash for a feed from `sender` to the recipient subdomain.
    pub fn feed_location_hash_for(
        &self,
        sender: &Account,
        recipient_label: &str,
    ) -> FeedLocationHash {
        encode_feed_location_hash(sender.address(), self.subdomain_name_hash(recipient_label))
    }

    fn tx_builder(&self) -> TxBuilder<'_, B> {
        TxBuilder::new(&self.binding, self.gas_price, self.config.chain_id)
    }

    /// Deploy a new Multibox contract from `account`.
    ///
    /// The contract address is not returned; see [`predict_multibox_address`]
    /// or the receipt from [`wait_for_confirmation`](Self::wait_for_confirmation).
    pub async fn deploy_multibox(&self, account: &Account, nonce: u64) -> MultiboxResult<TxHash> {
        let artifact = self.artifact.as_ref().ok_or_else(|| {
            MultiboxError::Artifact("no contract artifact attached to client".to_string())
        })?;

        tracing::info!(from = %account.address(), nonce = nonce, "Deploying multibox");

        self.tx_builder()
            .send(
                account,
                TxTarget::Create,
                artifact.deployment_data(),
                DEPLOY_GAS_LIMIT,
                Some(nonce),
            )
            .await
    }

    /// Register a request for `recipient_subdomain` on the contract at `multibox`.
    pub async fn new_request(
        &self,
        sender: &Account,
        recipient_subdomain: &str,
        multibox: Address,
        feed_location_hash: FeedLocationHash,
    ) -> MultiboxResult<TxHash> {
        let recipient_name_hash = self.subdomain_name_hash(recipient_subdomain);

        tracing::info!(
            from = %sender.address(),
            multibox = %multibox,
            recipient = recipient_subdomain,
            feed_location_hash = %feed_location_hash,
            "Creating request"
        );

        let data = Multibox::newRequestCall {
            recipient_name_hash,
            feed_location_hash: feed_location_hash.into(),
        }
        .abi_encode();

        self.tx_builder()
            .send(
                sender,
                TxTarget::Call(multibox),
                Bytes::from(data),
                NEW_REQUEST_GAS_LIMIT,
                None,
            )
            .await
    }

    /// Look up the request stored under `name_hash`.
    pub async fn get_request_raw(
        &self,
        name_hash: B256,
        multibox: Address,
    ) -> MultiboxResult<MultiboxRequest> {
        tracing::debug!(multibox = %multibox, name_hash = %name_hash, "getRequest");

        let data = Multibox::getRequestCall { name_hash }.abi_encode();
        let output = self.binding.call(multibox, Bytes::from(data)).await?;
        let request = Multibox::getRequestCall::abi_decode_returns(&output)
            .map_err(|e| MultiboxError::Abi(format!("getRequest: {}", e)))?;
        Ok(request.into())
    }

    /// Look up the request stored for `<subdomain>.<root domain>`.
    pub async fn get_request(
        &self,
        subdomain: &str,
        multibox: Address,
    ) -> MultiboxResult<MultiboxRequest> {
        self.get_request_raw(self.subdomain_name_hash(subdomain), multibox)
            .await
    }

    /// List every request recorded on the contract at `multibox`.
    pub async fn get_requests(&self, multibox: Address) -> MultiboxResult<Vec<MultiboxRequest>> {
        tracing::debug!(multibox = %multibox, "getRequests");

        let data = Multibox::getRequestsCall {}.abi_encode();
        let output = self.binding.call(multibox, Bytes::from(data)).await?;
        let requests = Multibox::getRequestsCall::abi_decode_returns(&output)
            .map_err(|e| MultiboxError::Abi(format!("getRequests: {}", e)))?;
        Ok(requests.into_iter().map(MultiboxRequest::from).collect())
    }

    /// Poll until `tx_hash` reaches the configured confirmation depth.
    pub async fn wait_for_confirmation(
        &self,
        tx_hash: TxHash,
    ) -> MultiboxResult<ConfirmationStatus> {
        self.tx_builder()
            .wait_for_confirmation(tx_hash, &self.config.confirmation)
            .await
    }
}

impl<B: std::fmt::Debug, H> std::fmt::Debug for MultiboxClient<B, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiboxClient")
            .field("binding", &self.binding)
            .field("domain", &self.config.ens.domain)
            .field("gas_price", &self.gas_price)
            .finish()
    }
}
