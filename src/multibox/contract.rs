//! Multibox contract interface and deployment artifact.

use std::path::Path;

use alloy::primitives::{Bytes, B256};
use alloy::sol;
use serde::{Deserialize, Serialize};

use crate::blockchain::types::{MultiboxError, MultiboxResult};
use crate::multibox::codec::FeedLocationHash;

sol! {
    contract Multibox {
        /// A request registered for a recipient's name-hash.
        #[derive(Debug, PartialEq, Eq)]
        struct Request {
            bytes32 name_hash;
            bytes32 feed_location_hash;
        }

        function newRequest(bytes32 recipient_name_hash, bytes32 feed_location_hash);
        function getRequest(bytes32 name_hash) view returns (Request memory request);
        function getRequests() view returns (Request[] memory requests);
    }
}

/// A request record read from a Multibox contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MultiboxRequest {
    pub name_hash: B256,
    pub feed_location_hash: FeedLocationHash,
}

impl From<Multibox::Request> for MultiboxRequest {
    fn from(request: Multibox::Request) -> Self {
        Self {
            name_hash: request.name_hash,
            feed_location_hash: request.feed_location_hash.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum BytecodeField {
    Hex(Bytes),
    Object { object: Bytes },
}

#[derive(Debug, Clone, Deserialize)]
struct RawArtifact {
    bytecode: BytecodeField,
}

/// Compiled Multibox contract, as emitted by the Solidity toolchain.
///
/// Accepts both `"bytecode": "0x…"` and `"bytecode": { "object": "0x…" }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiboxArtifact {
    bytecode: Bytes,
}

impl MultiboxArtifact {
    /// Wrap creation bytecode directly.
    pub fn new(bytecode: Bytes) -> MultiboxResult<Self> {
        if bytecode.is_empty() {
            return Err(MultiboxError::Artifact("bytecode is empty".to_string()));
        }
        Ok(Self { bytecode })
    }

    /// Parse an artifact from JSON text.
    pub fn from_json_str(json: &str) -> MultiboxResult<Self> {
        let raw: RawArtifact = serde_json::from_str(json)
            .map_err(|e| MultiboxError::Artifact(format!("invalid artifact JSON: {}", e)))?;
        let bytecode = match raw.bytecode {
            BytecodeField::Hex(b) => b,
            BytecodeField::Object { object } => object,
        };
        Self::new(bytecode)
    }

    /// Read an artifact file.
    pub fn load(path: &Path) -> MultiboxResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            MultiboxError::Artifact(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    /// Call data of the contract-creation transaction.
    ///
    /// The contract takes no constructor arguments.
    pub fn deployment_data(&self) -> Bytes {
        self.bytecode.clone()
    }
}
