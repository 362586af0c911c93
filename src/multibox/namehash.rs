//! ENS name hashing.

use alloy::primitives::{keccak256, B256};

/// Maps a dotted domain name to its 32-byte on-chain key.
///
/// Must match the scheme of the registry the contracts were deployed against.
pub trait NameHasher: Send + Sync {
    fn name_hash(&self, name: &str) -> B256;
}

impl<F> NameHasher for F
where
    F: Fn(&str) -> B256 + Send + Sync,
{
    fn name_hash(&self, name: &str) -> B256 {
        self(name)
    }
}

/// EIP-137 namehash.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnsNameHasher;

impl NameHasher for EnsNameHasher {
    fn name_hash(&self, name: &str) -> B256 {
        namehash(name)
    }
}

/// UTS-46 map `name` to its normalized Unicode form.
///
/// Lowercases, applies compatibility mappings and decodes `xn--` labels,
/// using nontransitional processing (`ß` is kept).
pub fn normalize(name: &str) -> String {
    let (normalized, result) = idna::domain_to_unicode(name);
    if let Err(e) = result {
        tracing::warn!(name = name, error = ?e, "Name is not valid under UTS-46");
    }
    normalized
}

/// Compute the EIP-137 namehash of `name` after UTS-46 normalization.
pub fn namehash(name: &str) -> B256 {
    if name.is_empty() {
        return B256::ZERO;
    }
    hash_labels(&normalize(name))
}

fn hash_labels(name: &str) -> B256 {
    let mut node = B256::ZERO;
    for label in name.rsplit('.') {
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(node.as_slice());
        buf[32..].copy_from_slice(keccak256(label.as_bytes()).as_slice());
        node = keccak256(buf);
    }
    node
}
