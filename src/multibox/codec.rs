//! Feed-location hash codec.
//!
//! A feed-location hash packs the sender's address and the tail of the
//! recipient's name-hash into one 32-byte word:
//!
//! ```text
//! byte   0                    20            32
//!        | sender address     | topic       |
//!        |  (20 bytes)        | name-hash   |
//!        |                    | [20..32]    |
//! text   0x + 40 hex chars      24 hex chars   (66 chars total)
//! ```
//!
//! Offsets are derived from the byte widths of [`Address`] and [`B256`].

use std::fmt;
use std::str::FromStr;

use alloy::hex;
use alloy::primitives::{Address, FixedBytes, B256};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Width of an address in bytes.
pub const ADDRESS_BYTES: usize = 20;
/// Width of a name-hash in bytes.
pub const NAME_HASH_BYTES: usize = 32;
/// Width of the topic carried in a feed-location hash.
pub const TOPIC_BYTES: usize = NAME_HASH_BYTES - ADDRESS_BYTES;
/// Text length of a `0x`-prefixed address.
pub const ADDRESS_TEXT_LEN: usize = 2 + 2 * ADDRESS_BYTES;
/// Text length of a `0x`-prefixed name-hash or feed-location hash.
pub const NAME_HASH_TEXT_LEN: usize = 2 + 2 * NAME_HASH_BYTES;

/// Tail of a name-hash identifying the feed topic.
pub type FeedTopic = FixedBytes<TOPIC_BYTES>;

/// Malformed hash-token text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("{field} must be {expected} characters, got {actual}")]
    InvalidLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{field} must start with 0x")]
    MissingPrefix { field: &'static str },

    #[error("{field} is not valid hex: {reason}")]
    InvalidHex { field: &'static str, reason: String },
}

fn decode_fixed<const N: usize>(field: &'static str, text: &str) -> Result<[u8; N], CodecError> {
    let expected = 2 + 2 * N;
    if text.len() != expected {
        return Err(CodecError::InvalidLength {
            field,
            expected,
            actual: text.len(),
        });
    }
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .ok_or(CodecError::MissingPrefix { field })?;

    let mut out = [0u8; N];
    hex::decode_to_slice(digits, &mut out).map_err(|e| CodecError::InvalidHex {
        field,
        reason: e.to_string(),
    })?;
    Ok(out)
}

/// Parse a 42-character `0x` address.
pub fn parse_address(text: &str) -> Result<Address, CodecError> {
    decode_fixed::<ADDRESS_BYTES>("address", text).map(Address::from)
}

/// Parse a 66-character `0x` name-hash.
pub fn parse_name_hash(text: &str) -> Result<B256, CodecError> {
    decode_fixed::<NAME_HASH_BYTES>("name-hash", text).map(B256::from)
}

/// Sender address plus name-hash topic, packed into 32 bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeedLocationHash(B256);

impl FeedLocationHash {
    /// Pack an address and a topic.
    pub fn new(address: Address, topic: FeedTopic) -> Self {
        let mut word = B256::ZERO;
        word[..ADDRESS_BYTES].copy_from_slice(address.as_slice());
        word[ADDRESS_BYTES..].copy_from_slice(topic.as_slice());
        Self(word)
    }

    /// The sender address (bytes 0..20).
    pub fn address(&self) -> Address {
        Address::from_slice(&self.0[..ADDRESS_BYTES])
    }

    /// The topic (bytes 20..32).
    pub fn topic(&self) -> FeedTopic {
        FeedTopic::from_slice(&self.0[ADDRESS_BYTES..])
    }

    /// The packed 32-byte word as stored on-chain.
    pub fn as_b256(&self) -> B256 {
        self.0
    }
}

impl From<B256> for FeedLocationHash {
    fn from(word: B256) -> Self {
        Self(word)
    }
}

impl From<FeedLocationHash> for B256 {
    fn from(hash: FeedLocationHash) -> Self {
        hash.0
    }
}

impl fmt::Display for FeedLocationHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for FeedLocationHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FeedLocationHash({})", self)
    }
}

impl FromStr for FeedLocationHash {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed::<NAME_HASH_BYTES>("feed-location hash", s).map(|b| Self(B256::from(b)))
    }
}

impl Serialize for FeedLocationHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FeedLocationHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// A decoded feed-location hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeedLocation {
    pub address: Address,
    pub topic: FeedTopic,
}

impl FeedLocation {
    /// The topic as 24 unprefixed hex characters.
    pub fn topic_hex(&self) -> String {
        hex::encode(self.topic)
    }
}

/// Concatenate the sender's address with the tail of the recipient's name-hash.
pub fn encode_feed_location_hash(sender: Address, recipient_name_hash: B256) -> FeedLocationHash {
    FeedLocationHash::new(
        sender,
        subdomain_name_hash_to_feed_location_hash(recipient_name_hash),
    )
}

/// Extract the topic part of a name-hash.
pub fn subdomain_name_hash_to_feed_location_hash(name_hash: B256) -> FeedTopic {
    FeedTopic::from_slice(&name_hash[ADDRESS_BYTES..])
}

/// Split a feed-location hash back into address and topic.
pub fn decode_feed_location_hash(hash: &FeedLocationHash) -> FeedLocation {
    FeedLocation {
        address: hash.address(),
        topic: hash.topic(),
    }
}
