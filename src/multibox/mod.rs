//! Multibox contract client.
//!
//! # Data Flow
//! ```text
//! deploy / new_request:
//!     contract.rs (ABI-encode call or deployment bytecode)
//!     → blockchain::transaction (sign, broadcast)
//!     → tx hash at acknowledgment
//!
//! get_request / get_requests:
//!     namehash.rs (label.domain → name-hash)
//!     → contract.rs (encode) → eth_call → contract.rs (decode)
//! ```
//!
//! The hash helpers in codec.rs are pure and do no I/O.

pub mod client;
pub mod codec;
pub mod contract;
pub mod namehash;

pub use client::{
    predict_multibox_address, MultiboxClient, DEPLOY_GAS_LIMIT, NEW_REQUEST_GAS_LIMIT,
};
pub use codec::{
    decode_feed_location_hash, encode_feed_location_hash, parse_address, parse_name_hash,
    subdomain_name_hash_to_feed_location_hash, CodecError, FeedLocation, FeedLocationHash,
    FeedTopic,
};
pub use contract::{MultiboxArtifact, MultiboxRequest};
pub use namehash::{namehash, normalize, EnsNameHasher, NameHasher};
