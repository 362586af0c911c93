//! Client for Multibox contracts: encrypted-feed requests between ENS subdomains.

pub mod blockchain;
pub mod config;
pub mod multibox;
pub mod observability;

pub use blockchain::{Account, ConfirmationStatus, MultiboxError, MultiboxResult};
pub use config::ClientConfig;
pub use multibox::{FeedLocationHash, MultiboxArtifact, MultiboxClient};
