//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Client operations produce:
//!     → tracing events with structured fields (tx_hash, multibox, nonce)
//!
//! Consumers:
//!     → logging.rs subscriber (stderr, filtered by level)
//! ```
//!
//! # Design Decisions
//! - The library only emits events; installing a subscriber is the binary's job
//! - Private keys never appear in any field

pub mod logging;

pub use logging::init_logging;
