//! Shared utilities
//!
//! Digest and timestamp helpers plus the canonical binary serialization
//! used for hashing and durable storage.

pub mod crypto;
pub mod serialization;

pub use crypto::{current_timestamp, sha256_digest};
pub use serialization::{deserialize, serialize};
