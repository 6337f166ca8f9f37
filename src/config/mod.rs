//! Node configuration
//!
//! Per-node settings and the protocol constants shared by every node.

pub mod settings;

pub use settings::{NodeConfig, BLOCK_VERSION, DEFAULT_RPC_TIMEOUT, PROTOCOL_VERSION};
