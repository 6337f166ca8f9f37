//! Peer-to-peer networking
//!
//! The RPC surface (handshake, transaction and block gossip), the peer
//! table, and the node that ties them to the chain and the mempool.

pub mod client;
pub mod node;
pub mod peers;
pub mod server;

pub use client::NodeClient;
pub use node::{Node, BLOCK_TIME};
pub use peers::{PeerEntry, PeerTable};
pub use server::{Request, Response, Version};
