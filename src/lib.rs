//! # Cadence Chain
//!
//! A minimal peer-to-peer blockchain node: a replicated append-only ledger
//! of transaction-carrying blocks, validated by signature and
//! unspent-output rules, gossipped over a small RPC mesh, and sealed at
//! fixed time intervals by validator nodes.
//!
//! ## How the code is organized
//! - `crypto/`: Ed25519 keypairs, signatures, and 20-byte addresses
//! - `core/`: blocks, transactions, the Merkle commitment, and the chain
//! - `storage/`: the block/transaction/UTXO stores and the mempool
//! - `network/`: the RPC surface, peer table, bootstrap, and validator tick
//! - `config/`: per-node configuration and protocol constants
//! - `utils/`: digests, timestamps, and the canonical binary encoding
//! - `cli/`: command-line argument parsing
//!
//! ## Where to start reading
//! 1. `main.rs` for process startup
//! 2. `core/chain.rs` for the validation and append rules
//! 3. `network/node.rs` for the peer mesh and the validator loop

pub mod cli;
pub mod config;
pub mod core;
pub mod crypto;
pub mod error;
pub mod network;
pub mod storage;
pub mod utils;

#[cfg(test)]
pub mod testnet;

// Re-export commonly used types for convenience
pub use cli::Opt;
pub use config::{NodeConfig, BLOCK_VERSION, DEFAULT_RPC_TIMEOUT, PROTOCOL_VERSION};
pub use core::{
    genesis_block, god_key, merkle_root, Block, Chain, Header, HeaderList, Transaction, TxInput,
    TxOutput, GOD_SEED,
};
pub use crypto::{Address, PrivateKey, PublicKey, Signature};
pub use error::{ChainError, Result};
pub use network::{Node, NodeClient, PeerEntry, PeerTable, Request, Response, Version, BLOCK_TIME};
pub use storage::{
    utxo_key, BlockStore, MemoryBlockStore, MemoryTxStore, MemoryUtxoStore, Mempool,
    SledBlockStore, SledTxStore, SledUtxoStore, TxStore, Utxo, UtxoStore,
};
