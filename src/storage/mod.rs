//! Stores and the mempool
//!
//! Three content-addressed stores (blocks, transactions, UTXOs) behind
//! narrow put/get traits, with in-memory and sled-backed implementations,
//! plus the concurrent transaction mempool.

pub mod mempool;
pub mod sled_store;
pub mod stores;

pub use mempool::Mempool;
pub use sled_store::{SledBlockStore, SledTxStore, SledUtxoStore};
pub use stores::{
    utxo_key, BlockStore, MemoryBlockStore, MemoryTxStore, MemoryUtxoStore, TxStore, Utxo,
    UtxoStore,
};
