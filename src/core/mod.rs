//! Core consensus state
//!
//! This module contains the chain itself and the types it is built from:
//! blocks, transactions, the Merkle commitment, and genesis installation.

pub mod block;
pub mod chain;
pub mod merkle;
pub mod transaction;

pub use block::{Block, Header};
pub use chain::{genesis_block, god_key, Chain, HeaderList, GOD_SEED};
pub use merkle::merkle_root;
pub use transaction::{Transaction, TxInput, TxOutput};
