use crate::core::{Block, Transaction};
use crate::error::{ChainError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

/// One row per transaction output, keyed by `{tx_hash}_{out_index}`.
/// The spent flag only ever transitions false to true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct Utxo {
    pub tx_hash: String,
    pub out_index: u32,
    pub amount: i64,
    pub spent: bool,
}

impl Utxo {
    pub fn store_key(&self) -> String {
        utxo_key(&self.tx_hash, self.out_index)
    }
}

/// Store key for the output `out_index` of the transaction `tx_hash` (hex)
pub fn utxo_key(tx_hash: &str, out_index: u32) -> String {
    format!("{tx_hash}_{out_index}")
}

/// Blocks keyed by hex block hash
pub trait BlockStore: Send + Sync {
    fn put(&self, block: &Block) -> Result<()>;
    fn get(&self, hash: &str) -> Result<Block>;
}

/// Transactions keyed by hex transaction hash
pub trait TxStore: Send + Sync {
    fn put(&self, tx: &Transaction) -> Result<()>;
    fn get(&self, hash: &str) -> Result<Transaction>;
}

/// UTXOs keyed by [`utxo_key`]. A put overwrites, which is how a row is
/// marked spent.
pub trait UtxoStore: Send + Sync {
    fn put(&self, utxo: &Utxo) -> Result<()>;
    fn get(&self, key: &str) -> Result<Utxo>;
}

pub struct MemoryBlockStore {
    inner: RwLock<HashMap<String, Block>>,
}

impl Default for MemoryBlockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBlockStore {
    pub fn new() -> MemoryBlockStore {
        MemoryBlockStore {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl BlockStore for MemoryBlockStore {
    fn put(&self, block: &Block) -> Result<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ChainError::Store("block store lock poisoned".to_string()))?;
        inner.insert(block.hash_hex(), block.clone());
        Ok(())
    }

    fn get(&self, hash: &str) -> Result<Block> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ChainError::Store("block store lock poisoned".to_string()))?;
        inner
            .get(hash)
            .cloned()
            .ok_or_else(|| ChainError::NotFound(format!("block with hash {hash} doesn't exist")))
    }
}

pub struct MemoryTxStore {
    inner: RwLock<HashMap<String, Transaction>>,
}

impl Default for MemoryTxStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTxStore {
    pub fn new() -> MemoryTxStore {
        MemoryTxStore {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl TxStore for MemoryTxStore {
    fn put(&self, tx: &Transaction) -> Result<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ChainError::Store("tx store lock poisoned".to_string()))?;
        inner.insert(tx.hash_hex(), tx.clone());
        Ok(())
    }

    fn get(&self, hash: &str) -> Result<Transaction> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ChainError::Store("tx store lock poisoned".to_string()))?;
        inner
            .get(hash)
            .cloned()
            .ok_or_else(|| ChainError::NotFound(format!("tx with hash {hash} doesn't exist")))
    }
}

pub struct MemoryUtxoStore {
    inner: RwLock<HashMap<String, Utxo>>,
}

impl Default for MemoryUtxoStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryUtxoStore {
    pub fn new() -> MemoryUtxoStore {
        MemoryUtxoStore {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl UtxoStore for MemoryUtxoStore {
    fn put(&self, utxo: &Utxo) -> Result<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ChainError::Store("utxo store lock poisoned".to_string()))?;
        inner.insert(utxo.store_key(), utxo.clone());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Utxo> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ChainError::Store("utxo store lock poisoned".to_string()))?;
        inner
            .get(key)
            .cloned()
            .ok_or_else(|| ChainError::NotFound(format!("utxo with key {key} doesn't exist")))
    }
}
