// sled-backed store implementations. Values are encoded with the same
// canonical bincode encoding used for hashing, so a re-read block hashes
// to the key it was stored under.

use crate::core::{Block, Transaction};
use crate::error::{ChainError, Result};
use crate::storage::{BlockStore, TxStore, Utxo, UtxoStore};
use crate::utils::{deserialize, serialize};
use sled::{Db, Tree};

const BLOCKS_TREE: &str = "blocks";
const TRANSACTIONS_TREE: &str = "transactions";
const UTXOS_TREE: &str = "utxos";

fn open_tree(db: &Db, name: &str) -> Result<Tree> {
    db.open_tree(name)
        .map_err(|e| ChainError::Store(format!("Failed to open {name} tree: {e}")))
}

pub struct SledBlockStore {
    tree: Tree,
}

impl SledBlockStore {
    pub fn new(db: &Db) -> Result<SledBlockStore> {
        Ok(SledBlockStore {
            tree: open_tree(db, BLOCKS_TREE)?,
        })
    }
}

impl BlockStore for SledBlockStore {
    fn put(&self, block: &Block) -> Result<()> {
        let bytes = serialize(block)?;
        self.tree
            .insert(block.hash_hex().as_bytes(), bytes)
            .map_err(|e| ChainError::Store(format!("Failed to store block: {e}")))?;
        Ok(())
    }

    fn get(&self, hash: &str) -> Result<Block> {
        let bytes = self
            .tree
            .get(hash.as_bytes())
            .map_err(|e| ChainError::Store(format!("Failed to read block: {e}")))?
            .ok_or_else(|| ChainError::NotFound(format!("block with hash {hash} doesn't exist")))?;
        deserialize(bytes.as_ref())
    }
}

pub struct SledTxStore {
    tree: Tree,
}

impl SledTxStore {
    pub fn new(db: &Db) -> Result<SledTxStore> {
        Ok(SledTxStore {
            tree: open_tree(db, TRANSACTIONS_TREE)?,
        })
    }
}

impl TxStore for SledTxStore {
    fn put(&self, tx: &Transaction) -> Result<()> {
        let bytes = serialize(tx)?;
        self.tree
            .insert(tx.hash_hex().as_bytes(), bytes)
            .map_err(|e| ChainError::Store(format!("Failed to store transaction: {e}")))?;
        Ok(())
    }

    fn get(&self, hash: &str) -> Result<Transaction> {
        let bytes = self
            .tree
            .get(hash.as_bytes())
            .map_err(|e| ChainError::Store(format!("Failed to read transaction: {e}")))?
            .ok_or_else(|| ChainError::NotFound(format!("tx with hash {hash} doesn't exist")))?;
        deserialize(bytes.as_ref())
    }
}

pub struct SledUtxoStore {
    tree: Tree,
}

impl SledUtxoStore {
    pub fn new(db: &Db) -> Result<SledUtxoStore> {
        Ok(SledUtxoStore {
            tree: open_tree(db, UTXOS_TREE)?,
        })
    }
}

impl UtxoStore for SledUtxoStore {
    fn put(&self, utxo: &Utxo) -> Result<()> {
        let bytes = serialize(utxo)?;
        self.tree
            .insert(utxo.store_key().as_bytes(), bytes)
            .map_err(|e| ChainError::Store(format!("Failed to store utxo: {e}")))?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Utxo> {
        let bytes = self
            .tree
            .get(key.as_bytes())
            .map_err(|e| ChainError::Store(format!("Failed to read utxo: {e}")))?
            .ok_or_else(|| ChainError::NotFound(format!("utxo with key {key} doesn't exist")))?;
        deserialize(bytes.as_ref())
    }
}
