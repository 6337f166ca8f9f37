use crate::core::Transaction;
use std::collections::HashMap;
use std::sync::RwLock;

/// Pending transactions awaiting inclusion in a block.
///
/// ( K -> txid_hex, V => Transaction ). The mempool only deduplicates;
/// it never rejects a transaction for semantic reasons.
pub struct Mempool {
    inner: RwLock<HashMap<String, Transaction>>,
}

impl Default for Mempool {
    fn default() -> Self {
        Self::new()
    }
}

impl Mempool {
    pub fn new() -> Mempool {
        Mempool {
            inner: RwLock::new(HashMap::new()),
        }
    }

    pub fn has(&self, tx: &Transaction) -> bool {
        self.contains(&tx.hash_hex())
    }

    pub fn contains(&self, txid: &str) -> bool {
        match self.inner.read() {
            Ok(pool) => pool.contains_key(txid),
            Err(_) => {
                log::error!("Failed to acquire read lock on mempool");
                false
            }
        }
    }

    /// Insert a transaction, returning true iff it was newly inserted.
    /// Duplicate inserts are idempotent, so the read-locked pre-check is
    /// enough.
    pub fn add(&self, tx: Transaction) -> bool {
        if self.has(&tx) {
            return false;
        }
        match self.inner.write() {
            Ok(mut pool) => pool.insert(tx.hash_hex(), tx).is_none(),
            Err(_) => {
                log::error!("Failed to acquire write lock on mempool");
                false
            }
        }
    }

    pub fn remove(&self, txid: &str) {
        match self.inner.write() {
            Ok(mut pool) => {
                pool.remove(txid);
            }
            Err(_) => {
                log::error!("Failed to acquire write lock on mempool");
            }
        }
    }

    pub fn len(&self) -> usize {
        match self.inner.read() {
            Ok(pool) => pool.len(),
            Err(_) => {
                log::error!("Failed to acquire read lock on mempool");
                0
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        match self.inner.read() {
            Ok(pool) => pool.is_empty(),
            Err(_) => {
                log::error!("Failed to acquire read lock on mempool");
                true
            }
        }
    }

    /// Atomically remove and return every pending transaction
    pub fn clear(&self) -> Vec<Transaction> {
        match self.inner.write() {
            Ok(mut pool) => pool.drain().map(|(_, tx)| tx).collect(),
            Err(_) => {
                log::error!("Failed to acquire write lock on mempool");
                Vec::new()
            }
        }
    }
}
