use crate::config::BLOCK_VERSION;
use crate::core::{Block, Chain, Header, Transaction, TxInput, TxOutput};
use crate::crypto::PrivateKey;
use crate::storage::{MemoryBlockStore, MemoryTxStore};
use crate::utils::current_timestamp;
use ring::rand::{SecureRandom, SystemRandom};

pub fn random_hash() -> Vec<u8> {
    let rng = SystemRandom::new();
    let mut hash = [0u8; 32];
    rng.fill(&mut hash)
        .expect("system randomness should be available in tests");
    hash.to_vec()
}

/// A header with random linkage, for tests that never touch a chain
pub fn random_header() -> Header {
    Header::new(
        BLOCK_VERSION,
        1,
        random_hash(),
        current_timestamp().expect("system clock should be available in tests"),
    )
}

/// An empty block over a random header, signed by a fresh key
pub fn signed_test_block() -> Block {
    let key = PrivateKey::generate().expect("key generation should work in tests");
    let mut block = Block::new(random_header(), vec![]);
    block.sign(&key).expect("signing an empty block works");
    block
}

/// An empty signed block linked to the current tip of the chain
pub fn random_block(chain: &Chain) -> Block {
    let key = PrivateKey::generate().expect("key generation should work in tests");
    let tip = chain
        .get_block_by_height(chain.height())
        .expect("chain always has a tip");
    let header = Header::new(
        BLOCK_VERSION,
        (chain.height() + 1) as u32,
        tip.hash(),
        current_timestamp().expect("system clock should be available in tests"),
    );
    let mut block = Block::new(header, vec![]);
    block.sign(&key).expect("signing an empty block works");
    block
}

/// A signed transaction spending a random (nonexistent) output.
/// Valid in shape, never against a chain.
pub fn random_transaction() -> Transaction {
    let key = PrivateKey::generate().expect("key generation should work in tests");
    let input = TxInput::new(&random_hash(), 0, key.public());
    let output = TxOutput::new(99, key.public().address());
    let mut tx = Transaction::new(1, vec![input], vec![output]);
    tx.sign(&key);
    tx
}

/// A fresh chain over in-memory stores
pub fn test_chain() -> Chain {
    Chain::new(
        Box::new(MemoryBlockStore::new()),
        Box::new(MemoryTxStore::new()),
    )
    .expect("chain construction with memory stores works")
}
