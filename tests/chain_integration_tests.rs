//! Chain integration tests
//!
//! End-to-end coverage of the consensus state: genesis installation,
//! sequential appends, retrieval by hash and height, spending the genesis
//! output, and the rejection paths.

use cadence_chain::{
    god_key, Block, Chain, ChainError, Header, MemoryBlockStore, MemoryTxStore, PrivateKey,
    Transaction, TxInput, TxOutput, BLOCK_VERSION,
};
use ring::rand::{SecureRandom, SystemRandom};
use std::time::{SystemTime, UNIX_EPOCH};

fn new_chain() -> Chain {
    Chain::new(
        Box::new(MemoryBlockStore::new()),
        Box::new(MemoryTxStore::new()),
    )
    .unwrap()
}

fn random_hash() -> Vec<u8> {
    let rng = SystemRandom::new();
    let mut hash = [0u8; 32];
    rng.fill(&mut hash).unwrap();
    hash.to_vec()
}

fn timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos() as i64
}

/// An empty signed block linked to the chain tip
fn random_block(chain: &Chain) -> Block {
    let key = PrivateKey::generate().unwrap();
    let tip = chain.get_block_by_height(chain.height()).unwrap();
    let header = Header::new(
        BLOCK_VERSION,
        (chain.height() + 1) as u32,
        tip.hash(),
        timestamp(),
    );
    let mut block = Block::new(header, vec![]);
    block.sign(&key).unwrap();
    block
}

#[test]
fn test_fresh_chain_serves_genesis() {
    let chain = new_chain();
    assert_eq!(chain.height(), 0);

    let genesis = chain.get_block_by_height(0).unwrap();
    assert_eq!(genesis.get_transactions().len(), 1);

    let coinbase = &genesis.get_transactions()[0];
    assert!(coinbase.get_inputs().is_empty());
    assert_eq!(coinbase.get_outputs().len(), 1);
    assert_eq!(coinbase.get_outputs()[0].get_amount(), 1000);
    assert_eq!(
        *coinbase.get_outputs()[0].get_address(),
        god_key().public().address()
    );

    let by_hash = chain.get_block_by_hash(&genesis.hash()).unwrap();
    assert_eq!(genesis, by_hash);
}

#[test]
fn test_ten_appended_blocks_are_retrievable() {
    let mut chain = new_chain();

    for i in 0..10 {
        let block = random_block(&chain);
        let block_hash = block.hash();
        chain.add_block(&block).unwrap();
        assert_eq!(chain.height(), i + 1);

        let by_hash = chain.get_block_by_hash(&block_hash).unwrap();
        let by_height = chain.get_block_by_height(i + 1).unwrap();
        assert_eq!(block, by_hash);
        assert_eq!(by_hash, by_height);
    }
}

#[test]
fn test_height_beyond_tip_is_an_error() {
    let chain = new_chain();
    assert!(chain.get_block_by_height(chain.height() + 1).is_err());
}

#[test]
fn test_spend_from_genesis() {
    let mut chain = new_chain();
    let god = god_key();
    let recipient = PrivateKey::generate().unwrap().public().address();

    let genesis = chain.get_block_by_height(0).unwrap();
    let coinbase = &genesis.get_transactions()[0];

    let mut tx = Transaction::new(
        1,
        vec![TxInput::new(&coinbase.hash(), 0, god.public())],
        vec![
            TxOutput::new(100, recipient),
            TxOutput::new(900, god.public().address()),
        ],
    );
    tx.sign(&god);

    let mut block = random_block(&chain);
    block.push_transaction(tx);
    block.sign(&PrivateKey::generate().unwrap()).unwrap();

    chain.add_block(&block).unwrap();
    assert_eq!(chain.height(), 1);
}

#[test]
fn test_overspend_is_rejected() {
    let mut chain = new_chain();
    let god = god_key();
    let recipient = PrivateKey::generate().unwrap().public().address();

    let genesis = chain.get_block_by_height(0).unwrap();
    let coinbase = &genesis.get_transactions()[0];

    let mut tx = Transaction::new(
        1,
        vec![TxInput::new(&coinbase.hash(), 0, god.public())],
        vec![TxOutput::new(10001, recipient)],
    );
    tx.sign(&god);

    let mut block = random_block(&chain);
    block.push_transaction(tx);
    block.sign(&PrivateKey::generate().unwrap()).unwrap();

    assert!(matches!(
        chain.add_block(&block),
        Err(ChainError::InsufficientFunds { .. })
    ));
    assert_eq!(chain.height(), 0);
}

#[test]
fn test_unlinked_block_is_rejected_despite_valid_signature() {
    let mut chain = new_chain();
    let key = PrivateKey::generate().unwrap();

    let header = Header::new(BLOCK_VERSION, 1, random_hash(), timestamp());
    let mut block = Block::new(header, vec![]);
    block.sign(&key).unwrap();
    assert!(block.verify_signature());

    assert!(chain.add_block(&block).is_err());
    assert_eq!(chain.height(), 0);
}
