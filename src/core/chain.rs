// The chain owns the header list and the three stores. Blocks are appended
// strictly in order behind full validation; once written they are immutable.

use crate::config::BLOCK_VERSION;
use crate::core::{Block, Header, Transaction, TxOutput};
use crate::crypto::PrivateKey;
use crate::error::{ChainError, Result};
use crate::storage::{utxo_key, BlockStore, MemoryUtxoStore, TxStore, Utxo, UtxoStore};
use data_encoding::HEXLOWER;
use log::debug;
use once_cell::sync::Lazy;

/// Seed of the key that signs the genesis block and owns its coinbase
/// output. A protocol parameter: every node derives the same genesis.
pub const GOD_SEED: &str = "f7b2e105abbf7b30cefc49019386f498ecc40e1db5472b7875fa223ead7c9389";

/// Amount paid to the god address by the genesis coinbase
const GENESIS_SUBSIDY: i64 = 1000;

static GOD_KEY: Lazy<PrivateKey> =
    Lazy::new(|| PrivateKey::from_seed_hex(GOD_SEED).expect("god seed is a valid 32-byte hex seed"));

/// The key derived from [`GOD_SEED`]
pub fn god_key() -> PrivateKey {
    GOD_KEY.clone()
}

/// The deterministic genesis block: a version-1 header with no previous
/// hash and a single coinbase-like transaction paying the god address,
/// signed by the god key
pub fn genesis_block() -> Result<Block> {
    let coinbase = Transaction::new(
        1,
        vec![],
        vec![TxOutput::new(GENESIS_SUBSIDY, GOD_KEY.public().address())],
    );

    // Timestamp zero keeps the genesis hash identical on every node
    let header = Header::new(BLOCK_VERSION, 0, vec![], 0);
    let mut block = Block::new(header, vec![coinbase]);
    block.sign(&GOD_KEY)?;
    Ok(block)
}

/// Dense array of headers indexed by height
pub struct HeaderList {
    headers: Vec<Header>,
}

impl Default for HeaderList {
    fn default() -> Self {
        Self::new()
    }
}

impl HeaderList {
    pub fn new() -> HeaderList {
        HeaderList { headers: vec![] }
    }

    pub fn add(&mut self, header: Header) {
        self.headers.push(header);
    }

    pub fn get(&self, height: usize) -> Option<&Header> {
        self.headers.get(height)
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Height of the last header; 0 once the genesis header is in
    pub fn height(&self) -> usize {
        self.len().saturating_sub(1)
    }
}

pub struct Chain {
    headers: HeaderList,
    block_store: Box<dyn BlockStore>,
    tx_store: Box<dyn TxStore>,
    utxo_store: Box<dyn UtxoStore>,
}

impl Chain {
    /// Construct a chain with an internally owned in-memory UTXO store and
    /// install the genesis block
    pub fn new(block_store: Box<dyn BlockStore>, tx_store: Box<dyn TxStore>) -> Result<Chain> {
        Self::with_utxo_store(block_store, tx_store, Box::new(MemoryUtxoStore::new()))
    }

    /// Construct a chain over an explicit UTXO store
    pub fn with_utxo_store(
        block_store: Box<dyn BlockStore>,
        tx_store: Box<dyn TxStore>,
        utxo_store: Box<dyn UtxoStore>,
    ) -> Result<Chain> {
        let mut chain = Chain {
            headers: HeaderList::new(),
            block_store,
            tx_store,
            utxo_store,
        };
        chain.append_block(&genesis_block()?)?;
        Ok(chain)
    }

    /// Height of the last header; at least 0 given the genesis block
    pub fn height(&self) -> usize {
        self.headers.height()
    }

    /// Validate the block against the current tip, then append it
    pub fn add_block(&mut self, block: &Block) -> Result<()> {
        self.validate_block(block)?;
        self.append_block(block)
    }

    // Write order per block: header, transactions, UTXOs, block. The
    // genesis block takes this path without validation.
    fn append_block(&mut self, block: &Block) -> Result<()> {
        self.headers.add(block.get_header().clone());

        for tx in block.get_transactions() {
            let tx_hash = tx.hash_hex();
            debug!("adding transaction {tx_hash}");
            self.tx_store.put(tx)?;

            for (index, output) in tx.get_outputs().iter().enumerate() {
                let utxo = Utxo {
                    tx_hash: tx_hash.clone(),
                    out_index: index as u32,
                    amount: output.get_amount(),
                    spent: false,
                };
                self.utxo_store.put(&utxo)?;
            }

            // Consume the referenced outputs in the same append
            for input in tx.get_inputs() {
                let key = utxo_key(
                    &HEXLOWER.encode(input.get_prev_tx_hash()),
                    input.get_prev_out_index(),
                );
                let mut spent = self.utxo_store.get(&key)?;
                spent.spent = true;
                self.utxo_store.put(&spent)?;
            }
        }

        self.block_store.put(block)
    }

    pub fn get_block_by_height(&self, height: usize) -> Result<Block> {
        if height > self.height() {
            return Err(ChainError::NotFound(format!(
                "height {height} is greater than the chain height {}",
                self.height()
            )));
        }
        let header = self
            .headers
            .get(height)
            .ok_or_else(|| ChainError::NotFound(format!("no header at height {height}")))?;
        self.get_block_by_hash(&header.hash())
    }

    pub fn get_block_by_hash(&self, hash: &[u8]) -> Result<Block> {
        self.block_store.get(&HEXLOWER.encode(hash))
    }

    /// Block validation, short-circuiting on the first failing rule:
    /// signature, Merkle commitment, previous-hash linkage, transactions
    pub fn validate_block(&self, block: &Block) -> Result<()> {
        if !block.verify_signature() {
            return Err(ChainError::InvalidBlock(
                "block signature is invalid".to_string(),
            ));
        }

        if !block.get_transactions().is_empty() && !block.verify_root_hash() {
            return Err(ChainError::InvalidBlock(
                "Merkle root does not commit to the block's transactions".to_string(),
            ));
        }

        let tip = self.get_block_by_height(self.height())?;
        if block.get_header().get_prev_hash() != tip.hash().as_slice() {
            return Err(ChainError::InvalidBlock(
                "previous hash does not match the current tip".to_string(),
            ));
        }

        for tx in block.get_transactions() {
            self.validate_transaction(tx)?;
        }
        Ok(())
    }

    /// Transaction validation: input signatures, referenced UTXOs exist
    /// and are unspent, and inputs cover outputs
    pub fn validate_transaction(&self, tx: &Transaction) -> Result<()> {
        if !tx.verify() {
            return Err(ChainError::InvalidTransaction(
                "transaction signature is invalid".to_string(),
            ));
        }

        let mut sum_inputs: i64 = 0;
        for input in tx.get_inputs() {
            let key = utxo_key(
                &HEXLOWER.encode(input.get_prev_tx_hash()),
                input.get_prev_out_index(),
            );
            let utxo = self.utxo_store.get(&key)?;
            if utxo.spent {
                return Err(ChainError::InvalidTransaction(format!(
                    "input {key} is already spent"
                )));
            }
            sum_inputs = sum_inputs.checked_add(utxo.amount).ok_or_else(|| {
                ChainError::InvalidTransaction("input amount overflow".to_string())
            })?;
        }

        let mut sum_outputs: i64 = 0;
        for output in tx.get_outputs() {
            if output.get_amount() < 0 {
                return Err(ChainError::InvalidTransaction(
                    "output amount is negative".to_string(),
                ));
            }
            sum_outputs = sum_outputs.checked_add(output.get_amount()).ok_or_else(|| {
                ChainError::InvalidTransaction("output amount overflow".to_string())
            })?;
        }

        if sum_inputs < sum_outputs {
            return Err(ChainError::InsufficientFunds {
                inputs: sum_inputs,
                outputs: sum_outputs,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TxInput;
    use crate::testnet::{random_block, random_hash, test_chain};

    #[test]
    fn test_new_chain_installs_genesis() {
        let chain = test_chain();
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
    }

    #[test]
    fn test_genesis_is_deterministic() {
        let a = genesis_block().unwrap();
        let b = genesis_block().unwrap();
        assert_eq!(a.hash(), b.hash());
    }

    #[test]
    fn test_chain_height_grows_per_block() {
        let mut chain = test_chain();
        for i in 0..10 {
            let block = random_block(&chain);
            chain.add_block(&block).unwrap();
            assert_eq!(chain.height(), i + 1);
        }
    }

    #[test]
    fn test_get_block_by_unknown_hash() {
        let chain = test_chain();
        assert!(chain.get_block_by_hash(&random_hash()).is_err());
    }

    #[test]
    fn test_get_block_beyond_height() {
        let chain = test_chain();
        assert!(chain.get_block_by_height(chain.height() + 1).is_err());
    }

    #[test]
    fn test_added_blocks_are_retrievable() {
        let mut chain = test_chain();
        for i in 0..10 {
            let block = random_block(&chain);
            let block_hash = block.hash();
            chain.add_block(&block).unwrap();

            let by_hash = chain.get_block_by_hash(&block_hash).unwrap();
            assert_eq!(block, by_hash);

            let by_height = chain.get_block_by_height(i + 1).unwrap();
            assert_eq!(block, by_height);
        }
    }

    #[test]
    fn test_wrong_prev_hash_is_rejected() {
        let mut chain = test_chain();
        let key = PrivateKey::generate().unwrap();
        let header = Header::new(BLOCK_VERSION, 1, random_hash(), 1);
        let mut block = Block::new(header, vec![]);
        block.sign(&key).unwrap();

        // Signature is valid, linkage is not
        assert!(block.verify_signature());
        assert!(chain.add_block(&block).is_err());
    }

    #[test]
    fn test_spend_from_genesis() {
        let mut chain = test_chain();
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
        let mut chain = test_chain();
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

        match chain.add_block(&block) {
            Err(ChainError::InsufficientFunds { inputs, outputs }) => {
                assert_eq!(inputs, 1000);
                assert_eq!(outputs, 10001);
            }
            other => panic!("expected insufficient funds, got {other:?}"),
        }
    }

    #[test]
    fn test_double_spend_across_blocks_is_rejected() {
        let mut chain = test_chain();
        let god = god_key();

        let genesis = chain.get_block_by_height(0).unwrap();
        let coinbase_hash = genesis.get_transactions()[0].hash();

        let mut spend = Transaction::new(
            1,
            vec![TxInput::new(&coinbase_hash, 0, god.public())],
            vec![TxOutput::new(1000, god.public().address())],
        );
        spend.sign(&god);

        let mut first = random_block(&chain);
        first.push_transaction(spend);
        first.sign(&PrivateKey::generate().unwrap()).unwrap();
        chain.add_block(&first).unwrap();

        // The same genesis output again, now marked spent
        let mut replay = Transaction::new(
            1,
            vec![TxInput::new(&coinbase_hash, 0, god.public())],
            vec![TxOutput::new(1000, god.public().address())],
        );
        replay.sign(&god);

        let mut second = random_block(&chain);
        second.push_transaction(replay);
        second.sign(&PrivateKey::generate().unwrap()).unwrap();

        let err = chain.add_block(&second).unwrap_err();
        assert!(matches!(err, ChainError::InvalidTransaction(_)));
    }
}
