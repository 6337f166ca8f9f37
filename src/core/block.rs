use crate::core::{merkle_root, Transaction};
use crate::crypto::{PrivateKey, PublicKey, Signature};
use crate::error::Result;
use crate::utils::{serialize, sha256_digest};
use data_encoding::HEXLOWER;
use serde::{Deserialize, Serialize};

/// Block header. The block's identity is the hash of this header, so every
/// field that matters for consensus is committed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct Header {
    version: u32,
    height: u32,
    prev_hash: Vec<u8>,
    root_hash: Vec<u8>,
    timestamp: i64,
}

impl Header {
    /// Create a header without a Merkle commitment; the root is filled in
    /// by [`Block::sign`] when the block carries transactions
    pub fn new(version: u32, height: u32, prev_hash: Vec<u8>, timestamp: i64) -> Header {
        Header {
            version,
            height,
            prev_hash,
            root_hash: vec![],
            timestamp,
        }
    }

    pub fn get_version(&self) -> u32 {
        self.version
    }

    pub fn get_height(&self) -> u32 {
        self.height
    }

    pub fn get_prev_hash(&self) -> &[u8] {
        self.prev_hash.as_slice()
    }

    pub fn get_root_hash(&self) -> &[u8] {
        self.root_hash.as_slice()
    }

    pub fn get_timestamp(&self) -> i64 {
        self.timestamp
    }

    /// SHA-256 of the canonical header encoding
    pub fn hash(&self) -> Vec<u8> {
        let bytes = serialize(self).expect("header encoding should never fail for hashing");
        sha256_digest(&bytes)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct Block {
    header: Header,
    transactions: Vec<Transaction>,
    public_key: Option<PublicKey>,
    signature: Option<Signature>,
}

impl Block {
    pub fn new(header: Header, transactions: Vec<Transaction>) -> Block {
        Block {
            header,
            transactions,
            public_key: None,
            signature: None,
        }
    }

    pub fn get_header(&self) -> &Header {
        &self.header
    }

    pub fn get_transactions(&self) -> &[Transaction] {
        self.transactions.as_slice()
    }

    pub fn get_public_key(&self) -> Option<&PublicKey> {
        self.public_key.as_ref()
    }

    pub fn get_signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }

    /// Append a transaction. The block must be signed (or re-signed)
    /// afterwards for the Merkle commitment to cover it.
    pub fn push_transaction(&mut self, tx: Transaction) {
        self.transactions.push(tx);
    }

    /// Block identity: the hash of the header
    pub fn hash(&self) -> Vec<u8> {
        self.header.hash()
    }

    pub fn hash_hex(&self) -> String {
        HEXLOWER.encode(&self.hash())
    }

    fn transaction_hashes(&self) -> Vec<Vec<u8>> {
        self.transactions.iter().map(|tx| tx.hash()).collect()
    }

    /// Commit to the transactions, then sign the header hash and install
    /// the publisher key and signature
    pub fn sign(&mut self, key: &PrivateKey) -> Result<Signature> {
        if !self.transactions.is_empty() {
            self.header.root_hash = merkle_root(&self.transaction_hashes())?;
        }

        let signature = key.sign(&self.hash());
        self.public_key = Some(key.public());
        self.signature = Some(signature);
        Ok(signature)
    }

    /// Check the block signature over the header hash
    pub fn verify_signature(&self) -> bool {
        match (&self.public_key, &self.signature) {
            (Some(public_key), Some(signature)) => public_key.verify(&self.hash(), signature),
            _ => false,
        }
    }

    /// Check that the header's Merkle root commits to the transactions.
    ///
    /// Empty blocks carry no commitment, so an empty root is the only
    /// valid value for them.
    pub fn verify_root_hash(&self) -> bool {
        if self.transactions.is_empty() {
            return self.header.root_hash.is_empty();
        }
        match merkle_root(&self.transaction_hashes()) {
            Ok(root) => !self.header.root_hash.is_empty() && root == self.header.root_hash,
            Err(_) => false,
        }
    }

    #[cfg(test)]
    pub fn set_public_key(&mut self, public_key: PublicKey) {
        self.public_key = Some(public_key);
    }
}
