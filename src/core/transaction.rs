// Transactions move value between addresses by consuming previous outputs
// and creating new ones. A transaction is identified by the hash of its
// unsigned view, so the identity is stable before and after signing.

use crate::crypto::{Address, PrivateKey, PublicKey, Signature};
use crate::utils::{serialize, sha256_digest};
use data_encoding::HEXLOWER;
use serde::{Deserialize, Serialize};

/// Reference to a previous transaction output, plus the spender's
/// authorization to consume it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct TxInput {
    prev_tx_hash: Vec<u8>,
    prev_out_index: u32,
    public_key: PublicKey,
    signature: Option<Signature>,
}

impl TxInput {
    /// Create an unsigned input; the signature is attached by
    /// [`Transaction::sign`]
    pub fn new(prev_tx_hash: &[u8], prev_out_index: u32, public_key: PublicKey) -> TxInput {
        TxInput {
            prev_tx_hash: prev_tx_hash.to_vec(),
            prev_out_index,
            public_key,
            signature: None,
        }
    }

    pub fn get_prev_tx_hash(&self) -> &[u8] {
        self.prev_tx_hash.as_slice()
    }

    pub fn get_prev_out_index(&self) -> u32 {
        self.prev_out_index
    }

    pub fn get_public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn get_signature(&self) -> Option<&Signature> {
        self.signature.as_ref()
    }
}

/// Value locked to an address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct TxOutput {
    amount: i64,
    address: Address,
}

impl TxOutput {
    pub fn new(amount: i64, address: Address) -> TxOutput {
        TxOutput { amount, address }
    }

    pub fn get_amount(&self) -> i64 {
        self.amount
    }

    pub fn get_address(&self) -> &Address {
        &self.address
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, bincode::Encode, bincode::Decode)]
pub struct Transaction {
    version: u32,
    inputs: Vec<TxInput>,
    outputs: Vec<TxOutput>,
}

impl Transaction {
    pub fn new(version: u32, inputs: Vec<TxInput>, outputs: Vec<TxOutput>) -> Transaction {
        Transaction {
            version,
            inputs,
            outputs,
        }
    }

    pub fn get_version(&self) -> u32 {
        self.version
    }

    pub fn get_inputs(&self) -> &[TxInput] {
        self.inputs.as_slice()
    }

    pub fn get_outputs(&self) -> &[TxOutput] {
        self.outputs.as_slice()
    }

    /// The transaction with every input signature cleared.
    ///
    /// Signatures sign the transaction they are embedded in, so the signing
    /// pre-image has to be computed over a view without them.
    fn unsigned_view(&self) -> Transaction {
        let inputs = self
            .inputs
            .iter()
            .map(|input| TxInput::new(&input.prev_tx_hash, input.prev_out_index, input.public_key))
            .collect();
        Transaction {
            version: self.version,
            inputs,
            outputs: self.outputs.clone(),
        }
    }

    /// SHA-256 of the canonical encoding of the unsigned view.
    ///
    /// This one hash is the transaction's identity everywhere: the signing
    /// pre-image, the mempool key, the store key, and the UTXO source hash.
    pub fn hash(&self) -> Vec<u8> {
        let bytes = serialize(&self.unsigned_view())
            .expect("transaction encoding should never fail for hashing");
        sha256_digest(&bytes)
    }

    pub fn hash_hex(&self) -> String {
        HEXLOWER.encode(&self.hash())
    }

    /// Sign every input whose public key belongs to the given key
    pub fn sign(&mut self, key: &PrivateKey) {
        let signature = key.sign(&self.hash());
        let public = key.public();
        for input in &mut self.inputs {
            if input.public_key == public {
                input.signature = Some(signature);
            }
        }
    }

    /// Check every input's signature against the unsigned-view hash
    pub fn verify(&self) -> bool {
        let hash = self.hash();
        self.inputs.iter().all(|input| match input.signature {
            Some(signature) => input.public_key.verify(&hash, &signature),
            None => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testnet::random_hash;

    #[test]
    fn test_sign_and_verify_transaction() {
        let from_key = PrivateKey::generate().unwrap();
        let from_address = from_key.public().address();
        let to_address = PrivateKey::generate().unwrap().public().address();

        let input = TxInput::new(&random_hash(), 0, from_key.public());
        let outputs = vec![
            TxOutput::new(5, to_address),
            TxOutput::new(95, from_address),
        ];

        let mut tx = Transaction::new(1, vec![input], outputs);
        tx.sign(&from_key);
        assert!(tx.verify());
    }

    #[test]
    fn test_unsigned_transaction_does_not_verify() {
        let key = PrivateKey::generate().unwrap();
        let input = TxInput::new(&random_hash(), 0, key.public());
        let tx = Transaction::new(1, vec![input], vec![]);
        assert!(!tx.verify());
    }

    #[test]
    fn test_hash_is_stable_across_signing() {
        let key = PrivateKey::generate().unwrap();
        let input = TxInput::new(&random_hash(), 0, key.public());
        let output = TxOutput::new(42, key.public().address());
        let mut tx = Transaction::new(1, vec![input], vec![output]);

        let before = tx.hash();
        tx.sign(&key);
        assert_eq!(before, tx.hash());
        assert_eq!(tx.hash().len(), 32);
    }

    #[test]
    fn test_foreign_signature_does_not_verify() {
        let key = PrivateKey::generate().unwrap();
        let other = PrivateKey::generate().unwrap();
        let input = TxInput::new(&random_hash(), 0, key.public());
        let mut tx = Transaction::new(1, vec![input], vec![]);

        // A signature from a key that does not own the input never attaches
        tx.sign(&other);
        assert!(!tx.verify());
    }
}
