//! Cryptographic primitives
//!
//! Ed25519 keypairs and signatures plus the 20-byte account address
//! derived from a public key. Key material lengths are enforced by the
//! types themselves; wrong-length bytes are rejected at construction.

pub mod keys;

pub use keys::{
    Address, PrivateKey, PublicKey, Signature, ADDRESS_LEN, PUBLIC_KEY_LEN, SEED_LEN,
    SIGNATURE_LEN,
};
