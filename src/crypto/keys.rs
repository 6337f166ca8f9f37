use crate::error::{ChainError, Result};
use data_encoding::HEXLOWER;
use ring::rand::{SecureRandom, SystemRandom};
use ring::signature::{Ed25519KeyPair, KeyPair, UnparsedPublicKey, ED25519};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::Zeroize;

/// Length of a private key seed in bytes
pub const SEED_LEN: usize = 32;
/// Length of a public key in bytes
pub const PUBLIC_KEY_LEN: usize = 32;
/// Length of a signature in bytes
pub const SIGNATURE_LEN: usize = 64;
/// Length of an address in bytes
pub const ADDRESS_LEN: usize = 20;

/// Ed25519 signing key, deterministically derived from a 32-byte seed.
///
/// The seed is wiped when the key is dropped and is never serialized.
pub struct PrivateKey {
    seed: [u8; SEED_LEN],
    keypair: Ed25519KeyPair,
}

impl PrivateKey {
    /// Generate a key from fresh system randomness
    pub fn generate() -> Result<PrivateKey> {
        let rng = SystemRandom::new();
        let mut seed = [0u8; SEED_LEN];
        rng.fill(&mut seed)
            .map_err(|_| ChainError::Crypto("Failed to read system randomness".to_string()))?;
        Ok(Self::from_seed(&seed))
    }

    /// Derive a key from a seed. The same seed always yields the same key.
    pub fn from_seed(seed: &[u8; SEED_LEN]) -> PrivateKey {
        let keypair = Ed25519KeyPair::from_seed_unchecked(seed)
            .expect("a 32-byte seed is always a valid Ed25519 seed");
        PrivateKey {
            seed: *seed,
            keypair,
        }
    }

    /// Derive a key from a hex-encoded 32-byte seed
    pub fn from_seed_hex(s: &str) -> Result<PrivateKey> {
        let bytes = HEXLOWER
            .decode(s.as_bytes())
            .map_err(|e| ChainError::Crypto(format!("Invalid seed hex: {e}")))?;
        let seed: [u8; SEED_LEN] = bytes.as_slice().try_into().map_err(|_| {
            ChainError::Crypto(format!(
                "Invalid seed length: expected {SEED_LEN}, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self::from_seed(&seed))
    }

    pub fn sign(&self, message: &[u8]) -> Signature {
        let sig = self.keypair.sign(message);
        let mut value = [0u8; SIGNATURE_LEN];
        value.copy_from_slice(sig.as_ref());
        Signature(value)
    }

    pub fn public(&self) -> PublicKey {
        let mut value = [0u8; PUBLIC_KEY_LEN];
        value.copy_from_slice(self.keypair.public_key().as_ref());
        PublicKey(value)
    }
}

impl Clone for PrivateKey {
    fn clone(&self) -> Self {
        Self::from_seed(&self.seed)
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.seed.zeroize();
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.seed == other.seed
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never expose the seed, not even in debug output
        write!(f, "PrivateKey({})", self.public())
    }
}

/// 32-byte Ed25519 public key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, bincode::Encode, bincode::Decode)]
pub struct PublicKey([u8; PUBLIC_KEY_LEN]);

impl PublicKey {
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }

    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        let key = UnparsedPublicKey::new(&ED25519, self.0.as_slice());
        key.verify(message, signature.as_bytes()).is_ok()
    }

    /// Derive the account address: the last 20 bytes of the key.
    ///
    /// Protocol invariant, the last bytes and not the first.
    pub fn address(&self) -> Address {
        let mut value = [0u8; ADDRESS_LEN];
        value.copy_from_slice(&self.0[PUBLIC_KEY_LEN - ADDRESS_LEN..]);
        Address(value)
    }
}

impl TryFrom<&[u8]> for PublicKey {
    type Error = ChainError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        let value: [u8; PUBLIC_KEY_LEN] = bytes.try_into().map_err(|_| {
            ChainError::Crypto(format!(
                "Invalid public key length: expected {PUBLIC_KEY_LEN}, got {}",
                bytes.len()
            ))
        })?;
        Ok(PublicKey(value))
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", HEXLOWER.encode(&self.0))
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.as_slice().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let bytes = Vec::<u8>::deserialize(deserializer)?;
        PublicKey::try_from(bytes.as_slice()).map_err(D::Error::custom)
    }
}

/// 64-byte Ed25519 signature
#[derive(Debug, Clone, Copy, PartialEq, Eq, bincode::Encode, bincode::Decode)]
pub struct Signature([u8; SIGNATURE_LEN]);

impl Signature {
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }
}

impl TryFrom<&[u8]> for Signature {
    type Error = ChainError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        let value: [u8; SIGNATURE_LEN] = bytes.try_into().map_err(|_| {
            ChainError::Crypto(format!(
                "Invalid signature length: expected {SIGNATURE_LEN}, got {}",
                bytes.len()
            ))
        })?;
        Ok(Signature(value))
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.as_slice().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let bytes = Vec::<u8>::deserialize(deserializer)?;
        Signature::try_from(bytes.as_slice()).map_err(D::Error::custom)
    }
}

/// 20-byte account address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, bincode::Encode, bincode::Decode)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }
}

impl TryFrom<&[u8]> for Address {
    type Error = ChainError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        let value: [u8; ADDRESS_LEN] = bytes.try_into().map_err(|_| {
            ChainError::Crypto(format!(
                "Invalid address length: expected {ADDRESS_LEN}, got {}",
                bytes.len()
            ))
        })?;
        Ok(Address(value))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", HEXLOWER.encode(&self.0))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.as_slice().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let bytes = Vec::<u8>::deserialize(deserializer)?;
        Address::try_from(bytes.as_slice()).map_err(D::Error::custom)
    }
}
