//! Error handling for the node
//!
//! This module provides the error types shared by every subsystem:
//! validation, stores, networking, and cryptography.

use std::fmt;

/// Result type alias for node operations
pub type Result<T> = std::result::Result<T, ChainError>;

/// Error type covering every fallible node operation
#[derive(Debug, Clone)]
pub enum ChainError {
    /// Store-related errors (memory or sled backed)
    Store(String),
    /// Cryptographic material errors (wrong-length keys, signatures, seeds)
    Crypto(String),
    /// Network communication errors
    Network(String),
    /// Block validation errors
    InvalidBlock(String),
    /// Transaction validation errors
    InvalidTransaction(String),
    /// Inputs do not cover outputs
    InsufficientFunds { inputs: i64, outputs: i64 },
    /// Lookup on an absent key
    NotFound(String),
    /// Serialization/deserialization errors
    Serialization(String),
    /// File or socket I/O errors
    Io(String),
    /// Configuration errors
    Config(String),
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainError::Store(msg) => write!(f, "Store error: {msg}"),
            ChainError::Crypto(msg) => write!(f, "Cryptographic error: {msg}"),
            ChainError::Network(msg) => write!(f, "Network error: {msg}"),
            ChainError::InvalidBlock(msg) => write!(f, "Invalid block: {msg}"),
            ChainError::InvalidTransaction(msg) => write!(f, "Invalid transaction: {msg}"),
            ChainError::InsufficientFunds { inputs, outputs } => {
                write!(f, "Insufficient balance: got {inputs}, spending {outputs}")
            }
            ChainError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ChainError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            ChainError::Io(msg) => write!(f, "I/O error: {msg}"),
            ChainError::Config(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for ChainError {}

impl From<std::io::Error> for ChainError {
    fn from(err: std::io::Error) -> Self {
        ChainError::Io(err.to_string())
    }
}

impl From<sled::Error> for ChainError {
    fn from(err: sled::Error) -> Self {
        ChainError::Store(err.to_string())
    }
}

impl From<bincode::error::EncodeError> for ChainError {
    fn from(err: bincode::error::EncodeError) -> Self {
        ChainError::Serialization(err.to_string())
    }
}

impl From<bincode::error::DecodeError> for ChainError {
    fn from(err: bincode::error::DecodeError) -> Self {
        ChainError::Serialization(err.to_string())
    }
}
