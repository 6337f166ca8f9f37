//! Test utilities
//!
//! Random fixtures shared by the unit tests.

pub mod test_utils;

pub use test_utils::{
    random_block, random_hash, random_header, random_transaction, signed_test_block, test_chain,
};
