use crate::error::{ChainError, Result};
use crate::utils::sha256_digest;

/// Merkle root over an ordered list of transaction hashes.
///
/// Levels are folded pairwise; an odd trailing node is paired with itself,
/// and a single leaf is likewise paired with itself. Callers skip the
/// Merkle commitment entirely for blocks without transactions.
pub fn merkle_root(hashes: &[Vec<u8>]) -> Result<Vec<u8>> {
    if hashes.is_empty() {
        return Err(ChainError::InvalidBlock(
            "Cannot calculate Merkle root from empty transaction list".to_string(),
        ));
    }

    if hashes.len() == 1 {
        return Ok(hash_pair(&hashes[0], &hashes[0]));
    }

    let mut current_level = hashes.to_vec();

    while current_level.len() > 1 {
        let mut next_level = Vec::new();
        let mut i = 0;

        while i < current_level.len() {
            let left = &current_level[i];
            let right = if i + 1 < current_level.len() {
                &current_level[i + 1]
            } else {
                // Odd number of nodes, duplicate the last one
                &current_level[i]
            };

            next_level.push(hash_pair(left, right));

            i += if i + 1 < current_level.len() { 2 } else { 1 };
        }

        current_level = next_level;
    }

    Ok(current_level
        .into_iter()
        .next()
        .expect("folded level always has exactly one root"))
}

/// Hash two nodes together (double SHA-256 of the concatenation)
fn hash_pair(left: &[u8], right: &[u8]) -> Vec<u8> {
    let mut combined = Vec::with_capacity(left.len() + right.len());
    combined.extend_from_slice(left);
    combined.extend_from_slice(right);

    let first_hash = sha256_digest(&combined);
    sha256_digest(&first_hash)
}
