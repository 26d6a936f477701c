//! The host chain's transaction Merkle tree.

use p2pool_constants::block::HASH_SIZE;
use p2pool_helper::crypto::keccak256_pair;

/// Calculates the Merkle root of `hashes`.
///
/// The tree is unbalanced on the left: with `cnt` the largest power of two not above
/// `hashes.len()`, the first `2 * cnt - hashes.len()` hashes are promoted to the second
/// level as-is and the rest are hashed in pairs. Every level after that is hashed pairwise.
///
/// Returns [`None`] for an empty slice.
///
/// ```rust
/// # use p2pool_block::tree_hash;
/// assert_eq!(tree_hash(&[[1; 32]]), Some([1; 32]));
/// assert_eq!(tree_hash(&[]), None);
/// ```
pub fn tree_hash(hashes: &[[u8; HASH_SIZE]]) -> Option<[u8; HASH_SIZE]> {
    match hashes {
        [] => None,
        [root] => Some(*root),
        [left, right] => Some(keccak256_pair(left, right)),
        _ => {
            let count = hashes.len();
            let mut cnt = 1 << count.ilog2();

            let promoted = 2 * cnt - count;
            let mut level = Vec::with_capacity(cnt);
            level.extend_from_slice(&hashes[..promoted]);
            level.extend(
                hashes[promoted..]
                    .chunks_exact(2)
                    .map(|pair| keccak256_pair(&pair[0], &pair[1])),
            );

            while cnt > 2 {
                cnt >>= 1;
                for i in 0..cnt {
                    level[i] = keccak256_pair(&level[2 * i], &level[2 * i + 1]);
                }
            }

            Some(keccak256_pair(&level[0], &level[1]))
        }
    }
}
