//! The host chain's hash function.
//!
//! Monero uses the original Keccak-256 (pre-NIST padding), not SHA3-256.

use sha3::{Digest, Keccak256};

/// The size of a [`keccak256`] digest.
pub const HASH_SIZE: usize = 32;

/// Hashes `data` with Keccak-256.
///
/// ```rust
/// # use p2pool_helper::crypto::keccak256;
/// assert_eq!(
///     keccak256(b""),
///     hex_literal::hex!("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"),
/// );
/// ```
#[inline]
pub fn keccak256(data: &[u8]) -> [u8; HASH_SIZE] {
    Keccak256::digest(data).into()
}

/// Hashes the concatenation of `parts` without staging them in a buffer.
///
/// ```rust
/// # use p2pool_helper::crypto::*;
/// assert_eq!(keccak256_parts([b"view", b"_tag"]), keccak256(b"view_tag"));
/// ```
pub fn keccak256_parts<const N: usize>(parts: [&[u8]; N]) -> [u8; HASH_SIZE] {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Hashes the concatenation of two digests, `keccak256(left || right)`.
///
/// This is the node hash of the transaction Merkle tree.
#[inline]
pub fn keccak256_pair(left: &[u8; HASH_SIZE], right: &[u8; HASH_SIZE]) -> [u8; HASH_SIZE] {
    keccak256_parts([left, right])
}

#[cfg(test)]
mod test {
    use hex_literal::hex;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn keccak_is_not_sha3() {
        // SHA3-256("") is a7ffc6f8...
        assert_eq!(
            keccak256(&[]),
            hex!("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470")
        );
    }

    #[test]
    fn pair_matches_concatenation() {
        let left = [1_u8; HASH_SIZE];
        let right = [2_u8; HASH_SIZE];

        let mut concat = [0_u8; HASH_SIZE * 2];
        concat[..HASH_SIZE].copy_from_slice(&left);
        concat[HASH_SIZE..].copy_from_slice(&right);

        assert_eq!(keccak256_pair(&left, &right), keccak256(&concat));
        assert_ne!(keccak256_pair(&left, &right), keccak256_pair(&right, &left));
    }
}
