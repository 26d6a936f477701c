//! Coinbase (miner) transaction layout.

use crate::macros::monero_definition_link;

/// The version of the coinbase transaction.
#[doc = monero_definition_link!(a1dc85c5373a30f14aaf7dcfdd95f5a7375d3623, "/src/cryptonote_config.h", 45)]
pub const TX_VERSION: u8 = 2;

/// The amount of blocks a coinbase output stays locked for.
///
/// The coinbase unlock time is always `generation height + MINER_REWARD_UNLOCK_TIME`.
#[doc = monero_definition_link!(a1dc85c5373a30f14aaf7dcfdd95f5a7375d3623, "/src/cryptonote_config.h", 44)]
pub const MINER_REWARD_UNLOCK_TIME: u64 = 60;

/// Input type tag of a generation (coinbase) input.
pub const TXIN_GEN: u8 = 0xFF;

/// Output type tag of a plain one-time key output.
pub const TXOUT_TO_KEY: u8 = 2;

/// Output type tag of a one-time key output followed by a 1 byte view tag.
pub const TXOUT_TO_TAGGED_KEY: u8 = 3;

/// `tx_extra` tag of the transaction public key.
pub const TX_EXTRA_TAG_PUBKEY: u8 = 1;

/// `tx_extra` tag of the extra nonce.
pub const TX_EXTRA_NONCE: u8 = 2;

/// `tx_extra` tag of the merge-mining field holding the side-chain id.
pub const TX_EXTRA_MERGE_MINING_TAG: u8 = 3;

/// The width of the extra nonce value that miners iterate over.
///
/// This is also the smallest extra nonce size a block can declare.
pub const EXTRA_NONCE_SIZE: usize = 4;

/// The largest extra nonce size a block can declare.
pub const EXTRA_NONCE_MAX_SIZE: usize = EXTRA_NONCE_SIZE + 10;

/// The capacity of the `tx_extra` staging buffer.
///
/// The largest `tx_extra` written is
/// `1 + 32 + 2 + EXTRA_NONCE_MAX_SIZE + 2 + 32` bytes.
pub const TX_EXTRA_MAX_SIZE: usize = 128;

/// `keccak256([0])`, the hash of an empty (type 0) RingCT base.
///
/// The coinbase transaction id is `keccak256(prefix_hash || MINER_TX_RCT_BASE_HASH || [0; 32])`.
pub const MINER_TX_RCT_BASE_HASH: [u8; 32] = [
    0xbc, 0x36, 0x78, 0x9e, 0x7a, 0x1e, 0x28, 0x14, 0x36, 0x46, 0x42, 0x29, 0x82, 0x8f, 0x81, 0x7d,
    0x66, 0x12, 0xf7, 0xb4, 0x77, 0xd6, 0x65, 0x91, 0xff, 0x96, 0xa9, 0xe0, 0x64, 0xbc, 0xc9, 0x8a,
];

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sha3::{Digest, Keccak256};

    use super::*;

    #[test]
    fn rct_base_hash_is_keccak_of_zero() {
        let hash: [u8; 32] = Keccak256::digest([0_u8]).into();
        assert_eq!(hash, MINER_TX_RCT_BASE_HASH);
        assert_eq!(
            hex::encode(MINER_TX_RCT_BASE_HASH),
            "bc36789e7a1e281436464229828f817d6612f7b477d66591ff96a9e064bcc98a"
        );
    }

    #[test]
    fn tx_extra_fits_staging_buffer() {
        let largest = 1 + 32 + 2 + EXTRA_NONCE_MAX_SIZE + 2 + 32;
        assert!(largest <= TX_EXTRA_MAX_SIZE);
    }
}
