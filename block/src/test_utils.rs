//! Block fixtures for tests.

use pretty_assertions::assert_eq;
use proptest::{collection::vec, prelude::*};

use p2pool_constants::tx::{EXTRA_NONCE_MAX_SIZE, EXTRA_NONCE_SIZE, MINER_REWARD_UNLOCK_TIME};
use p2pool_helper::cast::usize_to_u64;
use p2pool_wallet::Wallet;

use crate::{BlockData, PoolBlock, TxOutput, TxOutputType};

/// A block with 3 outputs, 3 transactions and 2 uncles.
pub(crate) fn test_block() -> BlockData {
    BlockData {
        major_version: 16,
        minor_version: 16,
        timestamp: 1_700_000_000,
        prev_id: [0x11; 32],
        nonce: 0xDEAD_BEEF,
        txin_gen_height: 3_000_000,
        outputs: (0..3)
            .map(|i| TxOutput {
                reward: 600_000_000_000 + i,
                eph_public_key: [0xA0 + u8::try_from(i).unwrap(); 32],
                view_tag: 0x50 + u8::try_from(i).unwrap(),
            })
            .collect(),
        txkey_pub: [0x22; 32],
        extra_nonce_size: 4,
        extra_nonce: 0x0102_0304,
        transactions: vec![[0; 32], [0x31; 32], [0x32; 32], [0x33; 32]],
        miner_wallet: Wallet::new([0x44; 32], [0x55; 32]),
        txkey_sec: [0x66; 32],
        parent: [0x77; 32],
        uncles: vec![[0x88; 32], [0x99; 32]],
        sidechain_height: 9_000_000,
        difficulty: 123_456_789_012,
        cumulative_difficulty: u128::from(u64::MAX) * 3,
        sidechain_id: [0xAB; 32],
        ..Default::default()
    }
}

/// Parses `blob` and checks both halves serialize back to exactly `blob`.
///
/// Returns the parsed block.
pub(crate) fn assert_reserializes(blob: &[u8]) -> PoolBlock {
    let block = PoolBlock::deserialize(blob).unwrap();

    let mut reserialized = block.serialize_mainchain_data().unwrap().into_data();
    reserialized.extend_from_slice(&block.serialize_sidechain_data());
    assert_eq!(reserialized, blob);

    block
}

prop_compose! {
    fn arb_header()(
        major_version in any::<u8>(),
        minor_version in any::<u8>(),
        timestamp in any::<u64>(),
        prev_id in any::<[u8; 32]>(),
        nonce in any::<u32>(),
    ) -> BlockData {
        BlockData {
            major_version,
            minor_version,
            timestamp,
            prev_id,
            nonce,
            ..Default::default()
        }
    }
}

prop_compose! {
    fn arb_output()(
        reward in any::<u64>(),
        eph_public_key in any::<[u8; 32]>(),
        view_tag in any::<u8>(),
    ) -> TxOutput {
        TxOutput { reward, eph_public_key, view_tag }
    }
}

prop_compose! {
    fn arb_coinbase()(
        header in arb_header(),
        txin_gen_height in 0..=u64::MAX - MINER_REWARD_UNLOCK_TIME,
        outputs in vec(arb_output(), 0..8),
        txkey_pub in any::<[u8; 32]>(),
        extra_nonce_size in usize_to_u64(EXTRA_NONCE_SIZE)..=usize_to_u64(EXTRA_NONCE_MAX_SIZE),
        extra_nonce in any::<u32>(),
        transactions in vec(any::<[u8; 32]>(), 0..8),
        sidechain_id in any::<[u8; 32]>(),
    ) -> BlockData {
        let mut outputs = outputs;
        if header.tx_type() == TxOutputType::ToKey {
            for output in &mut outputs {
                output.view_tag = 0;
            }
        }

        let mut placeholder = vec![[0; 32]];
        placeholder.extend(transactions);

        BlockData {
            txin_gen_height,
            outputs,
            txkey_pub,
            extra_nonce_size,
            extra_nonce,
            transactions: placeholder,
            sidechain_id,
            ..header
        }
    }
}

prop_compose! {
    /// Any block that can go through a serialize/parse round trip.
    pub(crate) fn arb_block()(
        coinbase in arb_coinbase(),
        spend_public_key in any::<[u8; 32]>(),
        view_public_key in any::<[u8; 32]>(),
        txkey_sec in any::<[u8; 32]>(),
        parent in any::<[u8; 32]>(),
        uncles in vec(any::<[u8; 32]>(), 0..4),
        sidechain_height in any::<u64>(),
        difficulty in any::<u128>(),
        cumulative_difficulty in any::<u128>(),
    ) -> BlockData {
        BlockData {
            miner_wallet: Wallet::new(spend_public_key, view_public_key),
            txkey_sec,
            parent,
            uncles,
            sidechain_height,
            difficulty,
            cumulative_difficulty,
            ..coinbase
        }
    }
}
