//! The proof-of-work input and hash.
//!
//! The PoW input of a block is its hashing blob:
//! `header || Merkle root of the transaction ids || varint(transaction count)`,
//! where the coinbase placeholder is replaced by the coinbase transaction id.

use std::fmt::Display;

use arrayvec::ArrayVec;

use p2pool_constants::{block::HASH_SIZE, tx::MINER_TX_RCT_BASE_HASH};
use p2pool_helper::{
    cast::usize_to_u64,
    crypto::{keccak256, keccak256_parts},
    varint::varint_bytes,
};

use crate::{tree_hash, BlockData, BlockError, PoolBlock};

/// The capacity of a PoW input.
pub const MAX_POW_INPUT_SIZE: usize = 128;

/// A PoW input.
pub type PowInput = ArrayVec<u8, MAX_POW_INPUT_SIZE>;

/// A proof-of-work function, keyed by a seed hash.
pub trait PowHasher {
    type Error: Display;

    /// Calculates the PoW hash of `blob` for a block at host-chain `height`.
    fn calculate(
        &self,
        blob: &[u8],
        height: u64,
        seed_hash: &[u8; HASH_SIZE],
    ) -> Result<[u8; HASH_SIZE], Self::Error>;
}

/// Calculates the id of a coinbase transaction.
///
/// `miner_tx` is the serialized coinbase including its trailing `0` byte, which
/// marks the empty RingCT signature and is not part of the prefix hash.
///
/// Returns [`None`] if `miner_tx` is empty.
pub fn miner_tx_id(miner_tx: &[u8]) -> Option<[u8; HASH_SIZE]> {
    let (_, prefix) = miner_tx.split_last()?;
    let prefix_hash = keccak256(prefix);

    Some(keccak256_parts([
        prefix_hash.as_slice(),
        MINER_TX_RCT_BASE_HASH.as_slice(),
        [0; HASH_SIZE].as_slice(),
    ]))
}

/// Builds `header || root || varint(tx_count)`.
pub(crate) fn build_pow_input(
    header: &[u8],
    root: &[u8; HASH_SIZE],
    tx_count: usize,
) -> Result<PowInput, BlockError> {
    let mut blob = PowInput::new();

    for part in [header, root.as_slice(), varint_bytes(usize_to_u64(tx_count)).as_slice()] {
        blob.try_extend_from_slice(part)
            .map_err(|_| BlockError::PowInputTooLarge)?;
    }

    Ok(blob)
}

impl BlockData {
    /// Builds the PoW input of this block.
    ///
    /// The block itself is not changed, the coinbase id only goes into a copy
    /// of the transaction list.
    pub fn pow_input(&self) -> Result<PowInput, BlockError> {
        let main = self.serialize_mainchain_data()?;

        if main.header_size() == 0
            || main.miner_tx_size() == 0
            || main.data().len() < main.header_size() + main.miner_tx_size()
        {
            tracing::error!("tried to calculate the PoW of an uninitialized block");
            return Err(BlockError::Uninitialized);
        }

        let mut leaves = self.transactions.clone();
        let Some(coinbase) = leaves.first_mut() else {
            tracing::error!("tried to calculate the PoW of a block without a coinbase placeholder");
            return Err(BlockError::Uninitialized);
        };
        *coinbase = miner_tx_id(main.miner_tx()).ok_or(BlockError::Uninitialized)?;

        let root = tree_hash(&leaves).ok_or(BlockError::Uninitialized)?;
        let blob = build_pow_input(main.header(), &root, leaves.len())?;

        tracing::trace!(size = blob.len(), tx_count = leaves.len(), "built PoW input");

        Ok(blob)
    }
}

impl PoolBlock {
    /// Builds the PoW input of this block, see [`BlockData::pow_input`].
    pub fn pow_input(&self) -> Result<PowInput, BlockError> {
        self.read().pow_input()
    }

    /// Calculates the PoW hash of this block with `hasher`.
    ///
    /// The block is only locked while its PoW input is built, not while `hasher` runs.
    pub fn get_pow_hash<H: PowHasher>(
        &self,
        hasher: &H,
        height: u64,
        seed_hash: &[u8; HASH_SIZE],
    ) -> Result<[u8; HASH_SIZE], BlockError> {
        let blob = self.pow_input()?;

        hasher.calculate(&blob, height, seed_hash).map_err(|e| {
            tracing::warn!(height, "failed to calculate PoW hash: {e}");
            BlockError::PowHasher
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use hex_literal::hex;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_utils::test_block;

    /// Mainnet block 2751506, a block with only a coinbase transaction.
    const BLOCK_2751506: [u8; 150] = hex!("1010c58bab9b06b27bdecfc6cd0a46172d136c08831cf67660377ba992332363228b1b722781e7807e07f502cef8a70101ff92f8a7010180e0a596bb1103d7cbf826b665d7a532c316982dc8dbc24f285cbc18bbcc27c7164cd9b3277a85d034019f629d8b36bd16a2bfce3ea80c31dc4d8762c67165aec21845494e32b7582fe00211000000297a787a000000000000000000000000");

    /// Mainnet block 2751210, a coinbase and 2 other transactions.
    const BLOCK_2751210: [u8; 205] = hex!("1010d8faa89b06f8a36d0dbe4d27d2f52160000563896048d71067c31e99a3869bf9b7142227bb5328010b02a6f6a70101ffeaf5a70101a08bc8b3bb11036d6713f5aa552a1aaf33baed7591f795b86daf339e51029a9062dfe09f0f909b312b0124d6023d591c4d434000e5e31c6db718a1e96e865939930e90a7042a1cd4cbd202083786a78452fdfc000002a89e380a44d8dfc64b551baa171447a0f9c9262255be6e8f8ef10896e36e2bf90c4d343e416e394ad9cc10b7d2df7b2f39370a554730f75dfcb04944bd62c299");

    /// Records what it was asked to hash and returns the keccak of the blob.
    #[derive(Default)]
    struct RecordingHasher {
        calls: Mutex<Vec<(Vec<u8>, u64, [u8; HASH_SIZE])>>,
    }

    impl PowHasher for RecordingHasher {
        type Error = std::convert::Infallible;

        fn calculate(
            &self,
            blob: &[u8],
            height: u64,
            seed_hash: &[u8; HASH_SIZE],
        ) -> Result<[u8; HASH_SIZE], Self::Error> {
            self.calls.lock().unwrap().push((blob.to_vec(), height, *seed_hash));
            Ok(keccak256(blob))
        }
    }

    struct FailingHasher;

    impl PowHasher for FailingHasher {
        type Error = &'static str;

        fn calculate(&self, _: &[u8], _: u64, _: &[u8; HASH_SIZE]) -> Result<[u8; HASH_SIZE], Self::Error> {
            Err("dataset not ready")
        }
    }

    /// Checks the block is not locked while the hasher runs.
    struct LockCheckingHasher<'a>(&'a PoolBlock);

    impl PowHasher for LockCheckingHasher<'_> {
        type Error = &'static str;

        fn calculate(&self, blob: &[u8], _: u64, _: &[u8; HASH_SIZE]) -> Result<[u8; HASH_SIZE], Self::Error> {
            let mut data = self.0.try_write().ok_or("block is still locked")?;
            data.offchain_mut().set_precalculated(true);
            Ok(keccak256(blob))
        }
    }

    #[test]
    fn mainnet_block_id() {
        let header = &BLOCK_2751506[..43];
        let miner_tx = &BLOCK_2751506[43..149];

        let id = miner_tx_id(miner_tx).unwrap();
        assert_eq!(id, hex!("e49b854c5f339d7410a77f2a137281d8042a0ffc7ef9ab24cd670b67139b24cd"));

        let root = tree_hash(&[id]).unwrap();
        let input = build_pow_input(header, &root, 1).unwrap();
        assert_eq!(input.len(), 76);
        assert_eq!(input.last(), Some(&1));

        // The block id hashes the PoW input behind its length.
        let block_id = keccak256_parts([varint_bytes(76).as_slice(), input.as_slice()]);
        assert_eq!(
            block_id,
            hex!("43bd1f2b6556dcafa413d8372974af59e4e8f37dbf74dc6b2a9b7212d0577428")
        );
    }

    #[test]
    fn mainnet_block_id_with_transactions() {
        let header = &BLOCK_2751210[..43];
        let miner_tx = &BLOCK_2751210[43..140];
        assert_eq!(BLOCK_2751210[140], 2);

        let id = miner_tx_id(miner_tx).unwrap();
        assert_eq!(id, hex!("dabe07900d3123ed895612f4a151adb3e39681b145f0f85bfee23ea1fe47acf2"));

        let mut ids = vec![id];
        ids.extend(
            BLOCK_2751210[141..]
                .chunks_exact(HASH_SIZE)
                .map(|tx| <[u8; HASH_SIZE]>::try_from(tx).unwrap()),
        );
        assert_eq!(ids.len(), 3);

        // The coinbase is promoted, the other 2 transactions are paired.
        let root = tree_hash(&ids).unwrap();
        let input = build_pow_input(header, &root, ids.len()).unwrap();
        assert_eq!(input.len(), 76);
        assert_eq!(input.last(), Some(&3));

        let block_id = keccak256_parts([varint_bytes(76).as_slice(), input.as_slice()]);
        assert_eq!(
            block_id,
            hex!("86d421322b700166dde2d7eba1cc8600925ef640abf6c0a2cc8ce0d6dd90abfd")
        );
    }

    #[test]
    fn largest_pow_input_fits() {
        use p2pool_constants::block::MAX_HEADER_SIZE;
        use p2pool_helper::varint::MAX_VARINT_LEN;

        assert!(MAX_HEADER_SIZE + HASH_SIZE + MAX_VARINT_LEN <= MAX_POW_INPUT_SIZE);

        let header = [0xFF; MAX_HEADER_SIZE];
        let input = build_pow_input(&header, &[0; HASH_SIZE], usize::MAX).unwrap();
        assert_eq!(input.len(), MAX_HEADER_SIZE + HASH_SIZE + MAX_VARINT_LEN);
    }

    #[test]
    fn miner_tx_id_of_nothing() {
        assert_eq!(miner_tx_id(&[]), None);
    }

    #[test]
    fn pow_input_layout() {
        let data = test_block();
        let main = data.serialize_mainchain_data().unwrap();

        let mut leaves = data.transactions.clone();
        leaves[0] = miner_tx_id(main.miner_tx()).unwrap();

        let mut expected = main.header().to_vec();
        expected.extend_from_slice(&tree_hash(&leaves).unwrap());
        expected.push(4);

        assert_eq!(data.pow_input().unwrap().as_slice(), expected.as_slice());
        assert_eq!(data.transactions[0], [0; HASH_SIZE]);
    }

    #[test]
    fn get_pow_hash() {
        let block = PoolBlock::new(test_block());
        let hasher = RecordingHasher::default();
        let seed_hash = [0x5E; HASH_SIZE];

        let hash = block.get_pow_hash(&hasher, 3_000_000, &seed_hash).unwrap();
        let input = block.pow_input().unwrap();

        assert_eq!(hash, keccak256(&input));
        assert_eq!(
            hasher.calls.into_inner().unwrap(),
            vec![(input.to_vec(), 3_000_000, seed_hash)]
        );
    }

    #[test]
    fn hasher_runs_unlocked() {
        let block = PoolBlock::new(test_block());

        block
            .get_pow_hash(&LockCheckingHasher(&block), 1, &[0; HASH_SIZE])
            .unwrap();
        assert!(block.read().offchain().precalculated());
    }

    #[test]
    fn hasher_failure() {
        let block = PoolBlock::new(test_block());

        assert_eq!(
            block.get_pow_hash(&FailingHasher, 1, &[0; HASH_SIZE]),
            Err(BlockError::PowHasher)
        );
    }

    #[test]
    fn uninitialized() {
        let block = PoolBlock::new(test_block());
        block.write().transactions.clear();

        assert_eq!(block.pow_input(), Err(BlockError::Uninitialized));
        assert_eq!(
            block.get_pow_hash(&FailingHasher, 1, &[0; HASH_SIZE]),
            Err(BlockError::Uninitialized)
        );
    }
}
