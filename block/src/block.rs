//! The side-chain block.
//!
//! A [`PoolBlock`] wraps its [`BlockData`] in a lock so one thread can serialize or
//! hash a block while another copies it. Every operation takes the lock for as
//! long as it reads fields and never across a call into a wallet or PoW hasher.
//! Copies never wait for the lock.

use std::{
    ops::{Deref, DerefMut},
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, TryLockError},
};

use arc_swap::ArcSwap;

use p2pool_constants::{block::HASH_SIZE, tx::EXTRA_NONCE_SIZE};
use p2pool_helper::{cast::usize_to_u64, time::current_unix_timestamp};
use p2pool_wallet::Wallet;

use crate::{ParseError, TxOutput, TxOutputType};

//---------------------------------------------------------------------------------------------------- BlockData
/// The fields of a side-chain block.
///
/// The host-chain fields are what [`BlockData::serialize_mainchain_data`] writes,
/// the side-chain fields are what [`BlockData::serialize_sidechain_data`] writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockData {
    // Host-chain block header.
    /// The host-chain major version, decides the [`TxOutputType`].
    pub major_version: u8,
    pub minor_version: u8,
    pub timestamp: u64,
    pub prev_id: [u8; HASH_SIZE],
    pub nonce: u32,

    // Host-chain coinbase transaction.
    /// The host-chain height this coinbase generates coins at.
    pub txin_gen_height: u64,
    pub outputs: Vec<TxOutput>,
    pub txkey_pub: [u8; HASH_SIZE],
    /// The declared size of the extra nonce.
    ///
    /// Sizes above [`EXTRA_NONCE_MAX_SIZE`](p2pool_constants::tx::EXTRA_NONCE_MAX_SIZE)
    /// are clamped when serializing, sizes below [`EXTRA_NONCE_SIZE`] are zero-padded.
    pub extra_nonce_size: u64,
    pub extra_nonce: u32,

    /// Host-chain transaction ids.
    ///
    /// # Invariant
    /// Element `0` is a placeholder for the coinbase transaction and is never
    /// serialized, it always exists.
    pub transactions: Vec<[u8; HASH_SIZE]>,

    // Side-chain data.
    pub miner_wallet: Wallet,
    /// The coinbase transaction secret key.
    pub txkey_sec: [u8; HASH_SIZE],
    pub parent: [u8; HASH_SIZE],
    pub uncles: Vec<[u8; HASH_SIZE]>,
    pub sidechain_height: u64,
    pub difficulty: u128,
    pub cumulative_difficulty: u128,

    /// The side-chain id of this block, committed to by the merge mining tag.
    pub sidechain_id: [u8; HASH_SIZE],

    pub(crate) offchain: OffChainData,
}

impl Default for BlockData {
    fn default() -> Self {
        Self {
            major_version: 0,
            minor_version: 0,
            timestamp: 0,
            prev_id: [0; HASH_SIZE],
            nonce: 0,
            txin_gen_height: 0,
            outputs: Vec::new(),
            txkey_pub: [0; HASH_SIZE],
            extra_nonce_size: usize_to_u64(EXTRA_NONCE_SIZE),
            extra_nonce: 0,
            transactions: vec![[0; HASH_SIZE]],
            miner_wallet: Wallet::default(),
            txkey_sec: [0; HASH_SIZE],
            parent: [0; HASH_SIZE],
            uncles: Vec::new(),
            sidechain_height: 0,
            difficulty: 0,
            cumulative_difficulty: 0,
            sidechain_id: [0; HASH_SIZE],
            offchain: OffChainData::default(),
        }
    }
}

impl BlockData {
    /// The output format of this block's coinbase transaction.
    pub const fn tx_type(&self) -> TxOutputType {
        TxOutputType::from_major_version(self.major_version)
    }

    /// The local bookkeeping of this block.
    pub const fn offchain(&self) -> &OffChainData {
        &self.offchain
    }

    /// Mutable access to the local bookkeeping of this block.
    pub const fn offchain_mut(&mut self) -> &mut OffChainData {
        &mut self.offchain
    }

    /// Resets the local bookkeeping to its defaults.
    pub fn reset_offchain_data(&mut self) {
        self.offchain = OffChainData::default();
    }

    /// Parses a block from its host-chain data followed by its side-chain data.
    pub fn deserialize(mut blob: &[u8]) -> Result<Self, ParseError> {
        let mut data = Self::default();

        data.read_mainchain_data(&mut blob)?;
        data.read_sidechain_data(&mut blob)?;

        if !blob.is_empty() {
            return Err(ParseError::TrailingBytes);
        }

        Ok(data)
    }
}

//---------------------------------------------------------------------------------------------------- OffChainData
/// The verification state of a block.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerificationState {
    #[default]
    Unverified,
    Verified,
    Invalid,
}

/// Local bookkeeping about a block, never serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffChainData {
    depth: u64,
    verification: VerificationState,
    broadcasted: bool,
    want_broadcast: bool,
    precalculated: bool,
    local_timestamp: u64,
}

impl Default for OffChainData {
    fn default() -> Self {
        Self {
            depth: 0,
            verification: VerificationState::Unverified,
            broadcasted: false,
            want_broadcast: false,
            precalculated: false,
            local_timestamp: current_unix_timestamp(),
        }
    }
}

impl OffChainData {
    /// How many blocks deep this block is from the side-chain tip.
    pub const fn depth(&self) -> u64 {
        self.depth
    }

    pub const fn set_depth(&mut self, depth: u64) {
        self.depth = depth;
    }

    pub const fn verification(&self) -> VerificationState {
        self.verification
    }

    pub const fn is_verified(&self) -> bool {
        matches!(self.verification, VerificationState::Verified)
    }

    pub const fn is_invalid(&self) -> bool {
        matches!(self.verification, VerificationState::Invalid)
    }

    /// Marks the block as verified.
    ///
    /// Returns `false` and leaves the state alone if the block was already
    /// marked invalid, an invalid block never becomes verified.
    pub fn set_verified(&mut self) -> bool {
        self.transition(VerificationState::Verified)
    }

    /// Marks the block as invalid.
    ///
    /// Returns `false` and leaves the state alone if the block was already verified.
    pub fn set_invalid(&mut self) -> bool {
        self.transition(VerificationState::Invalid)
    }

    fn transition(&mut self, to: VerificationState) -> bool {
        match self.verification {
            VerificationState::Unverified => {
                self.verification = to;
                true
            }
            state => state == to,
        }
    }

    pub const fn broadcasted(&self) -> bool {
        self.broadcasted
    }

    pub const fn set_broadcasted(&mut self, broadcasted: bool) {
        self.broadcasted = broadcasted;
    }

    pub const fn want_broadcast(&self) -> bool {
        self.want_broadcast
    }

    pub const fn set_want_broadcast(&mut self, want_broadcast: bool) {
        self.want_broadcast = want_broadcast;
    }

    /// Returns `true` if the PoW of this block was already checked elsewhere.
    pub const fn precalculated(&self) -> bool {
        self.precalculated
    }

    pub const fn set_precalculated(&mut self, precalculated: bool) {
        self.precalculated = precalculated;
    }

    /// The UNIX timestamp this block arrived at (or was copied at).
    pub const fn local_timestamp(&self) -> u64 {
        self.local_timestamp
    }
}

//---------------------------------------------------------------------------------------------------- PoolBlock
/// A side-chain block shared between threads.
///
/// Besides the lock around the fields, the block keeps the fields as they were
/// when the last writer released it. Copies fall back to those while a writer
/// holds the lock instead of waiting for it.
#[derive(Debug)]
pub struct PoolBlock {
    data: RwLock<BlockData>,
    published: ArcSwap<BlockData>,
}

impl PoolBlock {
    pub fn new(data: BlockData) -> Self {
        Self {
            published: ArcSwap::from_pointee(data.clone()),
            data: RwLock::new(data),
        }
    }

    /// Lock the block for reading.
    ///
    /// The fields are plain data, so a lock poisoned by a panicking writer is still usable.
    pub fn read(&self) -> RwLockReadGuard<'_, BlockData> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Lock the block for writing.
    pub fn write(&self) -> BlockWriteGuard<'_> {
        BlockWriteGuard {
            data: self.data.write().unwrap_or_else(PoisonError::into_inner),
            published: &self.published,
        }
    }

    /// Lock the block for writing if no one else holds the lock.
    pub fn try_write(&self) -> Option<BlockWriteGuard<'_>> {
        let data = match self.data.try_write() {
            Ok(data) => data,
            Err(TryLockError::Poisoned(e)) => e.into_inner(),
            Err(TryLockError::WouldBlock) => return None,
        };

        Some(BlockWriteGuard {
            data,
            published: &self.published,
        })
    }

    pub fn into_inner(self) -> BlockData {
        self.data.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a copy of the block's fields, never blocks.
    ///
    /// If a writer holds the lock (this thread included) this logs and copies
    /// the fields as they were before that writer took the lock.
    pub fn snapshot(&self) -> BlockData {
        match self.data.try_read() {
            Ok(data) => data.clone(),
            Err(TryLockError::Poisoned(e)) => e.into_inner().clone(),
            Err(TryLockError::WouldBlock) => {
                tracing::warn!("copying a block that is being written to, using its last published fields");
                BlockData::clone(&self.published.load())
            }
        }
    }

    /// Parses a block, see [`BlockData::deserialize`].
    pub fn deserialize(blob: &[u8]) -> Result<Self, ParseError> {
        BlockData::deserialize(blob)
            .map(Self::new)
            .inspect_err(|e| tracing::debug!(size = blob.len(), "rejected block: {e}"))
    }

    /// Resets the local bookkeeping of this block.
    pub fn reset_offchain_data(&self) {
        self.write().reset_offchain_data();
    }
}

impl Default for PoolBlock {
    fn default() -> Self {
        Self::new(BlockData::default())
    }
}

impl Clone for PoolBlock {
    /// Copies the block, the copy gets a fresh local timestamp.
    fn clone(&self) -> Self {
        let mut data = self.snapshot();
        data.offchain.local_timestamp = current_unix_timestamp();
        Self::new(data)
    }
}

impl From<BlockData> for PoolBlock {
    fn from(data: BlockData) -> Self {
        Self::new(data)
    }
}

//---------------------------------------------------------------------------------------------------- BlockWriteGuard
/// A write lock on a [`PoolBlock`].
///
/// Dropping it publishes the written fields for copies taken during the next write.
#[derive(Debug)]
pub struct BlockWriteGuard<'a> {
    data: RwLockWriteGuard<'a, BlockData>,
    published: &'a ArcSwap<BlockData>,
}

impl Deref for BlockWriteGuard<'_> {
    type Target = BlockData;

    fn deref(&self) -> &BlockData {
        &self.data
    }
}

impl DerefMut for BlockWriteGuard<'_> {
    fn deref_mut(&mut self) -> &mut BlockData {
        &mut self.data
    }
}

impl Drop for BlockWriteGuard<'_> {
    fn drop(&mut self) {
        // Published before the lock is released.
        self.published.store(Arc::new(BlockData::clone(&self.data)));
    }
}
