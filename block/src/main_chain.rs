//! The host-chain half of a block: its header, coinbase transaction and transaction ids.
//!
//! ```text
//! header        major (1) | minor (1) | varint timestamp | prev id (32) | nonce (4, LE)
//! coinbase tx   version (1) | varint unlock time | 1 | TXIN_GEN | varint height
//!               | varint output count | outputs | varint extra size | extra | 0
//! tx ids        varint (count - 1) | ids (32 each), skipping the coinbase placeholder
//! ```

use arrayvec::ArrayVec;
use bytes::{Buf, BufMut};

use p2pool_constants::{
    block::HASH_SIZE,
    tx::{
        EXTRA_NONCE_MAX_SIZE, EXTRA_NONCE_SIZE, MINER_REWARD_UNLOCK_TIME, TXIN_GEN, TX_EXTRA_MAX_SIZE,
        TX_EXTRA_MERGE_MINING_TAG, TX_EXTRA_NONCE, TX_EXTRA_TAG_PUBKEY, TX_VERSION,
    },
};
use p2pool_helper::{
    cast::{u64_to_usize, usize_to_u64},
    varint::write_varint,
};

use crate::{
    read::{read_bytes, read_count, read_ids, read_u32_le, read_u8, read_varint_u64},
    BlockData, BlockError, ParseError, PoolBlock, TxOutput,
};

/// The size byte of the merge mining tag, the side-chain id is one hash.
const MERGE_MINING_TAG_SIZE: u8 = 32;

/// The smallest an output can be on the wire: a 1 byte reward, its type and its key.
const MIN_OUTPUT_SIZE: usize = 1 + 1 + HASH_SIZE;

/// A serialized host-chain block and the offsets of its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MainChainData {
    data: Vec<u8>,
    header_size: usize,
    miner_tx_size: usize,
    outputs_offset: usize,
    outputs_blob_size: usize,
}

impl MainChainData {
    /// The whole serialized block.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// The block header bytes.
    pub fn header(&self) -> &[u8] {
        &self.data[..self.header_size]
    }

    /// The coinbase transaction bytes, including its trailing `0` byte.
    pub fn miner_tx(&self) -> &[u8] {
        &self.data[self.header_size..self.header_size + self.miner_tx_size]
    }

    /// The coinbase outputs, starting at their varint count.
    pub fn outputs_blob(&self) -> &[u8] {
        &self.data[self.outputs_offset..self.outputs_offset + self.outputs_blob_size]
    }

    pub const fn header_size(&self) -> usize {
        self.header_size
    }

    pub const fn miner_tx_size(&self) -> usize {
        self.miner_tx_size
    }

    /// The offset of the output count in [`MainChainData::data`].
    pub const fn outputs_offset(&self) -> usize {
        self.outputs_offset
    }

    pub const fn outputs_blob_size(&self) -> usize {
        self.outputs_blob_size
    }
}

impl BlockData {
    /// The extra nonce size that is actually written.
    ///
    /// Sizes below [`EXTRA_NONCE_SIZE`] are padded up, sizes above
    /// [`EXTRA_NONCE_MAX_SIZE`] are a bug in the caller and are clamped.
    pub fn effective_extra_nonce_size(&self) -> usize {
        match u64_to_usize(self.extra_nonce_size) {
            Some(size) if size <= EXTRA_NONCE_MAX_SIZE => size.max(EXTRA_NONCE_SIZE),
            _ => {
                tracing::error!(
                    extra_nonce_size = self.extra_nonce_size,
                    "extra nonce size is too large, clamping to {EXTRA_NONCE_MAX_SIZE}"
                );
                EXTRA_NONCE_MAX_SIZE
            }
        }
    }

    /// Builds the coinbase `tx_extra` field.
    fn tx_extra(&self) -> Result<ArrayVec<u8, TX_EXTRA_MAX_SIZE>, BlockError> {
        fn put(extra: &mut ArrayVec<u8, TX_EXTRA_MAX_SIZE>, bytes: &[u8]) -> Result<(), BlockError> {
            extra
                .try_extend_from_slice(bytes)
                .map_err(|_| BlockError::TxExtraTooLarge)
        }

        let extra_nonce_size = self.effective_extra_nonce_size();
        let declared_size = u8::try_from(extra_nonce_size).map_err(|_| BlockError::TxExtraTooLarge)?;
        let padding = [0; EXTRA_NONCE_MAX_SIZE - EXTRA_NONCE_SIZE];

        let mut extra = ArrayVec::new();

        put(&mut extra, &[TX_EXTRA_TAG_PUBKEY])?;
        put(&mut extra, &self.txkey_pub)?;

        put(&mut extra, &[TX_EXTRA_NONCE, declared_size])?;
        put(&mut extra, &self.extra_nonce.to_le_bytes())?;
        put(&mut extra, &padding[..extra_nonce_size - EXTRA_NONCE_SIZE])?;

        put(&mut extra, &[TX_EXTRA_MERGE_MINING_TAG, MERGE_MINING_TAG_SIZE])?;
        put(&mut extra, &self.sidechain_id)?;

        Ok(extra)
    }

    /// Serializes the host-chain block: header, coinbase transaction and the
    /// ids of every other transaction.
    pub fn serialize_mainchain_data(&self) -> Result<MainChainData, BlockError> {
        let mut data = Vec::with_capacity(
            128 + self.outputs.len() * 39 + self.transactions.len() * HASH_SIZE,
        );

        // Header
        data.put_u8(self.major_version);
        data.put_u8(self.minor_version);
        write_varint(self.timestamp, &mut data);
        data.put_slice(&self.prev_id);
        data.put_u32_le(self.nonce);

        let header_size = data.len();

        // Miner tx
        let unlock_time = self
            .txin_gen_height
            .checked_add(MINER_REWARD_UNLOCK_TIME)
            .ok_or(BlockError::UnlockTimeOverflow)?;

        data.put_u8(TX_VERSION);
        write_varint(unlock_time, &mut data);
        data.put_u8(1);
        data.put_u8(TXIN_GEN);
        write_varint(self.txin_gen_height, &mut data);

        let outputs_offset = data.len();

        write_varint(usize_to_u64(self.outputs.len()), &mut data);

        let tx_type = self.tx_type();
        for output in &self.outputs {
            write_varint(output.reward, &mut data);
            data.put_u8(tx_type.tag());
            data.put_slice(&output.eph_public_key);

            if tx_type.has_view_tag() {
                data.put_u8(output.view_tag);
            }
        }

        let outputs_blob_size = data.len() - outputs_offset;

        let extra = self.tx_extra()?;
        write_varint(usize_to_u64(extra.len()), &mut data);
        data.put_slice(&extra);

        data.put_u8(0);

        let miner_tx_size = data.len() - header_size;

        // Transactions, the coinbase placeholder is implied.
        let ids = self.transactions.get(1..).unwrap_or_default();
        write_varint(usize_to_u64(ids.len()), &mut data);
        for id in ids {
            data.put_slice(id);
        }

        Ok(MainChainData {
            data,
            header_size,
            miner_tx_size,
            outputs_offset,
            outputs_blob_size,
        })
    }

    /// Reads the fields written by [`BlockData::serialize_mainchain_data`].
    pub(crate) fn read_mainchain_data<B: Buf>(&mut self, r: &mut B) -> Result<(), ParseError> {
        // Header
        self.major_version = read_u8(r)?;
        self.minor_version = read_u8(r)?;
        self.timestamp = read_varint_u64(r)?;
        self.prev_id = read_bytes(r)?;
        self.nonce = read_u32_le(r)?;

        // Miner tx
        let version = read_u8(r)?;
        if version != TX_VERSION {
            return Err(ParseError::TxVersion(version));
        }

        let unlock_time = read_varint_u64(r)?;

        if read_varint_u64(r)? != 1 {
            return Err(ParseError::InputCount);
        }

        let input_type = read_u8(r)?;
        if input_type != TXIN_GEN {
            return Err(ParseError::InputType(input_type));
        }

        self.txin_gen_height = read_varint_u64(r)?;
        if self.txin_gen_height.checked_add(MINER_REWARD_UNLOCK_TIME) != Some(unlock_time) {
            return Err(ParseError::UnlockTime);
        }

        let output_count = read_count(r, MIN_OUTPUT_SIZE, ParseError::TooManyOutputs)?;
        let tx_type = self.tx_type();

        self.outputs = Vec::with_capacity(output_count);
        for _ in 0..output_count {
            let reward = read_varint_u64(r)?;

            let output_type = read_u8(r)?;
            if output_type != tx_type.tag() {
                return Err(ParseError::OutputType(output_type));
            }

            let eph_public_key = read_bytes(r)?;
            let view_tag = if tx_type.has_view_tag() { read_u8(r)? } else { 0 };

            self.outputs.push(TxOutput {
                reward,
                eph_public_key,
                view_tag,
            });
        }

        let extra_size = u64_to_usize(read_varint_u64(r)?).ok_or(ParseError::ExtraSize)?;
        if extra_size > r.remaining() {
            return Err(ParseError::ExtraSize);
        }
        let mut extra = r.copy_to_bytes(extra_size);
        self.read_tx_extra(&mut extra)?;
        if extra.has_remaining() {
            return Err(ParseError::ExtraSize);
        }

        let trailer = read_u8(r)?;
        if trailer != 0 {
            return Err(ParseError::MinerTxTrailer(trailer));
        }

        // Transactions
        let tx_count = read_count(r, HASH_SIZE, ParseError::TooManyTransactions)?;
        self.transactions = Vec::with_capacity(tx_count + 1);
        self.transactions.push([0; HASH_SIZE]);
        self.transactions.extend(read_ids(r, tx_count)?);

        Ok(())
    }

    fn read_tx_extra<B: Buf>(&mut self, r: &mut B) -> Result<(), ParseError> {
        fn expect_tag<B: Buf>(r: &mut B, expected: u8) -> Result<(), ParseError> {
            match read_u8(r)? {
                tag if tag == expected => Ok(()),
                tag => Err(ParseError::ExtraTag(tag)),
            }
        }

        expect_tag(r, TX_EXTRA_TAG_PUBKEY)?;
        self.txkey_pub = read_bytes(r)?;

        expect_tag(r, TX_EXTRA_NONCE)?;
        let extra_nonce_size = read_u8(r)?;
        if !(EXTRA_NONCE_SIZE..=EXTRA_NONCE_MAX_SIZE).contains(&usize::from(extra_nonce_size)) {
            return Err(ParseError::ExtraNonceSize(extra_nonce_size));
        }
        self.extra_nonce_size = u64::from(extra_nonce_size);
        self.extra_nonce = read_u32_le(r)?;

        let padding = usize::from(extra_nonce_size) - EXTRA_NONCE_SIZE;
        if r.remaining() < padding {
            return Err(ParseError::NotEnoughBytes);
        }
        if r.copy_to_bytes(padding).iter().any(|&b| b != 0) {
            return Err(ParseError::ExtraNoncePadding);
        }

        expect_tag(r, TX_EXTRA_MERGE_MINING_TAG)?;
        let merge_mining_tag_size = read_u8(r)?;
        if merge_mining_tag_size != MERGE_MINING_TAG_SIZE {
            return Err(ParseError::MergeMiningTagSize(merge_mining_tag_size));
        }
        self.sidechain_id = read_bytes(r)?;

        Ok(())
    }
}

impl PoolBlock {
    /// Serializes the host-chain block, see [`BlockData::serialize_mainchain_data`].
    pub fn serialize_mainchain_data(&self) -> Result<MainChainData, BlockError> {
        self.read().serialize_mainchain_data()
    }
}
