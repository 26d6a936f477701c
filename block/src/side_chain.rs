//! The side-chain half of a block.
//!
//! ```text
//! spend key (32) | view key (32) | tx secret key (32) | parent (32)
//! | varint uncle count | uncles (32 each) | varint height
//! | varint difficulty lo | varint difficulty hi
//! | varint cumulative difficulty lo | varint cumulative difficulty hi
//! ```

use bytes::{Buf, BufMut};

use p2pool_constants::block::HASH_SIZE;
use p2pool_helper::{cast::usize_to_u64, varint::write_varint};
use p2pool_wallet::Wallet;

use crate::{
    difficulty::{read_difficulty, write_difficulty},
    read::{read_bytes, read_count, read_ids, read_varint_u64},
    BlockData, ParseError, PoolBlock,
};

impl BlockData {
    /// Serializes the side-chain fields of this block.
    pub fn serialize_sidechain_data(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity((self.uncles.len() + 4) * HASH_SIZE + 20);

        data.put_slice(self.miner_wallet.spend_public_key());
        data.put_slice(self.miner_wallet.view_public_key());
        data.put_slice(&self.txkey_sec);
        data.put_slice(&self.parent);

        write_varint(usize_to_u64(self.uncles.len()), &mut data);
        for uncle in &self.uncles {
            data.put_slice(uncle);
        }

        write_varint(self.sidechain_height, &mut data);

        write_difficulty(self.difficulty, &mut data);
        write_difficulty(self.cumulative_difficulty, &mut data);

        data
    }

    /// Reads the fields written by [`BlockData::serialize_sidechain_data`].
    pub(crate) fn read_sidechain_data<B: Buf>(&mut self, r: &mut B) -> Result<(), ParseError> {
        let spend_public_key = read_bytes(r)?;
        let view_public_key = read_bytes(r)?;
        self.miner_wallet = Wallet::new(spend_public_key, view_public_key);

        self.txkey_sec = read_bytes(r)?;
        self.parent = read_bytes(r)?;

        let uncle_count = read_count(r, HASH_SIZE, ParseError::TooManyUncles)?;
        self.uncles = read_ids(r, uncle_count)?;

        self.sidechain_height = read_varint_u64(r)?;

        self.difficulty = read_difficulty(r)?;
        self.cumulative_difficulty = read_difficulty(r)?;

        Ok(())
    }
}

impl PoolBlock {
    /// Serializes the side-chain fields, see [`BlockData::serialize_sidechain_data`].
    pub fn serialize_sidechain_data(&self) -> Vec<u8> {
        self.read().serialize_sidechain_data()
    }
}
