//! Coinbase outputs.

use p2pool_constants::{
    block::{HARDFORK_VIEW_TAGS_VERSION, HASH_SIZE},
    tx::{TXOUT_TO_KEY, TXOUT_TO_TAGGED_KEY},
};

/// The output format of a block's coinbase transaction.
///
/// Every output of a block uses the same format, decided by the block's major version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TxOutputType {
    /// `txout_to_key`: a one-time key.
    ToKey,
    /// `txout_to_tagged_key`: a one-time key and a view tag.
    ToTaggedKey,
}

impl TxOutputType {
    /// The output format used by blocks with this major version.
    pub const fn from_major_version(major_version: u8) -> Self {
        if major_version < HARDFORK_VIEW_TAGS_VERSION {
            Self::ToKey
        } else {
            Self::ToTaggedKey
        }
    }

    /// The output type tag written before each output key.
    pub const fn tag(self) -> u8 {
        match self {
            Self::ToKey => TXOUT_TO_KEY,
            Self::ToTaggedKey => TXOUT_TO_TAGGED_KEY,
        }
    }

    /// Returns `true` if outputs of this type are followed by a view tag.
    pub const fn has_view_tag(self) -> bool {
        matches!(self, Self::ToTaggedKey)
    }
}

/// A coinbase output.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TxOutput {
    /// The amount paid, in atomic units.
    pub reward: u64,
    /// The one-time (ephemeral) public key of the output.
    pub eph_public_key: [u8; HASH_SIZE],
    /// The view tag, only serialized for [`TxOutputType::ToTaggedKey`] outputs.
    pub view_tag: u8,
}
