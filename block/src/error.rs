//! Block errors.

use p2pool_helper::varint::VarIntError;
use p2pool_wallet::WalletError;

/// An error from a [`PoolBlock`](crate::PoolBlock) operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BlockError {
    #[error("Tried to calculate the PoW of an uninitialized block.")]
    Uninitialized,
    #[error("The tx_extra field does not fit in its staging buffer.")]
    TxExtraTooLarge,
    #[error("The miner tx unlock time overflows a u64.")]
    UnlockTimeOverflow,
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("Wallet error: {0}")]
    Wallet(#[from] WalletError),
    #[error("The PoW input does not fit in its staging buffer.")]
    PowInputTooLarge,
    #[error("The PoW hasher failed to calculate a hash.")]
    PowHasher,
}

/// An error parsing a block from bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("VarInt error: {0}")]
    VarInt(#[from] VarIntError),
    #[error("The blob ended before the block was complete.")]
    NotEnoughBytes,
    #[error("The blob has bytes left after the block.")]
    TrailingBytes,
    #[error("The miner tx has an unsupported version: {0}.")]
    TxVersion(u8),
    #[error("The miner tx unlock time is not its height plus the unlock window.")]
    UnlockTime,
    #[error("The miner tx does not have exactly one input.")]
    InputCount,
    #[error("The miner tx input is not a generation input: {0}.")]
    InputType(u8),
    #[error("The miner tx declares more outputs than the blob can hold.")]
    TooManyOutputs,
    #[error("The miner tx output type does not match the block version: {0}.")]
    OutputType(u8),
    #[error("The tx_extra size does not match its contents.")]
    ExtraSize,
    #[error("Unexpected tx_extra tag: {0}.")]
    ExtraTag(u8),
    #[error("The extra nonce size is out of range: {0}.")]
    ExtraNonceSize(u8),
    #[error("The extra nonce padding is not zero.")]
    ExtraNoncePadding,
    #[error("The merge mining tag has the wrong size: {0}.")]
    MergeMiningTagSize(u8),
    #[error("The miner tx does not end with an empty signature: {0}.")]
    MinerTxTrailer(u8),
    #[error("The block declares more transactions than the blob can hold.")]
    TooManyTransactions,
    #[error("The block declares more uncles than the blob can hold.")]
    TooManyUncles,
}
