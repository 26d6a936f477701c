#![doc = include_str!("../README.md")]

mod block;
pub mod difficulty;
mod error;
mod main_chain;
mod merkle;
mod output;
mod payout;
mod pow;
#[cfg(feature = "randomx")]
mod randomx;
mod read;
mod side_chain;

#[cfg(test)]
mod test_utils;

pub use block::{BlockData, BlockWriteGuard, OffChainData, PoolBlock, VerificationState};
pub use error::{BlockError, ParseError};
pub use main_chain::MainChainData;
pub use merkle::tree_hash;
pub use output::{TxOutput, TxOutputType};
pub use pow::{miner_tx_id, PowHasher, PowInput, MAX_POW_INPUT_SIZE};
#[cfg(feature = "randomx")]
pub use randomx::{RandomXHasher, RandomXHasherError, RX_SEEDS_CACHED};
