//! The printed form of a block.

use serde::Serialize;

use p2pool_block::{BlockError, PoolBlock};
use p2pool_helper::{cast::usize_to_u64, crypto::keccak256_parts, varint::varint_bytes};

/// Everything known about a block, hashes as hex.
#[derive(Debug, Serialize)]
pub(crate) struct BlockSummary {
    /// The host-chain block id.
    pub(crate) id: String,
    pub(crate) major_version: u8,
    pub(crate) minor_version: u8,
    pub(crate) timestamp: u64,
    pub(crate) prev_id: String,
    pub(crate) nonce: u32,
    pub(crate) txin_gen_height: u64,
    pub(crate) outputs: Vec<OutputSummary>,
    pub(crate) total_reward: u64,
    pub(crate) txkey_pub: String,
    pub(crate) extra_nonce: u32,
    /// Every transaction id except the coinbase.
    pub(crate) transactions: Vec<String>,
    pub(crate) sidechain: SideChainSummary,
    /// The PoW hashing blob.
    pub(crate) pow_input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) payout: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) pow_hash: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct OutputSummary {
    pub(crate) reward: u64,
    pub(crate) eph_public_key: String,
    pub(crate) view_tag: Option<u8>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SideChainSummary {
    pub(crate) id: String,
    pub(crate) height: u64,
    pub(crate) parent: String,
    pub(crate) uncles: Vec<String>,
    pub(crate) miner_spend_public_key: String,
    pub(crate) miner_view_public_key: String,
    /// Difficulties are decimal strings, JSON numbers lose precision above 2^53.
    pub(crate) difficulty: String,
    pub(crate) cumulative_difficulty: String,
}

/// Summarizes `block`.
pub(crate) fn summarize(block: &PoolBlock) -> Result<BlockSummary, BlockError> {
    let pow_input = block.pow_input()?;
    let data = block.snapshot();

    let id = keccak256_parts([
        varint_bytes(usize_to_u64(pow_input.len())).as_slice(),
        pow_input.as_slice(),
    ]);

    let tx_type = data.tx_type();
    let outputs = data
        .outputs
        .iter()
        .map(|output| OutputSummary {
            reward: output.reward,
            eph_public_key: hex::encode(output.eph_public_key),
            view_tag: tx_type.has_view_tag().then_some(output.view_tag),
        })
        .collect();

    Ok(BlockSummary {
        id: hex::encode(id),
        major_version: data.major_version,
        minor_version: data.minor_version,
        timestamp: data.timestamp,
        prev_id: hex::encode(data.prev_id),
        nonce: data.nonce,
        txin_gen_height: data.txin_gen_height,
        outputs,
        total_reward: data
            .outputs
            .iter()
            .fold(0, |total, output| total.saturating_add(output.reward)),
        txkey_pub: hex::encode(data.txkey_pub),
        extra_nonce: data.extra_nonce,
        transactions: data.transactions.iter().skip(1).map(hex::encode).collect(),
        sidechain: SideChainSummary {
            id: hex::encode(data.sidechain_id),
            height: data.sidechain_height,
            parent: hex::encode(data.parent),
            uncles: data.uncles.iter().map(hex::encode).collect(),
            miner_spend_public_key: hex::encode(data.miner_wallet.spend_public_key()),
            miner_view_public_key: hex::encode(data.miner_wallet.view_public_key()),
            difficulty: data.difficulty.to_string(),
            cumulative_difficulty: data.cumulative_difficulty.to_string(),
        },
        pow_input: hex::encode(pow_input),
        payout: None,
        pow_hash: None,
    })
}

/// Calculates the RandomX PoW hash of `block`.
#[cfg(feature = "randomx")]
pub(crate) fn pow_hash(
    block: &PoolBlock,
    height: u64,
    seed_hash: &[u8; 32],
) -> anyhow::Result<String> {
    let hasher = p2pool_block::RandomXHasher::new();

    Ok(hex::encode(block.get_pow_hash(&hasher, height, seed_hash)?))
}

#[cfg(not(feature = "randomx"))]
pub(crate) fn pow_hash(_: &PoolBlock, _: u64, _: &[u8; 32]) -> anyhow::Result<String> {
    anyhow::bail!("--seed-hash needs p2pool-block-inspect built with the `randomx` feature")
}
