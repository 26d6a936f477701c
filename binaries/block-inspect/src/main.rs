#![doc = include_str!("../README.md")]

use anyhow::Context;

use p2pool_block::PoolBlock;

mod config;
mod constants;
mod inspect;
mod logging;

fn main() -> anyhow::Result<()> {
    let (config, args) = config::read_config_and_args();

    logging::init_logging(&config);

    let bytes = args.block_bytes()?;
    tracing::debug!(size = bytes.len(), "decoding block");

    let block = PoolBlock::deserialize(&bytes).context("failed to decode block")?;

    let mut summary = inspect::summarize(&block)?;

    if let Some(wallet) = args.wallet() {
        summary.payout = Some(block.get_payout(&wallet)?);
    }

    if let Some(seed_hash) = args.seed_hash {
        summary.pow_hash = Some(inspect::pow_hash(&block, args.height, &seed_hash)?);
    }

    let json = if config.output.pretty {
        serde_json::to_string_pretty(&summary)?
    } else {
        serde_json::to_string(&summary)?
    };
    println!("{json}");

    Ok(())
}
