use std::{path::PathBuf, process::exit};

use anyhow::{bail, Context};
use hex::FromHex;
use tracing::level_filters::LevelFilter;

use p2pool_wallet::Wallet;

use crate::config::Config;

/// Decode a P2Pool side-chain block and print it as JSON.
#[derive(clap::Parser, Debug)]
#[command(version, about)]
pub(crate) struct Args {
    /// The block as hex: its main-chain data followed by its side-chain data.
    #[arg(long, conflicts_with = "file")]
    pub(crate) blob: Option<String>,
    /// A file holding the raw block bytes.
    #[arg(long)]
    pub(crate) file: Option<PathBuf>,
    /// The spend public key of a wallet to look for a payout to, as hex.
    #[arg(long, requires = "view_key", value_parser = parse_hash)]
    pub(crate) spend_key: Option<[u8; 32]>,
    /// The view public key of a wallet to look for a payout to, as hex.
    #[arg(long, requires = "spend_key", value_parser = parse_hash)]
    pub(crate) view_key: Option<[u8; 32]>,
    /// The RandomX seed hash to calculate the PoW hash with, as hex.
    #[arg(long, value_parser = parse_hash)]
    pub(crate) seed_hash: Option<[u8; 32]>,
    /// The host-chain height the PoW hash is calculated at.
    #[arg(long, default_value_t = 0)]
    pub(crate) height: u64,
    /// The minimum log level, overrides the config file.
    #[arg(long)]
    pub(crate) log_level: Option<LevelFilter>,
    /// The PATH of the config file.
    #[arg(long)]
    pub(crate) config_file: Option<PathBuf>,
    /// Generate a config file and print it to stdout.
    #[arg(long)]
    pub(crate) generate_config: bool,
}

fn parse_hash(s: &str) -> Result<[u8; 32], hex::FromHexError> {
    <[u8; 32]>::from_hex(s.trim())
}

impl Args {
    /// Complete any quick requests asked for in [`Args`].
    ///
    /// May cause the process to [`exit`].
    pub(crate) fn do_quick_requests(&self) {
        if self.generate_config {
            println!("{}", Config::documented_config());
            exit(0);
        }
    }

    /// Apply the [`Args`] to the given [`Config`].
    pub(crate) const fn apply_args(&self, mut config: Config) -> Config {
        if let Some(level) = self.log_level {
            config.tracing.level = level;
        }

        config
    }

    /// Reads the block bytes from `--blob` or `--file`.
    pub(crate) fn block_bytes(&self) -> anyhow::Result<Vec<u8>> {
        match (&self.blob, &self.file) {
            (Some(blob), _) => hex::decode(blob.trim()).context("--blob is not valid hex"),
            (None, Some(file)) => std::fs::read(file)
                .with_context(|| format!("failed to read block from {}", file.display())),
            (None, None) => bail!("no block given, pass --blob or --file"),
        }
    }

    /// The wallet from `--spend-key` and `--view-key`, if both were given.
    pub(crate) fn wallet(&self) -> Option<Wallet> {
        Some(Wallet::new(self.spend_key?, self.view_key?))
    }
}
