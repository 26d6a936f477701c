//! Logging setup.

use crate::config::Config;

/// Installs the global [`tracing`] subscriber, logging to stderr so stdout only holds the block.
pub(crate) fn init_logging(config: &Config) {
    tracing_subscriber::fmt()
        .with_max_level(config.tracing.level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
