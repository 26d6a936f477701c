//! General constants used throughout `p2pool-block-inspect`.

/// The file name the config is looked up under in the current directory.
pub(crate) const DEFAULT_CONFIG_FILE_NAME: &str = "p2pool-block-inspect.toml";

/// Header to put at the start of the generated config file.
pub(crate) const CONFIG_HEADER: &str = "\
## p2pool-block-inspect config
##
## All these config values can be set to
## their default by commenting them out with '#'.

";
