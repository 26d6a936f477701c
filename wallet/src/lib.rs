#![doc = include_str!("../README.md")]

#[cfg(test)]
mod test_deps {
    use hex_literal as _;
    use pretty_assertions as _;
    use proptest as _;
}

mod derivation;
mod error;
mod wallet;

pub use derivation::{tx_public_key, DerivedOutputKey, OutputKeyDerivation};
pub use error::WalletError;
pub use wallet::Wallet;
