//! Wallet errors.

/// An error deriving a one-time output key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum WalletError {
    /// The view public key is not a valid curve point.
    #[error("The wallet's view public key is not a valid point.")]
    InvalidViewKey,
    /// The spend public key is not a valid curve point.
    #[error("The wallet's spend public key is not a valid point.")]
    InvalidSpendKey,
}
