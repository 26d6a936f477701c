//! The miner wallet.

use p2pool_helper::crypto::HASH_SIZE;

use crate::{
    derivation::{derive_public_key, derive_view_tag, key_derivation},
    DerivedOutputKey, OutputKeyDerivation, WalletError,
};

/// The public half of a miner's wallet.
///
/// The keys are held as raw bytes, they are only checked to be valid points
/// when a derivation needs them.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Wallet {
    spend_public_key: [u8; HASH_SIZE],
    view_public_key: [u8; HASH_SIZE],
}

impl Wallet {
    /// Create a wallet from its spend and view public keys.
    pub const fn new(spend_public_key: [u8; HASH_SIZE], view_public_key: [u8; HASH_SIZE]) -> Self {
        Self {
            spend_public_key,
            view_public_key,
        }
    }

    /// The spend public key.
    pub const fn spend_public_key(&self) -> &[u8; HASH_SIZE] {
        &self.spend_public_key
    }

    /// The view public key.
    pub const fn view_public_key(&self) -> &[u8; HASH_SIZE] {
        &self.view_public_key
    }
}

impl OutputKeyDerivation for Wallet {
    fn derive_output_key(
        &self,
        tx_key_sec: &[u8; HASH_SIZE],
        output_index: usize,
    ) -> Result<DerivedOutputKey, WalletError> {
        let derivation = key_derivation(&self.view_public_key, tx_key_sec)?;

        Ok(DerivedOutputKey {
            eph_public_key: derive_public_key(&derivation, output_index, &self.spend_public_key)?,
            view_tag: derive_view_tag(&derivation, output_index),
        })
    }

    fn derive_output_key_with_view_tag(
        &self,
        tx_key_sec: &[u8; HASH_SIZE],
        output_index: usize,
        view_tag: u8,
    ) -> Result<Option<[u8; HASH_SIZE]>, WalletError> {
        let derivation = key_derivation(&self.view_public_key, tx_key_sec)?;

        if derive_view_tag(&derivation, output_index) != view_tag {
            return Ok(None);
        }

        derive_public_key(&derivation, output_index, &self.spend_public_key).map(Some)
    }
}
