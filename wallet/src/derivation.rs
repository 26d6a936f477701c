//! One-time output key derivation.

use curve25519_dalek::{
    edwards::{CompressedEdwardsY, EdwardsPoint},
    Scalar,
};

use p2pool_helper::{
    cast::usize_to_u64,
    crypto::{keccak256_parts, HASH_SIZE},
    varint::varint_bytes,
};

use crate::WalletError;

/// The salt hashed in front of the derivation when computing a view tag.
const VIEW_TAG_SALT: &[u8; 8] = b"view_tag";

/// A one-time output key and its view tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DerivedOutputKey {
    /// The one-time (ephemeral) public key of the output.
    pub eph_public_key: [u8; HASH_SIZE],
    /// The first byte of the view tag hash.
    pub view_tag: u8,
}

/// The capability of recomputing which one-time output keys pay a wallet.
///
/// Implementors never need private keys, only the wallet's public keys and the
/// transaction secret key embedded in the block.
pub trait OutputKeyDerivation {
    /// Derives the one-time output key and view tag for the output at `output_index`
    /// of a transaction with secret key `tx_key_sec`.
    fn derive_output_key(
        &self,
        tx_key_sec: &[u8; HASH_SIZE],
        output_index: usize,
    ) -> Result<DerivedOutputKey, WalletError>;

    /// Same as [`OutputKeyDerivation::derive_output_key`], except returns [`None`] as soon as
    /// the derived view tag does not equal `view_tag`.
    ///
    /// Implementations should compute the view tag before the output key so a
    /// mismatch skips the remaining point arithmetic.
    fn derive_output_key_with_view_tag(
        &self,
        tx_key_sec: &[u8; HASH_SIZE],
        output_index: usize,
        view_tag: u8,
    ) -> Result<Option<[u8; HASH_SIZE]>, WalletError> {
        let derived = self.derive_output_key(tx_key_sec, output_index)?;

        Ok((derived.view_tag == view_tag).then_some(derived.eph_public_key))
    }
}

/// Returns the transaction public key `tx_key_sec * G`.
pub fn tx_public_key(tx_key_sec: &[u8; HASH_SIZE]) -> [u8; HASH_SIZE] {
    EdwardsPoint::mul_base(&Scalar::from_bytes_mod_order(*tx_key_sec))
        .compress()
        .to_bytes()
}

/// `8 * tx_key_sec * view_public_key`.
pub(crate) fn key_derivation(
    view_public_key: &[u8; HASH_SIZE],
    tx_key_sec: &[u8; HASH_SIZE],
) -> Result<CompressedEdwardsY, WalletError> {
    let view = CompressedEdwardsY(*view_public_key)
        .decompress()
        .ok_or(WalletError::InvalidViewKey)?;

    let tx_key_sec = Scalar::from_bytes_mod_order(*tx_key_sec);

    Ok((tx_key_sec * view).mul_by_cofactor().compress())
}

/// The first byte of `keccak256("view_tag" || derivation || varint(output_index))`.
pub(crate) fn derive_view_tag(derivation: &CompressedEdwardsY, output_index: usize) -> u8 {
    let index = varint_bytes(usize_to_u64(output_index));

    keccak256_parts([VIEW_TAG_SALT, derivation.as_bytes(), index.as_slice()])[0]
}

/// `keccak256(derivation || varint(output_index)) * G + spend_public_key`.
pub(crate) fn derive_public_key(
    derivation: &CompressedEdwardsY,
    output_index: usize,
    spend_public_key: &[u8; HASH_SIZE],
) -> Result<[u8; HASH_SIZE], WalletError> {
    let spend = CompressedEdwardsY(*spend_public_key)
        .decompress()
        .ok_or(WalletError::InvalidSpendKey)?;

    let index = varint_bytes(usize_to_u64(output_index));
    let scalar = Scalar::from_bytes_mod_order(keccak256_parts([derivation.as_bytes(), index.as_slice()]));

    Ok((EdwardsPoint::mul_base(&scalar) + spend).compress().to_bytes())
}
