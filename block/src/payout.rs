//! Finding a wallet's output in a block's coinbase.

use p2pool_wallet::OutputKeyDerivation;

use crate::{BlockData, BlockError, PoolBlock, TxOutput, TxOutputType};

/// Returns the reward of the first output in `outputs` that pays `wallet`, or `0`.
fn find_payout<W: OutputKeyDerivation>(
    wallet: &W,
    tx_type: TxOutputType,
    txkey_sec: &[u8; 32],
    outputs: &[TxOutput],
) -> Result<u64, BlockError> {
    for (i, output) in outputs.iter().enumerate() {
        let eph_public_key = if tx_type.has_view_tag() {
            wallet.derive_output_key_with_view_tag(txkey_sec, i, output.view_tag)?
        } else {
            Some(wallet.derive_output_key(txkey_sec, i)?.eph_public_key)
        };

        if eph_public_key == Some(output.eph_public_key) {
            return Ok(output.reward);
        }
    }

    Ok(0)
}

impl BlockData {
    /// Returns how much this block's coinbase pays `wallet`, `0` if nothing.
    ///
    /// A wallet is paid by at most one output, the first match is returned.
    pub fn get_payout<W: OutputKeyDerivation>(&self, wallet: &W) -> Result<u64, BlockError> {
        find_payout(wallet, self.tx_type(), &self.txkey_sec, &self.outputs)
    }
}

impl PoolBlock {
    /// Returns how much this block's coinbase pays `wallet`, see [`BlockData::get_payout`].
    ///
    /// The outputs are copied out first so the key derivations run without the lock held.
    pub fn get_payout<W: OutputKeyDerivation>(&self, wallet: &W) -> Result<u64, BlockError> {
        let (tx_type, txkey_sec, outputs) = {
            let data = self.read();
            (data.tx_type(), data.txkey_sec, data.outputs.clone())
        };

        find_payout(wallet, tx_type, &txkey_sec, &outputs)
    }
}
