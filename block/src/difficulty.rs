//! 128-bit difficulties.
//!
//! Difficulties are native [`u128`]s in memory. On the wire they are
//! two varints, the low 64 bits followed by the high 64 bits.

use bytes::{Buf, BufMut};

use p2pool_helper::varint::{read_varint, write_varint, VarIntError};

/// Splits a difficulty into its `(lo, hi)` 64-bit halves.
///
/// ```rust
/// # use p2pool_block::difficulty::*;
/// assert_eq!(split_difficulty(u128::from(u64::MAX) + 2), (1, 1));
/// ```
#[expect(clippy::cast_possible_truncation, reason = "truncation is the point")]
pub const fn split_difficulty(difficulty: u128) -> (u64, u64) {
    (difficulty as u64, (difficulty >> 64) as u64)
}

/// Joins `(lo, hi)` 64-bit halves into a difficulty.
///
/// ```rust
/// # use p2pool_block::difficulty::*;
/// assert_eq!(join_difficulty(1, 1), u128::from(u64::MAX) + 2);
/// ```
pub fn join_difficulty(lo: u64, hi: u64) -> u128 {
    (u128::from(hi) << 64) | u128::from(lo)
}

/// Writes a difficulty as `varint(lo) || varint(hi)`.
pub fn write_difficulty<B: BufMut>(difficulty: u128, w: &mut B) {
    let (lo, hi) = split_difficulty(difficulty);
    write_varint(lo, w);
    write_varint(hi, w);
}

/// Reads a difficulty written with [`write_difficulty`].
pub fn read_difficulty<B: Buf>(r: &mut B) -> Result<u128, VarIntError> {
    let lo = read_varint(r)?;
    let hi = read_varint(r)?;
    Ok(join_difficulty(lo, hi))
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn wire_layout() {
        let mut buf = Vec::new();
        write_difficulty(join_difficulty(300, 1), &mut buf);
        assert_eq!(buf, hex!("ac0201"));

        let mut buf = Vec::new();
        write_difficulty(0, &mut buf);
        assert_eq!(buf, [0, 0]);
    }

    proptest! {
        #[test]
        fn split_join(difficulty in any::<u128>()) {
            let (lo, hi) = split_difficulty(difficulty);
            prop_assert_eq!(join_difficulty(lo, hi), difficulty);

            let mut buf = Vec::new();
            write_difficulty(difficulty, &mut buf);
            prop_assert_eq!(read_difficulty(&mut buf.as_slice()), Ok(difficulty));
        }
    }
}
