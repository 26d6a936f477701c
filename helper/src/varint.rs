//! The host chain's varint.
//!
//! Little-endian base-128: 7 bits of payload per byte, the top bit set on every
//! byte except the last. A `u64` takes at most [`MAX_VARINT_LEN`] bytes.
//!
//! This is *not* the `epee` varint used by the levin protocol, which stores a
//! size marker in the low 2 bits of the first byte.
//!
//! `#[no_std]` compatible.

use arrayvec::ArrayVec;
use bytes::{Buf, BufMut};

/// The maximum amount of bytes a `u64` varint takes.
pub const MAX_VARINT_LEN: usize = 10;

/// An error reading a varint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VarIntError {
    /// The buffer ended in the middle of a varint.
    #[error("Not enough bytes to build VarInt")]
    NotEnoughBytes,
    /// The encoded value does not fit in a `u64`.
    #[error("VarInt overflows a u64")]
    Overflow,
    /// The varint has a redundant trailing zero byte.
    #[error("VarInt is not canonically encoded")]
    NonCanonical,
}

/// Encodes `number` into a fixed-capacity buffer.
///
/// ```rust
/// # use p2pool_helper::varint::*;
/// assert_eq!(varint_bytes(0x7F).as_slice(), &[0x7F]);
/// assert_eq!(varint_bytes(0x80).as_slice(), &[0x80, 0x01]);
/// ```
#[expect(clippy::cast_possible_truncation, reason = "only the low 7 bits of each byte are kept")]
pub fn varint_bytes(mut number: u64) -> ArrayVec<u8, MAX_VARINT_LEN> {
    let mut out = ArrayVec::new();

    // At most 10 iterations for a u64, which is the capacity.
    while number >= 0x80 {
        out.push((number & 0x7F) as u8 | 0x80);
        number >>= 7;
    }
    out.push(number as u8);

    out
}

/// Returns the amount of bytes `number` takes as a varint.
pub const fn varint_len(number: u64) -> usize {
    let bits = 64 - number.leading_zeros() as usize;
    if bits == 0 {
        1
    } else {
        bits.div_ceil(7)
    }
}

/// Writes `number` as a varint to `w`.
///
/// # Panics
/// Panics if `w` does not have room for [`varint_len`] bytes,
/// which never happens for growable buffers such as `Vec<u8>`.
pub fn write_varint<B: BufMut>(number: u64, w: &mut B) {
    w.put_slice(&varint_bytes(number));
}

/// Reads a varint from `r`.
///
/// Non-canonical encodings (a zero final byte after the first byte) are rejected,
/// so every value has exactly one accepted encoding.
pub fn read_varint<B: Buf>(r: &mut B) -> Result<u64, VarIntError> {
    let mut number = 0_u64;

    for i in 0..MAX_VARINT_LEN {
        if !r.has_remaining() {
            return Err(VarIntError::NotEnoughBytes);
        }

        let byte = r.get_u8();

        // The 10th byte only has room for the top bit of a u64.
        if i == MAX_VARINT_LEN - 1 && byte > 1 {
            return Err(VarIntError::Overflow);
        }

        if i != 0 && byte == 0 {
            return Err(VarIntError::NonCanonical);
        }

        number |= u64::from(byte & 0x7F) << (i * 7);

        if byte & 0x80 == 0 {
            return Ok(number);
        }
    }

    Err(VarIntError::Overflow)
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;

    fn assert_varint(number: u64, bytes: &[u8]) {
        assert_eq!(varint_bytes(number).as_slice(), bytes);
        assert_eq!(varint_len(number), bytes.len());

        let mut r = bytes;
        assert_eq!(read_varint(&mut r), Ok(number));
        assert!(r.is_empty());
    }

    #[test]
    fn known_encodings() {
        assert_varint(0, &[0]);
        assert_varint(1, &[1]);
        assert_varint(127, &[0x7F]);
        assert_varint(128, &[0x80, 0x01]);
        assert_varint(300, &hex!("ac02"));
        assert_varint(16_383, &hex!("ff7f"));
        assert_varint(16_384, &hex!("808001"));
        assert_varint(u64::MAX, &hex!("ffffffffffffffffff01"));
    }

    #[test]
    fn write_to_vec() {
        let mut buf = Vec::new();
        write_varint(1_667_941_829, &mut buf);
        write_varint(2_751_566, &mut buf);
        assert_eq!(buf, hex!("c58bab9b06cef8a701"));
    }

    #[test]
    fn truncated() {
        let mut r: &[u8] = &[0x80, 0x80];
        assert_eq!(read_varint(&mut r), Err(VarIntError::NotEnoughBytes));

        let mut r: &[u8] = &[];
        assert_eq!(read_varint(&mut r), Err(VarIntError::NotEnoughBytes));
    }

    #[test]
    fn overflow() {
        let mut r: &[u8] = &hex!("ffffffffffffffffff02");
        assert_eq!(read_varint(&mut r), Err(VarIntError::Overflow));

        let mut r: &[u8] = &hex!("ffffffffffffffffff8101");
        assert_eq!(read_varint(&mut r), Err(VarIntError::Overflow));
    }

    #[test]
    fn non_canonical() {
        let mut r: &[u8] = &[0x81, 0x00];
        assert_eq!(read_varint(&mut r), Err(VarIntError::NonCanonical));
    }

    proptest! {
        #[test]
        fn round_trip(number in any::<u64>()) {
            let bytes = varint_bytes(number);
            prop_assert_eq!(bytes.len(), varint_len(number));

            let mut r = bytes.as_slice();
            prop_assert_eq!(read_varint(&mut r), Ok(number));
            prop_assert!(r.is_empty());
        }
    }
}
