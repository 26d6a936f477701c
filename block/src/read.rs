//! Bounds-checked reads shared by the main-chain and side-chain parsers.

use bytes::Buf;

use p2pool_helper::{cast::u64_to_usize, varint::read_varint};

use crate::ParseError;

pub(crate) fn read_u8<B: Buf>(r: &mut B) -> Result<u8, ParseError> {
    if !r.has_remaining() {
        return Err(ParseError::NotEnoughBytes);
    }

    Ok(r.get_u8())
}

pub(crate) fn read_u32_le<B: Buf>(r: &mut B) -> Result<u32, ParseError> {
    Ok(u32::from_le_bytes(read_bytes(r)?))
}

pub(crate) fn read_bytes<const N: usize, B: Buf>(r: &mut B) -> Result<[u8; N], ParseError> {
    if r.remaining() < N {
        return Err(ParseError::NotEnoughBytes);
    }

    let mut bytes = [0; N];
    r.copy_to_slice(&mut bytes);
    Ok(bytes)
}

pub(crate) fn read_varint_u64<B: Buf>(r: &mut B) -> Result<u64, ParseError> {
    Ok(read_varint(r)?)
}

/// Reads a varint element count, rejecting counts that could not possibly fit in
/// the rest of the buffer when every element takes at least `min_element_size` bytes.
pub(crate) fn read_count<B: Buf>(
    r: &mut B,
    min_element_size: usize,
    too_many: ParseError,
) -> Result<usize, ParseError> {
    let count = u64_to_usize(read_varint(r)?).ok_or(too_many)?;

    match count.checked_mul(min_element_size) {
        Some(size) if size <= r.remaining() => Ok(count),
        _ => Err(too_many),
    }
}

/// Reads `count` 32-byte ids.
pub(crate) fn read_ids<B: Buf>(r: &mut B, count: usize) -> Result<Vec<[u8; 32]>, ParseError> {
    (0..count).map(|_| read_bytes(r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_reads() {
        assert_eq!(read_u8(&mut [].as_slice()), Err(ParseError::NotEnoughBytes));
        assert_eq!(read_bytes::<4, _>(&mut [1, 2, 3].as_slice()), Err(ParseError::NotEnoughBytes));
        assert_eq!(read_u32_le(&mut [1, 0, 0, 0].as_slice()), Ok(1));
    }

    #[test]
    fn count_bounded_by_remaining() {
        let too_many = ParseError::TooManyUncles;

        // 2 elements of 32 bytes, only 63 bytes left.
        let mut buf = vec![2];
        buf.extend_from_slice(&[0; 63]);
        assert_eq!(read_count(&mut buf.as_slice(), 32, too_many), Err(too_many));

        buf.push(0);
        assert_eq!(read_count(&mut buf.as_slice(), 32, too_many), Ok(2));

        let huge = [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01];
        assert_eq!(read_count(&mut huge.as_slice(), 32, too_many), Err(too_many));
    }
}
