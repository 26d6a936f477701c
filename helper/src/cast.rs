//! Casting between `usize` and `u64`.
//!
//! Lengths are written to the wire as `u64` varints and read back
//! into `usize` indices, these functions keep those conversions in one place.
//!
//! `#[no_std]` compatible.

#[rustfmt::skip]
#[cfg(not(any(target_pointer_width = "64", target_pointer_width = "32")))]
compile_error!("This module is only compatible with {32,64}-bit CPUs");

/// Cast [`usize`] to [`u64`].
///
/// This is lossless on every supported target.
///
/// ```rust
/// # use p2pool_helper::cast::*;
/// assert_eq!(usize_to_u64(usize::MAX), usize::MAX as u64);
/// ```
#[inline]
pub const fn usize_to_u64(u: usize) -> u64 {
    u as u64
}

/// Cast [`u64`] to [`usize`].
///
/// Returns [`None`] on 32-bit targets if `u` does not fit.
///
/// ```rust
/// # use p2pool_helper::cast::*;
/// assert_eq!(u64_to_usize(123), Some(123));
/// ```
#[inline]
pub fn u64_to_usize(u: u64) -> Option<usize> {
    usize::try_from(u).ok()
}
