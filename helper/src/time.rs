//! Time related.
//!
//! Requires `std`.

use std::time::{SystemTime, UNIX_EPOCH};

/// Returns the current system time as a UNIX timestamp.
///
/// A system clock set before the UNIX epoch reads as `0`.
///
/// ```rust
/// # use p2pool_helper::time::*;
/// assert!(current_unix_timestamp() > 0);
/// ```
#[inline]
pub fn current_unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}
