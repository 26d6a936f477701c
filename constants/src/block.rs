//! Host-chain block header.

/// The size of every hash, public key and secret key on the wire.
pub const HASH_SIZE: usize = 32;

/// The size of the header nonce field.
///
/// The nonce is a little-endian `u32`.
pub const NONCE_SIZE: usize = 4;

/// The first host-chain major version whose outputs carry a view tag.
///
/// Blocks with a `major_version` below this use `txout_to_key` outputs,
/// blocks at or above it use `txout_to_tagged_key` outputs.
pub const HARDFORK_VIEW_TAGS_VERSION: u8 = 15;

/// The largest header a block can have:
/// 2 version bytes, a 10 byte varint timestamp, the previous id and the nonce.
pub const MAX_HEADER_SIZE: usize = 2 + 10 + HASH_SIZE + NONCE_SIZE;
