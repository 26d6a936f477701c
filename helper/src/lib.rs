#![doc = include_str!("../README.md")]
#![cfg_attr(not(any(feature = "std", test)), no_std)]

#[cfg(test)]
mod test_deps {
    use hex_literal as _;
    use pretty_assertions as _;
    use proptest as _;
}

//---------------------------------------------------------------------------------------------------- Public API
#[cfg(feature = "cast")]
pub mod cast;

#[cfg(feature = "crypto")]
pub mod crypto;

#[cfg(feature = "time")]
pub mod time;

#[cfg(feature = "varint")]
pub mod varint;
//----------------------------------------------------------------------------------------------------
