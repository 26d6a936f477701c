#![doc = include_str!("../README.md")]
#![deny(missing_docs, reason = "all constants should document what they are")]

cfg_if::cfg_if! {
    // Used in test modules.
    if #[cfg(test)] {
        use hex as _;
        use pretty_assertions as _;
        use sha3 as _;
    }
}

mod macros;

#[cfg(feature = "block")]
pub mod block;
#[cfg(feature = "tx")]
pub mod tx;
