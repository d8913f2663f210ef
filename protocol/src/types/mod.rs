//! # Primitive Types
//!
//! Fixed-size identifiers shared by every other module: validator
//! [`Address`]es and proposal [`Hash`]es. Both are plain byte arrays with a
//! `0x`-prefixed hex text form, which is also their serde representation.
//!
//! Opaque variable-length byte fields (signatures, committed seals, raw
//! proposals) use the [`hex_bytes`] serde helper so that JSON fixtures stay
//! readable.

pub mod address;
pub mod hash;

pub use address::Address;
pub use hash::Hash;

use thiserror::Error;

/// Errors produced when parsing an address or hash from text.
#[derive(Debug, Error, PartialEq)]
pub enum TypeError {
    /// The input was not valid hexadecimal.
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// The input decoded to the wrong number of bytes.
    #[error("invalid length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Number of bytes the type requires.
        expected: usize,
        /// Number of bytes the input held.
        got: usize,
    },
}

/// Strips an optional `0x` / `0X` prefix.
pub(crate) fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// Decodes a hex string (with or without `0x`) into exactly `N` bytes.
pub(crate) fn decode_fixed<const N: usize>(s: &str) -> Result<[u8; N], TypeError> {
    let digits = strip_hex_prefix(s);
    if digits.len() != N * 2 {
        return Err(TypeError::InvalidLength {
            expected: N,
            got: digits.len() / 2,
        });
    }

    let mut out = [0u8; N];
    hex::decode_to_slice(digits, &mut out)?;
    Ok(out)
}

/// Serde helper for `Vec<u8>` fields encoded as `0x`-prefixed hex strings.
///
/// ```ignore
/// #[serde(with = "crate::types::hex_bytes")]
/// pub signature: Vec<u8>,
/// ```
pub mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(super::strip_hex_prefix(&s)).map_err(serde::de::Error::custom)
    }
}
