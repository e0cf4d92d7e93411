// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reversible mapping between text and a single plaintext integer.
//!
//! Every character (or byte) is XORed with [`MASK`] and becomes one base-256
//! digit, least significant first. The empty string maps to zero.

use num_bigint_dig::BigUint;
use num_traits::{ToPrimitive, Zero};

use crate::{Error, Result};

/// Byte mask applied to every digit.
pub const MASK: u8 = 0xAA;

/// Encode a string whose characters are all in `U+0000..=U+00FF`.
///
/// # Errors
///
/// [`Error::UnencodableCharacter`] for characters above `U+00FF`.
/// [`Error::AmbiguousEncoding`] when the text ends in `U+00AA`: that
/// character maps to a leading zero digit, which [`decode`] cannot recover.
pub fn encode(s: &str) -> Result<BigUint> {
    let bytes = s
        .chars()
        .enumerate()
        .map(|(index, character)| {
            u8::try_from(u32::from(character))
                .map_err(|_| Error::UnencodableCharacter { character, index })
        })
        .collect::<Result<Vec<u8>>>()?;

    if bytes.last() == Some(&MASK) {
        return Err(Error::AmbiguousEncoding);
    }

    Ok(encode_bytes(&bytes))
}

/// Decode an integer produced by [`encode`] back into text.
///
/// Each digit is read as a Latin-1 code point.
pub fn decode(n: &BigUint) -> String {
    decode_bytes(n).into_iter().map(char::from).collect()
}

/// Byte-level [`encode`]. First byte is the least significant digit.
pub fn encode_bytes(bytes: &[u8]) -> BigUint {
    let masked: Vec<u8> = bytes.iter().map(|b| b ^ MASK).collect();
    BigUint::from_bytes_le(&masked)
}

/// Byte-level [`decode`]. Stops as soon as the integer reaches zero.
pub fn decode_bytes(n: &BigUint) -> Vec<u8> {
    let mut rest = n.clone();
    let mut out = Vec::new();

    while !rest.is_zero() {
        let digit = (&rest % 256u32).to_u8().unwrap_or_default();
        out.push(digit ^ MASK);
        rest >>= 8;
    }

    out
}

/// Decode exactly `len` bytes, restoring trailing bytes equal to [`MASK`]
/// that [`decode_bytes`] drops.
///
/// # Errors
///
/// [`Error::DecryptionFailed`] if `n` holds more than `len` digits.
pub fn decode_bytes_exact(n: &BigUint, len: usize) -> Result<Vec<u8>> {
    let mut out = decode_bytes(n);
    if out.len() > len {
        return Err(Error::DecryptionFailed(format!(
            "block decodes to {} bytes, expected {}",
            out.len(),
            len
        )));
    }

    out.resize(len, MASK);
    Ok(out)
}
