// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::OnceLock;

use num_bigint_dig::BigUint;
use num_traits::One;

use crate::{Error, Result};

/// Identifier whose CRC-32 forms the standard tag.
const TAG_IDENTIFIER: &[u8] = b"Rabin cryptosystem";

static STANDARD_TAG: OnceLock<Tag> = OnceLock::new();

/// Fixed marker embedded in the low `width` bits of every padded plaintext.
///
/// Squaring modulo `n = pq` has four square roots, and the tag is how
/// decryption recognises the one that was encrypted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag {
    value: u64,
    width: u32,
}

impl Tag {
    pub const MAX_WIDTH: u32 = 64;

    /// Construct a tag of `width` bits.
    ///
    /// `width` must be in `1..=64` and `value` must fit in it.
    pub fn new(value: u64, width: u32) -> Result<Self> {
        if width == 0 || width > Self::MAX_WIDTH {
            return Err(Error::InvalidTag { value, width });
        }
        if width < Self::MAX_WIDTH && value >> width != 0 {
            return Err(Error::InvalidTag { value, width });
        }

        Ok(Self { value, width })
    }

    /// The 32-bit CRC of a fixed identifier, computed once per process.
    pub fn standard() -> Self {
        *STANDARD_TAG.get_or_init(|| Self {
            value: u64::from(crc32fast::hash(TAG_IDENTIFIER)),
            width: 32,
        })
    }

    #[inline]
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Width `W` of the tag in bits.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// `m · 2^W + h`
    pub fn apply(&self, m: &BigUint) -> BigUint {
        (m << self.shift()) + BigUint::from(self.value)
    }

    /// Whether the low `W` bits of `x` equal the tag.
    pub fn matches(&self, x: &BigUint) -> bool {
        x % self.modulus() == BigUint::from(self.value)
    }

    /// `x >> W`, the plaintext under a tagged value.
    pub fn strip(&self, x: &BigUint) -> BigUint {
        x >> self.shift()
    }

    #[inline]
    fn shift(&self) -> usize {
        self.width as usize
    }

    #[inline]
    fn modulus(&self) -> BigUint {
        BigUint::one() << self.shift()
    }
}

impl Default for Tag {
    fn default() -> Self {
        Self::standard()
    }
}
