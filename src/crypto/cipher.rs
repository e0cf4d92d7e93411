// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use num_bigint_dig::BigUint;
use tracing::trace;

use super::util::{square_roots, two};
use crate::error::{Error, Result};
use crate::tag::Tag;
use crate::util::power_mod;
use crate::util::prime::is_rabin_congruent;

/// Rabin encryption and decryption over raw integers.
///
/// The tag is fixed at construction; the cipher holds no other state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cipher {
    tag: Tag,
}

impl Cipher {
    pub fn new(tag: Tag) -> Self {
        Self { tag }
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// `c = (m · 2^W + h)² mod n`
    ///
    /// # Errors
    ///
    /// [`Error::PlaintextTooLarge`] if `m · 2^W + h ≥ n`: such a ciphertext
    /// could never be decrypted back to `m`.
    pub fn encrypt(&self, m: &BigUint, n: &BigUint) -> Result<BigUint> {
        let padded = self.tag.apply(m);
        if &padded >= n {
            return Err(Error::PlaintextTooLarge);
        }

        power_mod(&padded, &two(), n)
    }

    /// Largest `m` with `m · 2^W + h < n`, if any.
    pub fn max_plaintext(&self, n: &BigUint) -> Option<BigUint> {
        let h = BigUint::from(self.tag.value());
        if n <= &h {
            return None;
        }
        Some(self.tag.strip(&(n - h - 1u32)))
    }

    /// Recover `m` from `c` given the factorization `(p, q)`.
    ///
    /// Computes the four square roots of `c` modulo `pq` and returns the
    /// plaintext under the first one that squares back to `c` and carries the
    /// tag, scanning in the order `x, n - x, y, n - y`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPrivateKey`] if the factors are not distinct primes
    /// `≡ 3 (mod 4)`, [`Error::TagMismatch`] if no root carries the tag.
    pub fn decrypt(&self, c: &BigUint, p: &BigUint, q: &BigUint) -> Result<BigUint> {
        if p == q || !is_rabin_congruent(p) || !is_rabin_congruent(q) {
            return Err(Error::InvalidPrivateKey);
        }

        let n = p * q;
        let residue = c % &n;

        for (index, candidate) in square_roots(&residue, p, q)?.iter().enumerate() {
            if !self.tag.matches(candidate) {
                trace!(index, "candidate root does not carry the tag");
                continue;
            }
            if power_mod(candidate, &two(), &n)? != residue {
                trace!(index, "tagged candidate is not a square root");
                continue;
            }

            trace!(index, "selected candidate root");
            return Ok(self.tag.strip(candidate));
        }

        Err(Error::TagMismatch)
    }
}
