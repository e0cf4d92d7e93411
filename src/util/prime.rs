// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prime generation for the Rabin cryptosystem.
//!
//! All searches are rejection samplers over a uniform range:
//! - [`random_prime`] draws until a candidate passes Miller-Rabin
//! - [`safe_prime`] draws primes `p` until `2p + 1` is prime as well
//! - [`rabin_prime`] wraps either of them and keeps only primes `≡ 3 (mod 4)`
//!
//! The loops are unbounded by default. A [`PrimeSearch`] with `max_attempts`
//! set fails with [`Error::PrimeSearchExhausted`] instead of spinning forever.

use num_bigint_dig::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, ToPrimitive};
use rand::RngCore;
use tracing::debug;

use super::power_mod;
use crate::{Error, Result};

/// Miller-Rabin trial count used throughout. Error probability ≤ 4^-100.
pub const MILLER_RABIN_ROUNDS: usize = 100;

/// Miller-Rabin witness test.
///
/// Returns `true` if `a` proves `n` composite, `false` if it gives no
/// evidence of compositeness. `n` must be odd and at least 5, with `a` in
/// `[2, n - 2]`.
pub fn miller_rabin_witness(n: &BigUint, a: &BigUint) -> bool {
    let n_minus_1 = n - BigUint::one();

    // n - 1 = u · 2^t with u odd
    let mut u = n_minus_1.clone();
    let mut t = 0usize;
    while u.is_even() {
        u >>= 1;
        t += 1;
    }

    let mut x = match power_mod(a, &u, n) {
        Ok(x) => x,
        Err(_) => return true,
    };

    for _ in 0..t {
        let squared = (&x * &x) % n;
        if squared.is_one() && !x.is_one() && x != n_minus_1 {
            return true;
        }
        x = squared;
    }

    !x.is_one()
}

/// Probabilistic primality test with `k` random bases.
///
/// Values below 2 and even values above 2 are composite, 2 and 3 are prime.
/// Everything else runs `k` Miller-Rabin trials with bases drawn uniformly
/// from `[2, n - 2]`.
pub fn is_prime<R: RngCore + ?Sized>(n: &BigUint, k: usize, rng: &mut R) -> bool {
    match n.to_u8() {
        Some(0) | Some(1) => return false,
        Some(2) | Some(3) => return true,
        _ => {}
    }
    if n.is_even() {
        return false;
    }

    let low = BigUint::from(2u32);
    let high = n - BigUint::one(); // exclusive, so bases stop at n - 2

    (0..k).all(|_| {
        let a = rng.gen_biguint_range(&low, &high);
        !miller_rabin_witness(n, &a)
    })
}

/// Prime search parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimeSearch {
    rounds: usize,
    max_attempts: Option<usize>,
}

impl Default for PrimeSearch {
    fn default() -> Self {
        Self { rounds: MILLER_RABIN_ROUNDS, max_attempts: None }
    }
}

impl PrimeSearch {
    /// Create a search with 100 Miller-Rabin rounds and no attempt limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of Miller-Rabin rounds per candidate.
    pub fn rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds;
        self
    }

    /// Cap the number of candidates drawn by a single search.
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Uniform random prime in `[low, high]`.
    ///
    /// Expected number of draws is about `ln(high)`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidRange`] if the range is empty or below 2,
    /// [`Error::PrimeSearchExhausted`] if `max_attempts` is reached.
    pub fn random_prime<R: RngCore + ?Sized>(
        &self,
        low: &BigUint,
        high: &BigUint,
        rng: &mut R,
    ) -> Result<BigUint> {
        check_range(low, high, 2)?;
        let bound = high + BigUint::one();

        let mut attempts = 0usize;
        loop {
            self.charge(&mut attempts)?;

            let candidate = rng.gen_biguint_range(low, &bound);
            if is_prime(&candidate, self.rounds, rng) {
                debug!(attempts, bits = candidate.bits(), "found random prime");
                return Ok(candidate);
            }
        }
    }

    /// Safe prime `2p + 1` where `p` is a random prime in `[low, high]`.
    ///
    /// Needs two primality conditions at once, so expect roughly
    /// `ln(high)²` draws.
    pub fn safe_prime<R: RngCore + ?Sized>(
        &self,
        low: &BigUint,
        high: &BigUint,
        rng: &mut R,
    ) -> Result<BigUint> {
        check_range(low, high, 2)?;

        let mut attempts = 0usize;
        loop {
            self.charge(&mut attempts)?;

            let p = self.random_prime(low, high, rng)?;
            let candidate = (p << 1) + BigUint::one();
            if is_prime(&candidate, self.rounds, rng) {
                debug!(attempts, bits = candidate.bits(), "found safe prime");
                return Ok(candidate);
            }
        }
    }

    /// Prime `≡ 3 (mod 4)` from [`Self::safe_prime`] or [`Self::random_prime`].
    ///
    /// The congruence makes `(p + 1) / 4` an integer, which decryption uses as
    /// a square-root exponent.
    pub fn rabin_prime<R: RngCore + ?Sized>(
        &self,
        safe: bool,
        low: &BigUint,
        high: &BigUint,
        rng: &mut R,
    ) -> Result<BigUint> {
        check_range(low, high, 3)?;

        let mut attempts = 0usize;
        loop {
            self.charge(&mut attempts)?;

            let candidate = if safe {
                self.safe_prime(low, high, rng)?
            } else {
                self.random_prime(low, high, rng)?
            };

            if is_rabin_congruent(&candidate) {
                debug!(attempts, safe, "found rabin prime");
                return Ok(candidate);
            }
        }
    }

    #[inline]
    fn charge(&self, attempts: &mut usize) -> Result<()> {
        if let Some(max) = self.max_attempts {
            if *attempts >= max {
                return Err(Error::PrimeSearchExhausted { attempts: *attempts });
            }
        }
        *attempts += 1;
        Ok(())
    }
}

/// Uniform random prime in `[low, high]` with default search parameters.
pub fn random_prime<R: RngCore + ?Sized>(
    low: &BigUint,
    high: &BigUint,
    rng: &mut R,
) -> Result<BigUint> {
    PrimeSearch::new().random_prime(low, high, rng)
}

/// Safe prime `2p + 1` for a random prime `p` in `[low, high]`.
pub fn safe_prime<R: RngCore + ?Sized>(
    low: &BigUint,
    high: &BigUint,
    rng: &mut R,
) -> Result<BigUint> {
    PrimeSearch::new().safe_prime(low, high, rng)
}

/// Rabin prime (`≡ 3 mod 4`), safe or plain per `safe`.
pub fn rabin_prime<R: RngCore + ?Sized>(
    safe: bool,
    low: &BigUint,
    high: &BigUint,
    rng: &mut R,
) -> Result<BigUint> {
    PrimeSearch::new().rabin_prime(safe, low, high, rng)
}

#[inline]
pub(crate) fn is_rabin_congruent(p: &BigUint) -> bool {
    (p % 4u32).to_u8() == Some(3)
}

fn check_range(low: &BigUint, high: &BigUint, min_high: u32) -> Result<()> {
    if low > high || *high < BigUint::from(min_high) {
        return Err(Error::InvalidRange { low: low.clone(), high: high.clone() });
    }
    Ok(())
}
