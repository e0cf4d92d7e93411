// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

pub mod prime;

use num_bigint_dig::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::{Error, Result};

/// Computes `a^d mod n` by square-and-multiply.
///
/// The exponent is consumed one bit at a time from the least significant end:
/// the accumulator picks up the current power of `a` whenever the bit is set,
/// and the power is squared on every step.
///
/// # Errors
///
/// Returns [`Error::ZeroModulus`] if `n == 0`.
pub fn power_mod(a: &BigUint, d: &BigUint, n: &BigUint) -> Result<BigUint> {
    if n.is_zero() {
        return Err(Error::ZeroModulus);
    }

    let mut result = BigUint::one() % n;
    let mut base = a % n;
    let mut exp = d.clone();

    while !exp.is_zero() {
        if exp.is_odd() {
            result = (&result * &base) % n;
        }
        base = (&base * &base) % n;
        exp >>= 1;
    }

    Ok(result)
}

/// Extended Euclidean algorithm.
///
/// Returns `(g, (s, t))` such that `g = gcd(a, b) = s·a + t·b`.
pub fn extended_gcd(a: &BigUint, b: &BigUint) -> (BigUint, (BigInt, BigInt)) {
    let (mut old_r, mut r) = (to_signed(a), to_signed(b));
    let (mut old_s, mut s) = (BigInt::one(), BigInt::zero());
    let (mut old_t, mut t) = (BigInt::zero(), BigInt::one());

    while !r.is_zero() {
        let quotient = &old_r / &r;

        let next_r = &old_r - &quotient * &r;
        old_r = std::mem::replace(&mut r, next_r);

        let next_s = &old_s - &quotient * &s;
        old_s = std::mem::replace(&mut s, next_s);

        let next_t = &old_t - &quotient * &t;
        old_t = std::mem::replace(&mut t, next_t);
    }

    // Inputs are unsigned, so the final remainder is never negative.
    let g = old_r.to_biguint().unwrap_or_default();
    (g, (old_s, old_t))
}

#[inline]
pub(crate) fn to_signed(x: &BigUint) -> BigInt {
    BigInt::from_biguint(Sign::Plus, x.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn power_mod_small_values() {
        let r = power_mod(&BigUint::from(4u32), &BigUint::from(13u32), &BigUint::from(497u32));
        assert_eq!(r.unwrap(), BigUint::from(445u32));
    }

    #[test]
    fn power_mod_zero_exponent_is_one() {
        for n in [2u32, 3, 10, 65_537] {
            let r = power_mod(&BigUint::from(12345u32), &BigUint::zero(), &BigUint::from(n));
            assert_eq!(r.unwrap(), BigUint::one());
        }
    }

    #[test]
    fn power_mod_modulus_one() {
        let r = power_mod(&BigUint::from(7u32), &BigUint::zero(), &BigUint::one());
        assert_eq!(r.unwrap(), BigUint::zero());
    }

    #[test]
    fn power_mod_rejects_zero_modulus() {
        let r = power_mod(&BigUint::from(3u32), &BigUint::from(2u32), &BigUint::zero());
        assert_eq!(r, Err(Error::ZeroModulus));
    }

    #[test]
    fn extended_gcd_coprime_primes() {
        let p = BigUint::from(1_000_003u32);
        let q = BigUint::from(999_983u32);

        let (g, (s, t)) = extended_gcd(&p, &q);
        assert_eq!(g, BigUint::one());
        assert_eq!(&s * to_signed(&p) + &t * to_signed(&q), BigInt::one());
    }

    #[test]
    fn extended_gcd_with_zero() {
        let a = BigUint::from(42u32);
        let (g, (s, t)) = extended_gcd(&a, &BigUint::zero());
        assert_eq!(g, a);
        assert_eq!(s * to_signed(&a) + t * BigInt::zero(), to_signed(&a));
    }

    proptest! {
        #[test]
        fn power_mod_matches_modpow(a in any::<u64>(), d in any::<u32>(), n in 1u64..) {
            let (a, d, n) = (BigUint::from(a), BigUint::from(d), BigUint::from(n));
            prop_assert_eq!(power_mod(&a, &d, &n).unwrap(), a.modpow(&d, &n));
        }

        #[test]
        fn extended_gcd_bezout_identity(a in any::<u64>(), b in any::<u64>()) {
            let (a, b) = (BigUint::from(a), BigUint::from(b));
            let (g, (s, t)) = extended_gcd(&a, &b);

            prop_assert_eq!(&g, &a.gcd(&b));
            prop_assert_eq!(s * to_signed(&a) + t * to_signed(&b), to_signed(&g));
        }
    }
}
