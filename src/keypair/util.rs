// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use num_bigint_dig::BigUint;
use num_traits::One;
use tracing::debug;

use crate::Result;

/// Inclusive range `[2^(x-1), 2^x - 1]` of `x`-bit integers.
pub fn prime_range(bits: usize) -> (BigUint, BigUint) {
    let low = BigUint::one() << (bits - 1);
    let high = (BigUint::one() << bits) - BigUint::one();
    (low, high)
}

/// Keep drawing the second prime until it differs from the first.
///
/// `p == q` makes `n` a perfect square.
pub fn redraw_until_distinct<F>(mut q: BigUint, p: &BigUint, mut draw: F) -> Result<BigUint>
where
    F: FnMut() -> Result<BigUint>,
{
    while &q == p {
        debug!("second prime collided with the first, redrawing");
        q = draw()?;
    }
    Ok(q)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_bounds() {
        let (low, high) = prime_range(8);
        assert_eq!(low, BigUint::from(128u32));
        assert_eq!(high, BigUint::from(255u32));
    }

    #[test]
    fn redraws_on_collision() {
        let p = BigUint::from(7u32);
        let mut draws = vec![BigUint::from(11u32), BigUint::from(7u32)];

        let q = redraw_until_distinct(p.clone(), &p, || Ok(draws.pop().unwrap())).unwrap();

        assert_eq!(q, BigUint::from(11u32));
        assert!(draws.is_empty());
    }
}
