// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use num_bigint_dig::BigUint;
use num_integer::Integer;

use crate::error::{Error, Result};
use crate::util::{extended_gcd, power_mod, to_signed};

/// Packed stream format version.
pub const VERSION: u8 = 1;

/// `[version:u8][block_count:u32]`
pub const HEADER_LEN: usize = 5;

/// `[plain_len:u16][ct_len:u32]`
pub const BLOCK_HEADER_LEN: usize = 6;

#[inline]
pub fn two() -> BigUint {
    BigUint::from(2u32)
}

/// The four square roots of `c` modulo `n = pq`, in the order
/// `x, n - x, y, n - y`.
///
/// Requires `p ≡ q ≡ 3 (mod 4)`, where `c^((p+1)/4)` is a square root of `c`
/// modulo `p` whenever one exists. The residues are combined with the Bézout
/// coefficients of `p` and `q`:
///
/// ```text
/// x = (y_p·p·m_q + y_q·q·m_p) mod n
/// y = (y_p·p·m_q - y_q·q·m_p) mod n
/// ```
pub fn square_roots(c: &BigUint, p: &BigUint, q: &BigUint) -> Result<[BigUint; 4]> {
    let n = p * q;
    let (_, (y_p, y_q)) = extended_gcd(p, q);

    let m_p = power_mod(c, &((p + 1u32) >> 2), p)?;
    let m_q = power_mod(c, &((q + 1u32) >> 2), q)?;

    let lhs = y_p * to_signed(p) * to_signed(&m_q);
    let rhs = y_q * to_signed(q) * to_signed(&m_p);
    let n_signed = to_signed(&n);

    let x = to_unsigned((&lhs + &rhs).mod_floor(&n_signed))?;
    let y = to_unsigned((&lhs - &rhs).mod_floor(&n_signed))?;

    let neg_x = (&n - &x) % &n;
    let neg_y = (&n - &y) % &n;

    Ok([x, neg_x, y, neg_y])
}

fn to_unsigned(v: num_bigint_dig::BigInt) -> Result<BigUint> {
    v.to_biguint()
        .ok_or_else(|| Error::DecryptionFailed("CRT residue resulted in negative value".into()))
}

/// Append one block to a packed stream.
pub fn write_block(out: &mut Vec<u8>, plain_len: u16, ciphertext: &[u8]) {
    out.extend_from_slice(&plain_len.to_be_bytes());
    out.extend_from_slice(&(ciphertext.len() as u32).to_be_bytes());
    out.extend_from_slice(ciphertext);
}

/// Parse `[plain_len:u16][ct_len:u32]` from the start of `buf`.
pub fn read_block_header(buf: &[u8]) -> Option<(usize, usize)> {
    let plain_len = u16::from_be_bytes(buf.get(0..2)?.try_into().ok()?);
    let ct_len = u32::from_be_bytes(buf.get(2..6)?.try_into().ok()?);
    Some((plain_len as usize, ct_len as usize))
}
