// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Rabin Cryptosystem
//!
//! Public-key encryption by modular squaring, with decryption by square-root
//! extraction modulo the secret factors `p ≡ q ≡ 3 (mod 4)`.
//!
//! Reference: M. O. Rabin, *Digitalized Signatures and Public-Key Functions
//! as Intractable as Factorization* (MIT/LCS/TR-212, 1979).
//!
//! ## Tagging
//!
//! Squaring is four-to-one, so every plaintext `m` is padded to
//! `m · 2^W + h` with a fixed [`Tag`] `h` of width `W` before encryption.
//! Decryption computes all four square roots with the CRT and keeps the one
//! whose low `W` bits equal `h`. If none does, decryption fails with
//! [`Error::TagMismatch`].
//!
//! ## Security
//!
//! The private key `(p, q)` is zeroized on drop. Arithmetic is not
//! constant-time, and encryption is deterministic.
//!
//! ## Example
//!
//! ```rust,no_run
//! use rabin::{codec, Decrypt, Encrypt, KeyPair};
//!
//! let keypair = KeyPair::generate(false, 512).expect("key generation failed");
//!
//! let m = codec::encode("Hi").expect("encodable text");
//! let ciphertext = keypair.public_key().encrypt(&m).expect("encryption failed");
//! let decrypted = keypair.private_key().decrypt(&ciphertext).expect("decryption failed");
//!
//! assert_eq!(codec::decode(&decrypted), "Hi");
//! ```

pub mod codec;

mod ciphertext;
mod crypto;
mod error;
mod keypair;
mod tag;
mod util;

pub use ciphertext::*;
pub use crypto::{
    Cipher, Decrypt, DecryptBytes, Decryptor, Encrypt, EncryptBytes, Encryptor, Stream,
};
pub use error::*;
pub use keypair::{generate_key, KeyPair, KeyPairBuilder, PrivateKey, PublicKey};
pub use tag::Tag;
pub use util::prime::{
    is_prime, miller_rabin_witness, rabin_prime, random_prime, safe_prime, PrimeSearch,
    MILLER_RABIN_ROUNDS,
};
pub use util::{extended_gcd, power_mod};
