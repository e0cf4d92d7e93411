// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use num_bigint_dig::BigUint;

/// Errors that can occur during cryptographic operations.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid key size: must be at least {min} bits, got {actual}")]
    InvalidKeySize { min: usize, actual: usize },

    #[error("Plaintext exceeds maximum allowed value")]
    PlaintextTooLarge,

    #[error("No square root of the ciphertext carries the expected tag")]
    TagMismatch,

    #[error("Modulus must be non-zero")]
    ZeroModulus,

    #[error("Invalid search range [{low}, {high}]")]
    InvalidRange { low: BigUint, high: BigUint },

    #[error("Prime search gave up after {attempts} attempts")]
    PrimeSearchExhausted { attempts: usize },

    #[error("Invalid tag: value {value:#x} does not fit in {width} bits")]
    InvalidTag { value: u64, width: u32 },

    #[error("Invalid public key")]
    InvalidPublicKey,

    #[error("Invalid private key")]
    InvalidPrivateKey,

    #[error("Character {character:?} at index {index} is not representable as a byte")]
    UnencodableCharacter { character: char, index: usize },

    #[error("Text ending in U+00AA cannot be decoded unambiguously")]
    AmbiguousEncoding,

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("decryption failed: {0}")]
    DecryptionFailed(String),
}

pub type Result<T> = std::result::Result<T, Error>;
