// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

mod cipher;
mod decrypt;
mod encrypt;
mod util;

pub use cipher::Cipher;
pub use decrypt::Decryptor;
pub use encrypt::Encryptor;

use num_bigint_dig::BigUint;

use crate::ciphertext::Ciphertext;
use crate::error::Result;

/// Encrypts a single plaintext integer.
pub trait Encrypt {
    /// Encrypt a single plaintext integer `m`.
    ///
    /// The tagged value `m · 2^W + h` must be strictly smaller than the public
    /// modulus `n`. For arbitrary-length data, use
    /// [`EncryptBytes::encrypt_bytes`].
    fn encrypt(&self, plaintext: &BigUint) -> Result<Ciphertext>;
}

/// Encrypts arbitrary-length data by splitting it into blocks.
pub trait EncryptBytes {
    /// Encrypt arbitrary-length input and return it in packed form.
    ///
    /// The output can be decrypted with [`DecryptBytes::decrypt_bytes`].
    fn encrypt_bytes<P: AsRef<[u8]>>(&self, data: P) -> Result<Vec<u8>>;
}

/// Decrypts a single ciphertext back into its plaintext integer.
pub trait Decrypt {
    /// Recover the plaintext `m` from a ciphertext `c`.
    fn decrypt(&self, ciphertext: &Ciphertext) -> Result<BigUint>;
}

/// Decrypts variable-length plaintext that was encrypted in block form.
pub trait DecryptBytes {
    /// Decrypt packed multi-block ciphertext and return the full plaintext.
    fn decrypt_bytes<P: AsRef<[u8]>>(&self, packed: P) -> Result<Vec<u8>>;
}

/// Stateful interface for incremental cryptographic processing.
///
/// Implementations accept input in chunks via [`update`](Stream::update) and
/// produce any immediately available output. Remaining buffered state is
/// processed and returned by [`finalize`](Stream::finalize).
pub trait Stream {
    /// Processes the next chunk of input data.
    ///
    /// Implementations may buffer data internally and return an empty vector.
    fn update<D: AsRef<[u8]>>(&mut self, data: D) -> Result<Vec<u8>>;

    /// Completes processing and returns any remaining output.
    fn finalize(self) -> Result<Vec<u8>>;
}

#[cfg(test)]
mod test_encryption {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::keypair::{generate_key, KeyPair};

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn create_test_keypair() -> KeyPair {
        generate_key(false, 128, &mut StdRng::seed_from_u64(0xC0DE)).unwrap()
    }

    #[test]
    fn encrypt_single_block() {
        let keypair = create_test_keypair();
        let message = BigUint::from(0x48656c6c6fu64);

        let ciphertext = keypair.public_key().encrypt(&message).unwrap();
        let plaintext = keypair.private_key().decrypt(&ciphertext).unwrap();

        assert_eq!(message, plaintext);
    }

    #[test]
    fn encryption_is_deterministic() {
        let keypair = create_test_keypair();
        let message = BigUint::from(42u32);

        let c1 = keypair.encrypt(&message).unwrap();
        let c2 = keypair.encrypt(&message).unwrap();

        assert_eq!(c1, c2);
    }

    #[test]
    fn encrypt_bytes_simple() {
        let keypair = create_test_keypair();
        let message = b"This is a test message that spans multiple blocks!";

        let packed = keypair.public_key().encrypt_bytes(message).unwrap();
        let plaintext = keypair.private_key().decrypt_bytes(&packed).unwrap();

        assert_eq!(message, plaintext.as_slice());
    }

    #[test]
    fn streaming_encrypt_multiple_chunks() {
        let keypair = create_test_keypair();
        let message = b"This is a longer message for testing chunked streaming encryption!";

        let mut encryptor = keypair.public_key().encryptor();
        encryptor.update(&message[0..20]).unwrap();
        encryptor.update(&message[20..40]).unwrap();
        encryptor.update(&message[40..]).unwrap();
        let packed = encryptor.finalize().unwrap();

        let plaintext = keypair.private_key().decrypt_bytes(&packed).unwrap();
        assert_eq!(message, plaintext.as_slice());
    }

    #[test]
    fn streaming_encrypt_empty_message() {
        let keypair = create_test_keypair();

        let mut encryptor = keypair.encryptor();
        encryptor.update(b"").unwrap();
        let packed = encryptor.finalize().unwrap();

        let plaintext = keypair.decrypt_bytes(&packed).unwrap();
        assert!(plaintext.is_empty());
    }

    #[test]
    fn streaming_encrypt_byte_by_byte() {
        let keypair = create_test_keypair();
        let message = b"Byte by byte encryption";

        let mut encryptor = keypair.public_key().encryptor();
        for byte in message.iter() {
            encryptor.update([*byte]).unwrap();
        }

        let packed = encryptor.finalize().unwrap();
        let plaintext = keypair.private_key().decrypt_bytes(&packed).unwrap();

        assert_eq!(message, plaintext.as_slice());
    }

    #[test]
    fn mask_bytes_survive_block_boundaries() {
        let keypair = create_test_keypair();
        // 0xAA encodes to a zero digit; a block ending in it must keep its length
        let message = vec![0xAAu8; 100];

        let packed = keypair.encrypt_bytes(&message).unwrap();
        assert_eq!(keypair.decrypt_bytes(&packed).unwrap(), message);
    }

    #[test]
    fn encrypt_bytes_matches_encryptor() {
        let keypair = create_test_keypair();
        let message = b"Testing delegation";

        let packed1 = keypair.public_key().encrypt_bytes(message).unwrap();

        let mut encryptor = keypair.public_key().encryptor();
        encryptor.update(message).unwrap();
        let packed2 = encryptor.finalize().unwrap();

        // Rabin encryption is deterministic, so the packed forms are identical.
        assert_eq!(packed1, packed2);
    }

    #[test]
    fn roundtrip_utf8() {
        let keypair = create_test_keypair();
        let message = "Hello, 世界!";

        let packed = keypair.encrypt_bytes(message.as_bytes()).unwrap();
        let plaintext = String::from_utf8(keypair.decrypt_bytes(&packed).unwrap()).unwrap();

        assert_eq!(message, plaintext);
    }
}
