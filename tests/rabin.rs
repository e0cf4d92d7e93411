// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

#![allow(clippy::unwrap_used)]

use num_bigint_dig::prime::probably_prime;
use num_bigint_dig::BigUint;
use num_traits::One;
use rand::rngs::StdRng;
use rand::SeedableRng;

use rabin::{
    codec, generate_key, Cipher, Decrypt, DecryptBytes, Encrypt, EncryptBytes, Error, KeyPair,
    KeyPairBuilder, PrivateKey, PublicKey, Stream, Tag,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn keypair(seed: u64) -> KeyPair {
    init_tracing();
    generate_key(false, 128, &mut StdRng::seed_from_u64(seed)).unwrap()
}

#[test]
fn hi_roundtrip_at_toy_scale() {
    let keypair = keypair(1);

    let ciphertext = keypair.public_key().encrypt_str("Hi").unwrap();
    assert_eq!(keypair.private_key().decrypt_str(&ciphertext).unwrap(), "Hi");
}

#[test]
fn empty_string_roundtrip() {
    let keypair = keypair(2);

    let ciphertext = keypair.public_key().encrypt_str("").unwrap();
    assert_eq!(keypair.private_key().decrypt_str(&ciphertext).unwrap(), "");
}

#[test]
fn entropy_backed_generation_roundtrip() {
    init_tracing();
    let keypair = KeyPair::generate(false, 64).unwrap();

    let m = codec::encode("Latin-1 only: café").unwrap();
    let ciphertext = keypair.encrypt(&m).unwrap();
    assert_eq!(codec::decode(&keypair.decrypt(&ciphertext).unwrap()), "Latin-1 only: café");
}

#[test]
fn largest_admissible_plaintext_roundtrips() {
    let keypair = keypair(3);
    let public = keypair.public_key();

    let by_bits = (BigUint::one() << public.max_plaintext_bits()) - 1u32;
    let by_modulus = Cipher::default().max_plaintext(public.n()).unwrap();
    assert!(by_bits <= by_modulus);

    for m in [by_bits, by_modulus] {
        let ciphertext = keypair.encrypt(&m).unwrap();
        assert_eq!(keypair.decrypt(&ciphertext).unwrap(), m);
    }
}

#[test]
fn plaintext_past_the_modulus_is_rejected() {
    let keypair = keypair(4);
    let max = Cipher::default().max_plaintext(keypair.public_key().n()).unwrap();

    assert_eq!(keypair.encrypt(&(max + 1u32)), Err(Error::PlaintextTooLarge));
}

#[test]
fn foreign_key_reports_tag_mismatch() {
    let ours = keypair(5);
    let theirs = keypair(6);

    // The padded square must wrap around the modulus, otherwise it is an
    // integer square that every key can take the root of.
    let m = (BigUint::one() << ours.public_key().max_plaintext_bits()) - 1u32;
    let ciphertext = ours.encrypt(&m).unwrap();

    assert_eq!(theirs.decrypt(&ciphertext), Err(Error::TagMismatch));
}

#[test]
fn safe_prime_keys_roundtrip() {
    init_tracing();
    let keypair = generate_key(true, 16, &mut StdRng::seed_from_u64(7)).unwrap();
    let secret = keypair.private_key();

    for prime in [secret.p(), secret.q()] {
        assert_eq!(prime % 4u32, BigUint::from(3u32));
        assert!(probably_prime(&(prime >> 1usize), 20));
    }

    let ciphertext = keypair.public_key().encrypt_str("ok").unwrap();
    assert_eq!(secret.decrypt_str(&ciphertext).unwrap(), "ok");
}

#[test]
fn custom_tag_is_carried_by_the_keys() {
    init_tracing();
    let tag = Tag::new(0xBEEF, 16).unwrap();
    let keypair = KeyPairBuilder::new()
        .security_bits(96)
        .tag(tag)
        .build_with_rng(&mut StdRng::seed_from_u64(8))
        .unwrap();

    assert_eq!(keypair.public_key().tag(), tag);

    let m = (BigUint::one() << keypair.public_key().max_plaintext_bits()) - 1u32;
    let ciphertext = keypair.encrypt(&m).unwrap();
    assert_eq!(keypair.decrypt(&ciphertext).unwrap(), m);

    // Same factors, different tag
    let secret = keypair.private_key();
    let standard = Cipher::new(Tag::standard());
    assert_eq!(
        standard.decrypt(ciphertext.value(), secret.p(), secret.q()),
        Err(Error::TagMismatch)
    );
}

#[test]
fn keys_rebuilt_from_parts_interoperate() {
    let keypair = keypair(9);
    let public = keypair.public_key();
    let secret = keypair.private_key();

    let rebuilt_public =
        PublicKey::new(public.n().clone(), public.tag(), public.security_bits()).unwrap();
    let rebuilt_secret =
        PrivateKey::new(rebuilt_public.clone(), secret.p().clone(), secret.q().clone()).unwrap();

    let ciphertext = rebuilt_public.encrypt_str("parts").unwrap();
    assert_eq!(rebuilt_secret.decrypt_str(&ciphertext).unwrap(), "parts");

    // Swapped factor order is still a valid factorization
    let swapped = PrivateKey::new(rebuilt_public, secret.q().clone(), secret.p().clone()).unwrap();
    assert_eq!(swapped.decrypt_str(&ciphertext).unwrap(), "parts");
}

#[test]
fn packed_stream_survives_arbitrary_chunking() {
    let keypair = keypair(10);
    let message: Vec<u8> = (0..=255u8).cycle().take(1000).collect();

    let packed = keypair.encrypt_bytes(&message).unwrap();

    let mut decryptor = keypair.decryptor();
    let mut plaintext = Vec::new();
    for chunk in packed.chunks(13) {
        plaintext.extend(decryptor.update(chunk).unwrap());
    }
    plaintext.extend(decryptor.finalize().unwrap());

    assert_eq!(plaintext, message);
    assert_eq!(keypair.decrypt_bytes(&packed).unwrap(), message);
}

#[test]
fn invalid_parameters_are_rejected() {
    init_tracing();

    assert_eq!(
        KeyPairBuilder::new().security_bits(0).build().err(),
        Some(Error::InvalidKeySize { min: 1, actual: 0 })
    );
    assert!(matches!(Tag::new(0x1_0000, 16), Err(Error::InvalidTag { .. })));
    assert!(matches!(
        codec::encode("snowman ☃"),
        Err(Error::UnencodableCharacter { character: '☃', index: 8 })
    ));
}
