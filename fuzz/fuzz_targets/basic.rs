#![no_main]

use libfuzzer_sys::fuzz_target;
use num_bigint_dig::BigUint;
use std::sync::OnceLock;

use rabin::{Decrypt, Encrypt, Error, KeyPair};

static KEYPAIR: OnceLock<KeyPair> = OnceLock::new();

fuzz_target!(|data: &[u8]| {
    let key_pair = KEYPAIR.get_or_init(|| KeyPair::generate(false, 128).unwrap());

    let m = BigUint::from_bytes_be(data);

    let ciphertext = match key_pair.encrypt(&m) {
        Ok(ct) => ct,
        Err(Error::PlaintextTooLarge) => {
            assert!(m.bits() > key_pair.public_key().max_plaintext_bits());
            return;
        }
        Err(e) => panic!("Unexpected encryption error {:?} for input {:?}", e, data),
    };

    let decrypted = match key_pair.decrypt(&ciphertext) {
        Ok(pt) => pt,
        Err(e) => panic!("Decryption failed for valid ciphertext: {:?}, input {:?}", e, data),
    };

    assert_eq!(m, decrypted, "Plaintext mismatch for input {:?}", data);
});
