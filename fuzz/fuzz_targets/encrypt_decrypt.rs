#![no_main]

use libfuzzer_sys::fuzz_target;
use num_bigint_dig::BigUint;
use std::sync::OnceLock;

use rabin::{Cipher, Decrypt, Encrypt, Error, KeyPair};

static KEYPAIRS: OnceLock<(KeyPair, KeyPair)> = OnceLock::new();

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let (ours, theirs) = KEYPAIRS.get_or_init(|| {
        (KeyPair::generate(false, 256).unwrap(), KeyPair::generate(false, 256).unwrap())
    });

    // Clamp into the admissible plaintext range
    let max = Cipher::default().max_plaintext(ours.public_key().n()).unwrap();
    let m = BigUint::from_bytes_be(data) % (&max + 1u32);

    let ciphertext = ours.encrypt(&m).unwrap();
    assert_eq!(ours.decrypt(&ciphertext).unwrap(), m);

    // Foreign keys either reject the ciphertext or recover a different integer
    // whose padded square happens to carry the tag.
    match theirs.decrypt(&ciphertext) {
        Ok(_) | Err(Error::TagMismatch) => {}
        Err(e) => panic!("Unexpected error under foreign key: {:?}", e),
    }
});
