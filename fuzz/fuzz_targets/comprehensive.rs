#![no_main]

use libfuzzer_sys::fuzz_target;
use std::sync::OnceLock;

use rabin::{DecryptBytes, EncryptBytes, KeyPair, Stream};

static KEYPAIR: OnceLock<KeyPair> = OnceLock::new();

fuzz_target!(|data: &[u8]| {
    // 128-bit keys are insecure but keep fuzzing fast
    let keypair = KEYPAIR.get_or_init(|| KeyPair::generate(false, 128).unwrap());
    let public = keypair.public_key();

    // ----- 1. One-shot packed roundtrip -----
    let packed = public.encrypt_bytes(data).expect("Packed encryption failed");
    let plaintext = keypair.decrypt_bytes(&packed).expect("Packed decryption failed");
    assert_eq!(plaintext, data, "Packed roundtrip failed");

    // ----- 2. Streaming with various chunk sizes -----
    for &chunk_size in &[1usize, 3, 7, 16, 64] {
        let mut encryptor = public.encryptor();
        for chunk in data.chunks(chunk_size) {
            encryptor.update(chunk).unwrap();
        }
        let streamed = encryptor.finalize().unwrap();
        assert_eq!(streamed, packed, "Chunking changed the packed form");

        let mut decryptor = keypair.decryptor();
        let mut decrypted = Vec::new();
        for chunk in streamed.chunks(chunk_size) {
            decrypted.extend(decryptor.update(chunk).unwrap());
        }
        decrypted.extend(decryptor.finalize().unwrap());

        assert_eq!(decrypted, data, "Streaming roundtrip failed with chunk_size={}", chunk_size);
    }

    // ----- 3. Corruption must error, never panic -----
    let mut corrupted = packed.clone();
    corrupted[0] ^= 0xFF;
    assert!(keypair.decrypt_bytes(&corrupted).is_err());

    assert!(keypair.decrypt_bytes(&packed[..packed.len() - 1]).is_err());

    let mut extended = packed.clone();
    extended.extend_from_slice(&[0xFF; 32]);
    assert!(keypair.decrypt_bytes(&extended).is_err());

    // ----- 4. Raw fuzz input as a packed stream -----
    let _ = keypair.decrypt_bytes(data);
});
