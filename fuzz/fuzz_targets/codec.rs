#![no_main]

use libfuzzer_sys::fuzz_target;

use rabin::codec;
use rabin::Error;

fuzz_target!(|data: &[u8]| {
    // Byte codec: exact-length decoding restores everything
    let n = codec::encode_bytes(data);
    assert_eq!(codec::decode_bytes_exact(&n, data.len()).unwrap(), data);

    // Text codec on arbitrary UTF-8
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    match codec::encode(text) {
        Ok(n) => assert_eq!(codec::decode(&n), text),
        Err(Error::UnencodableCharacter { character, .. }) => {
            assert!(u32::from(character) > 0xFF);
        }
        Err(Error::AmbiguousEncoding) => {
            assert!(text.ends_with('\u{AA}'));
        }
        Err(e) => panic!("Unexpected codec error: {:?}", e),
    }
});
