// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::util::{self, VERSION};
use super::{Cipher, Encrypt, EncryptBytes, Stream};
use crate::ciphertext::Ciphertext;
use crate::codec;
use crate::error::{Error, Result};
use crate::keypair::PublicKey;

use num_bigint_dig::BigUint;

impl Encrypt for PublicKey {
    fn encrypt(&self, plaintext: &BigUint) -> Result<Ciphertext> {
        let c = Cipher::new(self.tag).encrypt(plaintext, &self.n)?;
        Ok(Ciphertext::new(c))
    }
}

impl EncryptBytes for PublicKey {
    fn encrypt_bytes<P: AsRef<[u8]>>(&self, data: P) -> Result<Vec<u8>> {
        let mut encryptor = self.encryptor();
        encryptor.update(data)?;
        encryptor.finalize()
    }
}

/// Internal state of the streaming encryptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EncryptorState {
    /// Accepting plaintext input.
    Encrypting,
    /// Finalized; no further input is allowed.
    Finalized,
}

/// Streaming encryption context.
///
/// Buffers plaintext until a full block is available, encrypts it, and emits
/// the whole packed stream on [`finalize`](Stream::finalize).
#[derive(Debug)]
pub struct Encryptor<'a> {
    pub_key: &'a PublicKey,

    /// Buffer holding an incomplete plaintext block.
    buffer: Vec<u8>,

    /// Encrypted blocks as `(plaintext length, ciphertext bytes)`.
    encrypted_blocks: Vec<(u16, Vec<u8>)>,

    state: EncryptorState,

    /// Maximum number of plaintext bytes per block.
    max_block_size: usize,

    /// Tracks whether any non-empty input was provided.
    has_data: bool,
}

impl<'a> Encryptor<'a> {
    /// Create a new encryptor bound to the given public key.
    pub(crate) fn new(pub_key: &'a PublicKey) -> Self {
        Self {
            pub_key,
            buffer: Vec::new(),
            encrypted_blocks: Vec::new(),
            state: EncryptorState::Encrypting,
            max_block_size: pub_key.max_block_bytes(),
            has_data: false,
        }
    }

    /// Encrypt a complete plaintext block and store its serialized ciphertext.
    fn encrypt_block(&mut self, block: &[u8]) -> Result<()> {
        let plain_len = u16::try_from(block.len())
            .map_err(|_| Error::EncryptionFailed("Block exceeds u16 length".into()))?;

        let m = codec::encode_bytes(block);
        let ciphertext = self.pub_key.encrypt(&m)?;
        self.encrypted_blocks.push((plain_len, ciphertext.to_bytes()));
        Ok(())
    }

    /// Encrypt all complete blocks currently available in the buffer.
    fn process_buffer(&mut self) -> Result<()> {
        while self.buffer.len() >= self.max_block_size {
            let block: Vec<u8> = self.buffer.drain(..self.max_block_size).collect();
            self.encrypt_block(&block)?;
        }
        Ok(())
    }

    /// Serialize encrypted blocks into the packed wire format.
    ///
    /// Format:
    /// `[version:u8][block_count:u32]` then per block
    /// `[plain_len:u16][ct_len:u32][ciphertext]`
    fn serialize_blocks(&self) -> Vec<u8> {
        let mut packed = Vec::new();

        packed.push(VERSION);
        packed.extend_from_slice(&(self.encrypted_blocks.len() as u32).to_be_bytes());

        for (plain_len, block) in &self.encrypted_blocks {
            util::write_block(&mut packed, *plain_len, block);
        }

        packed
    }
}

impl<'a> PublicKey {
    /// Create a streaming encryptor for this key.
    pub fn encryptor(&'a self) -> Encryptor<'a> {
        Encryptor::new(self)
    }

    /// Encode `text` with the codec and encrypt it as a single block.
    pub fn encrypt_str(&self, text: &str) -> Result<Ciphertext> {
        self.encrypt(&codec::encode(text)?)
    }

    /// Plaintext bytes per block, so that every block stays below
    /// `2^max_plaintext_bits`. Never zero, see [`PublicKey::MIN_PLAINTEXT_BITS`].
    pub(crate) fn max_block_bytes(&self) -> usize {
        (self.max_plaintext_bits / 8).clamp(1, u16::MAX as usize)
    }
}

impl<'a> Stream for Encryptor<'a> {
    fn update<D: AsRef<[u8]>>(&mut self, data: D) -> Result<Vec<u8>> {
        if self.state == EncryptorState::Finalized {
            return Err(Error::EncryptionFailed("Cannot update after finalize".into()));
        }

        let data = data.as_ref();
        if !data.is_empty() {
            self.has_data = true;
        }

        self.buffer.extend_from_slice(data);
        self.process_buffer()?;

        // Output is emitted only during finalize to preserve the packed format.
        Ok(Vec::new())
    }

    fn finalize(mut self) -> Result<Vec<u8>> {
        if self.state == EncryptorState::Finalized {
            return Err(Error::EncryptionFailed("Already finalized".into()));
        }

        // Distinguish empty input from missing data by emitting a single empty block.
        if !self.has_data {
            self.encrypt_block(&[])?;
        } else if !self.buffer.is_empty() {
            let remaining: Vec<u8> = self.buffer.drain(..).collect();
            self.encrypt_block(&remaining)?;
        }

        self.state = EncryptorState::Finalized;
        Ok(self.serialize_blocks())
    }
}
