// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::util::{self, BLOCK_HEADER_LEN, HEADER_LEN, VERSION};
use super::{Cipher, Decrypt, DecryptBytes, Stream};
use crate::ciphertext::Ciphertext;
use crate::codec;
use crate::error::{Error, Result};
use crate::keypair::PrivateKey;

use num_bigint_dig::BigUint;
use zeroize::{Zeroize, ZeroizeOnDrop};

impl Decrypt for PrivateKey {
    fn decrypt(&self, ciphertext: &Ciphertext) -> Result<BigUint> {
        Cipher::new(self.public_key.tag).decrypt(ciphertext.value(), &self.p, &self.q)
    }
}

impl DecryptBytes for PrivateKey {
    fn decrypt_bytes<P: AsRef<[u8]>>(&self, packed: P) -> Result<Vec<u8>> {
        let mut decryptor = self.decryptor();
        let mut output = Vec::new();

        output.extend(decryptor.update(packed)?);
        output.extend(decryptor.finalize()?);

        Ok(output)
    }
}

/// Internal state of the streaming decryptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecryptorState {
    /// Awaiting the stream header (version and block count).
    WaitingHeader,
    /// Reading encrypted blocks.
    ReadingBlocks,
    /// All blocks processed successfully.
    Complete,
}

/// Incremental (streaming) decryption context.
///
/// Emits plaintext as soon as each complete block has arrived. Buffered
/// ciphertext and plaintext are zeroized on drop.
#[allow(missing_debug_implementations)]
#[derive(Zeroize, ZeroizeOnDrop)]
#[cfg_attr(feature = "expose-secret", derive(Debug))]
pub struct Decryptor<'a> {
    #[zeroize(skip)]
    priv_key: &'a PrivateKey,
    buffer: Vec<u8>,
    #[zeroize(skip)]
    state: DecryptorState,
    blocks_remaining: usize,
    output: Vec<u8>,
}

impl<'a> Decryptor<'a> {
    /// Construct a new decryptor bound to the given private key.
    pub(crate) fn new(priv_key: &'a PrivateKey) -> Self {
        Self {
            priv_key,
            buffer: Vec::new(),
            state: DecryptorState::WaitingHeader,
            blocks_remaining: 0,
            output: Vec::new(),
        }
    }

    /// Parse and validate the stream header.
    fn process_header(&mut self) -> Result<()> {
        if self.buffer.len() < HEADER_LEN {
            return Ok(());
        }

        let version = self.buffer[0];
        if version != VERSION {
            return Err(Error::DecryptionFailed(format!("Unsupported version: {}", version)));
        }

        let mut count = [0u8; 4];
        count.copy_from_slice(&self.buffer[1..HEADER_LEN]);
        self.blocks_remaining = u32::from_be_bytes(count) as usize;

        self.buffer.drain(0..HEADER_LEN);
        self.state = DecryptorState::ReadingBlocks;

        Ok(())
    }

    /// Attempt to decrypt a single complete block from the buffer.
    fn process_one_block(&mut self) -> Result<bool> {
        let Some((plain_len, ct_len)) = util::read_block_header(&self.buffer) else {
            return Ok(false);
        };

        let end = BLOCK_HEADER_LEN + ct_len;
        if self.buffer.len() < end {
            return Ok(false);
        }

        let c = Ciphertext::from(&self.buffer[BLOCK_HEADER_LEN..end]);
        let m = self.priv_key.decrypt(&c)?;
        self.output.extend(codec::decode_bytes_exact(&m, plain_len)?);

        self.buffer.drain(0..end);
        self.blocks_remaining = self.blocks_remaining.saturating_sub(1);

        Ok(true)
    }

    /// Decrypt all fully available blocks in the buffer.
    fn process_blocks(&mut self) -> Result<()> {
        while self.blocks_remaining > 0 {
            if !self.process_one_block()? {
                break;
            }
        }

        if self.blocks_remaining == 0 {
            self.state = DecryptorState::Complete;
        }

        Ok(())
    }
}

impl<'a> Stream for Decryptor<'a> {
    fn update<D: AsRef<[u8]>>(&mut self, data: D) -> Result<Vec<u8>> {
        self.buffer.extend_from_slice(data.as_ref());

        if self.state == DecryptorState::WaitingHeader {
            self.process_header()?;
        }

        if self.state == DecryptorState::ReadingBlocks {
            self.process_blocks()?;
        }

        Ok(std::mem::take(&mut self.output))
    }

    fn finalize(self) -> Result<Vec<u8>> {
        match self.state {
            DecryptorState::WaitingHeader => {
                return Err(Error::DecryptionFailed("Stream ended with incomplete header".into()));
            }
            DecryptorState::ReadingBlocks => {
                return Err(Error::DecryptionFailed(format!(
                    "Stream ended prematurely: missing {} blocks",
                    self.blocks_remaining
                )));
            }
            DecryptorState::Complete => {}
        }

        if !self.buffer.is_empty() {
            return Err(Error::DecryptionFailed(format!(
                "Stream ended with {} trailing bytes",
                self.buffer.len()
            )));
        }

        Ok(Vec::new())
    }
}

impl<'a> PrivateKey {
    /// Create a streaming decryptor bound to this key.
    pub fn decryptor(&'a self) -> Decryptor<'a> {
        Decryptor::new(self)
    }

    /// Decrypt a single-block ciphertext and decode it as text.
    pub fn decrypt_str(&self, ciphertext: &Ciphertext) -> Result<String> {
        Ok(codec::decode(&self.decrypt(ciphertext)?))
    }
}
