// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

mod util;

use crate::ciphertext::Ciphertext;
use crate::crypto::{Decrypt, DecryptBytes, Decryptor, Encrypt, EncryptBytes, Encryptor};
use crate::error::{Error, Result};
use crate::tag::Tag;
use crate::util::prime::{is_rabin_congruent, PrimeSearch};

use num_bigint_dig::BigUint;
use num_traits::Zero;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, info, warn};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Public parameters of the cryptosystem.
///
/// Holds the modulus `n = pq` together with the tag every plaintext is padded
/// with, and the largest plaintext bit length that is always safe to encrypt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    pub(crate) n: BigUint,
    pub(crate) tag: Tag,
    pub(crate) security_bits: usize,
    pub(crate) max_plaintext_bits: usize,
}

impl PublicKey {
    /// Packed messages are split into whole bytes, so every key must fit one.
    pub const MIN_PLAINTEXT_BITS: usize = 8;

    /// Construct a public key from its modulus and tag.
    ///
    /// Fails if `n` is zero or too small to carry the tag plus one plaintext
    /// byte.
    pub fn new(n: BigUint, tag: Tag, security_bits: usize) -> Result<Self> {
        if n.is_zero() {
            return Err(Error::InvalidPublicKey);
        }

        // m < 2^k  ⇒  m·2^W + h < 2^(k+W) ≤ 2^(bits(n)-1) ≤ n
        let max_plaintext_bits = n.bits().saturating_sub(1 + tag.width() as usize);
        if max_plaintext_bits < Self::MIN_PLAINTEXT_BITS {
            return Err(Error::InvalidPublicKey);
        }

        Ok(Self { n, tag, security_bits, max_plaintext_bits })
    }

    /// Return the public modulus `n`.
    pub fn n(&self) -> &BigUint {
        &self.n
    }

    /// Return the tag used for padding.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Return the requested security parameter.
    pub fn security_bits(&self) -> usize {
        self.security_bits
    }

    /// Every plaintext below `2^max_plaintext_bits` is guaranteed to fit.
    pub fn max_plaintext_bits(&self) -> usize {
        self.max_plaintext_bits
    }
}

/// Secret key material: the factorization `(p, q)` of the public modulus.
///
/// Both factors are zeroized on drop.
#[allow(missing_debug_implementations)]
#[derive(PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
#[cfg_attr(feature = "expose-secret", derive(Debug))]
pub struct PrivateKey {
    #[zeroize(skip)]
    pub(crate) public_key: PublicKey,
    pub(crate) p: BigUint,
    pub(crate) q: BigUint,
}

impl PrivateKey {
    /// Construct a private key from its components.
    ///
    /// The factors must be distinct, `≡ 3 (mod 4)`, and multiply to the
    /// public modulus.
    pub fn new(public_key: PublicKey, p: BigUint, q: BigUint) -> Result<Self> {
        if p.is_zero() || q.is_zero() || p == q {
            return Err(Error::InvalidPrivateKey);
        }
        if !is_rabin_congruent(&p) || !is_rabin_congruent(&q) {
            return Err(Error::InvalidPrivateKey);
        }
        if &p * &q != public_key.n {
            return Err(Error::InvalidPrivateKey);
        }

        Ok(Self { public_key, p, q })
    }

    /// Return a reference to the associated public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn p(&self) -> &BigUint {
        &self.p
    }

    pub fn q(&self) -> &BigUint {
        &self.q
    }
}

/// A complete key pair consisting of public and private components.
///
/// Secret material is zeroized when dropped.
#[allow(missing_debug_implementations)]
#[derive(PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
#[cfg_attr(feature = "expose-secret", derive(Debug))]
pub struct KeyPair {
    #[zeroize(skip)]
    public: PublicKey,
    secret: PrivateKey,
}

impl<'a> KeyPair {
    /// Generate a key pair with default parameters.
    pub fn generate(safe: bool, security_bits: usize) -> Result<Self> {
        KeyPairBuilder::new().safe_primes(safe).security_bits(security_bits).build()
    }

    /// Return the public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    /// Return the private key.
    pub fn private_key(&self) -> &PrivateKey {
        &self.secret
    }

    /// Create a streaming encryptor bound to this public key.
    pub fn encryptor(&'a self) -> Encryptor<'a> {
        self.public.encryptor()
    }

    /// Create a streaming decryptor bound to this private key.
    pub fn decryptor(&'a self) -> Decryptor<'a> {
        self.secret.decryptor()
    }
}

impl Encrypt for KeyPair {
    fn encrypt(&self, plaintext: &BigUint) -> Result<Ciphertext> {
        self.public.encrypt(plaintext)
    }
}

impl EncryptBytes for KeyPair {
    fn encrypt_bytes<P: AsRef<[u8]>>(&self, data: P) -> Result<Vec<u8>> {
        self.public.encrypt_bytes(data)
    }
}

impl Decrypt for KeyPair {
    fn decrypt(&self, ciphertext: &Ciphertext) -> Result<BigUint> {
        self.secret.decrypt(ciphertext)
    }
}

impl DecryptBytes for KeyPair {
    fn decrypt_bytes<P: AsRef<[u8]>>(&self, packed: P) -> Result<Vec<u8>> {
        self.secret.decrypt_bytes(packed)
    }
}

/// Generate a Rabin key pair from the caller's RNG.
///
/// Both primes are drawn from `[2^(x-1), 2^x - 1]` with `x = bits + W`, so
/// the modulus has room for the standard tag on top of `bits` plaintext bits.
pub fn generate_key<R: RngCore + ?Sized>(safe: bool, bits: usize, rng: &mut R) -> Result<KeyPair> {
    KeyPairBuilder::new().safe_primes(safe).security_bits(bits).build_with_rng(rng)
}

/// Builder for generating key pairs with configurable parameters.
#[derive(Debug, Clone)]
pub struct KeyPairBuilder {
    security_bits: usize,
    safe_primes: bool,
    tag: Tag,
    search: PrimeSearch,
}

impl KeyPairBuilder {
    /// Moduli below this size get a warning.
    pub const MIN_SECURE_MODULUS_BITS: usize = 2048;

    /// Smallest accepted security parameter.
    const MIN_BITS: usize = 1;

    /// Create a builder with default parameters (1024 security bits,
    /// plain Rabin primes, standard tag, unbounded search).
    pub fn new() -> Self {
        Self {
            security_bits: 1024,
            safe_primes: false,
            tag: Tag::standard(),
            search: PrimeSearch::new(),
        }
    }

    /// Set the number of plaintext bits each prime is sized for.
    pub fn security_bits(mut self, bits: usize) -> Self {
        self.security_bits = bits;
        self
    }

    /// Use safe primes (`2p' + 1` with `p'` prime) for both factors.
    pub fn safe_primes(mut self, safe: bool) -> Self {
        self.safe_primes = safe;
        self
    }

    /// Set the tag embedded in every plaintext.
    pub fn tag(mut self, tag: Tag) -> Self {
        self.tag = tag;
        self
    }

    /// Bound every prime search to at most `attempts` candidates.
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.search = self.search.max_attempts(attempts);
        self
    }

    /// Generate the key pair, searching for `p` and `q` in parallel.
    pub fn build(self) -> Result<KeyPair> {
        let (low, high) = self.prepare()?;

        let (p_result, q_result) = rayon::join(
            || {
                let mut rng = StdRng::from_entropy();
                self.search.rabin_prime(self.safe_primes, &low, &high, &mut rng)
            },
            || {
                let mut rng = StdRng::from_entropy();
                self.search.rabin_prime(self.safe_primes, &low, &high, &mut rng)
            },
        );

        let p = p_result?;
        let q = util::redraw_until_distinct(q_result?, &p, || {
            let mut rng = StdRng::from_entropy();
            self.search.rabin_prime(self.safe_primes, &low, &high, &mut rng)
        })?;

        self.assemble(p, q)
    }

    /// Generate the key pair sequentially from a caller-supplied RNG.
    pub fn build_with_rng<R: RngCore + ?Sized>(self, rng: &mut R) -> Result<KeyPair> {
        let (low, high) = self.prepare()?;

        let p = self.search.rabin_prime(self.safe_primes, &low, &high, rng)?;
        let first_q = self.search.rabin_prime(self.safe_primes, &low, &high, rng)?;
        let q = util::redraw_until_distinct(first_q, &p, || {
            self.search.rabin_prime(self.safe_primes, &low, &high, &mut *rng)
        })?;

        self.assemble(p, q)
    }

    fn prepare(&self) -> Result<(BigUint, BigUint)> {
        if self.security_bits < Self::MIN_BITS {
            return Err(Error::InvalidKeySize { min: Self::MIN_BITS, actual: self.security_bits });
        }

        let too_large =
            || Error::InvalidKeySize { min: Self::MIN_BITS, actual: self.security_bits };
        let prime_bits =
            self.security_bits.checked_add(self.tag.width() as usize).ok_or_else(too_large)?;
        let modulus_bits = prime_bits.checked_mul(2).ok_or_else(too_large)?;

        if modulus_bits < Self::MIN_SECURE_MODULUS_BITS {
            warn!(
                modulus_bits,
                minimum = Self::MIN_SECURE_MODULUS_BITS,
                "generating a cryptographically weak key"
            );
        }

        debug!(prime_bits, safe = self.safe_primes, "searching for rabin primes");
        Ok(util::prime_range(prime_bits))
    }

    fn assemble(&self, p: BigUint, q: BigUint) -> Result<KeyPair> {
        let n = &p * &q;

        let public = PublicKey::new(n, self.tag, self.security_bits)?;
        let secret = PrivateKey::new(public.clone(), p, q)?;

        info!(
            modulus_bits = public.n.bits(),
            max_plaintext_bits = public.max_plaintext_bits,
            safe = self.safe_primes,
            "generated rabin key pair"
        );

        Ok(KeyPair { public, secret })
    }
}

impl Default for KeyPairBuilder {
    fn default() -> Self {
        Self::new()
    }
}
