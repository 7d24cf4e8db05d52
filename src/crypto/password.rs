//! Password-derived AES-256-CTR encryption
//!
//! The key is the SHA-256 digest of an arbitrary-length password. Each
//! encryption draws a fresh 16-byte IV from the OS CSPRNG, runs AES-256 in
//! CTR mode over the plaintext, and emits `base64(iv || ciphertext)`. The
//! scheme is a pure function of (key, iv, data), so encrypt and decrypt are
//! mutual inverses for a fixed key. A repeated (key, iv) pair would reuse the
//! keystream and break confidentiality; the CSPRNG makes that negligible.

use aes::cipher::{Iv, Key, KeyIvInit, StreamCipher};
use aes::Aes256;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::Cryptor;
use crate::error::{FieldcryptError, FieldcryptResult};

type Aes256Ctr = ctr::Ctr128BE<Aes256>;

/// Size of the initialization vector in bytes (one AES block)
const IV_SIZE: usize = 16;

/// Cryptor keyed by the SHA-256 digest of a password
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PasswordCryptor {
    key: [u8; 32],
}

impl PasswordCryptor {
    /// Derive the key from a password, which may be empty
    pub fn new(password: &[u8]) -> Self {
        Self {
            key: Sha256::digest(password).into(),
        }
    }

    fn apply_keystream(&self, iv: &[u8], buf: &mut [u8]) {
        let mut cipher = Aes256Ctr::new(
            Key::<Aes256Ctr>::from_slice(&self.key),
            Iv::<Aes256Ctr>::from_slice(iv),
        );
        cipher.apply_keystream(buf);
    }
}

impl Cryptor for PasswordCryptor {
    fn encrypt(&self, plaintext: &str) -> FieldcryptResult<String> {
        let mut iv = [0u8; IV_SIZE];
        OsRng.fill_bytes(&mut iv);

        let mut envelope = Vec::with_capacity(IV_SIZE + plaintext.len());
        envelope.extend_from_slice(&iv);
        envelope.extend_from_slice(plaintext.as_bytes());
        self.apply_keystream(&iv, &mut envelope[IV_SIZE..]);

        Ok(STANDARD.encode(envelope))
    }

    fn decrypt(&self, ciphertext: &str) -> FieldcryptResult<String> {
        let envelope = STANDARD
            .decode(ciphertext)
            .map_err(|e| FieldcryptError::MalformedEncoding(e.to_string()))?;
        if envelope.len() < IV_SIZE {
            return Err(FieldcryptError::CiphertextTooShort {
                len: envelope.len(),
            });
        }

        let (iv, body) = envelope.split_at(IV_SIZE);
        let mut plaintext = body.to_vec();
        self.apply_keystream(iv, &mut plaintext);

        String::from_utf8(plaintext).map_err(|_| {
            FieldcryptError::Cipher("plaintext is not valid UTF-8 (wrong password?)".to_string())
        })
    }
}
