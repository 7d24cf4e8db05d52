//! Encryption backends for fieldcrypt
//!
//! Every backend implements the two-method [`Cryptor`] contract: opaque text
//! in, base64-embeddable text out. Backends are selected at runtime through a
//! string-keyed factory so the CLI flag maps directly onto a construction.

pub mod kms;
pub mod password;

pub use kms::KmsCryptor;
pub use password::PasswordCryptor;

use crate::error::{FieldcryptError, FieldcryptResult};

/// Encrypts and decrypts opaque text
///
/// Ciphertext returned by `encrypt` must be safely embeddable as a textual
/// document value (standard base64 with padding).
pub trait Cryptor {
    /// Encrypt a plaintext and encode the result as base64 text
    fn encrypt(&self, plaintext: &str) -> FieldcryptResult<String>;

    /// Decode a base64 ciphertext and decrypt it back to the plaintext
    fn decrypt(&self, ciphertext: &str) -> FieldcryptResult<String>;
}

/// Parameters consumed by the cryptor factory
#[derive(Debug, Default)]
pub struct CryptorOptions {
    /// Password for the `password` backend (may be empty, but must be present)
    pub password: Option<String>,
    /// AWS region for the `aws-kms` backend
    pub aws_region: Option<String>,
    /// AWS KMS key id; required by the `aws-kms` backend for encryption only
    pub aws_key_id: Option<String>,
}

/// Construct a cryptor backend by name
///
/// Unknown names and missing required parameters are reported as errors, not
/// panics. Known names: `password`, `aws-kms`.
pub fn create_cryptor(kind: &str, options: &CryptorOptions) -> FieldcryptResult<Box<dyn Cryptor>> {
    match kind {
        "password" => {
            let password = options
                .password
                .as_deref()
                .ok_or(FieldcryptError::MissingParameter("password"))?;
            Ok(Box::new(PasswordCryptor::new(password.as_bytes())))
        }
        "aws-kms" => {
            let region = options
                .aws_region
                .clone()
                .ok_or(FieldcryptError::MissingParameter("aws-region"))?;
            Ok(Box::new(KmsCryptor::new(
                region,
                options.aws_key_id.clone(),
            )?))
        }
        other => Err(FieldcryptError::UnknownCryptor(other.to_string())),
    }
}
