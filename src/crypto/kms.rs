//! AWS KMS encryption backend
//!
//! Delegates both operations to the managed key service through the AWS SDK.
//! Credentials are resolved via the standard chain (environment, profile,
//! IMDS). The key id is only needed to encrypt; KMS resolves the key for
//! decryption from metadata embedded in the ciphertext blob.
//!
//! Each matched leaf costs one blocking round-trip, sequentially. That is
//! acceptable for a one-shot batch transform; timeouts and retries live in
//! the SDK's transport, not here.

use aws_config::{BehaviorVersion, Region};
use aws_sdk_kms::primitives::Blob;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tokio::runtime::Runtime;

use crate::crypto::Cryptor;
use crate::error::{FieldcryptError, FieldcryptResult};

/// Cryptor backed by an AWS KMS key
pub struct KmsCryptor {
    client: aws_sdk_kms::Client,
    key_id: Option<String>,
    runtime: Runtime,
}

impl KmsCryptor {
    /// Build a client for the given region
    ///
    /// `key_id` may be omitted for decrypt-only runs.
    pub fn new(region: String, key_id: Option<String>) -> FieldcryptResult<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| FieldcryptError::Remote(e.to_string()))?;
        let config = runtime.block_on(
            aws_config::defaults(BehaviorVersion::latest())
                .region(Region::new(region))
                .load(),
        );
        Ok(Self {
            client: aws_sdk_kms::Client::new(&config),
            key_id,
            runtime,
        })
    }
}

impl Cryptor for KmsCryptor {
    fn encrypt(&self, plaintext: &str) -> FieldcryptResult<String> {
        let key_id = self
            .key_id
            .as_deref()
            .ok_or(FieldcryptError::MissingParameter("aws-key-id"))?;
        tracing::debug!(key_id, "kms encrypt round-trip");

        let output = self
            .runtime
            .block_on(
                self.client
                    .encrypt()
                    .key_id(key_id)
                    .plaintext(Blob::new(plaintext.as_bytes()))
                    .send(),
            )
            .map_err(|e| FieldcryptError::Remote(e.to_string()))?;
        let blob = output
            .ciphertext_blob()
            .ok_or_else(|| FieldcryptError::Remote("response carried no ciphertext".to_string()))?;

        Ok(STANDARD.encode(blob.as_ref()))
    }

    fn decrypt(&self, ciphertext: &str) -> FieldcryptResult<String> {
        let blob = STANDARD
            .decode(ciphertext)
            .map_err(|e| FieldcryptError::MalformedEncoding(e.to_string()))?;
        tracing::debug!("kms decrypt round-trip");

        let output = self
            .runtime
            .block_on(
                self.client
                    .decrypt()
                    .ciphertext_blob(Blob::new(blob))
                    .send(),
            )
            .map_err(|e| FieldcryptError::Remote(e.to_string()))?;
        let plaintext = output
            .plaintext()
            .ok_or_else(|| FieldcryptError::Remote("response carried no plaintext".to_string()))?;

        String::from_utf8(plaintext.as_ref().to_vec())
            .map_err(|e| FieldcryptError::Remote(e.to_string()))
    }
}
