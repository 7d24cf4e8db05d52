//! fieldcrypt - selective field encryption for structured documents
//!
//! This library encrypts or decrypts scalar fields inside a semi-structured
//! document (JSON, YAML, TOML, or plain text) while preserving each field's
//! original data type across the round trip. Only fields whose structural
//! address matches a caller-supplied regular expression are touched.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `document`: generic value tree, structural paths, and leaf traversal
//! - `codec`: type-preserving tagged string encoding
//! - `crypto`: pluggable encryption backends (password, AWS KMS)
//! - `transform`: traversal/match/transform orchestration with dry-run
//! - `format`: JSON/YAML/TOML/text document codecs
//! - `error`: custom error types
//!
//! # Example
//!
//! ```rust
//! use fieldcrypt::crypto::PasswordCryptor;
//! use fieldcrypt::{decode_document, encode_document, transform, Format, Mode};
//!
//! # fn main() -> fieldcrypt::FieldcryptResult<()> {
//! let mut doc = decode_document(Format::Json, r#"{"name":"Alice","age":18}"#)?;
//! let pattern = regex::Regex::new("name").map_err(fieldcrypt::FieldcryptError::from)?;
//! let cryptor = PasswordCryptor::new(b"aaaa");
//!
//! transform(&mut doc, &pattern, &cryptor, Mode::Encrypt)?;
//! let encrypted = encode_document(Format::Json, &doc)?;
//! assert!(!encrypted.contains("Alice"));
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod crypto;
pub mod document;
pub mod error;
pub mod format;
pub mod transform;

pub use crypto::{create_cryptor, Cryptor, CryptorOptions};
pub use document::{Path, PathSegment, Value};
pub use error::{FieldcryptError, FieldcryptResult};
pub use format::{decode_document, encode_document, Format};
pub use transform::{transform, Mode, DRY_RUN_MARKER};
