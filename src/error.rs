//! Custom error types for fieldcrypt
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions. Every error aborts the current run; there
//! is no retry or partial-success reporting at this layer.

use thiserror::Error;

/// The main error type for fieldcrypt operations
#[derive(Error, Debug)]
pub enum FieldcryptError {
    /// A path segment addressed a mapping key that does not exist
    #[error("path not found: {path}")]
    NotFound { path: String },

    /// A path segment addressed a sequence index past the end
    #[error("index out of range at {path}: index {index}, length {len}")]
    IndexOutOfRange {
        path: String,
        index: usize,
        len: usize,
    },

    /// A path segment kind did not match the node kind it addressed
    #[error("type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A field expression could not be parsed into a path
    #[error("invalid path {text:?}: {reason}")]
    InvalidPath { text: String, reason: String },

    /// The field-selection pattern failed to compile
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    /// A tagged value had no tag separator or an unrecognized tag
    #[error("invalid tagged value: {0}")]
    InvalidTaggedFormat(String),

    /// A tagged numeric payload failed to parse
    #[error("numeric payload {payload:?} is not a valid {kind}")]
    NumericParse {
        payload: String,
        kind: &'static str,
    },

    /// Ciphertext was not valid base64
    #[error("malformed ciphertext encoding: {0}")]
    MalformedEncoding(String),

    /// Ciphertext was shorter than the initialization vector
    #[error("ciphertext too short: {len} bytes")]
    CiphertextTooShort { len: usize },

    /// The cipher produced unusable output (usually a wrong password)
    #[error("decryption failed: {0}")]
    Cipher(String),

    /// Opaque passthrough from the remote key-management service
    #[error("kms error: {0}")]
    Remote(String),

    /// The cryptor factory was given an unrecognized backend name
    #[error("unknown cryptor: {0:?}")]
    UnknownCryptor(String),

    /// A required cryptor parameter was not supplied
    #[error("{0} is required")]
    MissingParameter(&'static str),

    /// The input document was empty
    #[error("input is empty")]
    EmptyInput,

    /// Document decoding or encoding failed
    #[error("format error: {0}")]
    Format(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for FieldcryptError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<regex::Error> for FieldcryptError {
    fn from(err: regex::Error) -> Self {
        Self::InvalidPattern(err.to_string())
    }
}

/// Result type alias for fieldcrypt operations
pub type FieldcryptResult<T> = Result<T, FieldcryptError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FieldcryptError::NotFound {
            path: "user/name".into(),
        };
        assert_eq!(err.to_string(), "path not found: user/name");
    }

    #[test]
    fn test_index_out_of_range_display() {
        let err = FieldcryptError::IndexOutOfRange {
            path: "items/3".into(),
            index: 3,
            len: 2,
        };
        assert_eq!(
            err.to_string(),
            "index out of range at items/3: index 3, length 2"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: FieldcryptError = io_err.into();
        assert!(matches!(err, FieldcryptError::Io(_)));
    }

    #[test]
    fn test_from_regex_error() {
        let err: FieldcryptError = regex::Regex::new("(").unwrap_err().into();
        assert!(matches!(err, FieldcryptError::InvalidPattern(_)));
    }
}
