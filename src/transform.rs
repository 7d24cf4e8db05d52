//! Traversal, match, and transform orchestration
//!
//! Walks every leaf of a document, filters by the path pattern, and applies
//! the requested operation in place. The first error anywhere in the loop
//! aborts the run; mutations already written are retained (fail-fast with
//! partial effect, not atomic).

use regex::Regex;
use tracing::{debug, info};

use crate::codec;
use crate::crypto::Cryptor;
use crate::document::Value;
use crate::error::FieldcryptResult;

/// Marker written to every matched leaf in a dry run
pub const DRY_RUN_MARKER: &str = "THIS FIELD WILL BE CHANGED";

/// What to do with each matched leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Encode each leaf to its tagged form and encrypt it
    Encrypt,
    /// Decrypt each string leaf and decode it back to its original type
    Decrypt,
    /// Replace each matched leaf with [`DRY_RUN_MARKER`]; no cryptor calls
    DryRun,
}

/// Transform every leaf of `document` whose path string matches `pattern`
///
/// The pattern is tested as a substring match against the canonical path
/// string of each leaf, once per leaf.
///
/// - `Encrypt` silently skips values with no tagged form.
/// - `Decrypt` silently skips non-string leaves; ciphertexts are always
///   strings, so anything else was never encrypted.
pub fn transform(
    document: &mut Value,
    pattern: &Regex,
    cryptor: &dyn Cryptor,
    mode: Mode,
) -> FieldcryptResult<()> {
    let mut matched = 0usize;

    document.for_each_leaf_mut(|path, value| {
        if !pattern.is_match(&path.to_string()) {
            return Ok(());
        }
        matched += 1;

        match mode {
            Mode::DryRun => {
                debug!(path = %path, "would transform");
                *value = Value::String(DRY_RUN_MARKER.to_string());
            }
            Mode::Encrypt => {
                if let Some(tagged) = codec::encode(value) {
                    *value = Value::String(cryptor.encrypt(&tagged)?);
                }
            }
            Mode::Decrypt => {
                if let Value::String(ciphertext) = &*value {
                    let tagged = cryptor.decrypt(ciphertext)?;
                    *value = codec::decode(&tagged)?;
                }
            }
        }
        Ok(())
    })?;

    info!(?mode, matched, "transform complete");
    Ok(())
}
