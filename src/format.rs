//! Document format codecs
//!
//! Decodes raw input into the generic [`Value`] tree and encodes a tree back
//! to text. The `text` format wraps the entire input in a single string leaf,
//! which lets plain files ride through the same pipeline.

use clap::ValueEnum;

use crate::document::Value;
use crate::error::{FieldcryptError, FieldcryptResult};

/// The supported container formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// The whole input as one string value
    Text,
    /// JSON
    Json,
    /// YAML
    Yaml,
    /// TOML
    Toml,
}

/// Decode raw input into a document
pub fn decode_document(format: Format, input: &str) -> FieldcryptResult<Value> {
    if input.is_empty() {
        return Err(FieldcryptError::EmptyInput);
    }
    match format {
        Format::Text => Ok(Value::String(input.to_string())),
        Format::Json => {
            serde_json::from_str(input).map_err(|e| FieldcryptError::Format(e.to_string()))
        }
        Format::Yaml => {
            serde_yaml::from_str(input).map_err(|e| FieldcryptError::Format(e.to_string()))
        }
        Format::Toml => toml::from_str(input).map_err(|e| FieldcryptError::Format(e.to_string())),
    }
}

/// Encode a document back to text
pub fn encode_document(format: Format, document: &Value) -> FieldcryptResult<String> {
    match format {
        Format::Text => match document {
            Value::String(s) => Ok(s.clone()),
            other => Err(FieldcryptError::Format(format!(
                "text output requires a string document, found {}",
                other.type_name()
            ))),
        },
        Format::Json => serde_json::to_string(document)
            .map(with_newline)
            .map_err(|e| FieldcryptError::Format(e.to_string())),
        Format::Yaml => {
            serde_yaml::to_string(document).map_err(|e| FieldcryptError::Format(e.to_string()))
        }
        Format::Toml => {
            toml::to_string(document).map_err(|e| FieldcryptError::Format(e.to_string()))
        }
    }
}

fn with_newline(mut s: String) -> String {
    s.push('\n');
    s
}
