//! Type-preserving string codec
//!
//! Ciphertext is always textual, so a scalar is converted to a tagged string
//! (`"<tag>:<payload>"`) before encryption and recovered to its original type
//! after decryption. The payload may itself contain colons; only the first
//! colon separates the tag.

use crate::document::Value;
use crate::error::{FieldcryptError, FieldcryptResult};

/// The closed set of type tags carried through encryption
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    /// Verbatim text payload
    Str,
    /// Decimal signed 64-bit integer payload
    Int,
    /// Scientific-notation 64-bit float payload
    Float,
    /// `true` / `false` payload
    Bool,
    /// Empty payload
    Nil,
}

impl Tag {
    /// Wire name of this tag
    pub fn as_str(self) -> &'static str {
        match self {
            Tag::Str => "string",
            Tag::Int => "int",
            Tag::Float => "float",
            Tag::Bool => "bool",
            Tag::Nil => "nil",
        }
    }

    fn from_wire(tag: &str) -> Option<Self> {
        match tag {
            "string" => Some(Tag::Str),
            "int" => Some(Tag::Int),
            "float" => Some(Tag::Float),
            "bool" => Some(Tag::Bool),
            "nil" => Some(Tag::Nil),
            _ => None,
        }
    }
}

/// Encode a scalar value into its tagged textual form
///
/// Returns `None` for containers, which have no tagged form; callers skip
/// such values silently rather than erroring.
pub fn encode(value: &Value) -> Option<String> {
    let (tag, payload) = match value {
        Value::Null => (Tag::Nil, String::new()),
        Value::Bool(b) => (Tag::Bool, b.to_string()),
        Value::Int(i) => (Tag::Int, i.to_string()),
        Value::Float(f) => (Tag::Float, format!("{f:E}")),
        Value::String(s) => (Tag::Str, s.clone()),
        Value::Sequence(_) | Value::Mapping(_) => return None,
    };
    Some(format!("{}:{}", tag.as_str(), payload))
}

/// Decode a tagged textual form back into a scalar value
///
/// Integers always decode as 64-bit, regardless of the original width.
pub fn decode(tagged: &str) -> FieldcryptResult<Value> {
    let (tag, payload) = tagged
        .split_once(':')
        .ok_or_else(|| FieldcryptError::InvalidTaggedFormat(tagged.to_string()))?;
    let tag =
        Tag::from_wire(tag).ok_or_else(|| FieldcryptError::InvalidTaggedFormat(tagged.to_string()))?;

    match tag {
        Tag::Str => Ok(Value::String(payload.to_string())),
        Tag::Int => payload
            .parse()
            .map(Value::Int)
            .map_err(|_| FieldcryptError::NumericParse {
                payload: payload.to_string(),
                kind: "int",
            }),
        Tag::Float => payload
            .parse()
            .map(Value::Float)
            .map_err(|_| FieldcryptError::NumericParse {
                payload: payload.to_string(),
                kind: "float",
            }),
        Tag::Bool => match payload {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(FieldcryptError::InvalidTaggedFormat(tagged.to_string())),
        },
        Tag::Nil => Ok(Value::Null),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    #[test]
    fn test_round_trip_all_scalars() {
        let scalars = vec![
            Value::Null,
            Value::Bool(true),
            Value::Bool(false),
            Value::Int(0),
            Value::Int(-42),
            Value::Int(i64::MAX),
            Value::Float(18.0),
            Value::Float(-2.5e-3),
            Value::Float(f64::MAX),
            Value::Float(1e-308),
            Value::Float(-0.0),
            Value::String("Alice".into()),
            Value::String(String::new()),
        ];
        for value in scalars {
            let tagged = encode(&value).unwrap();
            assert_eq!(decode(&tagged).unwrap(), value, "tagged form: {tagged}");
        }
    }

    #[test]
    fn test_wire_forms() {
        assert_eq!(encode(&Value::Null).unwrap(), "nil:");
        assert_eq!(encode(&Value::Bool(true)).unwrap(), "bool:true");
        assert_eq!(encode(&Value::Int(-7)).unwrap(), "int:-7");
        assert_eq!(encode(&Value::String("a:b".into())).unwrap(), "string:a:b");
        assert_eq!(encode(&Value::Float(18.0)).unwrap(), "float:1.8E1");
    }

    #[test]
    fn test_payload_may_contain_colons() {
        assert_eq!(
            decode("string:urn:x:y").unwrap(),
            Value::String("urn:x:y".into())
        );
    }

    #[test]
    fn test_containers_are_not_encodable() {
        assert_eq!(encode(&Value::Sequence(vec![])), None);
        assert_eq!(encode(&Value::Mapping(IndexMap::new())), None);
    }

    #[test]
    fn test_decode_missing_colon() {
        let err = decode("string").unwrap_err();
        assert!(matches!(err, FieldcryptError::InvalidTaggedFormat(_)));
    }

    #[test]
    fn test_decode_unknown_tag() {
        let err = decode("complex:1+2i").unwrap_err();
        assert!(matches!(err, FieldcryptError::InvalidTaggedFormat(_)));
    }

    #[test]
    fn test_decode_bad_int_payload() {
        let err = decode("int:abc").unwrap_err();
        assert!(matches!(
            err,
            FieldcryptError::NumericParse { kind: "int", .. }
        ));
    }

    #[test]
    fn test_decode_bad_bool_payload() {
        assert!(decode("bool:yes").is_err());
    }
}
