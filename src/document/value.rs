//! The generic document value tree
//!
//! [`Value`] is a closed sum type over the scalar and container kinds that the
//! supported document formats share. Mappings keep insertion order so a
//! decode/transform/encode round trip does not reshuffle the document.
//!
//! Serde support is hand-written rather than derived so that every format
//! codec (JSON, YAML, TOML) funnels through this one self-describing tree.

use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::document::path::{Path, PathSegment};
use crate::error::{FieldcryptError, FieldcryptResult};

/// A document value: a scalar leaf or a container
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent/null value
    Null,
    /// Boolean scalar
    Bool(bool),
    /// 64-bit signed integer scalar
    Int(i64),
    /// 64-bit float scalar
    Float(f64),
    /// Textual scalar
    String(String),
    /// Ordered sequence of values
    Sequence(Vec<Value>),
    /// Insertion-ordered mapping from string keys to values
    Mapping(IndexMap<String, Value>),
}

impl Value {
    /// A human-readable kind name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
        }
    }

    /// Whether this value is a scalar with no children
    pub fn is_leaf(&self) -> bool {
        !matches!(self, Value::Sequence(_) | Value::Mapping(_))
    }

    /// Descend the tree by path segments and borrow the addressed value
    pub fn get(&self, path: &Path) -> FieldcryptResult<&Value> {
        let mut current = self;
        for (i, segment) in path.segments().iter().enumerate() {
            current = match (segment, current) {
                (PathSegment::Key(key), Value::Mapping(map)) => {
                    map.get(key).ok_or_else(|| FieldcryptError::NotFound {
                        path: path.prefix(i + 1),
                    })?
                }
                (PathSegment::Index(index), Value::Sequence(seq)) => {
                    let len = seq.len();
                    seq.get(*index)
                        .ok_or_else(|| FieldcryptError::IndexOutOfRange {
                            path: path.prefix(i + 1),
                            index: *index,
                            len,
                        })?
                }
                (segment, node) => {
                    return Err(FieldcryptError::TypeMismatch {
                        path: path.prefix(i),
                        expected: segment.expects(),
                        found: node.type_name(),
                    })
                }
            };
        }
        Ok(current)
    }

    /// Like [`Value::get`], but borrows the addressed value mutably
    pub fn get_mut(&mut self, path: &Path) -> FieldcryptResult<&mut Value> {
        let mut current = self;
        for (i, segment) in path.segments().iter().enumerate() {
            current = match (segment, current) {
                (PathSegment::Key(key), Value::Mapping(map)) => {
                    map.get_mut(key).ok_or_else(|| FieldcryptError::NotFound {
                        path: path.prefix(i + 1),
                    })?
                }
                (PathSegment::Index(index), Value::Sequence(seq)) => {
                    let len = seq.len();
                    seq.get_mut(*index)
                        .ok_or_else(|| FieldcryptError::IndexOutOfRange {
                            path: path.prefix(i + 1),
                            index: *index,
                            len,
                        })?
                }
                (segment, node) => {
                    return Err(FieldcryptError::TypeMismatch {
                        path: path.prefix(i),
                        expected: segment.expects(),
                        found: node.type_name(),
                    })
                }
            };
        }
        Ok(current)
    }

    /// Replace the value at an existing address
    ///
    /// The address must already exist; `set` never creates keys or extends
    /// sequences, so the document's shape is stable across a run.
    pub fn set(&mut self, path: &Path, value: Value) -> FieldcryptResult<()> {
        *self.get_mut(path)? = value;
        Ok(())
    }

    /// Depth-first traversal over every leaf, in mapping-insertion and
    /// sequence-index order
    ///
    /// Containers are recursed into, never passed to the visitor. A visitor
    /// error stops the traversal immediately.
    pub fn for_each_leaf<F>(&self, mut visitor: F) -> FieldcryptResult<()>
    where
        F: FnMut(&Path, &Value) -> FieldcryptResult<()>,
    {
        fn walk<F>(node: &Value, path: &mut Path, visitor: &mut F) -> FieldcryptResult<()>
        where
            F: FnMut(&Path, &Value) -> FieldcryptResult<()>,
        {
            match node {
                Value::Sequence(seq) => {
                    for (index, child) in seq.iter().enumerate() {
                        path.push(PathSegment::Index(index));
                        let result = walk(child, path, visitor);
                        path.pop();
                        result?;
                    }
                }
                Value::Mapping(map) => {
                    for (key, child) in map {
                        path.push(PathSegment::Key(key.clone()));
                        let result = walk(child, path, visitor);
                        path.pop();
                        result?;
                    }
                }
                leaf => visitor(path, leaf)?,
            }
            Ok(())
        }

        let mut path = Path::root();
        walk(self, &mut path, &mut visitor)
    }

    /// Like [`Value::for_each_leaf`], but hands each leaf to the visitor
    /// mutably so it can be rewritten in place
    ///
    /// Rewrites only replace leaf payloads; the traversal's leaf set is
    /// stable even as writes occur mid-traversal. Mutations applied before a
    /// visitor error are retained.
    pub fn for_each_leaf_mut<F>(&mut self, mut visitor: F) -> FieldcryptResult<()>
    where
        F: FnMut(&Path, &mut Value) -> FieldcryptResult<()>,
    {
        fn walk<F>(node: &mut Value, path: &mut Path, visitor: &mut F) -> FieldcryptResult<()>
        where
            F: FnMut(&Path, &mut Value) -> FieldcryptResult<()>,
        {
            match node {
                Value::Sequence(seq) => {
                    for (index, child) in seq.iter_mut().enumerate() {
                        path.push(PathSegment::Index(index));
                        let result = walk(child, path, visitor);
                        path.pop();
                        result?;
                    }
                }
                Value::Mapping(map) => {
                    for (key, child) in map.iter_mut() {
                        path.push(PathSegment::Key(key.clone()));
                        let result = walk(child, path, visitor);
                        path.pop();
                        result?;
                    }
                }
                leaf => visitor(path, leaf)?,
            }
            Ok(())
        }

        let mut path = Path::root();
        walk(self, &mut path, &mut visitor)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Sequence(seq) => {
                let mut state = serializer.serialize_seq(Some(seq.len()))?;
                for child in seq {
                    state.serialize_element(child)?;
                }
                state.end()
            }
            Value::Mapping(map) => {
                let mut state = serializer.serialize_map(Some(map.len()))?;
                for (key, child) in map {
                    state.serialize_entry(key, child)?;
                }
                state.end()
            }
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a document value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        i64::try_from(v)
            .map(Value::Int)
            .map_err(|_| E::custom(format!("integer {v} does not fit in 64 signed bits")))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Value, A::Error> {
        let mut seq = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(child) = access.next_element()? {
            seq.push(child);
        }
        Ok(Value::Sequence(seq))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Value, A::Error> {
        let mut map = IndexMap::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, child)) = access.next_entry::<String, Value>()? {
            map.insert(key, child);
        }
        Ok(Value::Mapping(map))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Value {
        serde_json::from_str(r#"{"name":"Alice","age":18,"items":[{"id":1},{"id":2}]}"#).unwrap()
    }

    #[test]
    fn test_get_by_path() {
        let doc = sample();
        let path = Path::parse("items/1/id").unwrap();
        assert_eq!(doc.get(&path).unwrap(), &Value::Int(2));
    }

    #[test]
    fn test_get_not_found() {
        let doc = sample();
        let err = doc.get(&Path::parse("items/0/missing").unwrap()).unwrap_err();
        assert!(
            matches!(&err, FieldcryptError::NotFound { path } if path == "items/0/missing"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn test_get_index_out_of_range() {
        let doc = sample();
        let err = doc.get(&Path::parse("items/5").unwrap()).unwrap_err();
        assert!(matches!(
            err,
            FieldcryptError::IndexOutOfRange {
                index: 5,
                len: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_get_type_mismatch() {
        let doc = sample();
        let err = doc.get(&Path::parse("name/0").unwrap()).unwrap_err();
        assert!(matches!(
            err,
            FieldcryptError::TypeMismatch {
                expected: "sequence",
                found: "string",
                ..
            }
        ));
    }

    #[test]
    fn test_set_replaces_leaf() {
        let mut doc = sample();
        let path = Path::parse("age").unwrap();
        doc.set(&path, Value::String("hidden".into())).unwrap();
        assert_eq!(doc.get(&path).unwrap(), &Value::String("hidden".into()));
    }

    #[test]
    fn test_set_missing_address_fails() {
        let mut doc = sample();
        let err = doc
            .set(&Path::parse("nope").unwrap(), Value::Null)
            .unwrap_err();
        assert!(matches!(err, FieldcryptError::NotFound { .. }));
    }

    #[test]
    fn test_for_each_leaf_order_and_completeness() {
        let doc = sample();
        let mut seen = Vec::new();
        doc.for_each_leaf(|path, value| {
            seen.push((path.to_string(), value.clone()));
            Ok(())
        })
        .unwrap();
        assert_eq!(
            seen,
            vec![
                ("name".to_string(), Value::String("Alice".into())),
                ("age".to_string(), Value::Int(18)),
                ("items/0/id".to_string(), Value::Int(1)),
                ("items/1/id".to_string(), Value::Int(2)),
            ]
        );
    }

    #[test]
    fn test_for_each_leaf_mut_stops_on_error_keeping_prior_writes() {
        let mut doc = sample();
        let mut visited = 0;
        let result = doc.for_each_leaf_mut(|_, value| {
            visited += 1;
            if visited == 2 {
                return Err(FieldcryptError::EmptyInput);
            }
            *value = Value::Null;
            Ok(())
        });
        assert!(result.is_err());
        assert_eq!(visited, 2);
        assert_eq!(doc.get(&Path::parse("name").unwrap()).unwrap(), &Value::Null);
        assert_eq!(
            doc.get(&Path::parse("age").unwrap()).unwrap(),
            &Value::Int(18)
        );
    }

    #[test]
    fn test_keys_with_separators_traverse_and_address() {
        let doc: Value = serde_json::from_str(r#"{"a/b":{"c\\d":1}}"#).unwrap();

        let mut seen = Vec::new();
        doc.for_each_leaf(|path, _| {
            seen.push(path.to_string());
            Ok(())
        })
        .unwrap();
        assert_eq!(seen, vec![r"a\/b/c\\d".to_string()]);

        let path = Path::parse(&seen[0]).unwrap();
        assert_eq!(doc.get(&path).unwrap(), &Value::Int(1));
    }

    #[test]
    fn test_leaf_and_container_kinds() {
        assert!(Value::Null.is_leaf());
        assert!(Value::Int(1).is_leaf());
        assert!(!Value::Sequence(vec![]).is_leaf());
        assert!(!sample().is_leaf());
    }

    #[test]
    fn test_json_round_trip_preserves_key_order() {
        let doc: Value = serde_json::from_str(r#"{"b":1,"a":2,"c":[true,null]}"#).unwrap();
        assert_eq!(
            serde_json::to_string(&doc).unwrap(),
            r#"{"b":1,"a":2,"c":[true,null]}"#
        );
    }

    #[test]
    fn test_deserialize_rejects_huge_unsigned() {
        let result: Result<Value, _> = serde_json::from_str("18446744073709551615");
        assert!(result.is_err());
    }
}
