//! Structural addressing of values within a document
//!
//! A [`Path`] is an ordered sequence of segments, each either a mapping key or
//! a sequence index. Its canonical string form joins segments with `/`; a
//! literal `/` or `\` inside a key is escaped as `\/` or `\\` so every path
//! string parses back to the same path.

use std::fmt::{self, Write as _};

use crate::error::{FieldcryptError, FieldcryptResult};

/// A single step in a path: a mapping key or a sequence index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Descend into a mapping by key
    Key(String),
    /// Descend into a sequence by index
    Index(usize),
}

impl PathSegment {
    /// The node kind this segment expects to descend into
    pub(crate) fn expects(&self) -> &'static str {
        match self {
            PathSegment::Key(_) => "mapping",
            PathSegment::Index(_) => "sequence",
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => {
                for c in key.chars() {
                    if c == '/' || c == '\\' {
                        f.write_char('\\')?;
                    }
                    f.write_char(c)?;
                }
                Ok(())
            }
            PathSegment::Index(index) => write!(f, "{index}"),
        }
    }
}

/// The structural address of a value within a document
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    /// The empty path, addressing the document root
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a `/`-delimited field expression into a path
    ///
    /// Segments made up entirely of ASCII digits address sequence indexes;
    /// everything else addresses mapping keys. `\/` and `\\` escape a literal
    /// separator or backslash inside a key.
    pub fn parse(text: &str) -> FieldcryptResult<Self> {
        let invalid = |reason: &str| FieldcryptError::InvalidPath {
            text: text.to_string(),
            reason: reason.to_string(),
        };

        if text.is_empty() {
            return Err(invalid("path is empty"));
        }

        let mut segments = Vec::new();
        let mut current = String::new();
        let mut escaped = false;
        let mut chars = text.chars();

        loop {
            match chars.next() {
                Some('\\') => match chars.next() {
                    Some(c @ ('/' | '\\')) => {
                        current.push(c);
                        escaped = true;
                    }
                    Some(c) => return Err(invalid(&format!("unknown escape \\{c}"))),
                    None => return Err(invalid("trailing backslash")),
                },
                Some('/') => {
                    segments.push(Self::finish_segment(text, &current, escaped)?);
                    current.clear();
                    escaped = false;
                }
                Some(c) => current.push(c),
                None => {
                    segments.push(Self::finish_segment(text, &current, escaped)?);
                    break;
                }
            }
        }

        Ok(Self { segments })
    }

    fn finish_segment(text: &str, segment: &str, escaped: bool) -> FieldcryptResult<PathSegment> {
        if segment.is_empty() {
            return Err(FieldcryptError::InvalidPath {
                text: text.to_string(),
                reason: "empty segment".to_string(),
            });
        }
        if !escaped && segment.bytes().all(|b| b.is_ascii_digit()) {
            let index = segment.parse().map_err(|_| FieldcryptError::InvalidPath {
                text: text.to_string(),
                reason: format!("index {segment} is out of range"),
            })?;
            return Ok(PathSegment::Index(index));
        }
        Ok(PathSegment::Key(segment.to_string()))
    }

    /// The segments of this path, in order
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Whether this path addresses the document root
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub(crate) fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    pub(crate) fn pop(&mut self) {
        self.segments.pop();
    }

    /// String form of the first `n` segments, for error reporting
    pub(crate) fn prefix(&self, n: usize) -> String {
        let head = Path {
            segments: self.segments[..n].to_vec(),
        };
        head.to_string()
    }
}

impl From<Vec<PathSegment>> for Path {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_char('/')?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}
