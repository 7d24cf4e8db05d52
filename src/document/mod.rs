//! Generic document model with structural addressing
//!
//! Provides the [`Value`] tree shared by every supported document format,
//! the [`Path`] addressing scheme, and the leaf traversal primitives the
//! orchestrator is built on.

pub mod path;
pub mod value;

pub use path::{Path, PathSegment};
pub use value::Value;
