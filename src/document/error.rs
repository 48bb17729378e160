//! Error types for node access and mutation.
//!
//! Every node operation reports failure through [`NodeError`]; nothing in the
//! document layer panics on bad input. Lines that cannot be read as a key are
//! reported as [`NodeError::MalformedLine`] by the scanner, but the lazy parser
//! skips them instead of failing the document.

use std::fmt;
use thiserror::Error;

/// Result alias used throughout the document layer.
pub type NodeResult<T> = Result<T, NodeError>;

/// Which storage a node lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backing {
    /// Heap-resident, mutable node built in code.
    Ram,
    /// Read-only view into a YAML text buffer.
    Yaml,
}

impl fmt::Display for Backing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backing::Ram => write!(f, "ram"),
            Backing::Yaml => write!(f, "yaml"),
        }
    }
}

/// The scalar types a node can be read or written as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Int,
    Float,
    String,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarKind::Int => write!(f, "int"),
            ScalarKind::Float => write!(f, "float"),
            ScalarKind::String => write!(f, "string"),
        }
    }
}

/// What a node currently holds, as reported in type mismatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// No scalar and no links.
    Empty,
    /// A scalar of the given kind.
    Scalar(ScalarKind),
    /// An interior node carrying child/next links instead of a scalar.
    Pair,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Empty => write!(f, "no value"),
            ValueKind::Scalar(kind) => write!(f, "{}", kind),
            ValueKind::Pair => write!(f, "an interior node"),
        }
    }
}

/// Errors raised by node operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NodeError {
    /// The backing does not implement the requested operation.
    #[error("{operation} is not supported on {backing} nodes")]
    Unsupported {
        operation: &'static str,
        backing: Backing,
    },

    /// `get` asked for a type the node does not hold.
    #[error("node '{key}' holds {found}, not {expected}")]
    TypeMismatch {
        key: String,
        expected: ScalarKind,
        found: ValueKind,
    },

    /// Direct lookup found no child with this key.
    #[error("no node named '{key}'")]
    NotFound { key: String },

    /// The line at this byte offset carries no usable key.
    #[error("line at byte {offset} has no key")]
    MalformedLine { offset: usize },
}

impl NodeError {
    pub(crate) fn unsupported(operation: &'static str, backing: Backing) -> Self {
        NodeError::Unsupported { operation, backing }
    }

    pub(crate) fn mismatch(key: &str, expected: ScalarKind, found: ValueKind) -> Self {
        NodeError::TypeMismatch {
            key: key.to_string(),
            expected,
            found,
        }
    }
}
