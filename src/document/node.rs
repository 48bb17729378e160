//! The node interface shared by both backings.
//!
//! A configuration tree is a first-child/next-sibling forest. Every node in it
//! is reached through a [`NodeRef`], which is either an index into a
//! [`NodeStore`](super::store::NodeStore) (a [`RamNode`](super::ram_node::RamNode))
//! or a lazy view into YAML text (a [`YamlNode`]). Both implement [`Node`].
//!
//! # Example
//!
//! ```
//! use devtree::document::node::{Node, ScalarRef};
//! use devtree::document::yaml_node::YamlNode;
//!
//! let yaml = "Uart:\n  Baud: 115200\n";
//! let uart = YamlNode::parse(yaml).unwrap();
//! assert_eq!(uart.key(), "Uart");
//!
//! let baud = uart.child().unwrap();
//! assert!(baud.is_yaml());
//! ```

use super::error::{NodeError, NodeResult, ScalarKind, ValueKind};
use super::yaml_node::YamlNode;

/// Index of a [`RamNode`](super::ram_node::RamNode) inside its store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RamId(pub(crate) usize);

/// A handle to a node of either backing.
///
/// Handles are small and `Copy`. A `Yaml` handle borrows the text buffer, so
/// the buffer must outlive every handle derived from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeRef<'src> {
    Ram(RamId),
    Yaml(YamlNode<'src>),
}

impl<'src> NodeRef<'src> {
    pub fn is_ram(&self) -> bool {
        matches!(self, NodeRef::Ram(_))
    }

    pub fn is_yaml(&self) -> bool {
        matches!(self, NodeRef::Yaml(_))
    }

    /// Shifts a RAM index by `offset`; used when one store is merged into another.
    pub(crate) fn rebase(self, offset: usize) -> Self {
        match self {
            NodeRef::Ram(RamId(id)) => NodeRef::Ram(RamId(id + offset)),
            yaml => yaml,
        }
    }
}

impl<'src> From<YamlNode<'src>> for NodeRef<'src> {
    fn from(node: YamlNode<'src>) -> Self {
        NodeRef::Yaml(node)
    }
}

/// A borrowed scalar as read from a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarRef<'a> {
    Int(i32),
    Float(f32),
    Str(&'a str),
}

impl ScalarRef<'_> {
    pub fn kind(&self) -> ScalarKind {
        match self {
            ScalarRef::Int(_) => ScalarKind::Int,
            ScalarRef::Float(_) => ScalarKind::Float,
            ScalarRef::Str(_) => ScalarKind::String,
        }
    }
}

impl std::fmt::Display for ScalarRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScalarRef::Int(i) => write!(f, "{}", i),
            ScalarRef::Float(fl) => write!(f, "{}", fl),
            ScalarRef::Str(s) => write!(f, "{}", s),
        }
    }
}

/// An owned scalar, as written into a node.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Int(i32),
    Float(f32),
    String(String),
}

impl Scalar {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Scalar::Int(_) => ScalarKind::Int,
            Scalar::Float(_) => ScalarKind::Float,
            Scalar::String(_) => ScalarKind::String,
        }
    }

    pub fn as_scalar_ref(&self) -> ScalarRef<'_> {
        match self {
            Scalar::Int(i) => ScalarRef::Int(*i),
            Scalar::Float(f) => ScalarRef::Float(*f),
            Scalar::String(s) => ScalarRef::Str(s),
        }
    }
}

/// Rust types that `get`/`set` accept: `i32`, `f32` and `String`.
///
/// Conversion is exact. An `Int` never reads back as `f32` and a `Float`
/// never reads back as `String`.
pub trait ScalarType: Sized {
    const KIND: ScalarKind;

    fn from_scalar(scalar: ScalarRef<'_>) -> Option<Self>;

    fn into_scalar(self) -> Scalar;
}

impl ScalarType for i32 {
    const KIND: ScalarKind = ScalarKind::Int;

    fn from_scalar(scalar: ScalarRef<'_>) -> Option<Self> {
        match scalar {
            ScalarRef::Int(i) => Some(i),
            _ => None,
        }
    }

    fn into_scalar(self) -> Scalar {
        Scalar::Int(self)
    }
}

impl ScalarType for f32 {
    const KIND: ScalarKind = ScalarKind::Float;

    fn from_scalar(scalar: ScalarRef<'_>) -> Option<Self> {
        match scalar {
            ScalarRef::Float(f) => Some(f),
            _ => None,
        }
    }

    fn into_scalar(self) -> Scalar {
        Scalar::Float(self)
    }
}

impl ScalarType for String {
    const KIND: ScalarKind = ScalarKind::String;

    fn from_scalar(scalar: ScalarRef<'_>) -> Option<Self> {
        match scalar {
            ScalarRef::Str(s) => Some(s.to_string()),
            _ => None,
        }
    }

    fn into_scalar(self) -> Scalar {
        Scalar::String(self)
    }
}

/// Converts a node's scalar to `T`, reporting what the node holds on failure.
pub(crate) fn read_scalar<T: ScalarType>(
    key: &str,
    value: Option<ScalarRef<'_>>,
    held: ValueKind,
) -> NodeResult<T> {
    value
        .and_then(T::from_scalar)
        .ok_or_else(|| NodeError::mismatch(key, T::KIND, held))
}

/// The capability set every node backing implements.
///
/// Structural lookups (`next`, `child`) return `None` at the edge of the tree
/// and never fail. Mutations return [`NodeError::Unsupported`] when the
/// backing is read-only.
pub trait Node<'src> {
    fn key(&self) -> &str;

    /// The node's scalar, if it currently holds one.
    fn value(&self) -> Option<ScalarRef<'_>>;

    fn value_kind(&self) -> ValueKind;

    fn set_value(&mut self, value: Scalar) -> NodeResult<()>;

    fn next(&self) -> Option<NodeRef<'src>>;

    fn child(&self) -> Option<NodeRef<'src>>;

    fn set_next(&mut self, next: NodeRef<'src>) -> NodeResult<()>;

    fn set_child(&mut self, child: NodeRef<'src>) -> NodeResult<()>;

    fn get<T: ScalarType>(&self) -> NodeResult<T>
    where
        Self: Sized,
    {
        read_scalar(self.key(), self.value(), self.value_kind())
    }

    fn set<T: ScalarType>(&mut self, value: T) -> NodeResult<()>
    where
        Self: Sized,
    {
        self.set_value(value.into_scalar())
    }
}
