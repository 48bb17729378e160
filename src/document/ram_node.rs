//! Mutable nodes built in code.
//!
//! A [`RamNode`] stores its key and a [`RamValue`]. A node is either a scalar
//! leaf or an interior node with child/next links, never both:
//!
//! - writing a scalar drops any child and next links;
//! - writing a link turns a scalar or empty node into an interior node,
//!   leaving the other link slot as it was.
//!
//! Reads are exact. An `Int` node can only be read as `i32`; unlike the YAML
//! backing, no text is coerced.

use super::error::{NodeResult, ValueKind};
use super::node::{Node, NodeRef, Scalar, ScalarRef};

/// What a [`RamNode`] currently holds.
#[derive(Debug, Clone, PartialEq)]
pub enum RamValue<'src> {
    Empty,
    Int(i32),
    Float(f32),
    String(String),
    Pair {
        child: Option<NodeRef<'src>>,
        next: Option<NodeRef<'src>>,
    },
}

impl From<Scalar> for RamValue<'_> {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Int(i) => RamValue::Int(i),
            Scalar::Float(f) => RamValue::Float(f),
            Scalar::String(s) => RamValue::String(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RamNode<'src> {
    key: String,
    value: RamValue<'src>,
}

impl<'src> RamNode<'src> {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: RamValue::Empty,
        }
    }

    pub fn ram_value(&self) -> &RamValue<'src> {
        &self.value
    }

    /// Remaps every RAM link by `offset` after the node moves to another store.
    pub(crate) fn rebase(&mut self, offset: usize) {
        if let RamValue::Pair { child, next } = &mut self.value {
            *child = child.map(|node| node.rebase(offset));
            *next = next.map(|node| node.rebase(offset));
        }
    }
}

impl<'src> Node<'src> for RamNode<'src> {
    fn key(&self) -> &str {
        &self.key
    }

    fn value(&self) -> Option<ScalarRef<'_>> {
        match &self.value {
            RamValue::Int(i) => Some(ScalarRef::Int(*i)),
            RamValue::Float(f) => Some(ScalarRef::Float(*f)),
            RamValue::String(s) => Some(ScalarRef::Str(s)),
            RamValue::Empty | RamValue::Pair { .. } => None,
        }
    }

    fn value_kind(&self) -> ValueKind {
        match self.value() {
            Some(scalar) => ValueKind::Scalar(scalar.kind()),
            None if matches!(self.value, RamValue::Pair { .. }) => ValueKind::Pair,
            None => ValueKind::Empty,
        }
    }

    fn set_value(&mut self, value: Scalar) -> NodeResult<()> {
        self.value = value.into();
        Ok(())
    }

    fn next(&self) -> Option<NodeRef<'src>> {
        match self.value {
            RamValue::Pair { next, .. } => next,
            _ => None,
        }
    }

    fn child(&self) -> Option<NodeRef<'src>> {
        match self.value {
            RamValue::Pair { child, .. } => child,
            _ => None,
        }
    }

    fn set_next(&mut self, node: NodeRef<'src>) -> NodeResult<()> {
        self.value = RamValue::Pair {
            child: self.child(),
            next: Some(node),
        };
        Ok(())
    }

    fn set_child(&mut self, node: NodeRef<'src>) -> NodeResult<()> {
        self.value = RamValue::Pair {
            child: Some(node),
            next: self.next(),
        };
        Ok(())
    }
}
