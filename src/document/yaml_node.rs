//! Lazy, zero-copy nodes over YAML-subset text.
//!
//! A [`YamlNode`] is nothing more than the text buffer and the byte offset of
//! one key line. Its key, value, first child and next sibling are derived by
//! re-scanning the buffer every time they are asked for; no parsed tree is ever
//! built. Nodes are `Copy` and compare equal when they point at the same line
//! of the same buffer.
//!
//! Structure comes from indentation alone:
//!
//! - the **child** is the first key line after this one that is indented
//!   further, provided no line at this indentation or shallower comes first;
//! - the **next sibling** is the first later key line at exactly this
//!   indentation, provided no shallower line comes first.
//!
//! Lines without a `:` and lines whose key is empty are skipped.
//!
//! # Example
//!
//! ```
//! use devtree::document::node::{Node, NodeRef};
//! use devtree::document::yaml_node::YamlNode;
//!
//! let yaml = "\
//! DeviceTree:
//!     MyFirstDevice:
//!         Baud: 115200
//!     SecondDevice:
//!         Compatible: Display
//! ";
//! let root = YamlNode::parse(yaml).unwrap();
//! let Some(NodeRef::Yaml(first)) = root.child() else { panic!() };
//! let Some(NodeRef::Yaml(second)) = first.next() else { panic!() };
//! assert_eq!(second.key(), "SecondDevice");
//! assert!(second.next().is_none());
//! ```

use std::fmt;
use std::ptr;

use super::error::{Backing, NodeError, NodeResult, ValueKind};
use super::node::{Node, NodeRef, Scalar, ScalarRef};
use super::scanner;

/// A read-only view of one key line in a YAML buffer.
#[derive(Clone, Copy)]
pub struct YamlNode<'src> {
    text: &'src str,
    offset: usize,
}

impl<'src> YamlNode<'src> {
    /// Returns the first node of the document, or `None` if it has no key lines.
    pub fn parse(text: &'src str) -> Option<Self> {
        Self::seek(text, 0)
    }

    /// Finds the first line at or after `offset` that yields a key.
    fn seek(text: &'src str, mut offset: usize) -> Option<Self> {
        loop {
            offset = scanner::skip_to_valid_line(text, offset)?;
            match scanner::extract_key(text, offset) {
                Ok(_) => return Some(Self { text, offset }),
                Err(err) => {
                    tracing::trace!(
                        line = scanner::line_number(text, offset),
                        error = %err,
                        "skipping malformed key line"
                    );
                    offset = scanner::advance_line(text, offset);
                }
            }
        }
    }

    pub fn line_number(&self) -> usize {
        scanner::line_number(self.text, self.offset)
    }

    pub fn indent(&self) -> usize {
        scanner::count_indent(self.text, self.offset).unwrap_or(0)
    }

    /// The key, borrowed for the buffer's lifetime.
    pub fn key_str(&self) -> &'src str {
        scanner::extract_key(self.text, self.offset).unwrap_or("")
    }

    /// The trimmed value text, if the line has one.
    pub fn raw_value(&self) -> Option<&'src str> {
        scanner::extract_value(self.text, self.offset)
    }

    /// The value coerced to int, float or string.
    pub fn scalar(&self) -> Option<ScalarRef<'src>> {
        self.raw_value().map(scanner::parse_scalar)
    }

    /// Walks the key lines that follow this one, stopping at the first line
    /// `accept` returns `Some` for.
    fn scan_following(
        &self,
        mut accept: impl FnMut(usize) -> Option<bool>,
    ) -> Option<YamlNode<'src>> {
        let mut offset = scanner::advance_line(self.text, self.offset);
        loop {
            let candidate = Self::seek(self.text, offset)?;
            match accept(candidate.indent()) {
                Some(true) => return Some(candidate),
                Some(false) => return None,
                None => offset = scanner::advance_line(self.text, candidate.offset),
            }
        }
    }

    /// First child as a YAML view.
    pub fn first_child(&self) -> Option<YamlNode<'src>> {
        let own = self.indent();
        self.scan_following(|indent| Some(indent > own))
    }

    /// Next sibling as a YAML view.
    pub fn next_sibling(&self) -> Option<YamlNode<'src>> {
        let own = self.indent();
        self.scan_following(|indent| match indent.cmp(&own) {
            std::cmp::Ordering::Equal => Some(true),
            std::cmp::Ordering::Less => Some(false),
            std::cmp::Ordering::Greater => None,
        })
    }
}

impl PartialEq for YamlNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.text, other.text) && self.offset == other.offset
    }
}

impl fmt::Debug for YamlNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YamlNode")
            .field("line", &self.line_number())
            .field("key", &self.key_str())
            .field("value", &self.raw_value())
            .finish()
    }
}

impl<'src> Node<'src> for YamlNode<'src> {
    fn key(&self) -> &str {
        self.key_str()
    }

    fn value(&self) -> Option<ScalarRef<'_>> {
        self.scalar()
    }

    fn value_kind(&self) -> ValueKind {
        match self.scalar() {
            Some(scalar) => ValueKind::Scalar(scalar.kind()),
            None => ValueKind::Empty,
        }
    }

    fn set_value(&mut self, _value: Scalar) -> NodeResult<()> {
        Err(NodeError::unsupported("set", Backing::Yaml))
    }

    fn next(&self) -> Option<NodeRef<'src>> {
        self.next_sibling().map(NodeRef::Yaml)
    }

    fn child(&self) -> Option<NodeRef<'src>> {
        self.first_child().map(NodeRef::Yaml)
    }

    fn set_next(&mut self, _next: NodeRef<'src>) -> NodeResult<()> {
        Err(NodeError::unsupported("set_next", Backing::Yaml))
    }

    fn set_child(&mut self, _child: NodeRef<'src>) -> NodeResult<()> {
        Err(NodeError::unsupported("set_child", Backing::Yaml))
    }
}
