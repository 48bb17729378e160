//! Arena for RAM nodes and dispatch over both backings.
//!
//! RAM nodes live in a `Vec` and refer to each other through [`RamId`]
//! indices, so shared links never form ownership cycles. YAML nodes are not
//! stored at all: their handles carry everything needed to re-scan the text.
//! [`NodeStore`] routes each [`Node`] operation on a [`NodeRef`] to the right
//! backing.

use super::error::{NodeResult, ValueKind};
use super::node::{Node, NodeRef, RamId, Scalar, ScalarRef};
use super::ram_node::RamNode;

#[derive(Debug, Clone, Default)]
pub struct NodeStore<'src> {
    nodes: Vec<RamNode<'src>>,
}

impl<'src> NodeStore<'src> {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Adds a node and returns its handle.
    pub fn insert(&mut self, node: RamNode<'src>) -> NodeRef<'src> {
        self.nodes.push(node);
        NodeRef::Ram(RamId(self.nodes.len() - 1))
    }

    /// Moves every node of `other` into this store.
    ///
    /// Returns the index offset to apply to handles that pointed into `other`.
    pub(crate) fn absorb(&mut self, other: NodeStore<'src>) -> usize {
        let offset = self.nodes.len();
        self.nodes.extend(other.nodes.into_iter().map(|mut node| {
            node.rebase(offset);
            node
        }));
        offset
    }

    /// Drops nodes allocated after the store had `len` entries.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.nodes.truncate(len);
    }

    // Handles are only minted by this store, so a RAM index is always in range.
    fn node(&self, id: RamId) -> &RamNode<'src> {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: RamId) -> &mut RamNode<'src> {
        &mut self.nodes[id.0]
    }

    pub fn key<'s>(&'s self, node: NodeRef<'src>) -> &'s str {
        match node {
            NodeRef::Ram(id) => self.node(id).key(),
            NodeRef::Yaml(yaml) => yaml.key_str(),
        }
    }

    pub fn value<'s>(&'s self, node: NodeRef<'src>) -> Option<ScalarRef<'s>> {
        match node {
            NodeRef::Ram(id) => self.node(id).value(),
            NodeRef::Yaml(yaml) => yaml.scalar(),
        }
    }

    pub fn value_kind(&self, node: NodeRef<'src>) -> ValueKind {
        match node {
            NodeRef::Ram(id) => self.node(id).value_kind(),
            NodeRef::Yaml(yaml) => yaml.value_kind(),
        }
    }

    pub fn set_value(&mut self, node: NodeRef<'src>, value: Scalar) -> NodeResult<()> {
        match node {
            NodeRef::Ram(id) => self.node_mut(id).set_value(value),
            NodeRef::Yaml(mut yaml) => yaml.set_value(value),
        }
    }

    pub fn next(&self, node: NodeRef<'src>) -> Option<NodeRef<'src>> {
        match node {
            NodeRef::Ram(id) => self.node(id).next(),
            NodeRef::Yaml(yaml) => yaml.next(),
        }
    }

    pub fn child(&self, node: NodeRef<'src>) -> Option<NodeRef<'src>> {
        match node {
            NodeRef::Ram(id) => self.node(id).child(),
            NodeRef::Yaml(yaml) => yaml.child(),
        }
    }

    pub fn set_next(&mut self, node: NodeRef<'src>, next: NodeRef<'src>) -> NodeResult<()> {
        match node {
            NodeRef::Ram(id) => self.node_mut(id).set_next(next),
            NodeRef::Yaml(mut yaml) => yaml.set_next(next),
        }
    }

    pub fn set_child(&mut self, node: NodeRef<'src>, child: NodeRef<'src>) -> NodeResult<()> {
        match node {
            NodeRef::Ram(id) => self.node_mut(id).set_child(child),
            NodeRef::Yaml(mut yaml) => yaml.set_child(child),
        }
    }

    /// The last node of `first`'s sibling chain.
    pub fn last_sibling(&self, first: NodeRef<'src>) -> NodeRef<'src> {
        let mut last = first;
        while let Some(next) = self.next(last) {
            last = next;
        }
        last
    }

    /// Makes `node` the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeRef<'src>, node: NodeRef<'src>) -> NodeResult<()> {
        match self.child(parent) {
            None => self.set_child(parent, node),
            Some(first) => {
                let last = self.last_sibling(first);
                self.set_next(last, node)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::error::{Backing, NodeError};
    use crate::document::yaml_node::YamlNode;

    #[test]
    fn test_insert_and_dispatch() {
        let mut store = NodeStore::new();
        assert!(store.is_empty());

        let root = store.insert(RamNode::new("Root"));
        let uart = store.insert(RamNode::new("Uart"));
        store.append_child(root, uart).unwrap();
        store.set_value(uart, Scalar::Int(9600)).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.key(root), "Root");
        assert_eq!(store.child(root), Some(uart));
        assert_eq!(store.value(uart), Some(ScalarRef::Int(9600)));
        assert_eq!(store.value_kind(root), ValueKind::Pair);
    }

    #[test]
    fn test_append_child_builds_sibling_chain() {
        let mut store = NodeStore::new();
        let root = store.insert(RamNode::new("Root"));
        let a = store.insert(RamNode::new("a"));
        let b = store.insert(RamNode::new("b"));
        let c = store.insert(RamNode::new("c"));
        for node in [a, b, c] {
            store.append_child(root, node).unwrap();
        }

        assert_eq!(store.child(root), Some(a));
        assert_eq!(store.next(a), Some(b));
        assert_eq!(store.next(b), Some(c));
        assert_eq!(store.last_sibling(a), c);
    }

    #[test]
    fn test_yaml_nodes_dispatch_without_storage() {
        let text = "a: 1\nb: two\n";
        let store = NodeStore::new();
        let a = NodeRef::from(YamlNode::parse(text).unwrap());
        let b = store.next(a).unwrap();

        assert_eq!(store.key(a), "a");
        assert_eq!(store.value(a), Some(ScalarRef::Int(1)));
        assert_eq!(store.value(b), Some(ScalarRef::Str("two")));
        assert!(store.child(a).is_none());
    }

    #[test]
    fn test_append_under_yaml_parent_fails() {
        let text = "a: 1\n";
        let mut store = NodeStore::new();
        let a = NodeRef::from(YamlNode::parse(text).unwrap());
        let fresh = store.insert(RamNode::new("fresh"));

        assert_eq!(
            store.append_child(a, fresh),
            Err(NodeError::Unsupported {
                operation: "set_child",
                backing: Backing::Yaml,
            })
        );
    }

    #[test]
    fn test_absorb_rebases_links() {
        let mut first = NodeStore::new();
        first.insert(RamNode::new("Root"));

        let mut second = NodeStore::new();
        let sub = second.insert(RamNode::new("Sub"));
        let leaf = second.insert(RamNode::new("Leaf"));
        second.append_child(sub, leaf).unwrap();

        let offset = first.absorb(second);
        assert_eq!(offset, 1);

        let sub = sub.rebase(offset);
        assert_eq!(first.key(sub), "Sub");
        assert_eq!(first.key(first.child(sub).unwrap()), "Leaf");
    }
}
