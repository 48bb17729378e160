//! The configuration facade.
//!
//! A [`Config`] owns a [`NodeStore`] together with the handle of its root
//! node. The root may be an in-memory node or a lazy view into YAML text, and
//! everything else in the tree may mix both backings. Application code walks
//! the tree through two cursors:
//!
//! - [`NodeView`] for reading: keys, typed values, keyed lookup and traversal;
//! - [`NodeMut`] for writing: get-or-create by key, `set`, and grafting.
//!
//! New nodes created by keyed access are always RAM nodes. A YAML node cannot
//! take new links, so creating a key under a YAML-backed parent (or after a
//! YAML-backed last sibling) fails with [`NodeError::Unsupported`] and leaves
//! the tree unchanged.
//!
//! # Example
//!
//! ```
//! use devtree::document::tree::Config;
//!
//! let yaml = "\
//! DeviceTree:
//!     MyFirstDevice:
//!         Compatible: MAXUART
//!         Baud: 115200
//! ";
//!
//! let mut board = Config::new("Board");
//! board.entry("Revision")?;
//! board.add_child(Config::from_yaml(yaml))?;
//!
//! let baud = board.root().find_path("DeviceTree/MyFirstDevice/Baud")?;
//! assert_eq!(baud.get::<i32>()?, 115200);
//!
//! let mut lines = Vec::new();
//! board.depth_first_search(|node, depth| lines.push(format!("{}{}", " ".repeat(depth), node.key())));
//! assert_eq!(lines[0], "Board");
//! assert_eq!(lines[2], " DeviceTree");
//! # Ok::<(), devtree::document::error::NodeError>(())
//! ```

use std::fmt;

use super::error::{NodeError, NodeResult, ValueKind};
use super::node::{read_scalar, NodeRef, ScalarRef, ScalarType};
use super::ram_node::RamNode;
use super::store::NodeStore;
use super::yaml_node::YamlNode;

/// Key given to the root of a document that contains no key lines.
pub const ROOT_SENTINEL_KEY: &str = "Root";

/// A configuration tree and the storage for its in-memory nodes.
#[derive(Debug, Clone)]
pub struct Config<'src> {
    store: NodeStore<'src>,
    root: NodeRef<'src>,
}

impl<'src> Config<'src> {
    /// Creates a tree with a single empty in-memory root.
    pub fn new(root_key: impl Into<String>) -> Self {
        let mut store = NodeStore::new();
        let root = store.insert(RamNode::new(root_key));
        Self { store, root }
    }

    /// Wraps YAML text without parsing it up front.
    ///
    /// The root is the first key line of the text. If there is none, the root
    /// is an empty in-memory node named [`ROOT_SENTINEL_KEY`].
    ///
    /// # Example
    ///
    /// ```
    /// use devtree::document::tree::{Config, ROOT_SENTINEL_KEY};
    ///
    /// let config = Config::from_yaml("Uart: MAXUART\n");
    /// assert_eq!(config.key(), "Uart");
    ///
    /// let empty = Config::from_yaml("nothing to see here\n");
    /// assert_eq!(empty.key(), ROOT_SENTINEL_KEY);
    /// assert!(empty.root().child().is_none());
    /// ```
    pub fn from_yaml(text: &'src str) -> Self {
        match YamlNode::parse(text) {
            Some(root) => Self {
                store: NodeStore::new(),
                root: NodeRef::Yaml(root),
            },
            None => {
                tracing::debug!(
                    bytes = text.len(),
                    "no key lines in document, using sentinel root"
                );
                Self::new(ROOT_SENTINEL_KEY)
            }
        }
    }

    pub fn root_ref(&self) -> NodeRef<'src> {
        self.root
    }

    pub fn store(&self) -> &NodeStore<'src> {
        &self.store
    }

    pub fn root(&self) -> NodeView<'_, 'src> {
        NodeView {
            store: &self.store,
            node: self.root,
        }
    }

    pub fn root_mut(&mut self) -> NodeMut<'_, 'src> {
        NodeMut {
            store: &mut self.store,
            node: self.root,
        }
    }

    pub fn key(&self) -> &str {
        self.store.key(self.root)
    }

    pub fn get<T: ScalarType>(&self) -> NodeResult<T> {
        self.root().get()
    }

    pub fn set<T: ScalarType>(&mut self, value: T) -> NodeResult<()> {
        self.root_mut().set(value)
    }

    /// Gets or creates the root's child named `key`. See [`NodeMut::entry`].
    pub fn entry(&mut self, key: &str) -> NodeResult<NodeMut<'_, 'src>> {
        self.root_mut().entry(key)
    }

    /// Gets or creates every node along a `/`-separated path.
    pub fn entry_path(&mut self, path: &str) -> NodeResult<NodeMut<'_, 'src>> {
        self.root_mut().entry_path(path)
    }

    /// Grafts `subtree` as the last child of the root. See [`NodeMut::add_child`].
    pub fn add_child(&mut self, subtree: Config<'src>) -> NodeResult<()> {
        self.root_mut().add_child(subtree)
    }

    /// Follows a `/`-separated path from the top level of the tree.
    ///
    /// The first key names a top-level node: the root or one of its
    /// following siblings. An empty path names the root.
    ///
    /// # Example
    ///
    /// ```
    /// use devtree::document::tree::Config;
    ///
    /// let config = Config::from_yaml("a:\n  x: 1\nb:\n  y: 2\n");
    /// assert_eq!(config.find_path("b/y")?.get::<i32>()?, 2);
    /// assert_eq!(config.find_path("a/x")?.get::<i32>()?, 1);
    /// # Ok::<(), devtree::document::error::NodeError>(())
    /// ```
    pub fn find_path(&self, path: &str) -> NodeResult<NodeView<'_, 'src>> {
        let mut keys = path.split('/').filter(|part| !part.is_empty());
        let Some(first) = keys.next() else {
            return Ok(self.root());
        };
        let top = std::iter::successors(Some(self.root()), |node| node.next())
            .find(|node| node.key() == first)
            .ok_or_else(|| NodeError::NotFound {
                key: first.to_string(),
            })?;
        keys.try_fold(top, |node, key| node.find(key))
    }

    /// Pre-order walk from the root. See [`NodeView::depth_first_search`].
    pub fn depth_first_search<'c, F>(&'c self, visitor: F)
    where
        F: FnMut(NodeView<'c, 'src>, usize),
    {
        self.root().depth_first_search(visitor)
    }

    /// Pre-order walk from the root that also reports sibling ordinals. See
    /// [`NodeView::depth_first_search_indexed`].
    pub fn depth_first_search_indexed<'c, F>(&'c self, visitor: F)
    where
        F: FnMut(NodeView<'c, 'src>, usize, usize),
    {
        self.root().depth_first_search_indexed(visitor)
    }
}

/// Read access to one node of a [`Config`].
#[derive(Clone, Copy)]
pub struct NodeView<'c, 'src> {
    store: &'c NodeStore<'src>,
    node: NodeRef<'src>,
}

impl<'c, 'src> NodeView<'c, 'src> {
    pub fn node_ref(&self) -> NodeRef<'src> {
        self.node
    }

    pub fn is_ram_backed(&self) -> bool {
        self.node.is_ram()
    }

    pub fn is_yaml_backed(&self) -> bool {
        self.node.is_yaml()
    }

    pub fn key(&self) -> &'c str {
        self.store.key(self.node)
    }

    pub fn value(&self) -> Option<ScalarRef<'c>> {
        self.store.value(self.node)
    }

    pub fn value_kind(&self) -> ValueKind {
        self.store.value_kind(self.node)
    }

    /// Reads the value as `T`.
    ///
    /// YAML values were already coerced to int, float or string; the request
    /// must match that kind exactly.
    pub fn get<T: ScalarType>(&self) -> NodeResult<T> {
        read_scalar(self.key(), self.value(), self.value_kind())
    }

    pub fn next(&self) -> Option<NodeView<'c, 'src>> {
        self.store.next(self.node).map(|node| self.at(node))
    }

    pub fn child(&self) -> Option<NodeView<'c, 'src>> {
        self.store.child(self.node).map(|node| self.at(node))
    }

    /// Iterates the direct children in link order.
    pub fn children(&self) -> Children<'c, 'src> {
        Children {
            store: self.store,
            next: self.store.child(self.node),
        }
    }

    /// Finds the direct child named `key` without creating it.
    pub fn find(&self, key: &str) -> NodeResult<NodeView<'c, 'src>> {
        self.children()
            .find(|child| child.key() == key)
            .ok_or_else(|| NodeError::NotFound {
                key: key.to_string(),
            })
    }

    /// Follows a `/`-separated path of keys from this node.
    ///
    /// An empty path, or `/`, names this node.
    ///
    /// # Example
    ///
    /// ```
    /// use devtree::document::tree::Config;
    /// use devtree::document::error::NodeError;
    ///
    /// let config = Config::from_yaml("soc:\n  uart0:\n    baud: 9600\n");
    /// let soc = config.root();
    ///
    /// assert_eq!(soc.find_path("uart0/baud").unwrap().get::<i32>().unwrap(), 9600);
    /// assert_eq!(soc.find_path("/").unwrap().key(), "soc");
    /// assert!(matches!(soc.find_path("uart1"), Err(NodeError::NotFound { .. })));
    /// ```
    pub fn find_path(&self, path: &str) -> NodeResult<NodeView<'c, 'src>> {
        path.split('/')
            .filter(|part| !part.is_empty())
            .try_fold(*self, |node, key| node.find(key))
    }

    /// Visits this node, its descendants and its following siblings in
    /// pre-order.
    ///
    /// The visitor receives each node with its depth relative to this one: a
    /// child is one deeper than its parent, a sibling shares its depth. For a
    /// YAML-backed tree the order is document order.
    ///
    /// # Example
    ///
    /// ```
    /// use devtree::document::tree::Config;
    ///
    /// let config = Config::from_yaml("a:\n  b: 1\n  c: 2\nd: 3\n");
    /// let mut seen = Vec::new();
    /// config.depth_first_search(|node, depth| seen.push((node.key().to_string(), depth)));
    ///
    /// let expected = [("a", 0), ("b", 1), ("c", 1), ("d", 0)];
    /// assert_eq!(seen, expected.map(|(k, d)| (k.to_string(), d)));
    /// ```
    pub fn depth_first_search<F>(&self, mut visitor: F)
    where
        F: FnMut(NodeView<'c, 'src>, usize),
    {
        self.depth_first_search_indexed(|node, depth, _| visitor(node, depth));
    }

    /// Same walk as [`depth_first_search`](Self::depth_first_search), also
    /// passing each node's width: its position in its sibling chain, counted
    /// from 0 at the first child (or at this node for the top level).
    ///
    /// # Example
    ///
    /// ```
    /// use devtree::document::tree::Config;
    ///
    /// let config = Config::from_yaml("a:\n  b: 1\n  c: 2\nd: 3\n");
    /// let mut seen = Vec::new();
    /// config.depth_first_search_indexed(|node, depth, width| seen.push((node.key(), depth, width)));
    /// assert_eq!(seen, [("a", 0, 0), ("b", 1, 0), ("c", 1, 1), ("d", 0, 1)]);
    /// ```
    pub fn depth_first_search_indexed<F>(&self, mut visitor: F)
    where
        F: FnMut(NodeView<'c, 'src>, usize, usize),
    {
        // The next sibling is pushed first so the child subtree pops before it.
        let mut stack = vec![(self.node, 0usize, 0usize)];
        while let Some((node, depth, width)) = stack.pop() {
            visitor(self.at(node), depth, width);
            if let Some(next) = self.store.next(node) {
                stack.push((next, depth, width + 1));
            }
            if let Some(child) = self.store.child(node) {
                stack.push((child, depth + 1, 0));
            }
        }
    }

    fn at(&self, node: NodeRef<'src>) -> NodeView<'c, 'src> {
        NodeView {
            store: self.store,
            node,
        }
    }
}

impl fmt::Debug for NodeView<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeView")
            .field("key", &self.key())
            .field("value", &self.value())
            .field("ram", &self.is_ram_backed())
            .finish()
    }
}

/// Iterator over a node's direct children.
pub struct Children<'c, 'src> {
    store: &'c NodeStore<'src>,
    next: Option<NodeRef<'src>>,
}

impl<'c, 'src> Iterator for Children<'c, 'src> {
    type Item = NodeView<'c, 'src>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = self.store.next(node);
        Some(NodeView {
            store: self.store,
            node,
        })
    }
}

/// Write access to one node of a [`Config`].
pub struct NodeMut<'c, 'src> {
    store: &'c mut NodeStore<'src>,
    node: NodeRef<'src>,
}

impl<'c, 'src> NodeMut<'c, 'src> {
    pub fn node_ref(&self) -> NodeRef<'src> {
        self.node
    }

    pub fn as_view(&self) -> NodeView<'_, 'src> {
        NodeView {
            store: &*self.store,
            node: self.node,
        }
    }

    /// Shortens the borrow so the cursor can be used again afterwards.
    pub fn reborrow(&mut self) -> NodeMut<'_, 'src> {
        NodeMut {
            store: &mut *self.store,
            node: self.node,
        }
    }

    pub fn key(&self) -> &str {
        self.store.key(self.node)
    }

    pub fn get<T: ScalarType>(&self) -> NodeResult<T> {
        self.as_view().get()
    }

    /// Stores a scalar. On a RAM node this drops the node's child and next
    /// links; on a YAML node it fails.
    pub fn set<T: ScalarType>(&mut self, value: T) -> NodeResult<()> {
        self.store.set_value(self.node, value.into_scalar())
    }

    /// Returns the child named `key`, creating it if needed.
    ///
    /// An existing child is returned as is. Otherwise a new empty RAM node
    /// becomes the first child (if there are none) or the next sibling of the
    /// last child. Calling this twice with the same key yields the same node.
    ///
    /// # Errors
    ///
    /// [`NodeError::Unsupported`] when the new node would have to hang off a
    /// YAML-backed node. The new node is discarded in that case.
    ///
    /// # Example
    ///
    /// ```
    /// use devtree::document::tree::Config;
    ///
    /// let mut config = Config::new("DeviceTree");
    /// let first = config.entry("Uart")?.node_ref();
    /// let again = config.entry("Uart")?.node_ref();
    /// assert_eq!(first, again);
    ///
    /// config.entry("Display")?;
    /// let keys: Vec<_> = config.root().children().map(|c| c.key()).collect();
    /// assert_eq!(keys, ["Uart", "Display"]);
    /// # Ok::<(), devtree::document::error::NodeError>(())
    /// ```
    pub fn entry(self, key: &str) -> NodeResult<NodeMut<'c, 'src>> {
        let mut last = None;
        let mut cursor = self.store.child(self.node);
        while let Some(node) = cursor {
            if self.store.key(node) == key {
                return Ok(NodeMut {
                    store: self.store,
                    node,
                });
            }
            last = Some(node);
            cursor = self.store.next(node);
        }

        let mark = self.store.len();
        let created = self.store.insert(RamNode::new(key));
        let attached = match last {
            None => self.store.set_child(self.node, created),
            Some(last) => self.store.set_next(last, created),
        };
        if let Err(err) = attached {
            self.store.truncate(mark);
            tracing::debug!(key, error = %err, "cannot attach new node");
            return Err(err);
        }

        tracing::debug!(key, parent = self.store.key(self.node), "created node");
        Ok(NodeMut {
            store: self.store,
            node: created,
        })
    }

    /// Applies [`entry`](Self::entry) for each key of a `/`-separated path.
    pub fn entry_path(self, path: &str) -> NodeResult<NodeMut<'c, 'src>> {
        path.split('/')
            .filter(|part| !part.is_empty())
            .try_fold(self, |node, key| node.entry(key))
    }

    /// Grafts another tree as the last child of this node.
    ///
    /// The subtree's in-memory nodes move into this tree's store; YAML-backed
    /// nodes keep borrowing their text. The subtree's root brings its own
    /// sibling chain along.
    ///
    /// # Errors
    ///
    /// [`NodeError::Unsupported`] when this node or its last child is
    /// YAML-backed. The tree is left as it was.
    pub fn add_child(&mut self, subtree: Config<'src>) -> NodeResult<()> {
        let mark = self.store.len();
        let Config { store, root } = subtree;
        let offset = self.store.absorb(store);
        let root = root.rebase(offset);

        if let Err(err) = self.store.append_child(self.node, root) {
            self.store.truncate(mark);
            tracing::debug!(error = %err, "cannot graft subtree");
            return Err(err);
        }

        tracing::debug!(
            parent = self.store.key(self.node),
            root = self.store.key(root),
            moved = self.store.len() - mark,
            "grafted subtree"
        );
        Ok(())
    }
}

impl fmt::Debug for NodeMut<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeMut")
            .field("key", &self.key())
            .field("node", &self.node)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::error::{Backing, ScalarKind};

    #[test]
    fn test_new_config_has_ram_root() {
        let config = Config::new("DeviceTree");
        assert_eq!(config.key(), "DeviceTree");
        assert!(config.root().is_ram_backed());
        assert!(config.root().child().is_none());
        assert_eq!(config.root().value_kind(), ValueKind::Empty);
    }

    #[test]
    fn test_entry_is_idempotent() {
        let mut config = Config::new("Root");
        let a = config.entry("a").unwrap().node_ref();
        let b = config.entry("b").unwrap().node_ref();
        assert_eq!(config.entry("a").unwrap().node_ref(), a);
        assert_eq!(config.entry("b").unwrap().node_ref(), b);
        assert_eq!(config.store().len(), 3);
    }

    #[test]
    fn test_entry_under_yaml_parent_fails_and_discards() {
        let mut config = Config::from_yaml("Uart:\n  Baud: 9600\n");
        let before = config.store().len();

        let err = config.entry("Parity").unwrap_err();
        assert_eq!(
            err,
            NodeError::Unsupported {
                operation: "set_next",
                backing: Backing::Yaml,
            }
        );
        assert_eq!(config.store().len(), before);

        // Existing YAML children are still found.
        let baud = config.entry("Baud").unwrap();
        assert_eq!(baud.get::<i32>().unwrap(), 9600);
    }

    #[test]
    fn test_entry_under_childless_yaml_node_fails() {
        let mut config = Config::from_yaml("Flag:\n");
        assert_eq!(
            config.entry("x").unwrap_err(),
            NodeError::Unsupported {
                operation: "set_child",
                backing: Backing::Yaml,
            }
        );
    }

    #[test]
    fn test_set_on_yaml_root_fails() {
        let mut config = Config::from_yaml("Baud: 9600\n");
        assert!(matches!(
            config.set(1),
            Err(NodeError::Unsupported { operation: "set", .. })
        ));
        assert_eq!(config.get::<i32>().unwrap(), 9600);
    }

    #[test]
    fn test_entry_path_creates_nested_nodes() {
        let mut config = Config::new("Root");
        config.entry_path("soc/uart0/baud").unwrap().set(9600).unwrap();

        let baud = config.root().find_path("soc/uart0/baud").unwrap();
        assert_eq!(baud.get::<i32>().unwrap(), 9600);
        assert_eq!(config.store().len(), 4);
    }

    #[test]
    fn test_reborrow_allows_multiple_entries() {
        let mut config = Config::new("Root");
        let mut soc = config.entry("soc").unwrap();
        soc.reborrow().entry("uart0").unwrap();
        soc.reborrow().entry("uart1").unwrap();

        let keys: Vec<_> = config.root().find("soc").unwrap().children().map(|c| c.key()).collect();
        assert_eq!(keys, ["uart0", "uart1"]);
    }

    #[test]
    fn test_find_does_not_create() {
        let config = Config::new("Root");
        assert_eq!(
            config.root().find("missing").unwrap_err(),
            NodeError::NotFound {
                key: "missing".to_string()
            }
        );
        assert_eq!(config.store().len(), 1);
    }

    #[test]
    fn test_add_child_moves_ram_nodes() {
        let mut sub = Config::new("Sub");
        sub.entry("Leaf").unwrap().set(1).unwrap();

        let mut config = Config::new("Root");
        config.entry("First").unwrap();
        config.add_child(sub).unwrap();

        let keys: Vec<_> = config.root().children().map(|c| c.key()).collect();
        assert_eq!(keys, ["First", "Sub"]);
        assert_eq!(
            config.root().find_path("Sub/Leaf").unwrap().get::<i32>().unwrap(),
            1
        );
        assert_eq!(config.store().len(), 4);
    }

    #[test]
    fn test_add_child_under_yaml_parent_is_rolled_back() {
        let text = "a: 1\n";
        let mut config = Config::from_yaml(text);
        let mut sub = Config::new("Sub");
        sub.entry("Leaf").unwrap();

        assert!(config.add_child(sub).is_err());
        assert!(config.store().is_empty());
    }

    #[test]
    fn test_type_mismatch_on_interior_node() {
        let mut config = Config::new("Root");
        config.entry("a").unwrap();
        assert_eq!(
            config.get::<String>().unwrap_err(),
            NodeError::TypeMismatch {
                key: "Root".to_string(),
                expected: ScalarKind::String,
                found: ValueKind::Pair,
            }
        );
    }

    #[test]
    fn test_depth_first_search_on_ram_tree() {
        let mut config = Config::new("Root");
        config.entry_path("a/b").unwrap();
        config.entry_path("a/c").unwrap();
        config.entry("d").unwrap();

        let mut seen = Vec::new();
        config.depth_first_search(|node, depth| seen.push(format!("{}:{}", node.key(), depth)));
        assert_eq!(seen, ["Root:0", "a:1", "b:2", "c:2", "d:1"]);
    }

    #[test]
    fn test_depth_first_search_reports_sibling_width() {
        let mut config = Config::new("Root");
        config.entry_path("a/b").unwrap();
        config.entry_path("a/c").unwrap();
        config.entry("d").unwrap();
        config.entry_path("d/e").unwrap();

        let mut seen = Vec::new();
        config.depth_first_search_indexed(|node, depth, width| {
            seen.push(format!("{}:{}:{}", node.key(), depth, width))
        });
        assert_eq!(seen, ["Root:0:0", "a:1:0", "b:2:0", "c:2:1", "d:1:1", "e:2:0"]);
    }

    #[test]
    fn test_config_find_path_starts_at_top_level() {
        let config = Config::from_yaml("a:\n  x: 1\nb:\n  y: 2\n");
        assert_eq!(config.find_path("b/y").unwrap().get::<i32>().unwrap(), 2);
        assert_eq!(config.find_path("/a/x").unwrap().get::<i32>().unwrap(), 1);
        assert_eq!(config.find_path("").unwrap().key(), "a");
        assert_eq!(
            config.find_path("c").unwrap_err(),
            NodeError::NotFound {
                key: "c".to_string()
            }
        );
        // Below the top level only children match, not siblings.
        assert!(config.find_path("a/y").is_err());
    }

    #[test]
    fn test_depth_first_search_from_inner_node_includes_siblings() {
        let config = Config::from_yaml("a:\n  b: 1\n  c: 2\n");
        let b = config.root().child().unwrap();

        let mut seen = Vec::new();
        b.depth_first_search(|node, depth| seen.push((node.key(), depth)));
        assert_eq!(seen, [("b", 0), ("c", 0)]);
    }
}
