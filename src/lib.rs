//! # devtree
//!
//! Device-tree style configuration as a navigable tree of keyed nodes.
//!
//! A tree can be built in code, read lazily from a small YAML subset, or both
//! at once: a parsed document can be grafted under nodes built in memory, and
//! everything is queried through the same [`Config`] facade.
//!
//! ```
//! use devtree::Config;
//!
//! let yaml = "\
//! MyFirstDevice:
//!     Compatible: MAXUART
//!     Baud: 115200
//! ";
//!
//! let mut config = Config::new("DeviceTree");
//! config.add_child(Config::from_yaml(yaml))?;
//!
//! let baud = config.root().find_path("MyFirstDevice/Baud")?;
//! assert_eq!(baud.get::<i32>()?, 115200);
//! # Ok::<(), devtree::NodeError>(())
//! ```
//!
//! The YAML subset is one `key: value` pair per line, nested by indentation.
//! Lists, quoting, anchors, comments and multi-line scalars are not supported;
//! lines without a `:` are ignored.

pub mod document;
pub mod file;
pub mod settings;
pub mod ui;

pub use document::{Config, Node, NodeError, NodeMut, NodeRef, NodeResult, NodeView, Scalar, ScalarRef};
