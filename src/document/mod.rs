//! Configuration trees with interchangeable node backings.
//!
//! Nodes either live in memory ([`ram_node`]) or are lazy views into YAML text
//! ([`yaml_node`]). Both implement the [`node::Node`] interface, and a
//! [`tree::Config`] lets them be mixed freely in one tree.

pub mod error;
pub mod node;
pub mod ram_node;
pub mod scanner;
pub mod store;
pub mod tree;
pub mod yaml_node;

pub use error::{NodeError, NodeResult};
pub use node::{Node, NodeRef, Scalar, ScalarRef, ScalarType};
pub use tree::{Config, NodeMut, NodeView};
