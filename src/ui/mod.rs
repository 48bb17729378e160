//! Text output for the `devtree` binary.

pub mod tree_view;

pub use tree_view::{format_line, render_tree};
