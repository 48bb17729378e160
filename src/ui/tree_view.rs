//! Plain-text rendering of a configuration tree.
//!
//! Each node becomes one line, indented by its depth, in traversal order:
//!
//! ```text
//! DeviceTree:
//!   MyFirstDevice:
//!     Compatible: MAXUART
//!     Baud: 115200
//! ```
//!
//! With `show_types` enabled, scalars are suffixed with their kind, e.g.
//! `Baud: 115200 (int)`.

use crate::document::tree::{Config, NodeView};
use crate::settings::Settings;

/// Formats a single node at `depth`.
pub fn format_line(node: NodeView<'_, '_>, depth: usize, settings: &Settings) -> String {
    let mut line = format!("{}{}:", " ".repeat(depth * settings.indent_size), node.key());
    if let Some(value) = node.value() {
        if settings.show_values {
            line.push(' ');
            line.push_str(&value.to_string());
        }
        if settings.show_types {
            line.push_str(&format!(" ({})", value.kind()));
        }
    }
    line
}

/// Renders the whole tree, one line per node, each ending in `\n`.
pub fn render_tree(config: &Config<'_>, settings: &Settings) -> String {
    let mut out = String::new();
    config.depth_first_search(|node, depth| {
        out.push_str(&format_line(node, depth, settings));
        out.push('\n');
    });
    out
}
