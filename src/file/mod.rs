//! File I/O for YAML documents.
//!
//! This module loads YAML text from disk or stdin, transparently handling
//! gzip-compressed input.

pub mod loader;
