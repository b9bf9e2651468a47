//! File processing pipeline.
//!
//! Each file goes through the same stages:
//!
//! **Structure:**
//! - Read the input into logical statements (joining continuations)
//! - Split statements at top-level separators
//! - Recover the tree of program units and procedures
//!
//! **Rewrite (per block):**
//! - Classify the statements of the block's own body
//! - Reorder imports, declarations, and executables
//! - Merge adjacent declarations and wrap them to the line width
//!
//! The main entry point is [`format_file`] which processes a buffered reader
//! and writes the rewritten output to any `Write` implementation.

pub mod pipeline;

pub use pipeline::{format_file, list_procedures, transform_source};
