//! Fortran source reading utilities.
//!
//! This module turns raw source lines into logical statements:
//! - [`CharFilter`]: Iterator adapter that identifies strings, comments, and code regions
//! - [`InputStream`]: Joins continuation lines and separates comments from code
//! - [`segment`]: Splits statements at top-level separators
//! - [`Syntax`]: Configurable marker characters and type keywords
//! - [`patterns`]: Precompiled regex patterns for statement shapes
//!
//! Every logical statement keeps the physical lines it came from, so
//! statements that are not rewritten are reproduced exactly.

pub mod char_filter;
pub mod patterns;
pub mod segment;
pub mod stream;
pub mod syntax;

pub use char_filter::{CharFilter, StringDelimiter};
pub use segment::{has_top_level_separator, segment_all, segment_statement, split_at_separators};
pub use stream::{split_comment, InputStream, LogicalStatement};
pub use syntax::Syntax;
