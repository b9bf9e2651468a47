//! Block structure of Fortran source.
//!
//! This module recovers the nesting of program units and procedures:
//! - [`statements`]: Recognises block headers, `end` statements, and `contains`
//! - [`construct`]: Tracks interface, derived-type, enum, and BLOCK constructs
//! - [`extractor`]: Builds the [`Block`] tree from logical statements
//! - [`procedures`]: Indexes top-level subroutines and functions by name
//!
//! Blocks keep every statement they were built from, so writing a tree back
//! out reproduces its input lines.

pub mod construct;
pub mod extractor;
pub mod procedures;
pub mod statements;
pub mod types;

pub use construct::{opening_kind, ConstructKind, ConstructTracker};
pub use extractor::{extract_units, BlockExtractor};
pub use procedures::{index_procedures, Procedure, ProcedureIndex, ProcedureKey};
pub use statements::{is_split_marker, parse_end, parse_opener, EndStatement, Opener};
pub use types::{Block, BlockKind, Node};
