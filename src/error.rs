//! Error types and result aliases for fdecl.
//!
//! - [`Result<T>`]: Type alias for `anyhow::Result<T>` used by the pipeline and I/O layers
//! - [`StructureError`]: Fatal structural problems found while parsing the source

use anyhow::Result as AnyhowResult;
use thiserror::Error;

use crate::scope::BlockKind;

pub type Result<T> = AnyhowResult<T>;

/// Structural failures that abort a transform with no partial output
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    /// End of input reached while a trailing continuation marker was still pending
    #[error("line {line}: statement continues past the end of input")]
    UnterminatedContinuation { line: usize },

    /// End of input reached with a block still open
    #[error("line {line}: {kind} {} is never closed", name.as_deref().unwrap_or("<unnamed>"))]
    UnterminatedBlock {
        kind: BlockKind,
        name: Option<String>,
        line: usize,
    },
}

/// Result type for the structural parsing stages
pub type ParseResult<T> = std::result::Result<T, StructureError>;
