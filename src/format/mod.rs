//! Declaration rewriting.
//!
//! This module contains the statement-level rewrites applied to each
//! block's own body:
//! - [`classify`]: Assigns every statement a shape and a reordering class
//! - [`reorganize`]: Moves imports, declarations, and executables into order
//! - [`declaration`]: Parses type declarations and normalizes type specs
//! - [`merge`]: Combines adjacent declarations of the same type
//! - [`wrap`]: Packs declaration entities into lines of bounded width
//! - [`colons`]: Adds `::` to declarations written without it
//! - [`implicit`]: Inserts `implicit none` where a block lacks it

pub mod classify;
pub mod colons;
pub mod declaration;
pub mod implicit;
pub mod merge;
pub mod reorganize;
pub mod wrap;

pub use classify::{classify_body, is_assignment, shape_of, ClassifiedStatement, Shape, StatementClass};
pub use colons::add_double_colons;
pub use declaration::{normalize_type_spec, parse_declaration, split_items, Declaration};
pub use implicit::{has_mode_statement, insert_implicit_none};
pub use merge::{merge_declarations, DeclarationMerger};
pub use reorganize::{has_preprocessor, reorganize};
pub use wrap::{wrap_declaration, wrap_items, WrapSettings};
