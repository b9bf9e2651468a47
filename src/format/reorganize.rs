//! Reordering of a block's own body
//!
//! Statements are regrouped so that imports and `implicit` come first, then
//! declarations, then executable statements. The order inside each group
//! is preserved.

use super::classify::{ClassifiedStatement, Shape, StatementClass};

/// Whether the body contains preprocessor lines and must keep its order
#[must_use]
pub fn has_preprocessor(items: &[ClassifiedStatement]) -> bool {
    items.iter().any(|item| item.shape == Shape::Preprocessor)
}

/// Keep a single blank line after `implicit` with the imports
///
/// Without this the blank line would move down with the declarations
/// that follow it.
fn attach_blank_after_mode(items: &mut [ClassifiedStatement]) {
    for i in 0..items.len() {
        if items[i].shape != Shape::Mode {
            continue;
        }
        let single_blank = items.get(i + 1).is_some_and(|s| s.statement.is_blank())
            && !items.get(i + 2).is_some_and(|s| s.statement.is_blank());
        if single_blank {
            items[i + 1].class = StatementClass::ImportOrMode;
        }
    }
}

/// Stable partition of the body into class order
#[must_use]
pub fn reorganize(mut items: Vec<ClassifiedStatement>) -> Vec<ClassifiedStatement> {
    attach_blank_after_mode(&mut items);
    items.sort_by_key(|item| item.class);
    items
}
