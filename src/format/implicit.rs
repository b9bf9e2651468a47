//! Insertion of `implicit none`

use crate::parser::LogicalStatement;

use super::classify::{ClassifiedStatement, Shape, StatementClass};

/// Whether the body already has an `implicit` statement
#[must_use]
pub fn has_mode_statement(items: &[ClassifiedStatement]) -> bool {
    items.iter().any(|item| item.shape == Shape::Mode)
}

/// Insert `implicit none` after the last import, or at the top of the body
///
/// The new statement takes the indentation of the first code statement in
/// the body; in an empty body it is indented `continuation_indent` spaces
/// past the header.
pub fn insert_implicit_none(
    items: &mut Vec<ClassifiedStatement>,
    header: &LogicalStatement,
    continuation_indent: usize,
) {
    let position = items
        .iter()
        .rposition(|item| item.shape == Shape::Import)
        .map_or(0, |i| i + 1);

    let indent = items
        .iter()
        .find(|item| !item.statement.is_trivia())
        .map_or_else(
            || format!("{}{}", header.indent(), " ".repeat(continuation_indent)),
            |item| item.statement.indent().to_string(),
        );

    let statement = LogicalStatement::single_line(format!("{indent}implicit none"), header.line_number);
    items.insert(
        position,
        ClassifiedStatement {
            statement,
            shape: Shape::Mode,
            class: StatementClass::ImportOrMode,
        },
    );
}
