/// Statement segmenter
///
/// Splits a logical statement at top-level statement separators (`;`
/// outside quotes) into independent statements. Only single-line statements
/// that are safe to rewrite are split; everything else passes through.
use log::trace;

use super::char_filter::CharFilter;
use super::stream::LogicalStatement;
use super::syntax::Syntax;

/// Check whether `text` contains a statement separator outside quotes
#[must_use]
pub fn has_top_level_separator(text: &str, syntax: &Syntax) -> bool {
    separator_positions(text, syntax).next().is_some()
}

fn separator_positions<'a>(text: &'a str, syntax: &Syntax) -> impl Iterator<Item = usize> + 'a {
    let separator = syntax.statement_separator;
    CharFilter::new(text, true, true)
        .with_comment_marker(syntax.comment_marker)
        .filter(move |&(_, c)| c == separator)
        .map(|(pos, _)| pos)
}

/// Split `text` at top-level separators
///
/// Segments are trimmed; empty segments are dropped.
#[must_use]
pub fn split_at_separators(text: &str, syntax: &Syntax) -> Vec<String> {
    let mut segments = Vec::new();
    let mut start = 0;
    for pos in separator_positions(text, syntax) {
        segments.push(text[start..pos].trim().to_string());
        start = pos + syntax.statement_separator.len_utf8();
    }
    segments.push(text[start..].trim().to_string());
    segments.retain(|s| !s.is_empty());
    segments
}

/// Split one statement into the statements it contains
///
/// Each new statement keeps the indentation of the original line. A
/// statement that is not safe, spans several physical lines, or has nothing
/// to split comes back unchanged.
#[must_use]
pub fn segment_statement(statement: LogicalStatement, syntax: &Syntax) -> Vec<LogicalStatement> {
    if !statement.safe
        || statement.line_count() != 1
        || !has_top_level_separator(&statement.text, syntax)
    {
        return vec![statement];
    }

    let segments = split_at_separators(&statement.text, syntax);
    if segments.is_empty() {
        return vec![statement];
    }

    trace!(
        "Line {}: split into {} statements",
        statement.line_number,
        segments.len()
    );
    let indent = statement.indent().to_string();
    segments
        .into_iter()
        .map(|segment| LogicalStatement::single_line(format!("{indent}{segment}"), statement.line_number))
        .collect()
}

/// Segment every statement in order
#[must_use]
pub fn segment_all(statements: Vec<LogicalStatement>, syntax: &Syntax) -> Vec<LogicalStatement> {
    statements
        .into_iter()
        .flat_map(|statement| segment_statement(statement, syntax))
        .collect()
}
