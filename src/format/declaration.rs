//! Parsing of type declaration statements
//!
//! A declaration is split into its indentation, its type spec (everything
//! before `::`, attributes included), and its entity list. Two declarations
//! may be merged when their normalized type specs are equal.

use log::debug;

use crate::parser::patterns::{
    CLOSE_PAREN_SPACING_RE, COMMA_SPACING_RE, OPEN_PAREN_SPACING_RE, OPERATOR_SPACING_RE,
    PLAIN_ITEM_RE, WHITESPACE_RUN_RE,
};
use crate::parser::{CharFilter, Syntax};

/// A parsed type declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Leading whitespace of the statement
    pub indent: String,
    /// Type spec and attributes exactly as written, trimmed
    pub type_spec: String,
    /// Type spec used to decide whether declarations merge
    pub normalized: String,
    /// Entities in source order, each trimmed
    pub items: Vec<String>,
    /// Whether the statement was written with `::`
    pub has_separator: bool,
}

impl Declaration {
    /// The declaration on one line, with `::`
    #[must_use]
    pub fn to_single_line(&self) -> String {
        format!(
            "{}{} :: {}",
            self.indent,
            self.type_spec,
            self.items.join(", ")
        )
    }
}

/// Normalize a type spec for comparison
///
/// Lowercases, collapses whitespace, and removes or fixes the spacing
/// around commas, parentheses, `=`, `*`, and `:`.
#[must_use]
pub fn normalize_type_spec(spec: &str) -> String {
    let lower = spec.trim().to_lowercase();
    let collapsed = WHITESPACE_RUN_RE.replace_all(&lower, " ");
    let commas = COMMA_SPACING_RE.replace_all(&collapsed, ", ");
    let open = OPEN_PAREN_SPACING_RE.replace_all(&commas, "(");
    let close = CLOSE_PAREN_SPACING_RE.replace_all(&open, ")");
    OPERATOR_SPACING_RE.replace_all(&close, "$1").into_owned()
}

/// Byte offset of the first `::` at nesting depth zero, outside quotes
#[must_use]
pub fn find_double_colon(text: &str, syntax: &Syntax) -> Option<usize> {
    let mut depth = 0usize;
    let mut previous: Option<(usize, char)> = None;
    for (pos, c) in CharFilter::new(text, true, true).with_comment_marker(syntax.comment_marker) {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ':' if depth == 0 => {
                if let Some((prev_pos, ':')) = previous {
                    if prev_pos + 1 == pos {
                        return Some(prev_pos);
                    }
                }
            }
            _ => {}
        }
        previous = Some((pos, c));
    }
    None
}

/// Split an entity list at commas outside parentheses, brackets, and quotes
///
/// Items are trimmed; empty items are dropped.
#[must_use]
pub fn split_items(text: &str, syntax: &Syntax) -> Vec<String> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (pos, c) in CharFilter::new(text, true, true).with_comment_marker(syntax.comment_marker) {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                items.push(text[start..pos].trim().to_string());
                start = pos + 1;
            }
            _ => {}
        }
    }
    items.push(text[start..].trim().to_string());
    items.retain(|item| !item.is_empty());
    items
}

/// Whether a `::`-less entity is a plain name with optional shape and length
#[must_use]
pub fn is_plain_item(item: &str) -> bool {
    PLAIN_ITEM_RE.is_match(item)
}

/// Parse a type declaration
///
/// Returns None when `text` does not start with a type keyword or its shape
/// is ambiguous. Without `::`, the type spec must be followed directly by
/// plain entities; attributes require `::`.
#[must_use]
pub fn parse_declaration(text: &str, syntax: &Syntax) -> Option<Declaration> {
    let body = text.trim_start();
    let indent = text[..text.len() - body.len()].to_string();
    let body = body.trim_end();
    let spec_end = syntax.match_type_spec(body)?;

    let (type_spec, entities, has_separator) = if let Some(colons) = find_double_colon(body, syntax) {
        if colons < spec_end {
            return None;
        }
        (body[..colons].trim(), &body[colons + 2..], true)
    } else {
        let rest = &body[spec_end..];
        if rest.trim_start().starts_with(',') {
            debug!("Attributes without '::' in {body:?}; not a plain declaration");
            return None;
        }
        (body[..spec_end].trim(), rest, false)
    };

    let items = split_items(entities, syntax);
    if items.is_empty() {
        return None;
    }
    if !has_separator && !items.iter().all(|item| is_plain_item(item)) {
        debug!("Ambiguous declaration {body:?}");
        return None;
    }

    Some(Declaration {
        indent,
        type_spec: type_spec.to_string(),
        normalized: normalize_type_spec(type_spec),
        items,
        has_separator,
    })
}
