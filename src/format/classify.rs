//! Statement classification
//!
//! Each statement of a block's own body gets a syntactic [`Shape`] and one
//! of the four [`StatementClass`] buckets used for reordering. Blank and
//! comment-only statements take the class of the next code statement so
//! that comments travel with the statement they describe.

use log::debug;

use crate::parser::patterns::{
    IMPLICIT_RE, IMPORT_RE, INCLUDE_RE, PREPROCESSOR_RE, SPECIFICATION_KEYWORDS, USE_RE,
};
use crate::parser::{has_top_level_separator, CharFilter, LogicalStatement, Syntax};
use crate::scope::{ConstructKind, ConstructTracker};

use super::declaration::{find_double_colon, parse_declaration};

/// Reordering buckets, in output order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatementClass {
    Header,
    ImportOrMode,
    Declaration,
    Executable,
}

/// What a statement looks like on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Blank or comment-only
    Trivia,
    /// `use`, `import`, `include`
    Import,
    /// `implicit`
    Mode,
    /// Type declaration that may be merged
    Declaration,
    /// Other specification statement (`parameter`, `save`, ...)
    Specification,
    /// Member of an interface, derived-type, enum, or BLOCK construct
    Construct(ConstructKind),
    Preprocessor,
    Executable,
}

impl Shape {
    /// Class of a non-trivia shape
    #[must_use]
    pub fn class(self) -> Option<StatementClass> {
        match self {
            Shape::Trivia => None,
            Shape::Import | Shape::Mode => Some(StatementClass::ImportOrMode),
            Shape::Declaration | Shape::Specification => Some(StatementClass::Declaration),
            Shape::Construct(kind) if kind.is_specification() => Some(StatementClass::Declaration),
            Shape::Construct(_) | Shape::Preprocessor | Shape::Executable => {
                Some(StatementClass::Executable)
            }
        }
    }
}

/// A statement with its shape and resolved class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedStatement {
    pub statement: LogicalStatement,
    pub shape: Shape,
    pub class: StatementClass,
}

impl ClassifiedStatement {
    /// Whether the statement may take part in a merge
    #[must_use]
    pub fn is_mergeable(&self) -> bool {
        self.shape == Shape::Declaration && self.statement.safe
    }
}

/// Whether `text` is an assignment
///
/// Looks for `=` at nesting depth zero outside quotes that is not part of
/// `==`, `/=`, `<=`, `>=`, or `=>`, in a statement without a top-level `::`.
#[must_use]
pub fn is_assignment(text: &str, syntax: &Syntax) -> bool {
    if find_double_colon(text, syntax).is_some() {
        return false;
    }
    let chars: Vec<char> = CharFilter::new(text, true, true)
        .with_comment_marker(syntax.comment_marker)
        .map(|(_, c)| c)
        .collect();
    let mut depth = 0usize;
    for (i, &c) in chars.iter().enumerate() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            '=' if depth == 0 => {
                let before = i.checked_sub(1).map(|j| chars[j]);
                let after = chars.get(i + 1).copied();
                let relational = matches!(before, Some('=' | '/' | '<' | '>'))
                    || matches!(after, Some('=' | '>'));
                if !relational {
                    return true;
                }
            }
            _ => {}
        }
    }
    false
}

fn first_word(text: &str) -> &str {
    let text = text.trim_start();
    let len = text
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(text.len());
    &text[..len]
}

/// Shape of one statement outside any construct
#[must_use]
pub fn shape_of(text: &str, syntax: &Syntax) -> Shape {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Shape::Trivia;
    }
    if PREPROCESSOR_RE.is_match(trimmed) {
        return Shape::Preprocessor;
    }
    if has_top_level_separator(trimmed, syntax) || is_assignment(trimmed, syntax) {
        return Shape::Executable;
    }
    if USE_RE.is_match(trimmed) || IMPORT_RE.is_match(trimmed) || INCLUDE_RE.is_match(trimmed) {
        return Shape::Import;
    }
    if IMPLICIT_RE.is_match(trimmed) {
        return Shape::Mode;
    }
    if syntax.match_type_keyword(trimmed).is_some() {
        if parse_declaration(trimmed, syntax).is_some() {
            return Shape::Declaration;
        }
        if find_double_colon(trimmed, syntax).is_some() {
            // Typed statement with `::` whose entity list is empty
            return Shape::Specification;
        }
        debug!("Ambiguous declaration {trimmed:?}; treated as executable");
        return Shape::Executable;
    }
    let word = first_word(trimmed);
    if SPECIFICATION_KEYWORDS
        .iter()
        .any(|k| k.eq_ignore_ascii_case(word))
    {
        return Shape::Specification;
    }
    Shape::Executable
}

/// Classify the statements of a block's own body
///
/// Statements inside a construct are classified as members of that
/// construct. Trivia take the class of the next code statement, or of the
/// previous one at the end of the body, or Executable when there is no code.
#[must_use]
pub fn classify_body(body: &[LogicalStatement], syntax: &Syntax) -> Vec<ClassifiedStatement> {
    let mut tracker = ConstructTracker::default();
    let shapes: Vec<Shape> = body
        .iter()
        .map(|statement| {
            let text = statement.text.as_str();
            if tracker.claims(text) {
                match tracker.observe(text) {
                    Some(kind) => Shape::Construct(kind),
                    None => shape_of(text, syntax),
                }
            } else {
                shape_of(text, syntax)
            }
        })
        .collect();

    let mut classes: Vec<Option<StatementClass>> = shapes.iter().map(|s| s.class()).collect();

    let mut next_class = None;
    for class in classes.iter_mut().rev() {
        match class {
            Some(c) => next_class = Some(*c),
            None => *class = next_class,
        }
    }
    let mut previous_class = None;
    for class in &mut classes {
        match class {
            Some(c) => previous_class = Some(*c),
            None => *class = previous_class,
        }
    }

    body.iter()
        .zip(shapes)
        .zip(classes)
        .map(|((statement, shape), class)| ClassifiedStatement {
            statement: statement.clone(),
            shape,
            class: class.unwrap_or(StatementClass::Executable),
        })
        .collect()
}
