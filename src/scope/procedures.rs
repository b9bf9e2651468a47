/// Procedure index
///
/// A lightweight pass that maps each top-level subroutine and function to
/// its source lines, for callers that need to look procedures up by name
/// without rewriting anything. Procedures nested inside another procedure
/// are part of the enclosing procedure's lines; they are not indexed on
/// their own. Interface bodies are not definitions and are skipped.
use std::collections::BTreeMap;

use log::debug;

use crate::parser::{LogicalStatement, Syntax};

use super::construct::ConstructTracker;
use super::statements::{parse_end, parse_opener};
use super::types::BlockKind;

/// Lookup key: procedure kind and lowercase name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProcedureKey {
    pub kind: BlockKind,
    pub name: String,
}

impl ProcedureKey {
    #[must_use]
    pub fn new(kind: BlockKind, name: &str) -> Self {
        Self {
            kind,
            name: name.to_ascii_lowercase(),
        }
    }
}

/// An indexed procedure with its physical lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Procedure {
    pub kind: BlockKind,
    pub name: String,
    pub lines: Vec<String>,
    /// 1-based line of the header
    pub start_line: usize,
    /// 1-based line of the last line of the end statement
    pub end_line: usize,
}

pub type ProcedureIndex = BTreeMap<ProcedureKey, Procedure>;

/// Index all top-level procedures in `statements`
///
/// A procedure closes at an end statement whose keyword matches its kind
/// and whose name matches or is omitted, or at a bare `end`. When a name
/// occurs twice the later procedure wins. A procedure still open at the end
/// of input is dropped.
#[must_use]
pub fn index_procedures(statements: &[LogicalStatement], syntax: &Syntax) -> ProcedureIndex {
    let mut index = ProcedureIndex::new();
    let mut open: Option<Procedure> = None;
    let mut tracker = ConstructTracker::default();

    for statement in statements {
        let text = statement.text.as_str();
        let last_line = statement.line_number + statement.line_count().saturating_sub(1);

        if tracker.claims(text) {
            tracker.observe(text);
            if let Some(procedure) = open.as_mut() {
                procedure.lines.extend(statement.lines.iter().cloned());
            }
            continue;
        }

        match open.as_mut() {
            None => {
                let Some(opener) = parse_opener(text, syntax) else {
                    continue;
                };
                let Some(name) = opener.name.filter(|_| opener.kind.is_procedure()) else {
                    continue;
                };
                open = Some(Procedure {
                    kind: opener.kind,
                    name,
                    lines: statement.lines.clone(),
                    start_line: statement.line_number,
                    end_line: last_line,
                });
            }
            Some(procedure) => {
                procedure.lines.extend(statement.lines.iter().cloned());
                let closes = parse_end(text).is_some_and(|end| match end.kind_word.as_deref() {
                    None => end.name.is_none(),
                    Some(word) => {
                        word == procedure.kind.keyword()
                            && end.name.as_deref().map_or(true, |n| n == procedure.name)
                    }
                });
                if closes {
                    procedure.end_line = last_line;
                    if let Some(done) = open.take() {
                        let key = ProcedureKey::new(done.kind, &done.name);
                        if index.contains_key(&key) {
                            debug!("Line {}: {} {} redefined", done.start_line, done.kind, done.name);
                        }
                        index.insert(key, done);
                    }
                }
            }
        }
    }

    if let Some(procedure) = open {
        debug!(
            "Line {}: {} {} is never closed; not indexed",
            procedure.start_line, procedure.kind, procedure.name
        );
    }

    index
}
