/// Recursive extraction of program units and procedures
///
/// Turns a flat list of logical statements into a tree of [`Block`]s. Each
/// block's own body runs from its header to `contains` (or the end); the
/// region after `contains` holds nested blocks, extracted recursively, and
/// any statements between them.
///
/// A file may start a main program without a `program` statement. When a
/// code statement appears at top level outside any block, extraction
/// tentatively treats it as the start of such a program. The attempt is
/// abandoned, and the statement passed through, if a block opener shows up
/// in the program's own body or the input ends first.
use log::debug;

use crate::error::{ParseResult, StructureError};
use crate::parser::patterns::PREPROCESSOR_RE;
use crate::parser::{LogicalStatement, Syntax};

use super::construct::ConstructTracker;
use super::statements::{is_split_marker, parse_end, parse_opener, Opener};
use super::types::{Block, BlockKind, Node};

/// Outcome of reading a block body
enum BodyEnd {
    Closed(Block, usize),
    /// A tentative header-less program turned out not to be one
    Abandoned,
}

/// Extracts blocks from a statement sequence
pub struct BlockExtractor<'a> {
    statements: &'a [LogicalStatement],
    syntax: &'a Syntax,
}

impl<'a> BlockExtractor<'a> {
    #[must_use]
    pub fn new(statements: &'a [LogicalStatement], syntax: &'a Syntax) -> Self {
        Self { statements, syntax }
    }

    /// Extract all top-level units
    ///
    /// Statements outside any block come back as [`Node::Verbatim`].
    pub fn extract_units(&self) -> ParseResult<Vec<Node>> {
        let mut units = Vec::new();
        let mut anonymous_allowed = true;
        let mut index = 0;

        while let Some(statement) = self.statements.get(index) {
            if let Some(opener) = parse_opener(&statement.text, self.syntax) {
                let (block, next) = self.extract_block(index, opener)?;
                units.push(Node::Block(block));
                index = next;
                continue;
            }

            if anonymous_allowed && starts_anonymous_program(statement) {
                match self.read_body(index, BlockKind::Program, None, None)? {
                    BodyEnd::Closed(block, next) => {
                        debug!(
                            "Line {}: main program without a program statement",
                            statement.line_number
                        );
                        units.push(Node::Block(block));
                        index = next;
                        continue;
                    }
                    BodyEnd::Abandoned => {
                        debug!(
                            "Line {}: top-level statements are not a main program",
                            statement.line_number
                        );
                        anonymous_allowed = false;
                    }
                }
            }

            units.push(Node::Verbatim(statement.clone()));
            index += 1;
        }

        Ok(units)
    }

    /// Extract the block whose header is at `start`
    ///
    /// Returns the block and the index of the first statement after its end.
    fn extract_block(&self, start: usize, opener: Opener) -> ParseResult<(Block, usize)> {
        let header = self.statements[start].clone();
        let line = header.line_number;
        let kind = opener.kind;
        let name = opener.name;
        match self.read_body(start + 1, kind, name.clone(), Some(header))? {
            BodyEnd::Closed(block, next) => Ok((block, next)),
            BodyEnd::Abandoned => Err(StructureError::UnterminatedBlock { kind, name, line }),
        }
    }

    /// Read a block's own body, `contains`, child region, and end
    ///
    /// `header` is None for a tentative header-less main program, which may
    /// be abandoned instead of failing.
    fn read_body(
        &self,
        start: usize,
        kind: BlockKind,
        name: Option<String>,
        header: Option<LogicalStatement>,
    ) -> ParseResult<BodyEnd> {
        let anonymous = header.is_none();
        let mut tracker = ConstructTracker::default();
        let mut body = Vec::new();
        let mut index = start;

        // Own body
        let contains = loop {
            let Some(statement) = self.statements.get(index) else {
                return Ok(BodyEnd::Abandoned);
            };
            let text = statement.text.as_str();

            if tracker.claims(text) {
                tracker.observe(text);
                body.push(statement.clone());
                index += 1;
                continue;
            }

            if let Some(end) = parse_end(text) {
                if end.closes(kind) {
                    check_end_name(kind, name.as_deref(), end.name.as_deref(), statement);
                    let block = Block {
                        kind,
                        name,
                        header,
                        body,
                        contains: None,
                        children: Vec::new(),
                        end: statement.clone(),
                    };
                    return Ok(BodyEnd::Closed(block, index + 1));
                }
            }

            if is_split_marker(text) {
                index += 1;
                break statement.clone();
            }

            if anonymous && parse_opener(text, self.syntax).is_some() {
                return Ok(BodyEnd::Abandoned);
            }

            body.push(statement.clone());
            index += 1;
        };

        // Child region
        let mut children = Vec::new();
        loop {
            let Some(statement) = self.statements.get(index) else {
                return Ok(BodyEnd::Abandoned);
            };
            let text = statement.text.as_str();

            if let Some(opener) = parse_opener(text, self.syntax) {
                let (child, next) = self.extract_block(index, opener)?;
                children.push(Node::Block(child));
                index = next;
                continue;
            }

            if let Some(end) = parse_end(text) {
                if end.closes(kind) {
                    check_end_name(kind, name.as_deref(), end.name.as_deref(), statement);
                    let block = Block {
                        kind,
                        name,
                        header,
                        body,
                        contains: Some(contains),
                        children,
                        end: statement.clone(),
                    };
                    return Ok(BodyEnd::Closed(block, index + 1));
                }
            }

            children.push(Node::Verbatim(statement.clone()));
            index += 1;
        }
    }
}

/// Code statement that may begin a main program without a header
fn starts_anonymous_program(statement: &LogicalStatement) -> bool {
    !statement.is_trivia()
        && !PREPROCESSOR_RE.is_match(&statement.text)
        && parse_end(&statement.text).is_none()
}

fn check_end_name(
    kind: BlockKind,
    expected: Option<&str>,
    found: Option<&str>,
    statement: &LogicalStatement,
) {
    if let (Some(expected), Some(found)) = (expected, found) {
        if expected != found {
            debug!(
                "Line {}: end {kind} {found} closes {kind} {expected}",
                statement.line_number
            );
        }
    }
}

/// Extract all top-level units from `statements`
pub fn extract_units(statements: &[LogicalStatement], syntax: &Syntax) -> ParseResult<Vec<Node>> {
    BlockExtractor::new(statements, syntax).extract_units()
}
