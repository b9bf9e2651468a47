/// `InputStream` - Converts physical lines to logical Fortran statements
///
/// This module handles:
/// - Joining line continuations (lines ending with the continuation marker)
/// - Separating trailing comments from code
/// - Keeping blank and comment-only lines as their own statements
/// - Marking statements whose layout must survive untouched
use std::io::{BufRead, BufReader};

use super::char_filter::CharFilter;
use super::syntax::Syntax;
use crate::error::{Result, StructureError};

/// A logical Fortran statement with its source lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalStatement {
    /// Code of the statement: continuations joined with single spaces,
    /// comments removed, leading indentation of the first line kept
    pub text: String,
    /// The original physical lines, without line terminators
    pub lines: Vec<String>,
    /// Comment text of each physical line (empty when the line has none)
    pub comments: Vec<String>,
    /// Whether any physical line carries a comment
    pub has_comment: bool,
    /// Whether the statement may be rewritten
    ///
    /// False when any contributing line is blank, a full-line comment, or
    /// carries a trailing comment.
    pub safe: bool,
    /// 1-based number of the first physical line
    pub line_number: usize,
}

impl LogicalStatement {
    /// A statement produced by a rewrite, occupying the given lines
    #[must_use]
    pub fn rewritten(text: String, lines: Vec<String>, line_number: usize) -> Self {
        let comments = vec![String::new(); lines.len()];
        Self {
            text,
            lines,
            comments,
            has_comment: false,
            safe: true,
            line_number,
        }
    }

    /// A rewritten statement that fits on one line
    #[must_use]
    pub fn single_line(text: String, line_number: usize) -> Self {
        Self::rewritten(text.clone(), vec![text], line_number)
    }

    /// Blank line or comment-only line
    #[must_use]
    pub fn is_trivia(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Blank line without a comment
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.is_trivia() && !self.has_comment && self.lines.iter().all(|l| l.trim().is_empty())
    }

    /// Leading whitespace of the statement
    #[must_use]
    pub fn indent(&self) -> &str {
        let trimmed = self.text.trim_start();
        &self.text[..self.text.len() - trimmed.len()]
    }

    /// Number of physical lines
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// `InputStream` reads logical statements from a reader
pub struct InputStream<R: BufRead> {
    reader: R,
    syntax: Syntax,
    line_number: usize,
}

impl<R: BufRead> InputStream<R> {
    /// Create a new `InputStream`
    ///
    /// # Arguments
    /// * `reader` - The underlying reader
    /// * `syntax` - Marker characters used to find comments and continuations
    pub fn new(reader: R, syntax: &Syntax) -> Self {
        Self {
            reader,
            syntax: syntax.clone(),
            line_number: 0,
        }
    }

    /// Get the number of physical lines consumed so far
    pub fn get_line_number(&self) -> usize {
        self.line_number
    }

    /// Read the next physical line without its terminator
    fn read_physical_line(&mut self) -> Result<Option<String>> {
        let mut raw_line = String::new();
        if self.reader.read_line(&mut raw_line)? == 0 {
            return Ok(None);
        }
        self.line_number += 1;
        if raw_line.ends_with('\n') {
            raw_line.pop();
            if raw_line.ends_with('\r') {
                raw_line.pop();
            }
        }
        Ok(Some(raw_line))
    }

    /// Read the next logical statement
    ///
    /// Returns None at EOF. Fails with [`StructureError::UnterminatedContinuation`]
    /// when the input ends while a continuation is pending.
    pub fn next_statement(&mut self) -> Result<Option<LogicalStatement>> {
        let Some(first) = self.read_physical_line()? else {
            return Ok(None);
        };
        let line_number = self.line_number;

        let (code, comment) = split_comment(&first, self.syntax.comment_marker);
        let mut statement = LogicalStatement {
            text: code.to_string(),
            lines: Vec::new(),
            comments: vec![comment.to_string()],
            has_comment: !comment.is_empty(),
            safe: comment.is_empty() && !code.trim().is_empty(),
            line_number,
        };
        statement.lines.push(first.clone());

        if code.trim().is_empty() {
            statement.text = String::new();
            return Ok(Some(statement));
        }

        let Some(stripped) = strip_continuation(code, &self.syntax) else {
            return Ok(Some(statement));
        };
        statement.text = stripped.to_string();

        loop {
            let Some(line) = self.read_physical_line()? else {
                return Err(StructureError::UnterminatedContinuation { line: line_number }.into());
            };
            let (code, comment) = split_comment(&line, self.syntax.comment_marker);
            statement.comments.push(comment.to_string());
            if !comment.is_empty() {
                statement.has_comment = true;
                statement.safe = false;
            }
            let is_comment_only = code.trim().is_empty();
            let code = code.trim().to_string();
            statement.lines.push(line);

            // Comment and blank lines between continuation lines stay inside
            // the statement so it remains atomic
            if is_comment_only {
                statement.safe = false;
                continue;
            }

            let mut part = code.as_str();
            if let Some(rest) = part.strip_prefix(self.syntax.continuation_marker) {
                part = rest.trim_start();
            }
            let continues = strip_continuation(part, &self.syntax);
            let piece = continues.unwrap_or(part);
            if !piece.is_empty() {
                if !statement.text.is_empty() {
                    statement.text.push(' ');
                }
                statement.text.push_str(piece);
            }
            if continues.is_none() {
                break;
            }
        }

        Ok(Some(statement))
    }

    /// Read all remaining statements
    pub fn collect_statements(&mut self) -> Result<Vec<LogicalStatement>> {
        let mut statements = Vec::new();
        while let Some(statement) = self.next_statement()? {
            statements.push(statement);
        }
        Ok(statements)
    }
}

impl<'a> InputStream<BufReader<&'a [u8]>> {
    /// Create an `InputStream` from a string (for testing)
    pub fn from_string(s: &'a str, syntax: &Syntax) -> Self {
        let reader = BufReader::new(s.as_bytes());
        Self::new(reader, syntax)
    }
}

/// Split a line into code and trailing comment
///
/// The comment starts at the first comment marker outside quotes. The code
/// part is right-trimmed; the comment part includes the marker.
pub fn split_comment(line: &str, comment_marker: char) -> (&str, &str) {
    // With strings filtered out, any marker the filter yields starts the comment
    match CharFilter::new(line, false, true)
        .with_comment_marker(comment_marker)
        .find(|&(_, c)| c == comment_marker)
    {
        Some((pos, _)) => (line[..pos].trim_end(), &line[pos..]),
        None => (line.trim_end(), ""),
    }
}

/// Remove a trailing continuation marker that lies outside quotes
///
/// Returns the code before the marker, right-trimmed, or None when the code
/// does not continue.
fn strip_continuation<'a>(code: &'a str, syntax: &Syntax) -> Option<&'a str> {
    let code = code.trim_end();
    let marker = syntax.continuation_marker;
    let (pos, c) = CharFilter::new(code, false, true)
        .with_comment_marker(syntax.comment_marker)
        .last()?;
    (c == marker && pos + c.len_utf8() == code.len()).then(|| code[..pos].trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StructureError;

    fn statements(input: &str) -> Vec<LogicalStatement> {
        InputStream::from_string(input, &Syntax::default())
            .collect_statements()
            .unwrap()
    }

    #[test]
    fn test_single_line() {
        let result = statements("x = 1\n");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].text, "x = 1");
        assert_eq!(result[0].lines, vec!["x = 1"]);
        assert!(result[0].safe);
        assert_eq!(result[0].line_number, 1);
    }

    #[test]
    fn test_continuation() {
        let result = statements("  integer :: a, &\n     b\n");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].text, "  integer :: a, b");
        assert_eq!(result[0].lines.len(), 2);
        assert!(result[0].safe);
    }

    #[test]
    fn test_leading_marker_on_continuation_line() {
        let result = statements("x = 1 + &\n    & 2 + &\n  &3\n");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].text, "x = 1 + 2 + 3");
        assert_eq!(result[0].line_count(), 3);
    }

    #[test]
    fn test_marker_inside_string_is_not_continuation() {
        let result = statements("print *, 'a &'\ny = 2\n");
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].text, "print *, 'a &'");
    }

    #[test]
    fn test_trailing_comment() {
        let result = statements("integer :: x ! counter\n");
        assert_eq!(result[0].text, "integer :: x");
        assert_eq!(result[0].comments, vec!["! counter"]);
        assert!(result[0].has_comment);
        assert!(!result[0].safe);
    }

    #[test]
    fn test_comment_marker_in_string() {
        let result = statements("print *, \"hi ! there\"\n");
        assert_eq!(result[0].text, "print *, \"hi ! there\"");
        assert!(!result[0].has_comment);
        assert!(result[0].safe);
    }

    #[test]
    fn test_blank_and_comment_lines_are_own_statements() {
        let result = statements("\n! header\nx = 1\n");
        assert_eq!(result.len(), 3);
        assert!(result[0].is_blank());
        assert!(result[1].is_trivia());
        assert!(!result[1].is_blank());
        assert!(!result[0].safe);
        assert!(!result[1].safe);
        assert_eq!(result[2].line_number, 3);
    }

    #[test]
    fn test_comment_inside_continuation_stays_atomic() {
        let result = statements("integer :: a, &\n! note\n  b\nx = 1\n");
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].text, "integer :: a, b");
        assert_eq!(result[0].lines.len(), 3);
        assert!(!result[0].safe);
        assert!(result[1].safe);
    }

    #[test]
    fn test_unterminated_continuation() {
        let err = InputStream::from_string("x = 1 + &\n", &Syntax::default())
            .collect_statements()
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<StructureError>(),
            Some(&StructureError::UnterminatedContinuation { line: 1 })
        );
    }

    #[test]
    fn test_crlf_input() {
        let result = statements("a = 1\r\nb = 2\r\n");
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].lines, vec!["a = 1"]);
        assert_eq!(result[1].text, "b = 2");
    }

    #[test]
    fn test_empty_file() {
        assert!(statements("").is_empty());
    }

    #[test]
    fn test_line_number_tracking() {
        let mut stream = InputStream::from_string("a = 1 + &\n 2\nb = 3\n", &Syntax::default());
        let first = stream.next_statement().unwrap().unwrap();
        assert_eq!(first.line_number, 1);
        assert_eq!(stream.get_line_number(), 2);
        let second = stream.next_statement().unwrap().unwrap();
        assert_eq!(second.line_number, 3);
        assert!(stream.next_statement().unwrap().is_none());
    }

    #[test]
    fn test_split_comment() {
        assert_eq!(split_comment("x = 1  ! c", '!'), ("x = 1", "! c"));
        assert_eq!(split_comment("s = '!'", '!'), ("s = '!'", ""));
        assert_eq!(split_comment("! only", '!'), ("", "! only"));
    }

    #[test]
    fn test_custom_markers() {
        let syntax = Syntax {
            continuation_marker: '\\',
            comment_marker: '#',
            ..Syntax::default()
        };
        let result = InputStream::from_string("a = 1 + \\\n 2 # two\n", &syntax)
            .collect_statements()
            .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].text, "a = 1 + 2");
        assert!(result[0].has_comment);
    }
}
