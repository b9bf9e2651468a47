/// Recognition of block-opening, block-closing, and `contains` statements
use crate::parser::patterns::{CONTAINS_RE, PROCEDURE_PREFIXES};
use crate::parser::Syntax;

use super::types::BlockKind;

/// A statement that opens a program unit or procedure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opener {
    pub kind: BlockKind,
    /// Lowercase name; only a main program may omit it
    pub name: Option<String>,
}

/// An `end` statement, bare or qualified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndStatement {
    /// Lowercase keyword after `end` (`subroutine`, `do`, `interface`, ...)
    pub kind_word: Option<String>,
    /// Lowercase name after the keyword
    pub name: Option<String>,
}

impl EndStatement {
    /// Whether this statement closes a block of `kind`
    ///
    /// A bare `end` closes any block; otherwise the keyword must match.
    /// Names are not compared.
    #[must_use]
    pub fn closes(&self, kind: BlockKind) -> bool {
        self.kind_word
            .as_deref()
            .map_or(true, |word| word == kind.keyword())
    }

    /// Whether this statement ends a construct introduced by `keyword`
    #[must_use]
    pub fn ends_construct(&self, keyword: &str) -> bool {
        self.kind_word.as_deref() == Some(keyword)
    }
}

/// Split a leading word (letters, digits, underscores) off `text`
///
/// Returns the word and the remainder with leading whitespace removed.
fn take_word(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start();
    let len = text
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(text.len());
    if len == 0 {
        return None;
    }
    Some((&text[..len], text[len..].trim_start()))
}

fn is_prefix(word: &str) -> bool {
    PROCEDURE_PREFIXES
        .iter()
        .any(|p| p.eq_ignore_ascii_case(word))
}

/// Text allowed after a procedure name in a header
fn is_procedure_tail(rest: &str) -> bool {
    if rest.is_empty() || rest.starts_with('(') {
        return true;
    }
    take_word(rest).is_some_and(|(word, _)| {
        word.eq_ignore_ascii_case("bind") || word.eq_ignore_ascii_case("result")
    })
}

/// Recognise a program, module, subroutine, or function header
///
/// Procedure headers may carry prefixes (`pure`, `elemental`, `recursive`,
/// `module`, ...) and, for functions, a type spec. `module procedure` is
/// not an opener.
#[must_use]
pub fn parse_opener(text: &str, syntax: &Syntax) -> Option<Opener> {
    let mut rest = text.trim();
    let mut seen_type = false;
    let mut seen_prefix = false;

    loop {
        if !seen_type {
            if let Some(end) = syntax.match_type_spec(rest) {
                seen_type = true;
                rest = rest[end..].trim_start();
                continue;
            }
        }

        let (word, after) = take_word(rest)?;
        let lower = word.to_ascii_lowercase();
        match lower.as_str() {
            "subroutine" | "function" => {
                let kind = BlockKind::from_keyword(&lower)?;
                if seen_type && kind != BlockKind::Function {
                    return None;
                }
                let (name, tail) = take_word(after)?;
                if !is_procedure_tail(tail) {
                    return None;
                }
                return Some(Opener {
                    kind,
                    name: Some(name.to_ascii_lowercase()),
                });
            }
            "program" | "module" if !seen_type && !seen_prefix => {
                let kind = BlockKind::from_keyword(&lower)?;
                if after.is_empty() && kind == BlockKind::Program {
                    return Some(Opener { kind, name: None });
                }
                let (name, tail) = take_word(after)?;
                let name_lower = name.to_ascii_lowercase();
                if kind == BlockKind::Module
                    && (is_prefix(&name_lower)
                        || matches!(name_lower.as_str(), "subroutine" | "function"))
                {
                    // "module subroutine" / "module pure function": a prefix
                    seen_prefix = true;
                    rest = after;
                    continue;
                }
                if kind == BlockKind::Module && name_lower == "procedure" {
                    return None;
                }
                if !tail.is_empty() {
                    return None;
                }
                return Some(Opener {
                    kind,
                    name: Some(name_lower),
                });
            }
            _ if is_prefix(&lower) => {
                seen_prefix = true;
                rest = after;
            }
            _ => return None,
        }
    }
}

/// Recognise an `end` statement
///
/// Accepts `end`, `end <keyword>`, `end <keyword> <name>`, and the fused
/// forms (`endsubroutine`, `enddo`). Anything else after the name makes the
/// statement something other than an end, except for generic interface
/// specs such as `end interface operator(+)`.
#[must_use]
pub fn parse_end(text: &str) -> Option<EndStatement> {
    let (first, rest) = take_word(text.trim())?;
    let first = first.to_ascii_lowercase();
    let suffix = first.strip_prefix("end")?;

    let (kind_word, rest) = if suffix.is_empty() {
        match take_word(rest) {
            Some((word, after)) => (Some(word.to_ascii_lowercase()), after),
            None => (None, rest),
        }
    } else {
        (Some(suffix.to_string()), rest)
    };

    if kind_word.is_none() {
        return rest.is_empty().then_some(EndStatement {
            kind_word: None,
            name: None,
        });
    }

    let (name, rest) = match take_word(rest) {
        Some((word, after)) => (Some(word.to_ascii_lowercase()), after),
        None => (None, rest),
    };
    if !rest.is_empty() && kind_word.as_deref() != Some("interface") {
        return None;
    }
    Some(EndStatement { kind_word, name })
}

/// Recognise the `contains` statement
#[must_use]
pub fn is_split_marker(text: &str) -> bool {
    CONTAINS_RE.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opener(text: &str) -> Option<(BlockKind, Option<String>)> {
        parse_opener(text, &Syntax::default()).map(|o| (o.kind, o.name))
    }

    fn named(kind: BlockKind, name: &str) -> Option<(BlockKind, Option<String>)> {
        Some((kind, Some(name.to_string())))
    }

    #[test]
    fn test_simple_openers() {
        assert_eq!(opener("module Physics"), named(BlockKind::Module, "physics"));
        assert_eq!(opener("  program main"), named(BlockKind::Program, "main"));
        assert_eq!(opener("program"), Some((BlockKind::Program, None)));
        assert_eq!(opener("subroutine run(a, b)"), named(BlockKind::Subroutine, "run"));
        assert_eq!(opener("SUBROUTINE init"), named(BlockKind::Subroutine, "init"));
        assert_eq!(opener("function f(x) result(y)"), named(BlockKind::Function, "f"));
    }

    #[test]
    fn test_prefixed_openers() {
        assert_eq!(opener("pure function f(x)"), named(BlockKind::Function, "f"));
        assert_eq!(
            opener("recursive subroutine walk(n)"),
            named(BlockKind::Subroutine, "walk")
        );
        assert_eq!(
            opener("elemental real(8) function sq(x)"),
            named(BlockKind::Function, "sq")
        );
        assert_eq!(opener("integer function count(a)"), named(BlockKind::Function, "count"));
        assert_eq!(
            opener("module subroutine impl(x)"),
            named(BlockKind::Subroutine, "impl")
        );
        assert_eq!(
            opener("subroutine cb(x) bind(c, name='cb')"),
            named(BlockKind::Subroutine, "cb")
        );
    }

    #[test]
    fn test_non_openers() {
        assert_eq!(opener("module procedure swap_int"), None);
        assert_eq!(opener("integer :: x"), None);
        assert_eq!(opener("call subroutine_x()"), None);
        assert_eq!(opener("program_name = 1"), None);
        assert_eq!(opener("module = 3"), None);
        assert_eq!(opener("real subroutine s()"), None);
        assert_eq!(opener("end subroutine s"), None);
        assert_eq!(opener(""), None);
    }

    #[test]
    fn test_end_statements() {
        let end = parse_end("end").unwrap();
        assert_eq!(end.kind_word, None);
        assert_eq!(end.name, None);

        let end = parse_end("  END SUBROUTINE Run").unwrap();
        assert_eq!(end.kind_word.as_deref(), Some("subroutine"));
        assert_eq!(end.name.as_deref(), Some("run"));

        let end = parse_end("endmodule m").unwrap();
        assert_eq!(end.kind_word.as_deref(), Some("module"));
        assert_eq!(end.name.as_deref(), Some("m"));

        let end = parse_end("end do").unwrap();
        assert!(!end.closes(BlockKind::Subroutine));

        let end = parse_end("end interface operator(+)").unwrap();
        assert!(end.ends_construct("interface"));
    }

    #[test]
    fn test_not_end_statements() {
        assert_eq!(parse_end("endx = 3"), None);
        assert_eq!(parse_end("end_time = 1"), None);
        assert_eq!(parse_end("x = 1"), None);
        assert_eq!(parse_end("end function f extra"), None);
        assert_eq!(parse_end(""), None);
    }

    #[test]
    fn test_closes() {
        assert!(parse_end("end").unwrap().closes(BlockKind::Module));
        assert!(parse_end("end function").unwrap().closes(BlockKind::Function));
        assert!(!parse_end("end function").unwrap().closes(BlockKind::Subroutine));
    }

    #[test]
    fn test_split_marker() {
        assert!(is_split_marker("contains"));
        assert!(is_split_marker("  CONTAINS"));
        assert!(!is_split_marker("contains = 1"));
    }
}
