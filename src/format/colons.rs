//! Insertion of `::` in declarations written without it

use crate::parser::{LogicalStatement, Syntax};

use super::classify::ClassifiedStatement;
use super::declaration::parse_declaration;
use super::wrap::{wrap_declaration, WrapSettings};

/// Rewrite `integer i, j` as `integer :: i, j`
///
/// Only mergeable declarations are touched; the result is wrapped to the
/// configured width.
#[must_use]
pub fn add_double_colons(
    items: Vec<ClassifiedStatement>,
    syntax: &Syntax,
    settings: &WrapSettings,
) -> Vec<ClassifiedStatement> {
    items
        .into_iter()
        .map(|item| {
            if !item.is_mergeable() {
                return item;
            }
            match parse_declaration(&item.statement.text, syntax) {
                Some(declaration) if !declaration.has_separator => {
                    let lines = wrap_declaration(&declaration, settings);
                    let statement = LogicalStatement::rewritten(
                        declaration.to_single_line(),
                        lines,
                        item.statement.line_number,
                    );
                    ClassifiedStatement { statement, ..item }
                }
                _ => item,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::classify::classify_body;
    use crate::parser::InputStream;

    fn run(source: &str) -> Vec<String> {
        let syntax = Syntax::default();
        let statements = InputStream::from_string(source, &syntax)
            .collect_statements()
            .unwrap();
        add_double_colons(
            classify_body(&statements, &syntax),
            &syntax,
            &WrapSettings::default(),
        )
        .into_iter()
        .flat_map(|item| item.statement.lines)
        .collect()
    }

    #[test]
    fn test_adds_colons() {
        assert_eq!(run("  integer i, j\n"), vec!["  integer :: i, j"]);
        assert_eq!(run("character*8 name\n"), vec!["character*8 :: name"]);
    }

    #[test]
    fn test_leaves_other_statements() {
        assert_eq!(run("real :: x\n"), vec!["real :: x"]);
        assert_eq!(run("integer i ! loop\n"), vec!["integer i ! loop"]);
        assert_eq!(run("x = 1\n"), vec!["x = 1"]);
    }
}
