//! Merging of adjacent declarations
//!
//! Consecutive mergeable declarations with the same normalized type spec
//! are combined into one declaration and wrapped to the line width. Any
//! other statement, including a blank line or a commented declaration,
//! ends the current run.

use log::trace;

use crate::parser::{LogicalStatement, Syntax};

use super::classify::ClassifiedStatement;
use super::declaration::{parse_declaration, Declaration};
use super::wrap::{wrap_declaration, WrapSettings};

/// Merges runs of compatible declarations
pub struct DeclarationMerger<'a> {
    syntax: &'a Syntax,
    settings: &'a WrapSettings,
    run: Vec<(ClassifiedStatement, Declaration)>,
    output: Vec<ClassifiedStatement>,
}

impl<'a> DeclarationMerger<'a> {
    #[must_use]
    pub fn new(syntax: &'a Syntax, settings: &'a WrapSettings) -> Self {
        Self {
            syntax,
            settings,
            run: Vec::new(),
            output: Vec::new(),
        }
    }

    /// Feed the next statement
    pub fn push(&mut self, item: ClassifiedStatement) {
        let declaration = if item.is_mergeable() {
            parse_declaration(&item.statement.text, self.syntax)
        } else {
            None
        };

        match declaration {
            Some(declaration) => {
                let compatible = self
                    .run
                    .last()
                    .map_or(true, |(_, last)| last.normalized == declaration.normalized);
                if !compatible {
                    self.flush();
                }
                self.run.push((item, declaration));
            }
            None => {
                self.flush();
                self.output.push(item);
            }
        }
    }

    /// Emit the pending run
    fn flush(&mut self) {
        if self.run.is_empty() {
            return;
        }
        let run = std::mem::take(&mut self.run);

        if run.len() == 1 {
            let fits = run[0]
                .0
                .statement
                .lines
                .iter()
                .all(|line| line.chars().count() <= self.settings.width);
            if fits {
                self.output.extend(run.into_iter().map(|(item, _)| item));
                return;
            }
        }

        let mut iter = run.into_iter();
        let Some((first_item, mut merged)) = iter.next() else {
            return;
        };
        let mut count = 1;
        for (_, declaration) in iter {
            merged.items.extend(declaration.items);
            count += 1;
        }

        let lines = wrap_declaration(&merged, self.settings);
        trace!(
            "Line {}: {count} declaration(s) of {:?} written as {} line(s)",
            first_item.statement.line_number,
            merged.normalized,
            lines.len()
        );
        let statement = LogicalStatement::rewritten(
            merged.to_single_line(),
            lines,
            first_item.statement.line_number,
        );
        self.output.push(ClassifiedStatement {
            statement,
            ..first_item
        });
    }

    /// Flush and return all statements
    #[must_use]
    pub fn finish(mut self) -> Vec<ClassifiedStatement> {
        self.flush();
        self.output
    }
}

/// Merge declaration runs in `items`
#[must_use]
pub fn merge_declarations(
    items: Vec<ClassifiedStatement>,
    syntax: &Syntax,
    settings: &WrapSettings,
) -> Vec<ClassifiedStatement> {
    let mut merger = DeclarationMerger::new(syntax, settings);
    for item in items {
        merger.push(item);
    }
    merger.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::classify::classify_body;
    use crate::parser::InputStream;
    use pretty_assertions::assert_eq;

    fn merge(source: &str, width: usize) -> Vec<String> {
        let syntax = Syntax::default();
        let statements = InputStream::from_string(source, &syntax)
            .collect_statements()
            .unwrap();
        let settings = WrapSettings {
            width,
            ..WrapSettings::default()
        };
        merge_declarations(classify_body(&statements, &syntax), &syntax, &settings)
            .into_iter()
            .flat_map(|item| item.statement.lines)
            .collect()
    }

    #[test]
    fn test_merge_same_type() {
        assert_eq!(merge("integer :: a\ninteger :: b\n", 80), vec!["integer :: a, b"]);
    }

    #[test]
    fn test_merge_respects_type_spec() {
        let source = "integer :: a\nreal :: b\nreal :: c\ninteger :: d\n";
        assert_eq!(
            merge(source, 80),
            vec!["integer :: a", "real :: b, c", "integer :: d"]
        );
    }

    #[test]
    fn test_normalized_specs_merge() {
        let source = "  REAL(8), INTENT(IN) :: x\n  real( 8 ) ,intent(in) :: y\n";
        assert_eq!(merge(source, 80), vec!["  REAL(8), INTENT(IN) :: x, y"]);
    }

    #[test]
    fn test_merge_adds_double_colon() {
        assert_eq!(merge("integer i\ninteger j\n", 80), vec!["integer :: i, j"]);
    }

    #[test]
    fn test_comment_breaks_run() {
        let source = "integer :: a\ninteger :: b ! keep\ninteger :: c\n";
        assert_eq!(
            merge(source, 80),
            vec!["integer :: a", "integer :: b ! keep", "integer :: c"]
        );
    }

    #[test]
    fn test_blank_line_breaks_run() {
        let source = "integer :: a\n\ninteger :: b\n";
        assert_eq!(merge(source, 80), vec!["integer :: a", "", "integer :: b"]);
    }

    #[test]
    fn test_single_declaration_kept_verbatim() {
        let source = "integer   ::   a,b\n";
        assert_eq!(merge(source, 80), vec!["integer   ::   a,b"]);
    }

    #[test]
    fn test_single_long_declaration_is_rewrapped() {
        let source = "integer :: alpha, beta, gamma, delta\n";
        assert_eq!(
            merge(source, 24),
            vec!["integer :: alpha, &", "   beta, gamma, delta"]
        );
    }

    #[test]
    fn test_specification_statements_are_not_merged() {
        let source = "dimension a(3)\ndimension b(3)\n";
        assert_eq!(merge(source, 80), vec!["dimension a(3)", "dimension b(3)"]);
    }

    #[test]
    fn test_interface_declarations_are_not_merged() {
        let source = "\
interface
  subroutine s(a, b)
    integer :: a
    integer :: b
  end subroutine
end interface
";
        let expected: Vec<&str> = source.lines().collect();
        assert_eq!(merge(source, 80), expected);
    }

    #[test]
    fn test_continued_declarations_merge() {
        let source = "integer :: a, &\n   b\ninteger :: c\n";
        assert_eq!(merge(source, 80), vec!["integer :: a, b, c"]);
    }
}
