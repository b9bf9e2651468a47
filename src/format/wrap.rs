//! Line wrapping for merged declarations
//!
//! Packs declaration entities onto as few lines as the width allows. The
//! first line carries the type spec and `::`; continuation lines are
//! indented and every line but the last ends with `, &`.

use super::declaration::Declaration;

/// Settings that control wrapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapSettings {
    /// Maximum line width in characters
    pub width: usize,
    /// Extra indentation of continuation lines, relative to the statement
    pub continuation_indent: usize,
    pub continuation_marker: char,
}

impl Default for WrapSettings {
    fn default() -> Self {
        Self {
            width: 80,
            continuation_indent: 3,
            continuation_marker: '&',
        }
    }
}

fn width_of(text: &str) -> usize {
    text.chars().count()
}

/// Wrap a declaration to fit within `settings.width`
///
/// An entity longer than the available space gets a line of its own and
/// that line may exceed the width.
#[must_use]
pub fn wrap_declaration(declaration: &Declaration, settings: &WrapSettings) -> Vec<String> {
    let first_prefix = format!("{}{} :: ", declaration.indent, declaration.type_spec);
    let continuation_prefix = format!(
        "{}{}",
        declaration.indent,
        " ".repeat(settings.continuation_indent)
    );
    wrap_items(&first_prefix, &continuation_prefix, &declaration.items, settings)
}

/// Pack `items` into lines starting with the given prefixes
///
/// Lines are filled greedily. When items remain after a line is full, items
/// are moved back to the next line until the continuation suffix fits, but a
/// line always keeps at least one item.
#[must_use]
pub fn wrap_items(
    first_prefix: &str,
    continuation_prefix: &str,
    items: &[String],
    settings: &WrapSettings,
) -> Vec<String> {
    let suffix = format!(", {}", settings.continuation_marker);
    let suffix_width = width_of(&suffix);
    let mut lines = Vec::new();
    let mut next = 0;

    while next < items.len() {
        let prefix = if lines.is_empty() {
            first_prefix
        } else {
            continuation_prefix
        };
        let mut taken = 0;
        let mut line_width = width_of(prefix);

        while let Some(item) = items.get(next + taken) {
            let separator = if taken == 0 { 0 } else { 2 };
            let candidate = line_width + separator + width_of(item);
            if taken > 0 && candidate > settings.width {
                break;
            }
            taken += 1;
            line_width = candidate;
            if taken == 1 && candidate > settings.width {
                // Overlong entity: alone on its line
                break;
            }
        }

        if next + taken < items.len() {
            while taken > 1 && line_width + suffix_width > settings.width {
                taken -= 1;
                line_width -= 2 + width_of(&items[next + taken]);
            }
        }

        let mut line = String::from(prefix);
        line.push_str(&items[next..next + taken].join(", "));
        next += taken;
        if next < items.len() {
            line.push_str(&suffix);
        }
        lines.push(line);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn items(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    fn settings(width: usize) -> WrapSettings {
        WrapSettings {
            width,
            ..WrapSettings::default()
        }
    }

    fn declaration(indent: &str, spec: &str, names: &[&str]) -> Declaration {
        Declaration {
            indent: indent.to_string(),
            type_spec: spec.to_string(),
            normalized: spec.to_string(),
            items: items(names),
            has_separator: true,
        }
    }

    #[test]
    fn test_everything_fits() {
        let decl = declaration("", "integer", &["a", "b"]);
        assert_eq!(wrap_declaration(&decl, &settings(80)), vec!["integer :: a, b"]);
    }

    #[test]
    fn test_wraps_with_suffix_room() {
        let decl = declaration("", "integer", &["aaaa", "bbbb", "cccc", "dddd"]);
        // "integer :: aaaa, bbbb" is 21 wide; the suffix needs 3 more
        let lines = wrap_declaration(&decl, &settings(22));
        assert_eq!(
            lines,
            vec!["integer :: aaaa, &", "   bbbb, cccc, dddd"]
        );
        assert!(lines.iter().all(|l| l.chars().count() <= 22));
    }

    #[test]
    fn test_continuation_indent_follows_statement() {
        let decl = declaration("  ", "real", &["alpha", "beta", "gamma"]);
        let lines = wrap_declaration(
            &decl,
            &WrapSettings {
                width: 22,
                continuation_indent: 4,
                continuation_marker: '&',
            },
        );
        assert_eq!(lines, vec!["  real :: alpha, &", "      beta, gamma"]);
    }

    #[test]
    fn test_overlong_item_gets_own_line() {
        let decl = declaration("", "integer", &["a", "very_long_entity_name", "b"]);
        let lines = wrap_declaration(&decl, &settings(20));
        assert_eq!(
            lines,
            vec!["integer :: a, &", "   very_long_entity_name, &", "   b"]
        );
    }

    #[test]
    fn test_every_item_kept_in_order() {
        let names: Vec<String> = (0..40).map(|i| format!("v{i}")).collect();
        let decl = Declaration {
            indent: "    ".to_string(),
            type_spec: "real(8)".to_string(),
            normalized: "real(8)".to_string(),
            items: names.clone(),
            has_separator: true,
        };
        let lines = wrap_declaration(&decl, &settings(40));
        let rejoined: Vec<String> = lines
            .iter()
            .enumerate()
            .flat_map(|(i, line)| {
                let body = if i == 0 {
                    line.split_once(" :: ").unwrap().1
                } else {
                    line.trim_start()
                };
                let body = body.trim_end_matches(", &");
                body.split(", ").map(str::to_string).collect::<Vec<_>>()
            })
            .collect();
        assert_eq!(rejoined, names);
        assert!(lines.iter().all(|l| l.chars().count() <= 40));
        assert!(lines[..lines.len() - 1].iter().all(|l| l.ends_with(", &")));
    }

    #[test]
    fn test_custom_marker() {
        let lines = wrap_items(
            "x :: ",
            "  ",
            &items(&["aa", "bb"]),
            &WrapSettings {
                width: 10,
                continuation_indent: 2,
                continuation_marker: '\\',
            },
        );
        assert_eq!(lines, vec!["x :: aa, \\", "  bb"]);
    }
}
