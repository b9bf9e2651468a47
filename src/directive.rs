//! Inline directive parsing for `! fdecl:` comments
//!
//! Supports in-file configuration overrides via special comments:
//! `! fdecl: --width 100 --mode merge`

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::config::{Config, MergeMode};

/// Pattern to match the directive body after the comment marker
static DIRECTIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(r"^\s*fdecl:\s*(.*?)\s*$")
        .case_insensitive(true)
        .build()
        .unwrap_or_else(|_| panic!("Invalid directive pattern"))
});

/// Parsed directive options that can override config
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DirectiveOverrides {
    pub line_length: Option<usize>,
    pub continuation_indent: Option<usize>,
    pub mode: Option<MergeMode>,
    pub split_statements: Option<bool>,
    pub add_implicit_none: Option<bool>,
    pub add_colons: Option<bool>,
}

impl DirectiveOverrides {
    /// Check if any overrides are set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.line_length.is_none()
            && self.continuation_indent.is_none()
            && self.mode.is_none()
            && self.split_statements.is_none()
            && self.add_implicit_none.is_none()
            && self.add_colons.is_none()
    }

    /// Apply the overrides on top of `config`
    pub fn apply(&self, config: &mut Config) {
        if let Some(v) = self.line_length {
            config.line_length = v;
        }
        if let Some(v) = self.continuation_indent {
            config.continuation_indent = v;
        }
        if let Some(v) = self.mode {
            config.mode = v;
        }
        if let Some(v) = self.split_statements {
            config.split_statements = v;
        }
        if let Some(v) = self.add_implicit_none {
            config.add_implicit_none = v;
        }
        if let Some(v) = self.add_colons {
            config.add_colons = v;
        }
    }
}

/// Check if a line contains an fdecl directive
#[must_use]
pub fn is_directive_line(line: &str, comment_marker: char) -> bool {
    directive_body(line, comment_marker).is_some()
}

fn directive_body(line: &str, comment_marker: char) -> Option<&str> {
    let comment = line.trim_start().strip_prefix(comment_marker)?;
    let caps = DIRECTIVE_RE.captures(comment)?;
    caps.get(1).map(|m| m.as_str())
}

/// Parse an fdecl directive line and return option overrides
///
/// # Returns
/// * `Some(DirectiveOverrides)` if the line is a directive with at least one known option
/// * `None` otherwise
#[must_use]
pub fn parse_directive(line: &str, comment_marker: char) -> Option<DirectiveOverrides> {
    parse_directive_args(directive_body(line, comment_marker)?)
}

/// Parse directive arguments into overrides
fn parse_directive_args(args_str: &str) -> Option<DirectiveOverrides> {
    let mut overrides = DirectiveOverrides::default();
    let tokens: Vec<&str> = args_str.split_whitespace().collect();
    let mut i = 0;

    while i < tokens.len() {
        match tokens[i] {
            "-w" | "--width" => {
                i += 1;
                if i < tokens.len() {
                    overrides.line_length = tokens[i].parse().ok();
                }
            }
            "--continuation-indent" => {
                i += 1;
                if i < tokens.len() {
                    overrides.continuation_indent = tokens[i].parse().ok();
                }
            }
            "-m" | "--mode" => {
                i += 1;
                if i < tokens.len() {
                    overrides.mode = tokens[i].parse().ok();
                }
            }
            "--no-split-statements" => overrides.split_statements = Some(false),
            "--split-statements" => overrides.split_statements = Some(true),
            "--add-implicit-none" => overrides.add_implicit_none = Some(true),
            "--add-colons" => overrides.add_colons = Some(true),
            _ => {
                // Unknown option, skip
            }
        }
        i += 1;
    }

    if overrides.is_empty() {
        None
    } else {
        Some(overrides)
    }
}

/// Scan input for fdecl directives and return the first found
///
/// Only the first directive is used (subsequent ones are ignored).
pub fn find_directive<R: std::io::BufRead>(
    input: &mut R,
    comment_marker: char,
) -> Option<DirectiveOverrides> {
    let mut buffer = String::new();

    while input.read_line(&mut buffer).ok()? > 0 {
        if is_directive_line(&buffer, comment_marker) {
            return parse_directive(&buffer, comment_marker);
        }
        buffer.clear();
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_directive_line() {
        assert!(is_directive_line("! fdecl: --width 100", '!'));
        assert!(is_directive_line("   !fdecl: --add-colons", '!'));
        assert!(is_directive_line("! FDECL: --mode merge", '!'));
        assert!(!is_directive_line("! this is a regular comment", '!'));
        assert!(!is_directive_line("x = 1 ! fdecl: --width 3", '!'));
        assert!(is_directive_line("# fdecl: -w 90", '#'));
    }

    #[test]
    fn test_parse_directive_width_and_mode() {
        let overrides = parse_directive("! fdecl: --width 100 -m merge", '!').unwrap();
        assert_eq!(overrides.line_length, Some(100));
        assert_eq!(overrides.mode, Some(MergeMode::Merge));
    }

    #[test]
    fn test_parse_directive_flags() {
        let overrides =
            parse_directive("! fdecl: --no-split-statements --add-implicit-none", '!').unwrap();
        assert_eq!(overrides.split_statements, Some(false));
        assert_eq!(overrides.add_implicit_none, Some(true));
        assert_eq!(overrides.add_colons, None);
    }

    #[test]
    fn test_parse_invalid_directive() {
        assert!(parse_directive("! fdecl:", '!').is_none());
        assert!(parse_directive("! fdecl: --unknown", '!').is_none());
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = Config::default();
        let overrides = parse_directive("! fdecl: --continuation-indent 6 --add-colons", '!').unwrap();
        overrides.apply(&mut config);
        assert_eq!(config.continuation_indent, 6);
        assert!(config.add_colons);
        assert_eq!(config.line_length, 80);
    }

    #[test]
    fn test_find_directive_takes_first() {
        let source = "module m\n! fdecl: -w 60\n! fdecl: -w 70\nend module m\n";
        let mut reader = std::io::BufReader::new(source.as_bytes());
        let overrides = find_directive(&mut reader, '!').unwrap();
        assert_eq!(overrides.line_length, Some(60));
    }
}
