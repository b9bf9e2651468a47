/// Lexical settings shared by every stage of the rewrite
///
/// The three marker characters and the declaration type keywords are
/// configurable; everything that scans statement text takes a `Syntax`.
use super::char_filter::CharFilter;
use super::patterns::{DEFAULT_TYPE_KEYWORDS, PARENTHESIZED_TYPE_KEYWORDS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Syntax {
    pub continuation_marker: char,
    pub comment_marker: char,
    pub statement_separator: char,
    /// Lowercase type keywords; multi-word keywords are single-space separated
    pub type_keywords: Vec<String>,
}

impl Default for Syntax {
    fn default() -> Self {
        Self {
            continuation_marker: '&',
            comment_marker: '!',
            statement_separator: ';',
            type_keywords: DEFAULT_TYPE_KEYWORDS.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl Syntax {
    /// Match a type keyword at the start of `text` (leading whitespace allowed)
    ///
    /// Returns the byte offset just past the keyword. Words of a multi-word
    /// keyword may be separated by any amount of whitespace, including none,
    /// so `doubleprecision` matches `double precision`. `type` and `class`
    /// only match when the next significant character is `(`.
    #[must_use]
    pub fn match_type_keyword(&self, text: &str) -> Option<usize> {
        self.type_keywords
            .iter()
            .filter_map(|keyword| match_keyword(text, keyword))
            .max()
    }

    /// Match a complete type spec at the start of `text`
    ///
    /// A type spec is a type keyword followed by an optional parenthesized
    /// kind/length selector or an old-style `*len`. Returns the byte offset
    /// just past the spec.
    #[must_use]
    pub fn match_type_spec(&self, text: &str) -> Option<usize> {
        let keyword_end = self.match_type_keyword(text)?;
        let rest = &text[keyword_end..];
        let selector_start = keyword_end + (rest.len() - rest.trim_start().len());
        let selector = &text[selector_start..];

        if selector.starts_with('(') {
            let close = matching_paren(selector)?;
            return Some(selector_start + close + 1);
        }

        if let Some(after_star) = selector.strip_prefix('*') {
            let len_start = selector_start + 1 + (after_star.len() - after_star.trim_start().len());
            let len_text = &text[len_start..];
            if len_text.starts_with('(') {
                let close = matching_paren(len_text)?;
                return Some(len_start + close + 1);
            }
            let digits = len_text.chars().take_while(char::is_ascii_digit).count();
            if digits == 0 {
                return None;
            }
            let after = &len_text[digits..];
            if after
                .chars()
                .next()
                .is_some_and(|c| c.is_alphanumeric() || c == '_')
            {
                return None;
            }
            return Some(len_start + digits);
        }

        Some(keyword_end)
    }
}

/// Find the parenthesis that closes the one at the start of `text`
///
/// Quoted strings are skipped. Returns the byte offset of the closing
/// parenthesis.
#[must_use]
pub fn matching_paren(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (pos, c) in CharFilter::new(text, false, true) {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(pos);
                }
            }
            _ => {}
        }
    }
    None
}

fn match_keyword(text: &str, keyword: &str) -> Option<usize> {
    let mut pos = text.len() - text.trim_start().len();
    for word in keyword.split_whitespace() {
        pos += text[pos..].len() - text[pos..].trim_start().len();
        let candidate = text.get(pos..pos + word.len())?;
        if !candidate.eq_ignore_ascii_case(word) {
            return None;
        }
        pos += word.len();
    }

    let rest = &text[pos..];
    if rest
        .chars()
        .next()
        .is_some_and(|c| c.is_alphanumeric() || c == '_')
    {
        return None;
    }

    let parenthesized = PARENTHESIZED_TYPE_KEYWORDS
        .iter()
        .any(|k| k.eq_ignore_ascii_case(keyword));
    if parenthesized && !rest.trim_start().starts_with('(') {
        return None;
    }

    Some(pos)
}
