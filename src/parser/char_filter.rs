/// `CharFilter` - Iterator that filters out quoted strings and comments
///
/// Wraps a string iterator and tracks whether the scan position is inside a
/// single- or double-quoted string, or inside a trailing comment. Every
/// quote-aware decision in the crate (comment detection, continuation
/// markers, statement separators, declaration item commas) goes through it.
///
/// Quote state toggles character by character with no escape handling: a
/// doubled quote (`'don''t'`) closes and reopens the string, which leaves the
/// scanner in the right state at the end.

/// Default comment marker
pub const DEFAULT_COMMENT_MARKER: char = '!';

/// Type of string delimiter we're currently inside
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StringDelimiter {
    #[default]
    None,
    Single, // '...'
    Double, // "..."
}

impl StringDelimiter {
    fn opened_by(c: char) -> Option<Self> {
        match c {
            '\'' => Some(StringDelimiter::Single),
            '"' => Some(StringDelimiter::Double),
            _ => None,
        }
    }

    fn closed_by(self, c: char) -> bool {
        matches!(
            (self, c),
            (StringDelimiter::Single, '\'') | (StringDelimiter::Double, '"')
        )
    }
}

/// Iterator adapter that filters out strings and comments
///
/// Yields (byte position, character) pairs for the characters that survive
/// the configured filters.
pub struct CharFilter<'a> {
    chars: std::str::CharIndices<'a>,
    instring: StringDelimiter,
    incomment: bool,
    comment_marker: char,
    filter_comments: bool,
    filter_strings: bool,
}

impl<'a> CharFilter<'a> {
    /// Create a new `CharFilter`
    ///
    /// # Arguments
    /// * `content` - The string to iterate over
    /// * `filter_comments` - Whether to drop everything from the comment marker on
    /// * `filter_strings` - Whether to drop quoted strings, quotes included
    #[must_use]
    pub fn new(content: &'a str, filter_comments: bool, filter_strings: bool) -> Self {
        Self {
            chars: content.char_indices(),
            instring: StringDelimiter::None,
            incomment: false,
            comment_marker: DEFAULT_COMMENT_MARKER,
            filter_comments,
            filter_strings,
        }
    }

    /// Use a comment marker other than `!`
    #[must_use]
    pub fn with_comment_marker(mut self, marker: char) -> Self {
        self.comment_marker = marker;
        self
    }

    /// Check if we're currently inside a string
    #[must_use]
    pub fn instring(&self) -> bool {
        self.instring != StringDelimiter::None
    }

    /// Check if the scan has reached a comment
    #[must_use]
    pub fn incomment(&self) -> bool {
        self.incomment
    }

    /// Get the current string delimiter state
    #[must_use]
    pub fn get_string_state(&self) -> StringDelimiter {
        self.instring
    }

    /// Get the filtered content as a string
    pub fn filter_all(&mut self) -> String {
        let mut result = String::with_capacity(self.chars.size_hint().0);
        for (_, c) in self.by_ref() {
            result.push(c);
        }
        result
    }
}

impl Iterator for CharFilter<'_> {
    type Item = (usize, char);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (pos, c) = self.chars.next()?;

            if self.incomment {
                if self.filter_comments {
                    continue;
                }
                return Some((pos, c));
            }

            if self.instring != StringDelimiter::None {
                if self.instring.closed_by(c) {
                    self.instring = StringDelimiter::None;
                }
                if self.filter_strings {
                    continue;
                }
                return Some((pos, c));
            }

            if c == self.comment_marker {
                self.incomment = true;
                if self.filter_comments {
                    continue;
                }
                return Some((pos, c));
            }

            if let Some(delimiter) = StringDelimiter::opened_by(c) {
                self.instring = delimiter;
                if self.filter_strings {
                    continue;
                }
            }

            return Some((pos, c));
        }
    }
}
