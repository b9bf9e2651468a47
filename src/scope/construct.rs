/// Tracking of nested constructs inside a block body
///
/// Interface blocks, derived-type definitions, enums, and BLOCK constructs
/// contain statements that look like block openers, `end` statements, or
/// declarations but belong to the construct. The tracker keeps a stack of
/// open constructs so callers can treat everything between a construct's
/// opening and closing statements as one group.
use crate::parser::patterns::{BLOCK_RE, ENUM_RE, INTERFACE_RE, TYPE_DEF_RE};

use super::statements::parse_end;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructKind {
    Interface,
    DerivedType,
    Enum,
    /// BLOCK construct (executable)
    Block,
}

impl ConstructKind {
    /// The keyword that follows `end` when the construct closes
    #[must_use]
    pub fn end_keyword(self) -> &'static str {
        match self {
            ConstructKind::Interface => "interface",
            ConstructKind::DerivedType => "type",
            ConstructKind::Enum => "enum",
            ConstructKind::Block => "block",
        }
    }

    /// Constructs that belong to the specification part
    #[must_use]
    pub fn is_specification(self) -> bool {
        !matches!(self, ConstructKind::Block)
    }
}

/// Recognise a statement that opens a construct
#[must_use]
pub fn opening_kind(text: &str) -> Option<ConstructKind> {
    if INTERFACE_RE.is_match(text) {
        return Some(ConstructKind::Interface);
    }
    if let Some(caps) = TYPE_DEF_RE.captures(text) {
        // "type is (real)" is a select-type guard
        if !caps[1].eq_ignore_ascii_case("is") {
            return Some(ConstructKind::DerivedType);
        }
    }
    if ENUM_RE.is_match(text) {
        return Some(ConstructKind::Enum);
    }
    if BLOCK_RE.is_match(text) {
        return Some(ConstructKind::Block);
    }
    None
}

/// Stack of open constructs
#[derive(Debug, Default, Clone)]
pub struct ConstructTracker {
    stack: Vec<ConstructKind>,
}

impl ConstructTracker {
    /// Whether a construct is currently open
    #[must_use]
    pub fn in_construct(&self) -> bool {
        !self.stack.is_empty()
    }

    /// Whether `text` is inside a construct or opens one
    #[must_use]
    pub fn claims(&self, text: &str) -> bool {
        self.in_construct() || opening_kind(text).is_some()
    }

    /// Feed the next statement
    ///
    /// Returns the outermost construct the statement belongs to, counting
    /// the opening and closing statements as members.
    pub fn observe(&mut self, text: &str) -> Option<ConstructKind> {
        let outermost = self.stack.first().copied();

        if let Some(kind) = opening_kind(text) {
            self.stack.push(kind);
            return outermost.or(Some(kind));
        }

        if let Some(&top) = self.stack.last() {
            if parse_end(text).is_some_and(|end| end.ends_construct(top.end_keyword())) {
                self.stack.pop();
            }
        }
        outermost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opening_kinds() {
        assert_eq!(opening_kind("interface"), Some(ConstructKind::Interface));
        assert_eq!(opening_kind("abstract interface"), Some(ConstructKind::Interface));
        assert_eq!(opening_kind("type :: point"), Some(ConstructKind::DerivedType));
        assert_eq!(opening_kind("type is (integer)"), None);
        assert_eq!(opening_kind("type(point) :: p"), None);
        assert_eq!(opening_kind("enum, bind(c)"), Some(ConstructKind::Enum));
        assert_eq!(opening_kind("outer: block"), Some(ConstructKind::Block));
        assert_eq!(opening_kind("x = 1"), None);
    }

    #[test]
    fn test_interface_group() {
        let mut tracker = ConstructTracker::default();
        let statements = [
            "interface",
            "subroutine ext(x)",
            "real :: x",
            "end subroutine ext",
            "end interface",
            "integer :: n",
        ];
        let kinds: Vec<_> = statements.iter().map(|s| tracker.observe(s)).collect();
        let interface = Some(ConstructKind::Interface);
        assert_eq!(
            kinds,
            vec![interface, interface, interface, interface, interface, None]
        );
        assert!(!tracker.in_construct());
    }

    #[test]
    fn test_nested_constructs_report_outermost() {
        let mut tracker = ConstructTracker::default();
        assert_eq!(tracker.observe("block"), Some(ConstructKind::Block));
        assert_eq!(tracker.observe("type :: local"), Some(ConstructKind::Block));
        assert_eq!(tracker.observe("end type"), Some(ConstructKind::Block));
        assert!(tracker.in_construct());
        assert_eq!(tracker.observe("end block"), Some(ConstructKind::Block));
        assert!(!tracker.in_construct());
    }

    #[test]
    fn test_claims() {
        let mut tracker = ConstructTracker::default();
        assert!(tracker.claims("type point"));
        assert!(!tracker.claims("integer :: i"));
        tracker.observe("type point");
        assert!(tracker.claims("integer :: i"));
        assert!(ConstructKind::DerivedType.is_specification());
        assert!(!ConstructKind::Block.is_specification());
    }
}
