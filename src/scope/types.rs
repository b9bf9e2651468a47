/// Program-unit and procedure block types
use std::fmt;

use crate::parser::LogicalStatement;

/// Kinds of block that own a declaration body
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BlockKind {
    Program,
    Module,
    Subroutine,
    Function,
}

impl BlockKind {
    /// The keyword that opens and closes this kind of block
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            BlockKind::Program => "program",
            BlockKind::Module => "module",
            BlockKind::Subroutine => "subroutine",
            BlockKind::Function => "function",
        }
    }

    /// Look up a block kind by keyword, ignoring case
    #[must_use]
    pub fn from_keyword(word: &str) -> Option<Self> {
        [
            BlockKind::Program,
            BlockKind::Module,
            BlockKind::Subroutine,
            BlockKind::Function,
        ]
        .into_iter()
        .find(|kind| kind.keyword().eq_ignore_ascii_case(word))
    }

    /// Subroutines and functions
    #[must_use]
    pub fn is_procedure(self) -> bool {
        matches!(self, BlockKind::Subroutine | BlockKind::Function)
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// An item in a block's child region or at the top level of a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Block(Block),
    /// A statement that belongs to no block and is reproduced as is
    Verbatim(LogicalStatement),
}

impl Node {
    /// Append the physical lines of this node to `out`
    pub fn write_lines(&self, out: &mut Vec<String>) {
        match self {
            Node::Block(block) => block.write_lines(out),
            Node::Verbatim(statement) => out.extend(statement.lines.iter().cloned()),
        }
    }
}

/// A program unit or procedure with its own declaration body
///
/// A block is split in two regions: its own body (header through the
/// statement before `contains`) and the child region after `contains`,
/// which holds nested blocks and the statements between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    /// Lowercase block name; None for a header-less main program
    pub name: Option<String>,
    /// Opening statement; None for a header-less main program
    pub header: Option<LogicalStatement>,
    /// Statements between the header and `contains` (or the end)
    pub body: Vec<LogicalStatement>,
    /// The `contains` statement, when present
    pub contains: Option<LogicalStatement>,
    pub children: Vec<Node>,
    pub end: LogicalStatement,
}

impl Block {
    /// Header-less main program
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.header.is_none()
    }

    /// Index of the `contains` statement counted over header and body,
    /// if the block has one
    #[must_use]
    pub fn split_marker_index(&self) -> Option<usize> {
        self.contains
            .as_ref()
            .map(|_| usize::from(self.header.is_some()) + self.body.len())
    }

    /// Nested blocks in the child region
    pub fn child_blocks(&self) -> impl Iterator<Item = &Block> {
        self.children.iter().filter_map(|child| match child {
            Node::Block(block) => Some(block),
            Node::Verbatim(_) => None,
        })
    }

    /// Append the physical lines of this block, in order, to `out`
    pub fn write_lines(&self, out: &mut Vec<String>) {
        if let Some(header) = &self.header {
            out.extend(header.lines.iter().cloned());
        }
        for statement in &self.body {
            out.extend(statement.lines.iter().cloned());
        }
        if let Some(contains) = &self.contains {
            out.extend(contains.lines.iter().cloned());
        }
        for child in &self.children {
            child.write_lines(out);
        }
        out.extend(self.end.lines.iter().cloned());
    }

    /// The physical lines of this block
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.write_lines(&mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stmt(text: &str) -> LogicalStatement {
        LogicalStatement::single_line(text.to_string(), 1)
    }

    #[test]
    fn test_keywords() {
        assert_eq!(BlockKind::from_keyword("SUBROUTINE"), Some(BlockKind::Subroutine));
        assert_eq!(BlockKind::from_keyword("Module"), Some(BlockKind::Module));
        assert_eq!(BlockKind::from_keyword("block"), None);
        assert_eq!(BlockKind::Function.to_string(), "function");
        assert!(BlockKind::Function.is_procedure());
        assert!(!BlockKind::Program.is_procedure());
    }

    #[test]
    fn test_block_lines_and_split_index() {
        let inner = Block {
            kind: BlockKind::Subroutine,
            name: Some("s".to_string()),
            header: Some(stmt("subroutine s")),
            body: vec![],
            contains: None,
            children: vec![],
            end: stmt("end subroutine s"),
        };
        let outer = Block {
            kind: BlockKind::Module,
            name: Some("m".to_string()),
            header: Some(stmt("module m")),
            body: vec![stmt("integer :: x")],
            contains: Some(stmt("contains")),
            children: vec![Node::Block(inner)],
            end: stmt("end module m"),
        };
        assert_eq!(outer.split_marker_index(), Some(2));
        assert_eq!(outer.child_blocks().count(), 1);
        assert_eq!(
            outer.lines(),
            vec![
                "module m",
                "integer :: x",
                "contains",
                "subroutine s",
                "end subroutine s",
                "end module m"
            ]
        );
    }
}
