/// Regex patterns and keyword tables for Fortran statement shapes
///
/// All patterns are compiled once at first use through `LazyLock` and are
/// case-insensitive. Patterns are applied to a single comment-free logical
/// statement, so none of them has to worry about continuation markers.
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

/// Build a case-insensitive regex from a compile-time constant pattern.
///
/// # Panics
///
/// Panics if the pattern is invalid. All patterns in this module are
/// constants exercised by the tests below.
fn build_re(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .unicode(true)
        .build()
        .unwrap_or_else(|_| panic!("Invalid regex pattern: {pattern}"))
}

const EOL_STR: &str = r"\s*$";
const SOL_STR: &str = r"^\s*";

// ===== TYPE KEYWORDS =====

/// Declaration type keywords recognised when the configuration names none
pub const DEFAULT_TYPE_KEYWORDS: &[&str] = &[
    "real",
    "integer",
    "logical",
    "character",
    "complex",
    "double precision",
    "type",
    "class",
];

/// Type keywords that only start a declaration when followed by `(`
///
/// `type point` opens a derived-type definition and `class default` is a
/// select-type guard; `type(point) :: p` is a declaration.
pub const PARENTHESIZED_TYPE_KEYWORDS: &[&str] = &["type", "class"];

/// Prefixes that may precede `subroutine` / `function` in a procedure header
pub const PROCEDURE_PREFIXES: &[&str] = &[
    "pure",
    "impure",
    "elemental",
    "recursive",
    "non_recursive",
    "module",
];

/// Specification statements that belong with the declarations but are never merged
pub const SPECIFICATION_KEYWORDS: &[&str] = &[
    "allocatable",
    "asynchronous",
    "bind",
    "codimension",
    "common",
    "contiguous",
    "data",
    "dimension",
    "equivalence",
    "external",
    "intent",
    "intrinsic",
    "namelist",
    "optional",
    "parameter",
    "pointer",
    "private",
    "procedure",
    "protected",
    "public",
    "save",
    "target",
    "value",
    "volatile",
];

// ===== IMPORT / MODE STATEMENTS =====

pub static USE_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"{SOL_STR}USE(\s+\w|\s*,|\s*::)")));
pub static IMPORT_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"{SOL_STR}IMPORT(\s+\w|\s*,|\s*::|{EOL_STR})")));
pub static INCLUDE_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r#"{SOL_STR}INCLUDE\s*['"]"#)));
pub static IMPLICIT_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"{SOL_STR}IMPLICIT(\s+\w|\s*\()")));

// ===== BODY-SPLIT MARKER =====

pub static CONTAINS_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"{SOL_STR}CONTAINS{EOL_STR}")));

// ===== NESTED SPECIFICATION CONSTRUCTS =====

pub static INTERFACE_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(&format!(
        r"{SOL_STR}(ABSTRACT\s+)?INTERFACE(\s+\w+|\s*(OPERATOR|ASSIGNMENT|READ|WRITE)\s*\(.*\))?{EOL_STR}"
    ))
});

/// Derived-type definition; group 1 is the type name
pub static TYPE_DEF_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(&format!(
        r"{SOL_STR}TYPE(?:\s*,[^:]*::|\s*::|\s+)\s*(\w+)\s*(?:\([^()]*\))?{EOL_STR}"
    ))
});

pub static ENUM_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(&format!(
        r"{SOL_STR}ENUM(\s*,\s*BIND\s*\(\s*C\s*\))?{EOL_STR}"
    ))
});

pub static BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(&format!(r"{SOL_STR}(\w+\s*:)?\s*BLOCK{EOL_STR}")));

// ===== PREPROCESSOR =====

pub static PREPROCESSOR_RE: LazyLock<Regex> = LazyLock::new(|| build_re(r"^\s*#"));

// ===== DECLARATION ITEMS =====

/// An entity in a declaration written without `::`: name, optional shape,
/// optional character length
pub static PLAIN_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    build_re(r"^[A-Z_]\w*\s*(\(.*\))?\s*(\*\s*(\d+|\(.*\)))?$")
});

// ===== TYPE SPEC NORMALIZATION =====

pub static WHITESPACE_RUN_RE: LazyLock<Regex> = LazyLock::new(|| build_re(r"\s+"));
pub static COMMA_SPACING_RE: LazyLock<Regex> = LazyLock::new(|| build_re(r"\s*,\s*"));
pub static OPEN_PAREN_SPACING_RE: LazyLock<Regex> = LazyLock::new(|| build_re(r"\s*\(\s*"));
pub static CLOSE_PAREN_SPACING_RE: LazyLock<Regex> = LazyLock::new(|| build_re(r"\s*\)"));
pub static OPERATOR_SPACING_RE: LazyLock<Regex> =
    LazyLock::new(|| build_re(r"\s*([=*:])\s*"));
