//! Configuration management for fdecl.
//!
//! This module provides the [`Config`] struct which controls all rewriting behavior.
//! Configuration can be loaded from:
//! - TOML files (`fdecl.toml`)
//! - CLI arguments (which override file settings)
//! - In-file directives (`! fdecl: --width 100`)
//!
//! Config files are auto-discovered by searching parent directories from the file
//! being rewritten up to the filesystem root, plus the user's home directory.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::format::WrapSettings;
use crate::parser::patterns::DEFAULT_TYPE_KEYWORDS;
use crate::parser::Syntax;

/// Config file names to search for (in order of priority, later overrides earlier)
const CONFIG_FILE_NAMES: &[&str] = &["fdecl.toml"];

/// Get the user's home directory
fn dirs_home() -> Option<PathBuf> {
    // Try HOME environment variable first (works on Unix and some Windows setups)
    if let Ok(home) = std::env::var("HOME") {
        return Some(PathBuf::from(home));
    }
    // Fallback for Windows
    if let Ok(userprofile) = std::env::var("USERPROFILE") {
        return Some(PathBuf::from(userprofile));
    }
    None
}

/// Which rewrites run on each block body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergeMode {
    /// Reorder only
    Reorganize,
    /// Merge and wrap only
    Merge,
    /// Reorder, then merge and wrap
    #[default]
    ReorganizeMerge,
}

impl MergeMode {
    #[must_use]
    pub fn reorganizes(self) -> bool {
        matches!(self, MergeMode::Reorganize | MergeMode::ReorganizeMerge)
    }

    #[must_use]
    pub fn merges(self) -> bool {
        matches!(self, MergeMode::Merge | MergeMode::ReorganizeMerge)
    }
}

impl FromStr for MergeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reorganize" => Ok(MergeMode::Reorganize),
            "merge" => Ok(MergeMode::Merge),
            "reorganize-merge" => Ok(MergeMode::ReorganizeMerge),
            other => Err(format!(
                "unknown mode '{other}' (expected reorganize, merge, or reorganize-merge)"
            )),
        }
    }
}

impl fmt::Display for MergeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MergeMode::Reorganize => "reorganize",
            MergeMode::Merge => "merge",
            MergeMode::ReorganizeMerge => "reorganize-merge",
        })
    }
}

/// Line terminator written between output lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    #[default]
    Lf,
    Crlf,
}

impl LineEnding {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Crlf => "\r\n",
        }
    }
}

// Serde default functions
fn default_line_length() -> usize {
    80
}
fn default_continuation_indent() -> usize {
    3
}
fn default_type_keywords() -> Vec<String> {
    DEFAULT_TYPE_KEYWORDS.iter().map(|s| (*s).to_string()).collect()
}
fn default_continuation_marker() -> char {
    '&'
}
fn default_comment_marker() -> char {
    '!'
}
fn default_statement_separator() -> char {
    ';'
}
fn default_true() -> bool {
    true
}

/// Main configuration struct for fdecl
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Maximum width of rewritten declaration lines (default: 80)
    #[serde(default = "default_line_length")]
    pub line_length: usize,

    /// Extra indentation of wrapped continuation lines (default: 3)
    #[serde(default = "default_continuation_indent")]
    pub continuation_indent: usize,

    /// Declaration type keywords
    #[serde(default = "default_type_keywords")]
    pub type_keywords: Vec<String>,

    /// Continuation marker (default: `&`)
    #[serde(default = "default_continuation_marker")]
    pub continuation_marker: char,

    /// Comment marker (default: `!`)
    #[serde(default = "default_comment_marker")]
    pub comment_marker: char,

    /// Statement separator (default: `;`)
    #[serde(default = "default_statement_separator")]
    pub statement_separator: char,

    /// Which rewrites to run (default: reorganize-merge)
    #[serde(default)]
    pub mode: MergeMode,

    /// Output line terminator (default: lf)
    #[serde(default)]
    pub line_ending: LineEnding,

    /// Split statements at top-level separators before classifying (default: true)
    #[serde(default = "default_true")]
    pub split_statements: bool,

    /// Insert `implicit none` into blocks that lack it (default: false)
    #[serde(default)]
    pub add_implicit_none: bool,

    /// Add `::` to declarations written without it (default: false)
    #[serde(default)]
    pub add_colons: bool,
}

/// Partial configuration for TOML parsing
///
/// All fields are `Option<T>` so we can distinguish between
/// "explicitly set" and "not specified" when merging configs.
#[derive(Debug, Clone, Default, Deserialize)]
struct PartialConfig {
    pub line_length: Option<usize>,
    pub continuation_indent: Option<usize>,
    pub type_keywords: Option<Vec<String>>,
    pub continuation_marker: Option<char>,
    pub comment_marker: Option<char>,
    pub statement_separator: Option<char>,
    pub mode: Option<MergeMode>,
    pub line_ending: Option<LineEnding>,
    pub split_statements: Option<bool>,
    pub add_implicit_none: Option<bool>,
    pub add_colons: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            line_length: 80,
            continuation_indent: 3,
            type_keywords: default_type_keywords(),
            continuation_marker: '&',
            comment_marker: '!',
            statement_separator: ';',
            mode: MergeMode::ReorganizeMerge,
            line_ending: LineEnding::Lf,
            split_statements: true,
            add_implicit_none: false,
            add_colons: false,
        }
    }
}

impl Config {
    /// Minimum line length (must fit a type spec and one entity)
    const MIN_LINE_LENGTH: usize = 20;
    /// Maximum reasonable line length
    const MAX_LINE_LENGTH: usize = 1000;
    /// Maximum continuation indent
    const MAX_CONTINUATION_INDENT: usize = 20;

    /// Validate configuration values are within reasonable bounds
    ///
    /// Returns an error message if validation fails, None if valid.
    #[must_use]
    pub fn validate(&self) -> Option<String> {
        if self.line_length < Self::MIN_LINE_LENGTH {
            return Some(format!(
                "line_length {} is below minimum of {}",
                self.line_length,
                Self::MIN_LINE_LENGTH
            ));
        }
        if self.line_length > Self::MAX_LINE_LENGTH {
            return Some(format!(
                "line_length {} exceeds maximum of {}",
                self.line_length,
                Self::MAX_LINE_LENGTH
            ));
        }
        if self.continuation_indent > Self::MAX_CONTINUATION_INDENT {
            return Some(format!(
                "continuation_indent {} exceeds maximum of {}",
                self.continuation_indent,
                Self::MAX_CONTINUATION_INDENT
            ));
        }

        let markers = [
            ("continuation_marker", self.continuation_marker),
            ("comment_marker", self.comment_marker),
            ("statement_separator", self.statement_separator),
        ];
        for (name, marker) in markers {
            if marker.is_whitespace() || marker.is_alphanumeric() || marker == '_' {
                return Some(format!("{name} '{marker}' must be a punctuation character"));
            }
            if marker == '\'' || marker == '"' {
                return Some(format!("{name} cannot be a quote character"));
            }
        }
        if self.continuation_marker == self.comment_marker
            || self.continuation_marker == self.statement_separator
            || self.comment_marker == self.statement_separator
        {
            return Some("continuation_marker, comment_marker and statement_separator must differ".to_string());
        }

        if self.type_keywords.iter().any(|k| k.trim().is_empty()) {
            return Some("type_keywords cannot contain empty entries".to_string());
        }
        None
    }

    /// Lexical settings for the parser
    #[must_use]
    pub fn syntax(&self) -> Syntax {
        Syntax {
            continuation_marker: self.continuation_marker,
            comment_marker: self.comment_marker,
            statement_separator: self.statement_separator,
            type_keywords: self
                .type_keywords
                .iter()
                .map(|k| k.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase())
                .collect(),
        }
    }

    /// Settings for wrapping merged declarations
    #[must_use]
    pub fn wrap_settings(&self) -> WrapSettings {
        WrapSettings {
            width: self.line_length,
            continuation_indent: self.continuation_indent,
            continuation_marker: self.continuation_marker,
        }
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let partial: PartialConfig = toml::from_str(&contents)?;
        let mut config = Self::default();
        config.apply_partial(&partial);
        Ok(config)
    }

    /// Apply a partial config, only overriding fields that are explicitly set
    fn apply_partial(&mut self, partial: &PartialConfig) {
        if let Some(v) = partial.line_length {
            self.line_length = v;
        }
        if let Some(v) = partial.continuation_indent {
            self.continuation_indent = v;
        }
        if let Some(v) = &partial.type_keywords {
            self.type_keywords.clone_from(v);
        }
        if let Some(v) = partial.continuation_marker {
            self.continuation_marker = v;
        }
        if let Some(v) = partial.comment_marker {
            self.comment_marker = v;
        }
        if let Some(v) = partial.statement_separator {
            self.statement_separator = v;
        }
        if let Some(v) = partial.mode {
            self.mode = v;
        }
        if let Some(v) = partial.line_ending {
            self.line_ending = v;
        }
        if let Some(v) = partial.split_statements {
            self.split_statements = v;
        }
        if let Some(v) = partial.add_implicit_none {
            self.add_implicit_none = v;
        }
        if let Some(v) = partial.add_colons {
            self.add_colons = v;
        }
    }

    /// Discover config files from parent directories of a given path
    ///
    /// Searches from the file's directory up to the root, then adds home directory config.
    /// Returns list of config file paths in order of priority (least specific first).
    #[must_use]
    pub fn discover_config_files(start_path: &Path) -> Vec<PathBuf> {
        let mut config_files = Vec::new();

        // Home directory config first (lowest priority)
        if let Some(home) = dirs_home() {
            for config_name in CONFIG_FILE_NAMES {
                let home_config = home.join(config_name);
                if home_config.is_file() {
                    config_files.push(home_config);
                }
            }
        }

        let start_dir = if start_path.is_file() {
            start_path.parent().map(Path::to_path_buf)
        } else if start_path.is_dir() {
            Some(start_path.to_path_buf())
        } else {
            std::env::current_dir().ok()
        };

        if let Some(dir) = start_dir {
            let mut ancestors: Vec<PathBuf> = dir.ancestors().map(Path::to_path_buf).collect();
            // Root first, so nearer files override farther ones
            ancestors.reverse();

            for ancestor in ancestors {
                for config_name in CONFIG_FILE_NAMES {
                    let config_path = ancestor.join(config_name);
                    if config_path.is_file() && !config_files.contains(&config_path) {
                        config_files.push(config_path);
                    }
                }
            }
        }

        config_files
    }

    /// Load and merge configuration from discovered config files
    ///
    /// Later files override earlier ones (only explicitly set values).
    /// Returns default config if no files found.
    #[must_use]
    pub fn from_discovered_files(start_path: &Path) -> Self {
        let mut config = Self::default();
        for path in &Self::discover_config_files(start_path) {
            match std::fs::read_to_string(path) {
                Ok(contents) => match toml::from_str::<PartialConfig>(&contents) {
                    Ok(partial) => config.apply_partial(&partial),
                    Err(e) => warn!("Failed to parse {}: {e}", path.display()),
                },
                Err(e) => warn!("Failed to read {}: {e}", path.display()),
            }
        }
        config
    }
}
