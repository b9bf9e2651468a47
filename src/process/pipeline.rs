//! Declaration rewriting pipeline
//!
//! Runs the stages in order:
//! - Line normalization (continuations joined, comments split off)
//! - Statement segmentation (optional)
//! - Block extraction
//! - Per-block classification, reordering, and merging
//! - Re-linearization of the block tree into output lines

use std::io::{BufRead, BufReader, Write};

use anyhow::{bail, Context};
use log::debug;

use crate::config::Config;
use crate::format::{
    add_double_colons, classify_body, has_mode_statement, has_preprocessor, insert_implicit_none,
    merge_declarations, reorganize, WrapSettings,
};
use crate::parser::{segment_all, InputStream, LogicalStatement, Syntax};
use crate::scope::{extract_units, index_procedures, Block, Node, ProcedureIndex};
use crate::Result;

/// Applies the configured rewrites to one block tree
struct BlockRewriter<'a> {
    config: &'a Config,
    syntax: Syntax,
    wrap: WrapSettings,
}

impl<'a> BlockRewriter<'a> {
    fn new(config: &'a Config) -> Self {
        Self {
            config,
            syntax: config.syntax(),
            wrap: config.wrap_settings(),
        }
    }

    fn write_node(&self, node: &Node, out: &mut Vec<String>) {
        match node {
            Node::Block(block) => self.write_block(block, false, out),
            Node::Verbatim(statement) => out.extend(statement.lines.iter().cloned()),
        }
    }

    /// Rewrite the own body of `block`, then its children
    ///
    /// `inherited_mode` is true when an enclosing block declares an
    /// implicit typing mode, which also covers this block.
    fn write_block(&self, block: &Block, inherited_mode: bool, out: &mut Vec<String>) {
        if let Some(header) = &block.header {
            out.extend(header.lines.iter().cloned());
        }

        let mut items = classify_body(&block.body, &self.syntax);
        let mut has_mode = inherited_mode || has_mode_statement(&items);

        if has_preprocessor(&items) {
            debug!(
                "{} {}: preprocessor lines in body; left unchanged",
                block.kind,
                block.name.as_deref().unwrap_or("<main>")
            );
        } else {
            if self.config.add_colons {
                items = add_double_colons(items, &self.syntax, &self.wrap);
            }
            if self.config.mode.reorganizes() {
                items = reorganize(items);
            }
            if let Some(header) = &block.header {
                if self.config.add_implicit_none && !has_mode {
                    insert_implicit_none(&mut items, header, self.config.continuation_indent);
                    has_mode = true;
                }
            }
            if self.config.mode.merges() {
                items = merge_declarations(items, &self.syntax, &self.wrap);
            }
        }

        for item in items {
            out.extend(item.statement.lines);
        }

        if let Some(contains) = &block.contains {
            out.extend(contains.lines.iter().cloned());
        }
        for child in &block.children {
            match child {
                Node::Block(nested) => self.write_block(nested, has_mode, out),
                Node::Verbatim(statement) => out.extend(statement.lines.iter().cloned()),
            }
        }
        out.extend(block.end.lines.iter().cloned());
    }
}

/// Read logical statements from `source`
fn normalize(source: &str, syntax: &Syntax) -> Result<Vec<LogicalStatement>> {
    let reader = BufReader::new(source.as_bytes());
    InputStream::new(reader, syntax).collect_statements()
}

/// Rewrite a whole source text
///
/// The output uses the configured line ending and ends with one only when
/// the input did. On a structural error nothing is produced.
pub fn transform_source(source: &str, config: &Config) -> Result<String> {
    if let Some(message) = config.validate() {
        bail!("Invalid configuration: {message}");
    }

    let syntax = config.syntax();
    let mut statements = normalize(source, &syntax)?;
    if config.split_statements {
        statements = segment_all(statements, &syntax);
    }
    let units = extract_units(&statements, &syntax)?;

    let rewriter = BlockRewriter::new(config);
    let mut lines = Vec::new();
    for unit in &units {
        rewriter.write_node(unit, &mut lines);
    }

    let eol = config.line_ending.as_str();
    let mut output = lines.join(eol);
    if source.ends_with('\n') && !lines.is_empty() {
        output.push_str(eol);
    }
    Ok(output)
}

/// Index the top-level procedures of a source text
pub fn list_procedures(source: &str, config: &Config) -> Result<ProcedureIndex> {
    let syntax = config.syntax();
    let statements = normalize(source, &syntax)?;
    Ok(index_procedures(&statements, &syntax))
}

/// Rewrite a Fortran file
///
/// Reads all of `input`, rewrites it, and writes the result to `output`.
pub fn format_file<R: BufRead, W: Write>(
    input: R,
    output: &mut W,
    config: &Config,
    filename: &str,
) -> Result<()> {
    let mut source = String::new();
    let mut reader = input;
    reader
        .read_to_string(&mut source)
        .with_context(|| format!("{filename}: input is not valid UTF-8 text"))?;

    let result =
        transform_source(&source, config).with_context(|| format!("Failed to process {filename}"))?;
    output.write_all(result.as_bytes())?;
    Ok(())
}
