//! Command-line interface for fdecl.
//!
//! Defines CLI arguments using clap builder API

use std::path::PathBuf;

use clap::{Arg, ArgAction, Command};

use crate::config::MergeMode;

/// CLI arguments parsed from command line
#[derive(Debug, Clone)]
pub struct CliArgs {
    /// Files or directories to rewrite
    pub inputs: Vec<PathBuf>,

    /// Write the result to this file instead of stdout
    pub output: Option<PathBuf>,

    /// Maximum width of rewritten declarations
    pub line_length: Option<usize>,

    /// Rewrite files in place
    pub in_place: bool,

    /// Reorganize, merge, or both
    pub mode: Option<MergeMode>,

    /// Extra indent of wrapped continuation lines
    pub continuation_indent: Option<usize>,

    /// Keep `;`-separated statements on one line
    pub no_split_statements: bool,

    pub add_implicit_none: bool,

    /// Insert `::` into declarations that lack it
    pub add_colons: bool,

    /// Emit CRLF line endings
    pub crlf: bool,

    /// Print the procedure index instead of rewriting
    pub list_procedures: bool,

    /// Explicit config file (skips discovery)
    pub config: Option<PathBuf>,

    /// Descend into directories
    pub recursive: bool,

    /// Glob patterns of paths to skip
    pub exclude: Vec<String>,

    /// Number of parallel jobs (0 = auto)
    pub jobs: Option<usize>,

    pub debug: bool,

    /// No progress output
    pub silent: bool,
}

/// Build the CLI command definition
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn build_cli() -> Command {
    Command::new("fdecl")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Reorganize and consolidate Fortran declaration statements")
        .arg(
            Arg::new("inputs")
                .help("Files or directories to rewrite ('-' or none for stdin)")
                .value_name("FILE")
                .num_args(1..)
                .required(false)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Write the result to FILE (single input only)")
                .value_name("FILE")
                .conflicts_with("in-place")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("width")
                .short('w')
                .long("width")
                .help("Maximum line width of rewritten declarations [default: 80]")
                .value_name("NUM")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("in-place")
                .short('i')
                .long("in-place")
                .help("Rewrite files in place")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("mode")
                .short('m')
                .long("mode")
                .help("What to do with declarations [default: reorganize-merge]")
                .value_name("MODE")
                .value_parser(["reorganize", "merge", "reorganize-merge"]),
        )
        .arg(
            Arg::new("continuation-indent")
                .long("continuation-indent")
                .help("Extra indent of wrapped continuation lines [default: 3]")
                .value_name("NUM")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("no-split-statements")
                .long("no-split-statements")
                .help("Do not split ';'-separated statements")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("add-implicit-none")
                .long("add-implicit-none")
                .help("Insert 'implicit none' where no typing mode is declared")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("add-colons")
                .long("add-colons")
                .help("Insert '::' into declarations that lack it")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("crlf")
                .long("crlf")
                .help("Use CRLF line endings in the output")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-procedures")
                .short('p')
                .long("list-procedures")
                .help("List the procedures of each file instead of rewriting")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to config file (skips fdecl.toml discovery)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("recursive")
                .short('r')
                .long("recursive")
                .help("Recursively process directories")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("exclude")
                .short('e')
                .long("exclude")
                .help("Skip files matching this glob pattern (can be repeated)")
                .value_name("PATTERN")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("jobs")
                .short('j')
                .long("jobs")
                .help("Number of parallel jobs (0=auto, 1=sequential)")
                .value_name("NUM")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("debug")
                .short('D')
                .long("debug")
                .help("Enable debug logging (config, classification fallbacks)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("silent")
                .short('S')
                .long("silent")
                .help("Silent mode (no progress output)")
                .action(ArgAction::SetTrue),
        )
}

/// Parse CLI arguments from command line
#[must_use]
pub fn parse_args() -> CliArgs {
    args_from_matches(&build_cli().get_matches())
}

/// Parse CLI arguments from an iterator (for testing)
#[must_use]
pub fn parse_args_from<I, T>(args: I) -> CliArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    args_from_matches(&build_cli().get_matches_from(args))
}

/// Convert clap `ArgMatches` to `CliArgs`
fn args_from_matches(matches: &clap::ArgMatches) -> CliArgs {
    CliArgs {
        inputs: matches
            .get_many::<PathBuf>("inputs")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default(),
        output: matches.get_one::<PathBuf>("output").cloned(),
        line_length: matches.get_one::<usize>("width").copied(),
        in_place: matches.get_flag("in-place"),
        // the value parser only admits valid mode names
        mode: matches
            .get_one::<String>("mode")
            .and_then(|m| m.parse().ok()),
        continuation_indent: matches.get_one::<usize>("continuation-indent").copied(),
        no_split_statements: matches.get_flag("no-split-statements"),
        add_implicit_none: matches.get_flag("add-implicit-none"),
        add_colons: matches.get_flag("add-colons"),
        crlf: matches.get_flag("crlf"),
        list_procedures: matches.get_flag("list-procedures"),
        config: matches.get_one::<PathBuf>("config").cloned(),
        recursive: matches.get_flag("recursive"),
        exclude: matches
            .get_many::<String>("exclude")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default(),
        jobs: matches.get_one::<usize>("jobs").copied(),
        debug: matches.get_flag("debug"),
        silent: matches.get_flag("silent"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_builds() {
        let cmd = build_cli();
        assert_eq!(cmd.get_name(), "fdecl");
        cmd.debug_assert();
    }

    #[test]
    fn test_cli_defaults() {
        let args = parse_args_from(vec!["fdecl"]);
        assert!(args.inputs.is_empty());
        assert!(!args.in_place);
        assert!(!args.list_procedures);
        assert_eq!(args.line_length, None);
        assert_eq!(args.mode, None);
        assert!(args.exclude.is_empty());
    }

    #[test]
    fn test_width_and_mode() {
        let args = parse_args_from(vec!["fdecl", "-w", "100", "-m", "merge", "file.f90"]);
        assert_eq!(args.line_length, Some(100));
        assert_eq!(args.mode, Some(MergeMode::Merge));
        assert_eq!(args.inputs, vec![PathBuf::from("file.f90")]);
    }

    #[test]
    fn test_invalid_mode_rejected() {
        let result = build_cli().try_get_matches_from(vec!["fdecl", "--mode", "sort", "a.f90"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_output_conflicts_with_in_place() {
        let result =
            build_cli().try_get_matches_from(vec!["fdecl", "-i", "-o", "out.f90", "a.f90"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_rewrite_flags() {
        let args = parse_args_from(vec![
            "fdecl",
            "--continuation-indent",
            "5",
            "--no-split-statements",
            "--add-implicit-none",
            "--add-colons",
            "--crlf",
            "a.f90",
        ]);
        assert_eq!(args.continuation_indent, Some(5));
        assert!(args.no_split_statements);
        assert!(args.add_implicit_none);
        assert!(args.add_colons);
        assert!(args.crlf);
    }

    #[test]
    fn test_exclude_multiple() {
        let args = parse_args_from(vec![
            "fdecl", "-r", "-e", "*.mod", "--exclude", "build*", "src/",
        ]);
        assert!(args.recursive);
        assert_eq!(args.exclude, vec!["*.mod", "build*"]);
    }

    #[test]
    fn test_list_procedures_and_jobs() {
        let args = parse_args_from(vec!["fdecl", "-p", "-j", "4", "-D", "-S", "a.f90"]);
        assert!(args.list_procedures);
        assert_eq!(args.jobs, Some(4));
        assert!(args.debug);
        assert!(args.silent);
    }
}
