//! fdecl - Reorganize and consolidate Fortran declaration statements

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::fs::File;
use std::io::{self, BufReader, Cursor, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{bail, Context};
use fdecl::process::{format_file, list_procedures};
use fdecl::{find_directive, parse_args, CliArgs, Config, LineEnding, Result};
use glob::Pattern;
use log::{debug, info};
use rayon::prelude::*;
use walkdir::WalkDir;

/// Fortran file extensions picked up when walking directories
const FORTRAN_EXTENSIONS: &[&str] = &[
    "f90", "f95", "f03", "f08", "f18", "f", "for", "ftn", "fpp", "F90", "F95", "F03", "F08", "F18",
    "F", "FOR", "FTN", "FPP",
];

/// Files larger than this are skipped
const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Where the rewritten text of one input goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Destination<'a> {
    Stdout,
    File(&'a Path),
    InPlace,
}

fn main() {
    let args = parse_args();
    init_logging(&args);

    if let Err(e) = run(&args) {
        if !args.silent {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(1);
    }
}

fn init_logging(args: &CliArgs) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if args.debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format_timestamp(None).init();
}

fn run(args: &CliArgs) -> Result<()> {
    let use_stdin =
        args.inputs.is_empty() || (args.inputs.len() == 1 && args.inputs[0].as_os_str() == "-");

    if args.inputs.is_empty() && io::stdin().is_terminal() {
        print_usage();
        return Ok(());
    }

    if use_stdin {
        if args.in_place {
            bail!("--in-place needs at least one input file");
        }
        let config = build_config(args, None)?;
        return process_stdin(&config, args);
    }

    if let Some(jobs) = args.jobs {
        if jobs > 0 {
            if let Err(e) = rayon::ThreadPoolBuilder::new()
                .num_threads(jobs)
                .build_global()
            {
                log::warn!("Failed to configure thread pool: {e}");
            }
        }
    }

    let files = collect_files(args);
    if files.is_empty() {
        if !args.silent {
            eprintln!("No Fortran files found.");
        }
        return Ok(());
    }

    let destination = if args.list_procedures {
        Destination::Stdout
    } else if let Some(output) = &args.output {
        if files.len() > 1 {
            bail!("--output takes exactly one input file, got {}", files.len());
        }
        Destination::File(output)
    } else if args.in_place {
        Destination::InPlace
    } else {
        Destination::Stdout
    };

    // An explicit config file applies to every input; otherwise each file
    // discovers its own
    let base_config = match &args.config {
        Some(_) => Some(build_config(args, None)?),
        None => None,
    };

    let failures = if destination == Destination::InPlace && args.jobs != Some(1) {
        process_files_parallel(&files, base_config.as_ref(), args)
    } else {
        process_files_sequential(&files, base_config.as_ref(), args, destination)
    };

    if failures > 0 {
        bail!("{failures} of {} files failed", files.len());
    }
    Ok(())
}

/// Build configuration from CLI args and config files
///
/// With no explicit `--config`, files are discovered starting at `for_path`
/// (or the current directory).
fn build_config(args: &CliArgs, for_path: Option<&Path>) -> Result<Config> {
    let mut config = if let Some(config_path) = &args.config {
        debug!("Using explicit config file: {}", config_path.display());
        Config::from_toml_file(config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()))?
    } else {
        let start = match for_path {
            Some(path) => path.to_path_buf(),
            None => std::env::current_dir().unwrap_or_default(),
        };
        for found in Config::discover_config_files(&start) {
            debug!("Discovered config file: {}", found.display());
        }
        Config::from_discovered_files(&start)
    };

    if let Some(line_length) = args.line_length {
        config.line_length = line_length;
    }
    if let Some(indent) = args.continuation_indent {
        config.continuation_indent = indent;
    }
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if args.no_split_statements {
        config.split_statements = false;
    }
    if args.add_implicit_none {
        config.add_implicit_none = true;
    }
    if args.add_colons {
        config.add_colons = true;
    }
    if args.crlf {
        config.line_ending = LineEnding::Crlf;
    }

    debug!("Configuration: {config:?}");

    if let Some(error) = config.validate() {
        bail!("Invalid configuration: {error}");
    }

    Ok(config)
}

/// Collect all files to process, handling directories and the recursive flag
fn collect_files(args: &CliArgs) -> Vec<PathBuf> {
    let exclude_patterns: Vec<Pattern> = args
        .exclude
        .iter()
        .filter_map(|p| match Pattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                log::warn!("Ignoring exclude pattern '{p}': {e}");
                None
            }
        })
        .collect();

    let mut files = Vec::new();

    for input in &args.inputs {
        if input.is_file() {
            if !is_excluded(input, &exclude_patterns) {
                files.push(input.clone());
            }
        } else if input.is_dir() {
            let max_depth = if args.recursive { 256 } else { 1 };
            for entry in WalkDir::new(input)
                .follow_links(true)
                .max_depth(max_depth)
                .sort_by_file_name()
                .into_iter()
                .filter_map(std::result::Result::ok)
            {
                let path = entry.path();
                if path.is_file() && is_fortran_file(path) && !is_excluded(path, &exclude_patterns)
                {
                    files.push(path.to_path_buf());
                }
            }
        } else {
            // reading it reports the failure
            files.push(input.clone());
        }
    }

    files
}

/// Check if a path matches any exclusion pattern
fn is_excluded(path: &Path, patterns: &[Pattern]) -> bool {
    if patterns.is_empty() {
        return false;
    }

    let path_str = path.to_string_lossy();

    patterns.iter().any(|pattern| {
        pattern.matches(&path_str)
            || path.components().any(|component| match component {
                std::path::Component::Normal(c) => pattern.matches(&c.to_string_lossy()),
                _ => false,
            })
    })
}

fn is_fortran_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| FORTRAN_EXTENSIONS.contains(&ext))
}

/// Process files one after another; returns the number of failures
fn process_files_sequential(
    files: &[PathBuf],
    base_config: Option<&Config>,
    args: &CliArgs,
    destination: Destination<'_>,
) -> usize {
    let mut failures = 0;
    for path in files {
        if let Err(e) = process_with_config(path, base_config, args, destination) {
            failures += 1;
            report_failure(path, &e, args);
        }
    }
    failures
}

/// Rewrite files in place using Rayon; returns the number of failures
fn process_files_parallel(files: &[PathBuf], base_config: Option<&Config>, args: &CliArgs) -> usize {
    let success_count = AtomicUsize::new(0);
    let error_count = AtomicUsize::new(0);

    files.par_iter().for_each(|path| {
        match process_with_config(path, base_config, args, Destination::InPlace) {
            Ok(()) => {
                success_count.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                error_count.fetch_add(1, Ordering::Relaxed);
                report_failure(path, &e, args);
            }
        }
    });

    let success = success_count.load(Ordering::Relaxed);
    let errors = error_count.load(Ordering::Relaxed);

    if !args.silent {
        if errors == 0 {
            eprintln!("Rewrote {success} files successfully.");
        } else {
            eprintln!("Rewrote {success} files, {errors} errors.");
        }
    }
    errors
}

fn report_failure(path: &Path, e: &anyhow::Error, args: &CliArgs) {
    if !args.silent {
        eprintln!("Error processing {}: {e:#}", path.display());
    }
}

fn process_with_config(
    path: &Path,
    base_config: Option<&Config>,
    args: &CliArgs,
    destination: Destination<'_>,
) -> Result<()> {
    match base_config {
        Some(config) => process_single_file(path, config, args, destination),
        None => {
            let config = build_config(args, Some(path))?;
            process_single_file(path, &config, args, destination)
        }
    }
}

/// Apply the first in-file directive, if any, to a per-file copy of `config`
fn with_directive_overrides(config: &Config, contents: &[u8], source_name: &str) -> Config {
    let mut file_config = config.clone();
    let mut reader = BufReader::new(Cursor::new(contents));
    if let Some(overrides) = find_directive(&mut reader, config.comment_marker) {
        debug!("Found file directive in {source_name}: {overrides:?}");
        overrides.apply(&mut file_config);
    }
    file_config
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    let file_size = std::fs::metadata(path)?.len();
    if file_size > DEFAULT_MAX_FILE_SIZE {
        bail!(
            "{} MB exceeds limit of {} MB",
            file_size / (1024 * 1024),
            DEFAULT_MAX_FILE_SIZE / (1024 * 1024)
        );
    }
    let mut contents = Vec::new();
    File::open(path)?.read_to_end(&mut contents)?;
    Ok(contents)
}

/// Process a single file
fn process_single_file(
    path: &Path,
    config: &Config,
    args: &CliArgs,
    destination: Destination<'_>,
) -> Result<()> {
    let contents = read_input(path)?;
    let name = path.to_string_lossy();
    let file_config = with_directive_overrides(config, &contents, &name);

    if args.list_procedures {
        let source = std::str::from_utf8(&contents)
            .with_context(|| format!("{name}: input is not valid UTF-8 text"))?;
        let output = render_procedures(source, &file_config, Some(&*name))?;
        io::stdout().write_all(output.as_bytes())?;
        return Ok(());
    }

    info!("Rewriting {name}");
    let mut output = Vec::new();
    format_file(
        BufReader::new(Cursor::new(&contents)),
        &mut output,
        &file_config,
        &name,
    )?;

    match destination {
        Destination::Stdout => io::stdout().write_all(&output)?,
        Destination::File(target) => std::fs::write(target, &output)
            .with_context(|| format!("Failed to write {}", target.display()))?,
        Destination::InPlace => {
            // unchanged files are not rewritten
            if output != contents {
                std::fs::write(path, &output)?;
            }
        }
    }

    Ok(())
}

/// One line per procedure: kind, name, and line range
fn render_procedures(source: &str, config: &Config, file: Option<&str>) -> Result<String> {
    let index = list_procedures(source, config)?;
    let prefix = file.map(|f| format!("{f}:")).unwrap_or_default();
    Ok(index
        .values()
        .map(|procedure| {
            format!(
                "{prefix}{}-{}: {} {}\n",
                procedure.start_line, procedure.end_line, procedure.kind, procedure.name
            )
        })
        .collect())
}

/// Process input from stdin
fn process_stdin(config: &Config, args: &CliArgs) -> Result<()> {
    let mut stdin_contents = Vec::new();
    io::stdin().read_to_end(&mut stdin_contents)?;

    let stdin_size = stdin_contents.len() as u64;
    if stdin_size > DEFAULT_MAX_FILE_SIZE {
        bail!(
            "stdin input too large ({} MB exceeds limit of {} MB)",
            stdin_size / (1024 * 1024),
            DEFAULT_MAX_FILE_SIZE / (1024 * 1024)
        );
    }

    let file_config = with_directive_overrides(config, &stdin_contents, "stdin");

    if args.list_procedures {
        let source = std::str::from_utf8(&stdin_contents)
            .context("stdin: input is not valid UTF-8 text")?;
        let output = render_procedures(source, &file_config, None)?;
        io::stdout().write_all(output.as_bytes())?;
        return Ok(());
    }

    let mut output = Vec::new();
    format_file(
        BufReader::new(Cursor::new(&stdin_contents)),
        &mut output,
        &file_config,
        "stdin",
    )?;

    match &args.output {
        Some(target) => std::fs::write(target, &output)
            .with_context(|| format!("Failed to write {}", target.display()))?,
        None => io::stdout().write_all(&output)?,
    }

    Ok(())
}

fn print_usage() {
    println!(
        "fdecl v{} - Fortran declaration reorganizer",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("Usage:");
    println!("  fdecl [OPTIONS] <FILE>...");
    println!("  fdecl [OPTIONS] -r <DIRECTORY>");
    println!("  fdecl [OPTIONS] -              # Read from stdin");
    println!("  cat file.f90 | fdecl           # Pipe input");
    println!();
    println!("Examples:");
    println!("  fdecl file.f90                 # Print the rewritten file");
    println!("  fdecl -i *.f90                 # Rewrite files in place");
    println!("  fdecl -i -r src/               # Recursively rewrite a directory");
    println!("  fdecl -m merge -w 100 a.f90    # Only merge, wrap at 100 columns");
    println!("  fdecl -p a.f90                 # List the procedures of a file");
    println!();
    println!("Run 'fdecl --help' for all options.");
    println!();
    println!("Config file auto-discovery:");
    println!("  Searches for fdecl.toml in parent directories");
    println!("  starting from the file being rewritten up to the root directory.");
    println!("  Also checks fdecl.toml in the home directory.");
    println!("  More specific configs (closer to file) override less specific ones.");
}
