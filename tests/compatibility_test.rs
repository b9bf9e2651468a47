//! Compatibility tests against expected output
//!
//! Each fixture under `tests/fixtures/` comes as a pair: `NAME.f90` is the
//! input and `NAME.expected.f90` is what fdecl must produce for it.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::fs;
use std::io::{BufReader, Cursor};

use fdecl::process::format_file;
use fdecl::{Config, MergeMode};
use pretty_assertions::assert_eq;

fn fixture_path(file: &str) -> String {
    format!("{}/tests/fixtures/{file}", env!("CARGO_MANIFEST_DIR"))
}

/// Run fdecl on a fixture and compare with its expected output
fn check_fixture(name: &str, config: &Config) {
    let input_path = fixture_path(&format!("{name}.f90"));
    let expected_path = fixture_path(&format!("{name}.expected.f90"));

    let input = fs::read_to_string(&input_path)
        .unwrap_or_else(|e| panic!("Failed to read input file {input_path}: {e}"));
    let expected = fs::read_to_string(&expected_path)
        .unwrap_or_else(|e| panic!("Failed to read expected file {expected_path}: {e}"));

    let reader = BufReader::new(Cursor::new(input.as_bytes()));
    let mut output = Vec::new();
    format_file(reader, &mut output, config, &input_path)
        .unwrap_or_else(|e| panic!("fdecl failed on {input_path}: {e:#}"));

    let result = String::from_utf8(output)
        .unwrap_or_else(|e| panic!("Invalid UTF-8 in output for {input_path}: {e}"));

    assert_eq!(result, expected, "output mismatch for {name}");

    // The expected output is a fixed point
    let reader = BufReader::new(Cursor::new(expected.as_bytes()));
    let mut again = Vec::new();
    format_file(reader, &mut again, config, &expected_path).unwrap();
    assert_eq!(String::from_utf8(again).unwrap(), expected, "{name} is not stable");
}

#[test]
fn test_geometry_module() {
    check_fixture("geometry", &Config::default());
}

#[test]
fn test_constants_with_comments_and_constructs() {
    check_fixture("constants", &Config::default());
}

#[test]
fn test_legacy_declarations() {
    let config = Config {
        add_colons: true,
        add_implicit_none: true,
        ..Default::default()
    };
    check_fixture("legacy", &config);
}

#[test]
fn test_reorganize_only_keeps_separate_declarations() {
    let config = Config {
        mode: MergeMode::Reorganize,
        ..Default::default()
    };
    let input = fs::read_to_string(fixture_path("geometry.f90")).unwrap();
    let result = fdecl::transform_source(&input, &config).unwrap();

    // Nothing merges, so the line count is unchanged
    assert_eq!(result.lines().count(), input.lines().count());
    let scale: Vec<&str> = result
        .lines()
        .skip_while(|l| !l.contains("subroutine scale"))
        .take(5)
        .collect();
    assert_eq!(
        scale,
        vec![
            "  subroutine scale(points, n, factor)",
            "    integer, intent(in) :: n",
            "    real(real64), intent(inout) :: points(2, n)",
            "    real(real64), intent(in) :: factor",
            "    points = points * factor",
        ]
    );
}

#[test]
fn test_narrow_width() {
    let config = Config {
        line_length: 40,
        ..Default::default()
    };
    let input = "\
subroutine s
  integer :: alpha
  integer :: beta
  integer :: gamma
  integer :: delta
  integer :: epsilon
end subroutine s
";
    let expected = "\
subroutine s
  integer :: alpha, beta, gamma, &
     delta, epsilon
end subroutine s
";
    assert_eq!(fdecl::transform_source(input, &config).unwrap(), expected);
}
