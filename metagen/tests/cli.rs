//! Command-line driver tests.

use clap::Parser;
use metagen::cli::{Cli, run};
use std::fs;

const MODEL: &str = r#"{
    "metaData": {"version": "3.17.0"},
    "structures": [
        {
            "name": "Position",
            "properties": [
                {"name": "line", "type": {"kind": "base", "name": "uinteger"}},
                {"name": "character", "type": {"kind": "base", "name": "uinteger"}}
            ],
            "documentation": "Position in a text document."
        }
    ],
    "enumerations": [
        {
            "name": "TraceValues",
            "type": {"kind": "base", "name": "string"},
            "values": [{"name": "Off", "value": "off"}]
        }
    ]
}"#;

fn cli(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("metagen").chain(args.iter().copied()))
        .expect("Failed to parse")
}

#[test]
fn test_writes_output_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("metaModel.json");
    let output = dir.path().join("generated/lsp.rs");
    fs::write(&input, MODEL).expect("write input");

    let result = run(&cli(&[
        "--input",
        input.to_str().expect("utf-8 path"),
        "--output",
        output.to_str().expect("utf-8 path"),
    ]))
    .expect("run succeeds");

    assert!(result.is_none());
    let code = fs::read_to_string(&output).expect("output written");
    assert!(code.contains("pub struct Position"));
    assert!(code.contains("pub const TraceValuesOff: TraceValues"));
    assert!(code.contains("/// Position in a text document."));
}

#[test]
fn test_returns_code_without_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("metaModel.json");
    fs::write(&input, MODEL).expect("write input");

    let args = cli(&["-i", input.to_str().expect("utf-8 path"), "--no-docs"]);
    let code = run(&args).expect("run succeeds").expect("code returned");

    assert!(code.contains("pub line: u32"));
    assert!(!code.contains("Position in a text document."));
}

#[test]
fn test_missing_input_names_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("absent.json");

    let err = run(&cli(&["--input", input.to_str().expect("utf-8 path")])).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("failed to load meta model"), "{message}");
    assert!(message.contains("absent.json"), "{message}");
}

#[test]
fn test_generation_error_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("metaModel.json");
    fs::write(
        &input,
        r#"{"enumerations": [{"name": "Bad", "type": {"kind": "base", "name": "boolean"}, "values": []}]}"#,
    )
    .expect("write input");

    let err = run(&cli(&["--input", input.to_str().expect("utf-8 path")])).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("code generation failed"), "{message}");
    assert!(message.contains("Bad"), "{message}");
}
