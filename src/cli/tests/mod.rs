//! Unit tests for command-line parsing and execution

#![allow(clippy::panic)]

use std::{fs, path::PathBuf};

use clap::Parser;
use tempfile::TempDir;

use crate::{
    cli::{Cli, Commands, execute, parse_format_output},
    config::ConditionPolicy,
};

const DESCRIPTOR: &str = r#"
[[component]]
name = "my"
summary = "super my component"
category = "input"

[[component.property]]
name = "configuration"
description = "configuration configuration"
"#;

fn write_root() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("plugins")).unwrap();
    fs::write(dir.path().join("plugins/my.toml"), DESCRIPTOR).unwrap();
    dir
}

#[test]
fn parses_format_outputs() {
    assert_eq!(
        parse_format_output("html=out/index.html"),
        Ok(("html".to_string(), PathBuf::from("out/index.html")))
    );
    assert!(parse_format_output("html").is_err());
    assert!(parse_format_output("=out.html").is_err());
    assert!(parse_format_output("pdf=").is_err());
}

#[test]
fn generate_flags_become_options() {
    let cli = Cli::try_parse_from([
        "compdoc",
        "generate",
        "--root",
        "a",
        "--root",
        "b",
        "--output",
        "out.adoc",
        "--format",
        "html=out.html",
        "--heading-depth",
        "3",
        "--version-stamp",
        "1.0",
        "--strict",
    ])
    .unwrap();

    let Commands::Generate(args) = cli.command else {
        panic!("expected generate command");
    };
    let options = args.to_options().unwrap();

    assert_eq!(options.roots, [PathBuf::from("a"), PathBuf::from("b")]);
    assert_eq!(options.output_path, PathBuf::from("out.adoc"));
    assert_eq!(options.heading_depth, 3);
    assert_eq!(options.version.as_deref(), Some("1.0"));
    assert_eq!(options.format_outputs["html"], PathBuf::from("out.html"));
    assert_eq!(options.condition_policy, ConditionPolicy::Strict);
}

#[test]
fn flags_override_configuration_file() {
    let dir = write_root();
    let config = dir.path().join("compdoc.toml");
    fs::write(
        &config,
        "roots = [\"plugins\"]\noutput_path = \"docs/components.adoc\"\nheading_depth = 3\n",
    )
    .unwrap();

    let cli = Cli::try_parse_from([
        "compdoc",
        "generate",
        "--config",
        config.to_str().unwrap(),
        "--heading-depth",
        "1",
    ])
    .unwrap();
    let Commands::Generate(args) = cli.command else {
        panic!("expected generate command");
    };
    let options = args.to_options().unwrap();

    assert_eq!(options.roots, [dir.path().join("plugins")]);
    assert_eq!(options.output_path, dir.path().join("docs/components.adoc"));
    assert_eq!(options.heading_depth, 1);
}

#[test]
fn generate_command_writes_document() {
    let dir = write_root();
    let output = dir.path().join("out.adoc");

    let cli = Cli::try_parse_from([
        "compdoc",
        "generate",
        "--root",
        dir.path().join("plugins").to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
    ])
    .unwrap();

    let message = execute(cli).unwrap();

    assert!(message.contains("1 components"));
    assert!(fs::read_to_string(&output).unwrap().starts_with("== my\n"));
}

#[test]
fn list_command_names_components() {
    let dir = write_root();

    let cli = Cli::try_parse_from([
        "compdoc",
        "list",
        "--root",
        dir.path().join("plugins").to_str().unwrap(),
    ])
    .unwrap();

    let message = execute(cli).unwrap();

    assert!(message.contains("my"));
    assert!(message.contains("[input]"));
    assert!(message.contains("1 properties"));
}

#[test]
fn generate_without_roots_fails() {
    let cli = Cli::try_parse_from(["compdoc", "generate"]).unwrap();

    assert!(execute(cli).is_err());
}

#[test]
fn options_command_documents_configuration_fields() {
    let cli = Cli::try_parse_from(["compdoc", "options"]).unwrap();

    let document = execute(cli).unwrap();

    assert!(document.starts_with("== compdoc.toml\n"));
    assert!(document.contains("|roots|"));
    assert!(document.contains("|heading_depth|Heading level of component sections (1 to 5).|2|"));
    assert!(document.contains("|condition_policy|"));
}
