//! Unit tests for config module
//!
//! Tests option defaults, TOML parsing and path anchoring.

#![allow(clippy::panic)]

use std::path::{Path, PathBuf};

use crate::{
    DocgenError,
    config::{ConditionPolicy, GeneratorOptions, MAX_HEADING_DEPTH},
};

#[test]
fn options_default() {
    let options = GeneratorOptions::default();

    assert!(options.roots.is_empty());
    assert_eq!(options.output_path, PathBuf::from("components.adoc"));
    assert_eq!(options.heading_depth, 2);
    assert!(options.format_outputs.is_empty());
    assert_eq!(options.condition_policy, ConditionPolicy::Lenient);
}

#[test]
fn options_empty_toml() {
    let options = GeneratorOptions::from_toml_str("").unwrap();

    assert_eq!(options, GeneratorOptions::default());
}

#[test]
fn options_deserialize_toml() {
    let toml_str = r#"
        roots = ["plugins/a", "plugins/b"]
        output_path = "docs/components.adoc"
        title = "Components"
        heading_depth = 3
        category_filter = "input"
        includes = ["mysql.*"]
        version = "1.0"
        condition_policy = "strict"

        [format_outputs]
        html = "docs/components.html"

        [converters.pdf]
        command = "asciidoctor-pdf"
        args = ["-a", "pdf-theme=compact"]
    "#;

    let options = GeneratorOptions::from_toml_str(toml_str).unwrap();

    assert_eq!(options.roots.len(), 2);
    assert_eq!(options.title.as_deref(), Some("Components"));
    assert_eq!(options.heading_depth, 3);
    assert_eq!(options.condition_policy, ConditionPolicy::Strict);
    assert_eq!(
        options.format_outputs.get("html"),
        Some(&PathBuf::from("docs/components.html"))
    );
    assert_eq!(options.converters["pdf"].args.len(), 2);
}

#[test]
fn options_reject_unknown_fields() {
    let result = GeneratorOptions::from_toml_str("output = \"x.adoc\"");

    assert!(result.is_err());
}

#[test]
fn options_serialize_roundtrip() {
    let original = GeneratorOptions::new(["plugins"], "out.adoc").with_format("html", "out.html");

    let toml_str = toml::to_string(&original).unwrap();
    let deserialized = GeneratorOptions::from_toml_str(&toml_str).unwrap();

    assert_eq!(original, deserialized);
}

#[test]
fn heading_depth_is_clamped() {
    let mut options = GeneratorOptions::default();

    options.heading_depth = 0;
    assert_eq!(options.effective_heading_depth(), 1);

    options.heading_depth = 9;
    assert_eq!(options.effective_heading_depth(), MAX_HEADING_DEPTH);
}

#[test]
fn relative_paths_are_anchored() {
    let mut options = GeneratorOptions::new(["plugins", "/abs/plugins"], "out.adoc")
        .with_format("html", "out.html");
    options.work_dir = Some(PathBuf::from("work"));

    options.resolve_relative_to(Path::new("/project"));

    assert_eq!(options.roots[0], PathBuf::from("/project/plugins"));
    assert_eq!(options.roots[1], PathBuf::from("/abs/plugins"));
    assert_eq!(options.output_path, PathBuf::from("/project/out.adoc"));
    assert_eq!(options.format_outputs["html"], PathBuf::from("/project/out.html"));
    assert_eq!(options.work_dir, Some(PathBuf::from("/project/work")));
}

#[test]
fn load_reports_parse_location() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("compdoc.toml");
    std::fs::write(&path, "roots = [").unwrap();

    let err = GeneratorOptions::load(&path).unwrap_err();

    match err {
        DocgenError::TomlParse { location, .. } => assert!(location.ends_with("compdoc.toml")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn condition_policy_parses_case_insensitively() {
    assert_eq!("STRICT".parse::<ConditionPolicy>(), Ok(ConditionPolicy::Strict));
    assert!("loose".parse::<ConditionPolicy>().is_err());
}
