//! compdoc - configuration reference generator for components.
//!
//! Reads component configuration metadata and renders it as an AsciiDoc
//! reference, optionally converted into further formats. The main features
//! include:
//!
//! - Pluggable metadata discovery (descriptor files, JSON Schema, `schemars` types)
//! - Stable dot-joined paths for nested configuration trees
//! - Visibility conditions rendered as readable prose
//! - Byte-for-byte reproducible output
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use compdoc::{config::GeneratorOptions, docs::DocsGenerator};
//!
//! let options = GeneratorOptions::new(["plugins"], "docs/components.adoc")
//!     .with_format("html", "docs/components.html");
//!
//! let report = DocsGenerator::new(options).generate_all()?;
//! println!("Documented {} components", report.components.len());
//! # Ok::<(), compdoc::DocgenError>(())
//! ```

/// Generation options and their TOML loading.
pub mod config;

/// Core error types and result aliases.
pub mod core;

/// Document rendering pipeline.
pub mod docs;

/// Component metadata model and providers.
pub mod metadata;

/// Conversion into secondary formats.
pub mod convert;

/// Command-line interface.
pub mod cli;

/// Log subscriber setup for the binary.
pub mod tracing_config;

/// Re-exported core types for convenience.
pub use crate::core::{DocgenError, Result};
