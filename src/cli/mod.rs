//! Command-line interface.
//!
//! `generate` writes the component reference (and any requested formats),
//! `list` shows what the roots contain, and `options` documents the
//! configuration file itself.

pub mod formatting;
mod types;

#[cfg(test)]
mod tests;

pub use types::{CliError, CommandResult};

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::instrument;

use crate::{
    config::{ConditionPolicy, GeneratorOptions},
    docs::{DocsGenerator, write_atomically},
    metadata::SchemaProvider,
};
use formatting::{format_category, format_description, format_header};

/// Top-level command line.
#[derive(Parser, Debug)]
#[command(name = "compdoc")]
#[command(about = "Generate configuration reference documentation for components")]
pub struct Cli {
    /// Command to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the AsciiDoc reference and any extra formats
    Generate(GenerateArgs),
    /// List the components found under the roots
    List(SourceArgs),
    /// Print the reference of the configuration file format
    Options {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Where components come from and which ones are kept.
#[derive(Args, Debug, Default)]
pub struct SourceArgs {
    /// TOML configuration file; flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Scan root (directory, .zip/.jar archive or descriptor file), repeatable
    #[arg(short, long = "root")]
    pub roots: Vec<PathBuf>,

    /// Only keep components of this category
    #[arg(long)]
    pub category: Option<String>,

    /// Keep components whose name matches this regex, repeatable
    #[arg(long = "include")]
    pub includes: Vec<String>,

    /// Skip components whose name matches this regex, repeatable
    #[arg(long = "exclude")]
    pub excludes: Vec<String>,
}

/// Arguments of `generate`.
#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// Component sources and filters.
    #[command(flatten)]
    pub source: SourceArgs,

    /// Primary document destination
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Document title for converted formats
    #[arg(long)]
    pub title: Option<String>,

    /// Heading level of component sections
    #[arg(long)]
    pub heading_depth: Option<usize>,

    /// Extra output as FORMAT=PATH (e.g. html=docs/index.html), repeatable
    #[arg(short, long = "format", value_parser = parse_format_output)]
    pub formats: Vec<(String, PathBuf)>,

    /// Version stamped into converted formats
    #[arg(long = "version-stamp")]
    pub version: Option<String>,

    /// Scratch directory for converters
    #[arg(long)]
    pub work_dir: Option<PathBuf>,

    /// Fail on conditions that reference unknown properties
    #[arg(long)]
    pub strict: bool,
}

impl SourceArgs {
    /// Options from the configuration file (if any) with flags applied.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Generation` if the configuration file cannot be loaded.
    pub fn to_options(&self) -> Result<GeneratorOptions, CliError> {
        let mut options = match &self.config {
            Some(path) => GeneratorOptions::load(path)?,
            None => GeneratorOptions::default(),
        };

        if !self.roots.is_empty() {
            options.roots = self.roots.clone();
        }
        if let Some(category) = &self.category {
            options.category_filter = Some(category.clone());
        }
        if !self.includes.is_empty() {
            options.includes = self.includes.clone();
        }
        if !self.excludes.is_empty() {
            options.excludes = self.excludes.clone();
        }

        Ok(options)
    }
}

impl GenerateArgs {
    /// Options for a `generate` run.
    ///
    /// # Errors
    ///
    /// Returns `CliError::Generation` if the configuration file cannot be loaded.
    pub fn to_options(&self) -> Result<GeneratorOptions, CliError> {
        let mut options = self.source.to_options()?;

        if let Some(output) = &self.output {
            options.output_path = output.clone();
        }
        if let Some(title) = &self.title {
            options.title = Some(title.clone());
        }
        if let Some(depth) = self.heading_depth {
            options.heading_depth = depth;
        }
        for (format, path) in &self.formats {
            options.format_outputs.insert(format.clone(), path.clone());
        }
        if let Some(version) = &self.version {
            options.version = Some(version.clone());
        }
        if let Some(work_dir) = &self.work_dir {
            options.work_dir = Some(work_dir.clone());
        }
        if self.strict {
            options.condition_policy = ConditionPolicy::Strict;
        }

        Ok(options)
    }
}

/// Parses `FORMAT=PATH`.
///
/// # Errors
///
/// Returns a message when the separator or either side is missing.
pub fn parse_format_output(value: &str) -> Result<(String, PathBuf), String> {
    match value.split_once('=') {
        Some((format, path)) if !format.trim().is_empty() && !path.trim().is_empty() => {
            Ok((format.trim().to_string(), PathBuf::from(path.trim())))
        }
        _ => Err(format!("expected FORMAT=PATH, got '{value}'")),
    }
}

/// Executes a parsed command line and returns what should be printed.
///
/// # Errors
///
/// Returns `CliError::Generation` when the underlying run fails.
#[instrument(skip_all)]
pub fn execute(cli: Cli) -> CommandResult {
    match cli.command {
        Commands::Generate(args) => generate(&args),
        Commands::List(source) => list(&source),
        Commands::Options { output } => options_reference(output),
    }
}

fn generate(args: &GenerateArgs) -> CommandResult {
    let report = DocsGenerator::new(args.to_options()?).generate_all()?;

    let mut lines = vec![format!(
        "Generated {} ({} components)",
        report.document.display(),
        report.components.len()
    )];
    lines.extend(
        report
            .conversions
            .iter()
            .map(|(format, path)| format!("Converted {format}: {}", path.display())),
    );

    Ok(lines.join("\n"))
}

fn list(source: &SourceArgs) -> CommandResult {
    let components = DocsGenerator::new(source.to_options()?).list_components()?;

    let mut lines = vec![format_header("Available components:")];
    for component in &components {
        let category = component.category.as_deref().unwrap_or("-");
        lines.push(format!(
            "  {} {} {}",
            component.name,
            format_category(&format!("[{category}]")),
            format_description(&format!("{} properties", component.property_count()))
        ));
    }

    Ok(lines.join("\n"))
}

fn options_reference(output: Option<PathBuf>) -> CommandResult {
    let provider = SchemaProvider::new().register::<GeneratorOptions>("compdoc.toml");
    let document = DocsGenerator::new(GeneratorOptions::default()).render_document(&provider)?;

    match output {
        Some(path) => {
            write_atomically(&path, document.as_bytes())?;
            Ok(format!("Generated {}", path.display()))
        }
        None => Ok(document),
    }
}
