//! Secondary output formats.
//!
//! The assembled document can be handed to backend converters, one per
//! requested format. Converters are opaque: the only contract is that a file
//! for the requested format exists at the target path once `convert` returns
//! `Ok`.

mod command;
mod html;

pub use command::CommandConverter;
pub use html::HtmlConverter;

use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::Path,
};

use tracing::{debug, info};

use crate::{DocgenError, Result, config::ConverterSettings};

/// Everything a converter gets to know about one conversion.
#[derive(Debug, Clone, Copy)]
pub struct ConversionRequest<'a> {
    /// Format name as requested (e.g. `html`, `pdf`).
    pub format: &'a str,
    /// Assembled AsciiDoc document.
    pub source: &'a Path,
    /// Where the converted file must end up.
    pub target: &'a Path,
    /// Document title, if any.
    pub title: Option<&'a str>,
    /// Version to stamp, if any.
    pub version: Option<&'a str>,
    /// Scratch directory, already created.
    pub work_dir: &'a Path,
}

/// A backend able to produce one output format from the document.
pub trait Converter {
    /// Produces `request.target` from `request.source`.
    ///
    /// # Errors
    ///
    /// Returns `DocgenError::Conversion` when the backend fails.
    fn convert(&self, request: &ConversionRequest<'_>) -> Result<()>;
}

/// Converters by format name.
pub struct ConverterRegistry {
    converters: BTreeMap<String, Box<dyn Converter>>,
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ConverterRegistry {
    /// Creates a registry without any converter.
    pub fn empty() -> Self {
        Self {
            converters: BTreeMap::new(),
        }
    }

    /// Built-in HTML preview plus `asciidoctor-pdf` for `pdf`.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register("html", Box::new(HtmlConverter));
        registry.register("pdf", Box::new(CommandConverter::new("asciidoctor-pdf")));
        registry
    }

    /// Defaults overridden by the configured external commands.
    pub fn from_settings(settings: &BTreeMap<String, ConverterSettings>) -> Self {
        let mut registry = Self::with_defaults();
        for (format, setting) in settings {
            registry.register(
                format,
                Box::new(CommandConverter::new(&setting.command).with_args(setting.args.clone())),
            );
        }
        registry
    }

    /// Registers (or replaces) the converter for `format`.
    pub fn register(&mut self, format: impl Into<String>, converter: Box<dyn Converter>) {
        self.converters.insert(format.into(), converter);
    }

    /// Registered format names, sorted.
    pub fn formats(&self) -> Vec<&str> {
        self.converters.keys().map(String::as_str).collect()
    }

    /// Runs the converter registered for `request.format`.
    ///
    /// # Errors
    ///
    /// Returns `DocgenError::Conversion` if no converter is registered for
    /// the format, if a previous output cannot be removed, if the converter
    /// fails, or if it reports success without producing the target file.
    pub fn convert(&self, request: &ConversionRequest<'_>) -> Result<()> {
        let converter = self.converters.get(request.format).ok_or_else(|| {
            DocgenError::conversion(
                format!(
                    "no converter registered, available formats: {}",
                    self.formats().join(", ")
                ),
                request.format,
                request.target,
            )
        })?;

        match fs::remove_file(request.target) {
            Ok(()) => debug!(target = %request.target.display(), "Removed previous output"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(DocgenError::conversion(e, request.format, request.target)),
        }

        debug!(format = request.format, target = %request.target.display(), "Converting");
        converter.convert(request)?;

        if !request.target.exists() {
            return Err(DocgenError::conversion(
                "converter finished without producing the file",
                request.format,
                request.target,
            ));
        }

        info!(format = request.format, target = %request.target.display(), "Converted document");
        Ok(())
    }
}
