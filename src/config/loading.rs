use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::debug;

use super::GeneratorOptions;
use crate::{DocgenError, Result};

impl GeneratorOptions {
    /// Loads options from a TOML file.
    ///
    /// Relative paths in the file (roots, output, format outputs and work
    /// directory) are resolved against the directory containing the file, so
    /// a configuration behaves the same from any working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is invalid or names unknown fields
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use compdoc::config::GeneratorOptions;
    /// use std::path::Path;
    ///
    /// let options = GeneratorOptions::load(Path::new("compdoc.toml"))?;
    /// # Ok::<(), compdoc::DocgenError>(())
    /// ```
    pub fn load(path: &Path) -> Result<GeneratorOptions> {
        let content = fs::read_to_string(path).map_err(|e| DocgenError::ConfigValidation {
            field: "config".to_string(),
            details: format!("cannot read '{}': {e}", path.display()),
        })?;

        let mut options = Self::from_toml_str(&content)
            .map_err(|e| DocgenError::toml_parse(e, Some(path)))?;

        if let Some(base_dir) = path.parent() {
            options.resolve_relative_to(base_dir);
        }

        debug!(config = %path.display(), roots = options.roots.len(), "Loaded options");
        Ok(options)
    }

    /// Parses options from TOML text without resolving paths.
    ///
    /// # Errors
    ///
    /// Returns the TOML deserialization error.
    pub fn from_toml_str(content: &str) -> std::result::Result<GeneratorOptions, toml::de::Error> {
        toml::from_str(content)
    }

    /// Anchors every relative path of the options at `base_dir`.
    pub fn resolve_relative_to(&mut self, base_dir: &Path) {
        let anchor = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base_dir.join(&*path);
            }
        };

        self.roots.iter_mut().for_each(anchor);
        anchor(&mut self.output_path);
        self.format_outputs.values_mut().for_each(anchor);
        if let Some(work_dir) = self.work_dir.as_mut() {
            anchor(work_dir);
        }
    }
}
