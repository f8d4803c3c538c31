//! Generation options.
//!
//! Defines every option of a generation run as one structure with named,
//! independently defaulted fields. Options can be loaded from TOML and then
//! overridden field by field (see [`GeneratorOptions::load`]).

mod loading;
mod policy;

#[cfg(test)]
mod tests;

pub use policy::ConditionPolicy;

use std::{collections::BTreeMap, env, path::PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const DEFAULT_OUTPUT: &str = "components.adoc";
const DEFAULT_HEADING_DEPTH: usize = 2;

/// Deepest component heading that still leaves room for its sub-heading.
pub const MAX_HEADING_DEPTH: usize = 5;

/// External program used for one output format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ConverterSettings {
    /// Program to execute (looked up on `PATH` when not a path).
    pub command: String,

    /// Extra arguments placed before the generated ones.
    #[serde(default)]
    pub args: Vec<String>,
}

/// Options for one documentation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorOptions {
    /// Scan locations, in the order their components appear in the document.
    pub roots: Vec<PathBuf>,

    /// Destination of the primary document. Overwritten if it exists.
    pub output_path: PathBuf,

    /// Document title handed to converters.
    pub title: Option<String>,

    /// Heading level of component sections (1 to 5).
    pub heading_depth: usize,

    /// Only document components of this category.
    pub category_filter: Option<String>,

    /// Regex patterns; when non-empty a component name must match one.
    pub includes: Vec<String>,

    /// Regex patterns; a component name matching any is skipped.
    pub excludes: Vec<String>,

    /// Version stamped into converted outputs.
    pub version: Option<String>,

    /// Scratch directory for converters. Defaults to a directory under the
    /// system temp dir.
    pub work_dir: Option<PathBuf>,

    /// What to do with conditions whose target cannot be found.
    pub condition_policy: ConditionPolicy,

    /// Secondary outputs: format name to destination path.
    pub format_outputs: BTreeMap<String, PathBuf>,

    /// Per-format converter overrides.
    pub converters: BTreeMap<String, ConverterSettings>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            output_path: PathBuf::from(DEFAULT_OUTPUT),
            title: None,
            heading_depth: DEFAULT_HEADING_DEPTH,
            format_outputs: BTreeMap::new(),
            category_filter: None,
            includes: Vec::new(),
            excludes: Vec::new(),
            version: None,
            work_dir: None,
            condition_policy: ConditionPolicy::default(),
            converters: BTreeMap::new(),
        }
    }
}

impl GeneratorOptions {
    /// Creates options for the given roots and output, everything else defaulted.
    pub fn new<I, P>(roots: I, output_path: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
            output_path: output_path.into(),
            ..Self::default()
        }
    }

    /// Requests an additional output format.
    pub fn with_format(mut self, format: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.format_outputs.insert(format.into(), path.into());
        self
    }

    /// Heading depth limited to the range AsciiDoc sections support.
    pub fn effective_heading_depth(&self) -> usize {
        self.heading_depth.clamp(1, MAX_HEADING_DEPTH)
    }

    /// Scratch directory for converters.
    pub fn effective_work_dir(&self) -> PathBuf {
        self.work_dir
            .clone()
            .unwrap_or_else(|| env::temp_dir().join("compdoc"))
    }
}
