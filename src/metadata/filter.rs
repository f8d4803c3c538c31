use regex::Regex;

use super::ComponentDescriptor;
use crate::{DocgenError, Result};

/// Restricts which discovered components make it into the document.
///
/// A component is kept when it matches the category (if one is set), at
/// least one include pattern (if any are set), and no exclude pattern.
/// Patterns are regular expressions matched against the whole component name.
#[derive(Debug, Clone, Default)]
pub struct ComponentFilter {
    category: Option<String>,
    includes: Vec<Regex>,
    excludes: Vec<Regex>,
}

impl ComponentFilter {
    /// Builds a filter from raw patterns.
    ///
    /// # Errors
    ///
    /// Returns `DocgenError::ConfigValidation` if a pattern is not a valid regex.
    pub fn new(
        category: Option<String>,
        includes: &[String],
        excludes: &[String],
    ) -> Result<Self> {
        Ok(Self {
            category,
            includes: compile_patterns("includes", includes)?,
            excludes: compile_patterns("excludes", excludes)?,
        })
    }

    /// Whether the filter lets the component through.
    pub fn accepts(&self, component: &ComponentDescriptor) -> bool {
        if let Some(category) = &self.category {
            if component.category.as_deref() != Some(category.as_str()) {
                return false;
            }
        }

        let included =
            self.includes.is_empty() || self.includes.iter().any(|re| re.is_match(&component.name));

        included && !self.excludes.iter().any(|re| re.is_match(&component.name))
    }

    /// Keeps accepted components, preserving their order.
    pub fn apply(&self, components: Vec<ComponentDescriptor>) -> Vec<ComponentDescriptor> {
        components.into_iter().filter(|c| self.accepts(c)).collect()
    }
}

fn compile_patterns(field: &str, patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(&format!("^(?:{pattern})$")).map_err(|e| DocgenError::ConfigValidation {
                field: field.to_string(),
                details: format!("invalid pattern '{pattern}': {e}"),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn components() -> Vec<ComponentDescriptor> {
        vec![
            ComponentDescriptor::new("mysql-input").with_category("input"),
            ComponentDescriptor::new("mysql-output").with_category("output"),
            ComponentDescriptor::new("csv-input").with_category("input"),
        ]
    }

    fn names(components: &[ComponentDescriptor]) -> Vec<&str> {
        components.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn default_filter_keeps_everything() {
        let kept = ComponentFilter::default().apply(components());

        assert_eq!(names(&kept), ["mysql-input", "mysql-output", "csv-input"]);
    }

    #[test]
    fn category_restricts_components() {
        let filter = ComponentFilter::new(Some("input".to_string()), &[], &[]).unwrap();

        let kept = filter.apply(components());

        assert_eq!(names(&kept), ["mysql-input", "csv-input"]);
    }

    #[test]
    fn includes_and_excludes_match_whole_names() {
        let filter = ComponentFilter::new(
            None,
            &["mysql-.*".to_string()],
            &[".*output".to_string()],
        )
        .unwrap();

        let kept = filter.apply(components());

        assert_eq!(names(&kept), ["mysql-input"]);
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let err = ComponentFilter::new(None, &["(".to_string()], &[]).unwrap_err();

        assert!(matches!(err, DocgenError::ConfigValidation { .. }));
    }
}
