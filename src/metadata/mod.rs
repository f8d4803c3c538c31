//! Component metadata model and discovery.
//!
//! A [`MetadataProvider`] yields [`ComponentDescriptor`]s from whatever
//! discovery mechanism it wraps. The generator never assumes a particular
//! mechanism; it only consumes the descriptors in the order they are given.

mod descriptor_files;
mod filter;
mod schema;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Result;

pub use descriptor_files::DescriptorFileProvider;
pub use filter::ComponentFilter;
pub use schema::{SchemaProvider, descriptor_from_schema};

/// Source of component descriptors for a generation run.
///
/// Implementations must return descriptors in a stable order: scan roots in
/// the order they were given, then discovery order inside each root.
pub trait MetadataProvider {
    /// Returns every component this provider knows about.
    ///
    /// # Errors
    ///
    /// Returns `DocgenError::Scan` when a location cannot be read or yields
    /// nothing, and `DocgenError::MalformedMetadata` when metadata cannot be
    /// parsed.
    fn components(&self) -> Result<Vec<ComponentDescriptor>>;
}

/// Comparison applied by a single visibility predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    /// Target equals the single expected value.
    Equals,
    /// Target equals any of the expected values.
    OneOf,
    /// Target has no value.
    IsEmpty,
    /// Target has a value.
    IsNotEmpty,
}

impl Operator {
    /// Whether the operator compares against expected values at all.
    pub fn takes_values(self) -> bool {
        matches!(self, Operator::Equals | Operator::OneOf)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Equals => write!(f, "equals"),
            Operator::OneOf => write!(f, "one_of"),
            Operator::IsEmpty => write!(f, "is_empty"),
            Operator::IsNotEmpty => write!(f, "is_not_empty"),
        }
    }
}

/// A single visibility test against another property's value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    target: String,
    operator: Operator,
    values: Vec<String>,
}

impl Predicate {
    /// Creates a predicate. Repeated expected values keep their first occurrence.
    pub fn new<I, V>(target: impl Into<String>, operator: Operator, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for value in values.into_iter().map(Into::into) {
            if !unique.contains(&value) {
                unique.push(value);
            }
        }

        Self {
            target: target.into(),
            operator,
            values: unique,
        }
    }

    /// `target == value`
    pub fn equals(target: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(target, Operator::Equals, [value.into()])
    }

    /// `target ∈ values`
    pub fn one_of<I, V>(target: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self::new(target, Operator::OneOf, values)
    }

    /// `target` has no value.
    pub fn is_empty(target: impl Into<String>) -> Self {
        Self::new(target, Operator::IsEmpty, Vec::<String>::new())
    }

    /// `target` has a value.
    pub fn is_not_empty(target: impl Into<String>) -> Self {
        Self::new(target, Operator::IsNotEmpty, Vec::<String>::new())
    }

    /// Target path, exactly as declared.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Comparison operator.
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Expected values in declared order.
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Checks that the number of expected values fits the operator.
    ///
    /// # Errors
    ///
    /// Returns a description of the mismatch.
    pub fn check_arity(&self) -> std::result::Result<(), String> {
        let count = self.values.len();
        match self.operator {
            Operator::Equals if count != 1 => Err(format!(
                "`{}` uses equals with {count} values, expected exactly one",
                self.target
            )),
            Operator::OneOf if count == 0 => Err(format!(
                "`{}` uses one_of without any value",
                self.target
            )),
            Operator::IsEmpty | Operator::IsNotEmpty if count != 0 => Err(format!(
                "`{}` uses {} which takes no values",
                self.target, self.operator
            )),
            _ => Ok(()),
        }
    }
}

/// Conjunction of predicates controlling a property's visibility.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Condition {
    predicates: Vec<Predicate>,
}

impl Condition {
    /// All of the given predicates must hold.
    pub fn all(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        Self {
            predicates: predicates.into_iter().collect(),
        }
    }

    /// Predicates in declared order.
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// A condition without predicates never hides anything.
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

/// One node of a component's configuration tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyNode {
    /// Single path segment, joined with its ancestors by dots.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Literal default value, if any.
    pub default: Option<String>,
    /// Visibility condition; `None` means always visible.
    pub condition: Option<Condition>,
    /// Nested properties in declaration order.
    pub children: Vec<PropertyNode>,
}

impl PropertyNode {
    /// Creates a leaf without default or condition.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            default: None,
            condition: None,
            children: Vec::new(),
        }
    }

    /// Sets the default value.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Sets the visibility condition.
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Appends a nested property.
    pub fn with_child(mut self, child: PropertyNode) -> Self {
        self.children.push(child);
        self
    }
}

/// Metadata unit describing one documentable component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentDescriptor {
    /// Display name, used as the heading.
    pub name: String,
    /// Optional paragraph rendered under the heading.
    pub summary: Option<String>,
    /// Optional category used by filters.
    pub category: Option<String>,
    /// Root properties in declaration order.
    pub properties: Vec<PropertyNode>,
}

impl ComponentDescriptor {
    /// Creates a component without summary, category or properties.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            summary: None,
            category: None,
            properties: Vec::new(),
        }
    }

    /// Sets the summary paragraph.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Sets the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Appends a root property.
    pub fn with_property(mut self, property: PropertyNode) -> Self {
        self.properties.push(property);
        self
    }

    /// Total number of properties in the tree.
    pub fn property_count(&self) -> usize {
        fn count(nodes: &[PropertyNode]) -> usize {
            nodes.iter().map(|node| 1 + count(&node.children)).sum()
        }
        count(&self.properties)
    }
}

/// A property after flattening: its full dot-joined path plus metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationProperty {
    /// Dot-joined path, unique within the component.
    pub path: String,
    /// Human-readable description.
    pub description: String,
    /// Literal default value, if any.
    pub default: Option<String>,
    /// Visibility condition; `None` means always visible.
    pub condition: Option<Condition>,
}

impl ConfigurationProperty {
    /// Path of the enclosing property, or `None` for root properties.
    pub fn parent_path(&self) -> Option<&str> {
        self.path.rsplit_once('.').map(|(parent, _)| parent)
    }
}
