//! JSON Schema documents as a metadata source.
//!
//! Schemas are either registered as raw `serde_json` values or derived from
//! Rust types through `schemars`. Nested objects become nested properties;
//! `$ref`s into `$defs` are followed. Visibility conditions live in the
//! `x-active-if` extension keyword:
//!
//! ```json
//! "x-active-if": [{ "target": "advanced", "operator": "equals", "values": ["false"] }]
//! ```

use schemars::{JsonSchema, Schema, schema_for};
use serde_json::{Map, Value};
use tracing::debug;

use super::{ComponentDescriptor, Condition, MetadataProvider, Operator, Predicate, PropertyNode};
use crate::{DocgenError, Result};

/// Function producing a schema on demand.
pub type SchemeFn = fn() -> Schema;

const ACTIVE_IF: &str = "x-active-if";
const SUMMARY: &str = "x-summary";
const CATEGORY: &str = "x-category";
const DESCRIPTION_PLACEHOLDER: &str = "-";

#[derive(Debug, Clone)]
enum SchemaSource {
    Value(Value),
    Derived(SchemeFn),
}

#[derive(Debug, Clone)]
struct SchemaEntry {
    name: String,
    source: SchemaSource,
}

/// Builds component descriptors from registered JSON Schemas.
///
/// Components are yielded in registration order.
#[derive(Debug, Clone, Default)]
pub struct SchemaProvider {
    entries: Vec<SchemaEntry>,
}

impl SchemaProvider {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a component whose schema is derived from `T`.
    pub fn register<T: JsonSchema>(mut self, name: impl Into<String>) -> Self {
        self.entries.push(SchemaEntry {
            name: name.into(),
            source: SchemaSource::Derived(schema_of::<T>),
        });
        self
    }

    /// Registers a component from an already built schema document.
    pub fn with_schema(mut self, name: impl Into<String>, schema: Value) -> Self {
        self.entries.push(SchemaEntry {
            name: name.into(),
            source: SchemaSource::Value(schema),
        });
        self
    }

    /// Registered component names in order.
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.name.clone()).collect()
    }
}

impl MetadataProvider for SchemaProvider {
    fn components(&self) -> Result<Vec<ComponentDescriptor>> {
        self.entries
            .iter()
            .map(|entry| match &entry.source {
                SchemaSource::Value(value) => descriptor_from_schema(&entry.name, value),
                SchemaSource::Derived(schema_fn) => {
                    let value = serde_json::to_value(schema_fn()).map_err(|e| {
                        DocgenError::malformed(&entry.name, "<schema>", e.to_string())
                    })?;
                    descriptor_from_schema(&entry.name, &value)
                }
            })
            .collect()
    }
}

fn schema_of<T: JsonSchema>() -> Schema {
    schema_for!(T)
}

/// Converts one JSON Schema document into a component descriptor.
///
/// The root's `x-summary` (or its `description`) becomes the summary and
/// `x-category` the category.
///
/// # Errors
///
/// Returns `DocgenError::MalformedMetadata` if an `x-active-if` entry is not a
/// valid predicate.
pub fn descriptor_from_schema(name: &str, schema: &Value) -> Result<ComponentDescriptor> {
    let walker = SchemaWalker {
        component: name,
        root: schema,
    };

    let summary = string_field(schema, SUMMARY).or_else(|| string_field(schema, "description"));
    let category = string_field(schema, CATEGORY);

    let mut stack = Vec::new();
    let properties = walker.properties(schema, "", &mut stack)?;
    debug!(component = name, roots = properties.len(), "Converted schema");

    Ok(ComponentDescriptor {
        name: name.to_string(),
        summary,
        category,
        properties,
    })
}

struct SchemaWalker<'a> {
    component: &'a str,
    root: &'a Value,
}

impl<'a> SchemaWalker<'a> {
    /// Follows `$ref`, single-entry `allOf` and nullable `anyOf`/`oneOf` wrappers.
    fn resolve(&self, node: &'a Value, stack: &mut Vec<String>) -> Option<&'a Value> {
        if let Some(reference) = node.get("$ref").and_then(Value::as_str) {
            if stack.iter().any(|seen| seen == reference) {
                return None;
            }
            stack.push(reference.to_string());
            let target = self.lookup(reference)?;
            return self.resolve(target, stack);
        }

        for keyword in ["allOf", "anyOf", "oneOf"] {
            if let Some(variants) = node.get(keyword).and_then(Value::as_array) {
                let object_like = variants.iter().find(|variant| {
                    variant.get("$ref").is_some() || variant.get("properties").is_some()
                });
                if let Some(variant) = object_like {
                    return self.resolve(variant, stack);
                }
            }
        }

        Some(node)
    }

    fn lookup(&self, reference: &str) -> Option<&'a Value> {
        let pointer = reference.strip_prefix('#')?;
        self.root.pointer(pointer)
    }

    fn properties(
        &self,
        node: &'a Value,
        prefix: &str,
        stack: &mut Vec<String>,
    ) -> Result<Vec<PropertyNode>> {
        let depth = stack.len();
        let Some(resolved) = self.resolve(node, stack) else {
            stack.truncate(depth);
            return Ok(Vec::new());
        };

        let result = match resolved.get("properties").and_then(Value::as_object) {
            Some(props) => self.build_properties(props, prefix, stack),
            None => Ok(Vec::new()),
        };

        stack.truncate(depth);
        result
    }

    fn build_properties(
        &self,
        props: &'a Map<String, Value>,
        prefix: &str,
        stack: &mut Vec<String>,
    ) -> Result<Vec<PropertyNode>> {
        props
            .iter()
            .map(|(name, property)| {
                let path = if prefix.is_empty() {
                    name.clone()
                } else {
                    format!("{prefix}.{name}")
                };

                let depth = stack.len();
                let target = self.resolve(property, stack).unwrap_or(property);
                stack.truncate(depth);

                let description = string_field(property, "description")
                    .or_else(|| string_field(target, "description"))
                    .unwrap_or_else(|| DESCRIPTION_PLACEHOLDER.to_string());
                let default = property
                    .get("default")
                    .or_else(|| target.get("default"))
                    .and_then(default_text);

                Ok(PropertyNode {
                    name: name.clone(),
                    description,
                    default,
                    condition: self.condition(property, &path)?,
                    children: self.properties(property, &path, stack)?,
                })
            })
            .collect()
    }

    fn condition(&self, property: &Value, path: &str) -> Result<Option<Condition>> {
        let Some(entries) = property.get(ACTIVE_IF) else {
            return Ok(None);
        };

        let entries = entries.as_array().ok_or_else(|| {
            DocgenError::malformed(self.component, path, format!("{ACTIVE_IF} must be an array"))
        })?;

        let predicates = entries
            .iter()
            .map(|entry| self.predicate(entry, path))
            .collect::<Result<Vec<_>>>()?;

        Ok((!predicates.is_empty()).then(|| Condition::all(predicates)))
    }

    fn predicate(&self, entry: &Value, path: &str) -> Result<Predicate> {
        let malformed = |details: String| DocgenError::malformed(self.component, path, details);

        let target = entry
            .get("target")
            .and_then(Value::as_str)
            .ok_or_else(|| malformed("predicate without a string `target`".to_string()))?;

        let operator: Operator = entry
            .get("operator")
            .cloned()
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| malformed(format!("unknown operator: {e}")))?
            .unwrap_or(Operator::Equals);

        let values = match entry.get("values") {
            None => Vec::new(),
            Some(Value::Array(values)) => values.iter().map(scalar_text).collect(),
            Some(single) => vec![scalar_text(single)],
        };

        let predicate = Predicate::new(target, operator, values);
        predicate.check_arity().map_err(malformed)?;
        Ok(predicate)
    }
}

fn string_field(node: &Value, key: &str) -> Option<String> {
    node.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Object defaults are documented through their children instead.
fn default_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Object(_) => None,
        other => Some(scalar_text(other)),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        _ => value.to_string(),
    }
}
