use std::collections::HashSet;

use crate::{
    DocgenError, Result,
    metadata::{ComponentDescriptor, ConfigurationProperty, PropertyNode},
};

/// Flattens a component's property tree into dot-joined paths.
///
/// The result is the pre-order traversal of the tree: every property comes
/// before its children and siblings keep their declaration order.
///
/// # Errors
///
/// Returns `DocgenError::MalformedMetadata` if two properties end up with
/// the same path.
pub fn flatten(descriptor: &ComponentDescriptor) -> Result<Vec<ConfigurationProperty>> {
    let mut flattened = Vec::with_capacity(descriptor.property_count());
    let mut seen = HashSet::new();

    for node in &descriptor.properties {
        visit(&descriptor.name, node, "", &mut seen, &mut flattened)?;
    }

    Ok(flattened)
}

fn visit(
    component: &str,
    node: &PropertyNode,
    prefix: &str,
    seen: &mut HashSet<String>,
    out: &mut Vec<ConfigurationProperty>,
) -> Result<()> {
    let path = if prefix.is_empty() {
        node.name.clone()
    } else {
        format!("{prefix}.{}", node.name)
    };

    if !seen.insert(path.clone()) {
        return Err(DocgenError::malformed(
            component,
            &path,
            "path is declared more than once",
        ));
    }

    out.push(ConfigurationProperty {
        path: path.clone(),
        description: node.description.clone(),
        default: node.default.clone(),
        condition: node.condition.clone(),
    });

    for child in &node.children {
        visit(component, child, &path, seen, out)?;
    }

    Ok(())
}
