//! Static descriptor files as a metadata source.
//!
//! Each scan root is a single descriptor file, a directory that is walked
//! recursively, or a `.zip`/`.jar` archive whose entries are read in sorted
//! name order. TOML (`.toml`) and JSON (`.json`) documents are read; the two
//! formats share one layout of `component` entries holding nested `property`
//! entries.

use std::{
    fmt,
    fs::{self, File},
    io::{BufReader, Read},
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::{debug, info};
use zip::ZipArchive;

use super::{ComponentDescriptor, Condition, MetadataProvider, Operator, Predicate, PropertyNode};
use crate::{DocgenError, Result};

const DESCRIPTION_PLACEHOLDER: &str = "-";

#[derive(Debug, Deserialize)]
struct DescriptorFile {
    #[serde(default, rename = "component", alias = "components")]
    components: Vec<RawComponent>,
}

#[derive(Debug, Deserialize)]
struct RawComponent {
    name: String,
    summary: Option<String>,
    category: Option<String>,
    #[serde(default, rename = "property", alias = "properties")]
    properties: Vec<RawProperty>,
}

#[derive(Debug, Deserialize)]
struct RawProperty {
    name: String,
    description: Option<String>,
    default: Option<ScalarValue>,
    #[serde(default)]
    active_if: Vec<RawPredicate>,
    #[serde(default, rename = "property", alias = "properties")]
    properties: Vec<RawProperty>,
}

#[derive(Debug, Deserialize)]
struct RawPredicate {
    target: String,
    operator: Operator,
    #[serde(default)]
    values: Vec<ScalarValue>,
}

/// Scalars accepted where the document shows a literal value.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ScalarValue {
    Flag(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Flag(b) => write!(f, "{b}"),
            ScalarValue::Integer(i) => write!(f, "{i}"),
            ScalarValue::Float(x) => write!(f, "{x}"),
            ScalarValue::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Reads component descriptors from descriptor files under a set of roots.
#[derive(Debug, Clone, Default)]
pub struct DescriptorFileProvider {
    roots: Vec<PathBuf>,
}

impl DescriptorFileProvider {
    /// Creates a provider scanning the given roots in order.
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    /// Roots in scan order.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    fn scan_root(root: &Path) -> Result<Vec<ComponentDescriptor>> {
        if !root.exists() {
            return Err(DocgenError::scan("root does not exist", root));
        }

        let documents = if root.is_dir() {
            let mut files = Vec::new();
            collect_descriptor_files(root, &mut files)
                .map_err(|e| DocgenError::scan(e, root))?;
            files
                .iter()
                .map(|file| read_file(file, root))
                .collect::<Result<Vec<_>>>()?
        } else if is_archive(root) {
            read_archive(root)?
        } else if is_descriptor_file(root) {
            vec![read_file(root, root)?]
        } else {
            return Err(DocgenError::scan(
                "not a directory, a .zip/.jar archive or a .toml/.json descriptor file",
                root,
            ));
        };

        let mut components = Vec::new();
        for document in &documents {
            let parsed = document.parse()?;
            debug!(source = %document.source, count = parsed.len(), "Read descriptor");
            components.extend(parsed);
        }

        if components.is_empty() {
            return Err(DocgenError::scan("no component metadata found", root));
        }

        info!(root = %root.display(), count = components.len(), "Scanned root");
        Ok(components)
    }
}

impl MetadataProvider for DescriptorFileProvider {
    fn components(&self) -> Result<Vec<ComponentDescriptor>> {
        let mut components = Vec::new();
        for root in &self.roots {
            components.extend(Self::scan_root(root)?);
        }
        Ok(components)
    }
}

/// Raw text of one descriptor, from a plain file or an archive entry.
struct Document {
    source: String,
    json: bool,
    content: String,
}

impl Document {
    fn parse(&self) -> Result<Vec<ComponentDescriptor>> {
        let malformed = |e: &dyn fmt::Display| {
            DocgenError::malformed(&self.source, "<document>", e.to_string())
        };
        let file: DescriptorFile = if self.json {
            serde_json::from_str(&self.content).map_err(|e| malformed(&e))?
        } else {
            toml::from_str(&self.content).map_err(|e| malformed(&e))?
        };

        file.components.into_iter().map(convert_component).collect()
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

fn is_descriptor_file(path: &Path) -> bool {
    matches!(extension(path), Some("toml") | Some("json"))
}

fn is_archive(path: &Path) -> bool {
    matches!(extension(path), Some("zip") | Some("jar"))
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Walks `dir` depth-first, visiting entries in sorted path order.
fn collect_descriptor_files(dir: &Path, files: &mut Vec<PathBuf>) -> std::io::Result<()> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<PathBuf>>>()?;
    entries.sort();

    for path in entries {
        let hidden = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(is_hidden);
        if hidden {
            continue;
        }

        if path.is_dir() {
            collect_descriptor_files(&path, files)?;
        } else if is_descriptor_file(&path) {
            files.push(path);
        }
    }

    Ok(())
}

fn read_file(path: &Path, root: &Path) -> Result<Document> {
    let content = fs::read_to_string(path).map_err(|e| {
        DocgenError::scan(format!("cannot read '{}': {e}", path.display()), root)
    })?;

    Ok(Document {
        source: path.display().to_string(),
        json: extension(path) == Some("json"),
        content,
    })
}

/// Reads every descriptor entry of a zip archive, in sorted entry-name order.
fn read_archive(root: &Path) -> Result<Vec<Document>> {
    let file = File::open(root).map_err(|e| DocgenError::scan(e, root))?;
    let mut archive =
        ZipArchive::new(BufReader::new(file)).map_err(|e| DocgenError::scan(e, root))?;

    let mut names: Vec<String> = archive
        .file_names()
        .filter(|name| !name.ends_with('/'))
        .filter(|name| !name.split('/').any(is_hidden))
        .filter(|name| is_descriptor_file(Path::new(name)))
        .map(str::to_owned)
        .collect();
    names.sort();

    let mut documents = Vec::with_capacity(names.len());
    for name in names {
        let mut entry = archive
            .by_name(&name)
            .map_err(|e| DocgenError::scan(format!("cannot open '{name}': {e}"), root))?;
        let mut content = String::new();
        entry
            .read_to_string(&mut content)
            .map_err(|e| DocgenError::scan(format!("cannot read '{name}': {e}"), root))?;

        documents.push(Document {
            source: format!("{}!/{name}", root.display()),
            json: extension(Path::new(&name)) == Some("json"),
            content,
        });
    }

    Ok(documents)
}

fn convert_component(raw: RawComponent) -> Result<ComponentDescriptor> {
    let properties = raw
        .properties
        .into_iter()
        .map(|property| convert_property(&raw.name, "", property))
        .collect::<Result<Vec<_>>>()?;

    Ok(ComponentDescriptor {
        name: raw.name,
        summary: raw.summary,
        category: raw.category,
        properties,
    })
}

fn convert_property(component: &str, prefix: &str, raw: RawProperty) -> Result<PropertyNode> {
    let path = if prefix.is_empty() {
        raw.name.clone()
    } else {
        format!("{prefix}.{}", raw.name)
    };

    if raw.name.is_empty() || raw.name.contains('.') {
        return Err(DocgenError::malformed(
            component,
            &path,
            "property names must be a single non-empty path segment",
        ));
    }

    let predicates = raw
        .active_if
        .into_iter()
        .map(|raw| {
            let predicate = Predicate::new(
                raw.target,
                raw.operator,
                raw.values.iter().map(ToString::to_string),
            );
            predicate
                .check_arity()
                .map(|()| predicate)
                .map_err(|details| DocgenError::malformed(component, &path, details))
        })
        .collect::<Result<Vec<_>>>()?;

    let children = raw
        .properties
        .into_iter()
        .map(|child| convert_property(component, &path, child))
        .collect::<Result<Vec<_>>>()?;

    Ok(PropertyNode {
        name: raw.name,
        description: raw
            .description
            .unwrap_or_else(|| DESCRIPTION_PLACEHOLDER.to_string()),
        default: raw.default.map(|value| value.to_string()),
        condition: (!predicates.is_empty()).then(|| Condition::all(predicates)),
        children,
    })
}
