use crate::metadata::ComponentDescriptor;

const TABLE_ATTRIBUTES: &str = "[cols=\"e,d,m,a\",options=\"header\"]";
const TABLE_DELIMITER: &str = "|===";
const TABLE_HEADER: &str = "|Path|Description|Default Value|Enabled If";
const CONFIGURATION_TITLE: &str = "Configuration";
const NO_DEFAULT: &str = "-";

/// One table row, derived per property per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    /// Flattened property path.
    pub path: String,
    /// Property description.
    pub description: String,
    /// Default value, or `-` when there is none.
    pub default_text: String,
    /// Rendered visibility condition.
    pub condition_text: String,
}

impl RenderedRow {
    /// Builds a row, substituting the placeholder for a missing default.
    pub fn new(
        path: impl Into<String>,
        description: impl Into<String>,
        default: Option<&str>,
        condition_text: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            description: description.into(),
            default_text: default.unwrap_or(NO_DEFAULT).to_string(),
            condition_text: condition_text.into(),
        }
    }

    fn to_line(&self) -> String {
        format!(
            "|{}|{}|{}|{}",
            escape_cell(&self.path),
            escape_cell(&self.description),
            escape_cell(&self.default_text),
            escape_cell(&self.condition_text)
        )
    }
}

/// Renders the AsciiDoc block of one component.
///
/// The block holds a heading of `heading_depth` levels, the summary paragraph
/// when there is one, a `Configuration` sub-heading one level deeper and the
/// four-column property table. It always ends with the closing delimiter
/// followed by a newline.
pub fn render_component(
    descriptor: &ComponentDescriptor,
    rows: &[RenderedRow],
    heading_depth: usize,
) -> String {
    let mut lines = vec![heading(heading_depth, &descriptor.name), String::new()];

    if let Some(summary) = &descriptor.summary {
        lines.push(summary.clone());
        lines.push(String::new());
    }

    lines.push(heading(heading_depth + 1, CONFIGURATION_TITLE));
    lines.push(String::new());
    lines.push(TABLE_ATTRIBUTES.to_string());
    lines.push(TABLE_DELIMITER.to_string());
    lines.push(TABLE_HEADER.to_string());
    lines.extend(rows.iter().map(RenderedRow::to_line));
    lines.push(TABLE_DELIMITER.to_string());

    let mut block = lines.join("\n");
    block.push('\n');
    block
}

fn heading(depth: usize, title: &str) -> String {
    format!("{} {title}", "=".repeat(depth))
}

/// Cell separators inside content must not split the row.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
