use std::fs;

use super::{ConversionRequest, Converter};
use crate::{DocgenError, Result, docs::write_atomically};

const DEFAULT_TITLE: &str = "Components";

/// Standalone HTML preview of the document.
///
/// Wraps the AsciiDoc source in a single page without any markup
/// translation; use a [`CommandConverter`](super::CommandConverter) backed by
/// `asciidoctor` for typeset HTML.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlConverter;

impl HtmlConverter {
    /// Builds the page for `source` text.
    pub fn render_page(source: &str, title: Option<&str>, version: Option<&str>) -> String {
        let title = escape_html(title.unwrap_or(DEFAULT_TITLE));
        let mut page = String::with_capacity(source.len() + 512);

        page.push_str("<!DOCTYPE html>\n");
        page.push_str("<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
        page.push_str("<meta name=\"generator\" content=\"compdoc\">\n");
        page.push_str(&format!("<title>{title}</title>\n</head>\n<body>\n"));
        page.push_str(&format!("<h1>{title}</h1>\n"));
        page.push_str("<pre class=\"asciidoc\">");
        page.push_str(&escape_html(source));
        page.push_str("</pre>\n");
        if let Some(version) = version {
            page.push_str(&format!("<footer>Version {}</footer>\n", escape_html(version)));
        }
        page.push_str("</body>\n</html>\n");

        page
    }
}

impl Converter for HtmlConverter {
    fn convert(&self, request: &ConversionRequest<'_>) -> Result<()> {
        let source = fs::read_to_string(request.source)
            .map_err(|e| DocgenError::conversion(e, request.format, request.target))?;

        let page = Self::render_page(&source, request.title, request.version);

        write_atomically(request.target, page.as_bytes())
            .map_err(|e| DocgenError::conversion(e, request.format, request.target))
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_starts_with_doctype() {
        let page = HtmlConverter::render_page("== my\n", Some("SuperTitle"), Some("1.0"));

        assert_eq!(page.lines().next(), Some("<!DOCTYPE html>"));
        assert!(page.contains("<title>SuperTitle</title>"));
        assert!(page.contains("<footer>Version 1.0</footer>"));
    }

    #[test]
    fn escapes_source_and_title() {
        let page = HtmlConverter::render_page("a <b> & c", Some("\"T\""), None);

        assert!(page.contains("a &lt;b&gt; &amp; c"));
        assert!(page.contains("<title>&quot;T&quot;</title>"));
        assert!(!page.contains("<footer>"));
    }

    #[test]
    fn missing_title_falls_back() {
        let page = HtmlConverter::render_page("", None, None);

        assert!(page.contains("<title>Components</title>"));
    }
}
