use super::collection::Document;
use crate::error::{FurrowError, Result};

const YAML_DELIMITER: &str = "---";
const TOML_DELIMITER: &str = "+++";

/// Serialization format of the frontmatter block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrontmatterFormat {
    #[default]
    Toml,
    Yaml,
}

impl FrontmatterFormat {
    fn delimiter(self) -> &'static str {
        match self {
            FrontmatterFormat::Toml => TOML_DELIMITER,
            FrontmatterFormat::Yaml => YAML_DELIMITER,
        }
    }
}

/// Detect the frontmatter format from the opening delimiter.
pub fn detect_format(content: &str) -> Option<FrontmatterFormat> {
    let content = content.trim_start();
    if content.starts_with(TOML_DELIMITER) {
        Some(FrontmatterFormat::Toml)
    } else if content.starts_with(YAML_DELIMITER) {
        Some(FrontmatterFormat::Yaml)
    } else {
        None
    }
}

/// Split a document file into (format, frontmatter, body).
fn split_frontmatter(content: &str) -> Result<(FrontmatterFormat, &str, &str)> {
    let content = content.trim_start();
    let format = detect_format(content).ok_or_else(|| {
        FurrowError::Parse("Missing frontmatter delimiter ('+++' or '---')".to_string())
    })?;
    let delimiter = format.delimiter();

    let after_first = &content[delimiter.len()..];
    // The closing delimiter must start a line of its own.
    let closing = format!("\n{}", delimiter);
    let end_index = after_first
        .find(&closing)
        .ok_or_else(|| FurrowError::Parse("Missing closing frontmatter delimiter".to_string()))?;

    let frontmatter = after_first[..end_index].trim();
    let body = body_after_frontmatter(&after_first[end_index + closing.len()..]);
    Ok((format, frontmatter, body))
}

/// Notes following the closing delimiter. Blank lines before the first line of text and
/// trailing line breaks are dropped; indentation is kept.
fn body_after_frontmatter(rest: &str) -> &str {
    let mut body = rest;
    while let Some(newline) = body.find('\n') {
        if !body[..newline].trim().is_empty() {
            break;
        }
        body = &body[newline + 1..];
    }
    if body.trim().is_empty() {
        return "";
    }
    body.trim_end_matches(['\n', '\r'])
}

/// Parse a document, auto-detecting TOML or YAML frontmatter.
pub fn parse_document<T: Document>(content: &str) -> Result<T> {
    let (format, frontmatter, body) = split_frontmatter(content)?;

    let mut doc: T = match format {
        FrontmatterFormat::Toml => toml::from_str(frontmatter)?,
        FrontmatterFormat::Yaml => serde_yaml::from_str(frontmatter)?,
    };
    doc.set_notes(body.to_string());
    Ok(doc)
}

/// Render a document with the requested frontmatter format.
pub fn render_document<T: Document>(doc: &T, format: FrontmatterFormat) -> Result<String> {
    let frontmatter = match format {
        FrontmatterFormat::Toml => toml::to_string(doc)?,
        FrontmatterFormat::Yaml => serde_yaml::to_string(doc)?,
    };
    let delimiter = format.delimiter();

    let mut output = String::new();
    output.push_str(delimiter);
    output.push('\n');
    output.push_str(frontmatter.trim());
    output.push('\n');
    output.push_str(delimiter);
    output.push('\n');

    let notes = doc.notes().trim_end_matches(['\n', '\r']);
    if !notes.trim().is_empty() {
        output.push('\n');
        output.push_str(notes);
        output.push('\n');
    }

    Ok(output)
}
