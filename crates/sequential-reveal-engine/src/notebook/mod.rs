//! # Notebook Model
//!
//! The slice of the Jupyter nbformat 4 document this tool reads and writes.
//!
//! A presentation pairs a markdown cell with the code cell that follows it. The
//! code cell is found by a metadata tag, its markdown outputs hold the previous
//! render, and recording a new render replaces those outputs. Fields this tool
//! does not understand are carried through untouched via the `extra` maps, so a
//! notebook saved after recording differs from the original only in outputs.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::{
    Error, io,
    parsing::lines_from_text,
    reveal::{Reveal, RevealOptions, reveal_next},
};

pub const MARKDOWN_CELL: &str = "markdown";
pub const DISPLAY_DATA: &str = "display_data";
pub const MARKDOWN_MIME: &str = "text/markdown";

#[derive(Debug, thiserror::Error)]
pub enum NotebookError {
    #[error("Invalid notebook JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Tag '{0}' not found in any cell")]
    TagNotFound(String),
    #[error("Tag '{0}' found in first cell. There must be a preceding cell containing Markdown")]
    NoPrecedingCell(String),
    #[error("The preceding cell is not a Markdown cell (found '{cell_type}')")]
    PrecedingCellNotMarkdown { cell_type: String },
    #[error("No content found in the preceding Markdown cell")]
    EmptyMarkdownCell,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notebook {
    pub cells: Vec<Cell>,
    #[serde(default)]
    pub metadata: NotebookMetadata,
    #[serde(default = "default_nbformat")]
    pub nbformat: u32,
    #[serde(default)]
    pub nbformat_minor: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotebookMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kernelspec: Option<KernelSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_info: Option<LanguageInfo>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KernelSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    pub cell_type: String,
    #[serde(default)]
    pub metadata: CellMetadata,
    #[serde(default, deserialize_with = "multiline_text")]
    pub source: Vec<String>,
    /// Only code cells carry outputs; markdown cells omit the field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Vec<CellOutput>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CellMetadata {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellOutput {
    pub output_type: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub data: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_nbformat() -> u32 {
    4
}

/// nbformat stores multi-line text either as one string or as a list of lines.
#[derive(Deserialize)]
#[serde(untagged)]
enum MultilineText {
    One(String),
    Many(Vec<String>),
}

impl MultilineText {
    fn into_lines(self) -> Vec<String> {
        match self {
            MultilineText::One(text) => lines_from_text(&text),
            MultilineText::Many(lines) => lines,
        }
    }
}

fn multiline_text<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(MultilineText::deserialize(deserializer)?.into_lines())
}

impl Notebook {
    pub fn from_json(json: &str) -> Result<Self, NotebookError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let content = io::read_file(path)?;
        Ok(Self::from_json(&content)?)
    }

    /// Serialises with the one-space indent Jupyter itself writes.
    pub fn to_json_pretty(&self) -> Result<String, NotebookError> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;
        let mut json = String::from_utf8_lossy(&buf).into_owned();
        json.push('\n');
        Ok(json)
    }

    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let json = self.to_json_pretty()?;
        io::write_file(path, &json)?;
        Ok(())
    }

    pub fn index_of_cell_with_tag(&self, tag: &str) -> Option<usize> {
        self.cells.iter().position(|cell| cell.has_tag(tag))
    }

    pub fn cell_with_tag(&self, tag: &str) -> Option<&Cell> {
        self.index_of_cell_with_tag(tag).map(|i| &self.cells[i])
    }

    pub fn cell_with_tag_mut(&mut self, tag: &str) -> Option<&mut Cell> {
        self.cells.iter_mut().find(|cell| cell.has_tag(tag))
    }

    /// Source lines of the markdown cell immediately before the tagged cell.
    pub fn preceding_markdown_lines(&self, tag: &str) -> Result<&[String], NotebookError> {
        let index = self
            .index_of_cell_with_tag(tag)
            .ok_or_else(|| NotebookError::TagNotFound(tag.to_string()))?;
        if index == 0 {
            return Err(NotebookError::NoPrecedingCell(tag.to_string()));
        }

        let preceding = &self.cells[index - 1];
        if !preceding.is_markdown() {
            return Err(NotebookError::PrecedingCellNotMarkdown {
                cell_type: preceding.cell_type.clone(),
            });
        }
        if preceding.source.is_empty() {
            return Err(NotebookError::EmptyMarkdownCell);
        }
        Ok(&preceding.source)
    }

    /// The next reveal step for the cell tagged `tag`.
    pub fn render_next(
        &self,
        tag: &str,
        prefix: Option<&[String]>,
        options: &RevealOptions,
    ) -> Result<Reveal, Error> {
        let lines = self.preceding_markdown_lines(tag)?;
        let previous = self
            .cell_with_tag(tag)
            .and_then(Cell::last_markdown_text);
        log::debug!(
            "Rendering '{tag}' with {} source line(s), previous output: {}",
            lines.len(),
            if previous.is_some() { "present" } else { "none" }
        );
        reveal_next(lines, previous.as_deref(), prefix, options)
    }

    /// Replaces the tagged cell's outputs with a single markdown display.
    pub fn record_output(&mut self, tag: &str, markdown: &str) -> Result<(), NotebookError> {
        let cell = self
            .cell_with_tag_mut(tag)
            .ok_or_else(|| NotebookError::TagNotFound(tag.to_string()))?;
        cell.outputs = Some(vec![CellOutput::markdown(markdown)]);
        Ok(())
    }

    /// Forgets the recorded render so the next one starts from the first section.
    pub fn clear_outputs(&mut self, tag: &str) -> Result<(), NotebookError> {
        let cell = self
            .cell_with_tag_mut(tag)
            .ok_or_else(|| NotebookError::TagNotFound(tag.to_string()))?;
        cell.outputs = Some(vec![]);
        Ok(())
    }
}

impl Cell {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.metadata.tags.iter().any(|t| t == tag)
    }

    pub fn is_markdown(&self) -> bool {
        self.cell_type == MARKDOWN_CELL
    }

    pub fn markdown_outputs(&self) -> impl Iterator<Item = &CellOutput> {
        self.outputs
            .iter()
            .flatten()
            .filter(|output| output.is_markdown_display())
    }

    /// Text of the most recent markdown display, if any.
    pub fn last_markdown_text(&self) -> Option<String> {
        self.markdown_outputs()
            .filter_map(CellOutput::markdown_text)
            .last()
    }
}

impl CellOutput {
    pub fn markdown(text: &str) -> Self {
        let lines = lines_from_text(text)
            .into_iter()
            .map(Value::String)
            .collect();
        let mut data = Map::new();
        data.insert(MARKDOWN_MIME.to_string(), Value::Array(lines));
        Self {
            output_type: DISPLAY_DATA.to_string(),
            data,
            metadata: Some(Value::Object(Map::new())),
            extra: Map::new(),
        }
    }

    pub fn is_markdown_display(&self) -> bool {
        self.output_type == DISPLAY_DATA && self.data.contains_key(MARKDOWN_MIME)
    }

    pub fn markdown_text(&self) -> Option<String> {
        match self.data.get(MARKDOWN_MIME)? {
            Value::String(text) => Some(text.clone()),
            Value::Array(lines) => Some(lines.iter().filter_map(Value::as_str).collect()),
            _ => None,
        }
    }
}
