use std::path::PathBuf;

use crate::{
    Error, io,
    notebook::{Notebook, NotebookError},
    parsing::lines_from_text,
};

/// Where the prefix lines placed above every render come from.
///
/// The lines are opaque to the engine; they are usually a `<style>` block or a
/// stylesheet `<link>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleSource {
    File(PathBuf),
    Inline(String),
    /// The source of another cell in the same notebook.
    CellTag(String),
}

impl StyleSource {
    pub fn resolve(&self, notebook: &Notebook) -> Result<Vec<String>, Error> {
        match self {
            StyleSource::File(path) => Ok(lines_from_text(&io::read_file(path)?)),
            StyleSource::Inline(text) => Ok(lines_from_text(text)),
            StyleSource::CellTag(tag) => notebook
                .cell_with_tag(tag)
                .map(|cell| cell.source.clone())
                .ok_or_else(|| NotebookError::TagNotFound(tag.clone()).into()),
        }
    }
}
