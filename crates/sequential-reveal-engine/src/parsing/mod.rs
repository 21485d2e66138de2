//! # Section Splitting
//!
//! Partitions a Markdown document into the sections revealed one per render.
//!
//! ## Modules
//!
//! - **`html`**: `HtmlBlockClassifier` recognises single-line HTML, block openers
//!   and block closers with a handful of patterns
//! - **`fence`**: `CodeFence` detects the configured fence marker
//! - **`splitter`**: `SectionSplitter` makes one pass over the lines and emits
//!   `Section`s
//! - **`lines`**: newline-preserving line splitting for raw text
//! - **`types`**: `Section` and `Document`
//!
//! ## Key Invariants
//!
//! - Lossless: the sections of a document, concatenated, are the input lines
//! - A printable line outside any fence or HTML block ends its section
//! - A fenced block is always exactly one section
//! - An HTML block never ends a section by itself; it joins the next printable line

pub mod fence;
pub mod html;
pub mod lines;
pub mod splitter;
pub mod types;

pub use fence::CodeFence;
pub use html::{HtmlBlockClassifier, HtmlLine};
pub use lines::lines_from_text;
pub use splitter::{SectionSplitter, SplitError};
pub use types::{Document, Section};

/// Splits lines into sections using the default backtick fence.
pub fn split<S: AsRef<str>>(lines: &[S]) -> Result<Document, SplitError> {
    split_with_fence(lines, CodeFence::default())
}

pub fn split_with_fence<S: AsRef<str>>(
    lines: &[S],
    fence: CodeFence,
) -> Result<Document, SplitError> {
    let mut splitter = SectionSplitter::new(fence);
    for line in lines {
        splitter.push(line.as_ref());
    }
    splitter.finish()
}
