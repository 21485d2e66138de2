use super::{
    fence::CodeFence,
    html::{HtmlBlockClassifier, HtmlLine},
    types::{Document, Section},
};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SplitError {
    #[error("Unclosed HTML block: {depth} element(s) opened from line {line} are never closed")]
    UnclosedHtml { depth: usize, line: usize },
    #[error("Unclosed HTML comment starting at line {line}")]
    UnclosedComment { line: usize },
}

/// Partitions Markdown lines into revealable sections.
///
/// Lines are pushed one at a time; a section closes right after a printable
/// Markdown line that sits outside any code fence or HTML block, and a fenced
/// block always forms a section of its own. Blank and HTML lines are filler that
/// joins the next section to close.
pub struct SectionSplitter {
    fence: CodeFence,
    classifier: HtmlBlockClassifier,
    current: Section,
    in_fence: bool,
    html_depth: usize,
    /// 1-based line that opened the outermost HTML block still open.
    html_opened_at: Option<usize>,
    /// 1-based line of a multi-line comment still open.
    comment_opened_at: Option<usize>,
    line_no: usize,
    out: Vec<Section>,
}

impl SectionSplitter {
    pub fn new(fence: CodeFence) -> Self {
        Self {
            fence,
            classifier: HtmlBlockClassifier,
            current: Section::default(),
            in_fence: false,
            html_depth: 0,
            html_opened_at: None,
            comment_opened_at: None,
            line_no: 0,
            out: vec![],
        }
    }

    pub fn push(&mut self, line: &str) {
        self.line_no += 1;

        if self.comment_opened_at.is_some() {
            if line.contains("-->") {
                self.comment_opened_at = None;
            }
            self.current.push(line);
            return;
        }

        if self.fence.is_marker(line) {
            if self.in_fence {
                self.current.push(line);
                self.emit();
                self.in_fence = false;
            } else {
                if self.current.has_content() {
                    self.emit();
                }
                self.current.push(line);
                self.in_fence = true;
            }
            return;
        }

        if !self.in_fence
            && let Some(html) = self.classifier.classify(line.trim_start())
        {
            self.consume_html_line(html);
            self.current.push(line);
            return;
        }

        let printable = !line.trim().is_empty();
        self.current.push(line);
        if printable && !self.in_fence && self.html_depth == 0 {
            self.emit();
        }
    }

    pub fn finish(mut self) -> Result<Document, SplitError> {
        if let Some(line) = self.comment_opened_at {
            return Err(SplitError::UnclosedComment { line });
        }
        if self.html_depth > 0 {
            return Err(SplitError::UnclosedHtml {
                depth: self.html_depth,
                line: self.html_opened_at.unwrap_or(self.line_no),
            });
        }

        if self.in_fence {
            log::debug!("Code fence left open at end of input, closing it with the document");
        }

        let remainder = std::mem::take(&mut self.current);
        if remainder.has_content() {
            self.out.push(remainder);
        } else if !remainder.is_empty()
            && let Some(last) = self.out.last_mut()
        {
            // Trailing blank lines stay with the last section so nothing is lost.
            last.extend(remainder.into_lines());
        }

        Ok(Document { sections: self.out })
    }

    fn consume_html_line(&mut self, html: HtmlLine) {
        match html {
            html if html.is_single_line() => {}
            HtmlLine::Opener => {
                if self.html_depth == 0 {
                    self.html_opened_at = Some(self.line_no);
                }
                self.html_depth += 1;
            }
            HtmlLine::Closer { count } => {
                if count > self.html_depth {
                    log::warn!(
                        "Line {}: {} closing tag(s) with only {} HTML element(s) open",
                        self.line_no,
                        count,
                        self.html_depth
                    );
                }
                self.html_depth = self.html_depth.saturating_sub(count);
                if self.html_depth == 0 {
                    self.html_opened_at = None;
                }
            }
            HtmlLine::CommentOpen => {
                self.comment_opened_at = Some(self.line_no);
            }
            _ => {}
        }
    }

    fn emit(&mut self) {
        let section = std::mem::take(&mut self.current);
        if !section.is_empty() {
            self.out.push(section);
        }
    }
}

impl Default for SectionSplitter {
    fn default() -> Self {
        Self::new(CodeFence::default())
    }
}
