use std::collections::HashSet;

/// One atomic, independently revealable unit of Markdown.
///
/// Lines are kept exactly as received, trailing newlines included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    lines: Vec<String>,
}

impl Section {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// True when at least one line carries something other than whitespace.
    pub fn has_content(&self) -> bool {
        self.lines.iter().any(|l| !l.trim().is_empty())
    }

    /// The last non-blank line, trimmed. Used as the resume marker between renders.
    pub fn terminal_line(&self) -> Option<&str> {
        self.lines
            .iter()
            .rev()
            .map(|l| l.trim())
            .find(|l| !l.is_empty())
    }

    pub(crate) fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub(crate) fn extend(&mut self, lines: Vec<String>) {
        self.lines.extend(lines);
    }
}

/// The ordered sections of one Markdown document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub sections: Vec<Section>,
}

impl Document {
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Section> {
        self.sections.iter()
    }

    /// Every line of every section, in order. Equals the split input.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.sections
            .iter()
            .flat_map(|s| s.lines().iter().map(String::as_str))
    }

    /// Terminal lines shared by more than one section, in order of first repeat.
    ///
    /// Resuming always matches the first section with a given terminal line, so
    /// a later section ending the same way (every closing code fence, say) sends
    /// the reveal back to the earlier one.
    pub fn duplicate_terminal_lines(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for line in self.sections.iter().filter_map(Section::terminal_line) {
            if !seen.insert(line) && !duplicates.contains(&line) {
                duplicates.push(line);
            }
        }
        duplicates
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Section;
    type IntoIter = std::slice::Iter<'a, Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.iter()
    }
}
