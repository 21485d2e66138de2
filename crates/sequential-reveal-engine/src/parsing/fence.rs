/// Detects code fence delimiter lines.
///
/// The marker is a literal prefix matched after leading whitespace, so
/// "```csharp" both opens and (as "```") closes a backtick fence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeFence {
    marker: String,
}

impl CodeFence {
    pub const BACKTICKS: &'static str = "```";
    pub const TILDES: &'static str = "~~~";

    /// A fence using `marker`. A blank marker would match every line, so it
    /// falls back to backticks.
    pub fn new(marker: impl Into<String>) -> Self {
        let marker = marker.into();
        if marker.trim().is_empty() {
            log::warn!("Ignoring blank code fence marker, using {}", Self::BACKTICKS);
            return Self::default();
        }
        Self { marker }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn is_marker(&self, line: &str) -> bool {
        line.trim_start().starts_with(self.marker.as_str())
    }
}

impl Default for CodeFence {
    fn default() -> Self {
        Self {
            marker: Self::BACKTICKS.to_string(),
        }
    }
}
