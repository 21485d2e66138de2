use std::sync::OnceLock;

use regex::Regex;

/// Tag names HTML treats as void: they never take content or a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// The shape of a line that starts with `<`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HtmlLine {
    /// `<!-- ... -->` on one line.
    Comment,
    /// `<!--` with no terminator on the same line.
    CommentOpen,
    /// A void element such as `<link rel="stylesheet" href="styles.css">`.
    Void,
    /// `<tag ... />`
    SelfClosing,
    /// `<tag ...>content</tag>` on one line.
    Balanced,
    /// An opening tag left open for following lines.
    Opener,
    /// One or more bare closing tags, e.g. `</p></div>`.
    Closer {
        /// How many closing tags the line carries.
        count: usize,
    },
}

impl HtmlLine {
    /// Whether the line is complete in itself and leaves no block open.
    pub fn is_single_line(self) -> bool {
        matches!(
            self,
            HtmlLine::Comment | HtmlLine::Void | HtmlLine::SelfClosing | HtmlLine::Balanced
        )
    }
}

fn open_tag_regex() -> &'static Regex {
    static OPEN_TAG: OnceLock<Regex> = OnceLock::new();
    OPEN_TAG.get_or_init(|| {
        Regex::new(r"^<([A-Za-z][A-Za-z0-9-]*)(?:\s[^>]*)?>").expect("Invalid open tag regex")
    })
}

fn void_element_regex() -> &'static Regex {
    static VOID: OnceLock<Regex> = OnceLock::new();
    VOID.get_or_init(|| {
        let names = VOID_ELEMENTS.join("|");
        Regex::new(&format!(r"(?i)^<(?:{names})\b[^>]*>$")).expect("Invalid void element regex")
    })
}

fn self_closing_regex() -> &'static Regex {
    static SELF_CLOSING: OnceLock<Regex> = OnceLock::new();
    SELF_CLOSING.get_or_init(|| {
        Regex::new(r"^<[A-Za-z][A-Za-z0-9-]*(?:\s[^>]*)?/>$").expect("Invalid self-closing regex")
    })
}

fn closer_regex() -> &'static Regex {
    static CLOSER: OnceLock<Regex> = OnceLock::new();
    CLOSER.get_or_init(|| {
        Regex::new(r"^(?:</[A-Za-z][A-Za-z0-9-]*\s*>\s*)+(?:<!--.*-->\s*)?$")
            .expect("Invalid closing tag regex")
    })
}

/// Classifies single lines of embedded HTML.
///
/// These are pattern heuristics for hand-written presentation markup (style
/// links, comments, divs, scripts), not an HTML parser. Every predicate expects
/// a line with its leading whitespace already removed; trailing whitespace and
/// newlines are ignored.
pub struct HtmlBlockClassifier;

impl HtmlBlockClassifier {
    /// Classifies a line, returning `None` when it does not look like HTML at all
    /// (for example an autolink such as `<https://example.com>`).
    pub fn classify(&self, line: &str) -> Option<HtmlLine> {
        let line = line.trim();
        if !line.starts_with('<') {
            return None;
        }

        if Self::is_comment_line(line) {
            Some(HtmlLine::Comment)
        } else if Self::is_comment_opener_line(line) {
            Some(HtmlLine::CommentOpen)
        } else if Self::is_closer_line(line) {
            Some(HtmlLine::Closer {
                count: Self::closing_tag_count(line),
            })
        } else if Self::is_self_closing_line(line) {
            Some(HtmlLine::SelfClosing)
        } else if Self::is_void_element_line(line) {
            Some(HtmlLine::Void)
        } else if Self::is_balanced_single_line(line) {
            Some(HtmlLine::Balanced)
        } else if Self::is_opener_line(line) {
            Some(HtmlLine::Opener)
        } else {
            None
        }
    }

    pub fn is_comment_line(line: &str) -> bool {
        let line = line.trim();
        line.starts_with("<!--") && line.len() >= "<!---->".len() && line.ends_with("-->")
    }

    /// `<!--` that is not terminated on the same line.
    pub fn is_comment_opener_line(line: &str) -> bool {
        let line = line.trim();
        line.starts_with("<!--") && !line[4..].contains("-->")
    }

    pub fn is_void_element_line(line: &str) -> bool {
        void_element_regex().is_match(line.trim())
    }

    pub fn is_self_closing_line(line: &str) -> bool {
        self_closing_regex().is_match(line.trim())
    }

    /// An opening tag, some content, and the matching closing tag, all on one line.
    pub fn is_balanced_single_line(line: &str) -> bool {
        let line = line.trim();
        let Some((name, open_end)) = Self::opening_tag(line) else {
            return false;
        };
        let closing = format!("</{name}>");
        line.len() >= open_end + closing.len()
            && line[open_end..]
                .to_ascii_lowercase()
                .ends_with(&closing.to_ascii_lowercase())
    }

    /// An opening tag whose element continues on later lines.
    ///
    /// A tag closed further along the same line, as in `<b>Note:</b> read this`,
    /// is inline Markdown and opens nothing.
    pub fn is_opener_line(line: &str) -> bool {
        let line = line.trim();
        match Self::opening_tag(line) {
            Some((name, _)) => {
                !Self::is_void_name(name)
                    && !Self::is_self_closing_line(line)
                    && !Self::is_balanced_single_line(line)
                    && !Self::closes_on_same_line(line)
            }
            None => false,
        }
    }

    /// One or more closing tags, optionally followed by a one-line comment.
    pub fn is_closer_line(line: &str) -> bool {
        closer_regex().is_match(line.trim())
    }

    fn closing_tag_count(line: &str) -> usize {
        let tags = line.split("<!--").next().unwrap_or(line);
        tags.matches("</").count()
    }

    /// Whether the leading tag's closing tag appears anywhere later on the line.
    fn closes_on_same_line(line: &str) -> bool {
        let Some((name, open_end)) = Self::opening_tag(line) else {
            return false;
        };
        line[open_end..]
            .to_ascii_lowercase()
            .contains(&format!("</{}>", name.to_ascii_lowercase()))
    }

    fn is_void_name(name: &str) -> bool {
        VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(name))
    }

    /// Tag name of a leading opening tag, and the byte offset just past its `>`.
    fn opening_tag(line: &str) -> Option<(&str, usize)> {
        let caps = open_tag_regex().captures(line)?;
        let name = caps.get(1)?.as_str();
        let end = caps.get(0)?.end();
        Some((name, end))
    }
}
