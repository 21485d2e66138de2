//! # Reveal Resolution
//!
//! Works out how far a presentation has progressed from the text rendered last
//! time, and builds the next cumulative render.
//!
//! Progress is never stored. The terminal line (last non-blank line) of the
//! previous output is compared with the terminal line of each section; the
//! first section that matches is the last one shown, so the next render shows
//! one more. Two sections ending in the same line therefore resolve to the
//! earlier one: a slide with two code blocks steps back to the first block's
//! end after showing the second. `Document::duplicate_terminal_lines` lists
//! the lines where that can happen.

pub mod padding;

use crate::{
    Error,
    parsing::{CodeFence, Section, split_with_fence},
};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RevealError {
    #[error("Cannot reveal an empty document: no sections found")]
    EmptyDocument,
}

/// Knobs shared by every render of a presentation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevealOptions {
    pub fence: CodeFence,
    /// Height in rem of the spacer appended after the content; 0 disables it.
    pub append_space_rem: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealProgress {
    pub shown: usize,
    pub total: usize,
}

impl RevealProgress {
    pub fn is_complete(&self) -> bool {
        self.shown >= self.total
    }
}

/// The result of one reveal step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reveal {
    pub markdown: String,
    pub progress: RevealProgress,
}

/// The last non-blank line of a previous render, ignoring spacer lines.
pub fn terminal_line_of_output(text: &str) -> Option<&str> {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty() && !padding::is_marker(line))
        .next_back()
}

/// How many sections the next render should show.
pub fn resolve_visible_count(sections: &[Section], previous: Option<&str>) -> usize {
    let total = sections.len();
    let Some(terminal) = previous.and_then(terminal_line_of_output) else {
        return total.min(1);
    };

    match sections
        .iter()
        .position(|s| s.terminal_line() == Some(terminal))
    {
        Some(index) => {
            let shown = (index + 2).min(total);
            log::debug!("Previous output ends at section {index}, showing {shown} of {total}");
            shown
        }
        None => {
            log::debug!("Previous output line {terminal:?} matches no section, assuming step two");
            total.min(2)
        }
    }
}

/// Renders the next step with default options.
pub fn render(
    sections: &[Section],
    previous: Option<&str>,
    prefix: Option<&[String]>,
) -> Result<String, RevealError> {
    render_with_options(sections, previous, prefix, &RevealOptions::default())
}

pub fn render_with_options(
    sections: &[Section],
    previous: Option<&str>,
    prefix: Option<&[String]>,
    options: &RevealOptions,
) -> Result<String, RevealError> {
    if sections.is_empty() {
        return Err(RevealError::EmptyDocument);
    }
    let shown = resolve_visible_count(sections, previous);
    Ok(render_sections(&sections[..shown], prefix, options))
}

/// Drops the first Markdown line when a prefix line repeats it, so a style
/// directive authored at the top of the cell is not emitted twice.
pub fn strip_duplicate_prefix_line<'a, S: AsRef<str>>(
    lines: &'a [S],
    prefix: Option<&[String]>,
) -> &'a [S] {
    let (Some(first), Some(prefix)) = (lines.first(), prefix) else {
        return lines;
    };
    let first = first.as_ref().trim_end();
    if prefix.iter().any(|p| p.trim_end() == first) {
        &lines[1..]
    } else {
        lines
    }
}

/// Splits `lines` and renders the step after `previous`.
pub fn reveal_next<S: AsRef<str>>(
    lines: &[S],
    previous: Option<&str>,
    prefix: Option<&[String]>,
    options: &RevealOptions,
) -> Result<Reveal, Error> {
    let lines = strip_duplicate_prefix_line(lines, prefix);
    let document = split_with_fence(lines, options.fence.clone())?;
    if document.is_empty() {
        return Err(RevealError::EmptyDocument.into());
    }

    let shown = resolve_visible_count(&document.sections, previous);
    let markdown = render_sections(&document.sections[..shown], prefix, options);

    Ok(Reveal {
        markdown,
        progress: RevealProgress {
            shown,
            total: document.len(),
        },
    })
}

fn render_sections(
    sections: &[Section],
    prefix: Option<&[String]>,
    options: &RevealOptions,
) -> String {
    let mut out = String::new();

    if let Some(prefix) = prefix.filter(|p| !p.is_empty()) {
        for line in prefix {
            out.push_str(line);
            if !line.ends_with('\n') {
                out.push('\n');
            }
        }
        out.push('\n');
    }

    for line in sections.iter().flat_map(Section::lines) {
        out.push_str(line.trim());
        out.push('\n');
    }

    if options.append_space_rem > 0 {
        out.push_str(&padding::marker(options.append_space_rem));
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::split;
    use crate::tests::lines;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn sections(items: &[&[&str]]) -> Vec<Section> {
        items.iter().map(|s| Section::new(lines(s))).collect()
    }

    fn three_sections() -> Vec<Section> {
        sections(&[
            &["## A new Section"],
            &["A paragraph of text"],
            &["- bullet point one"],
        ])
    }

    #[test]
    fn first_render_shows_first_section() {
        let sections = sections(&[&["<!-- hint -->\n", "\n", "  # Title  \n"], &["Body\n"]]);

        let out = render(&sections, None, None).unwrap();

        assert_eq!(out, "<!-- hint -->\n\n# Title\n");
    }

    #[test]
    fn reveals_one_more_section() {
        let out = render(&three_sections(), Some("## A new Section\n"), None).unwrap();

        assert_eq!(out, "## A new Section\nA paragraph of text\n");
    }

    #[test]
    fn new_terminal_line_is_next_section() {
        let sections = three_sections();
        let previous = render(&sections, Some("## A new Section"), None).unwrap();

        let out = render(&sections, Some(&previous), None).unwrap();

        assert_eq!(terminal_line_of_output(&out), Some("- bullet point one"));
    }

    #[test]
    fn fully_revealed_output_is_stable() {
        let sections = three_sections();
        let full = "## A new Section\nA paragraph of text\n- bullet point one\n";

        let once = render(&sections, Some(full), None).unwrap();
        let twice = render(&sections, Some(&once), None).unwrap();

        assert_eq!(once, full);
        assert_eq!(twice, full);
    }

    #[rstest]
    #[case(None, 1)]
    #[case(Some(""), 1)]
    #[case(Some("\n  \n"), 1)]
    #[case(Some("## A new Section"), 2)]
    #[case(Some("...\nA paragraph of text\n\n"), 3)]
    #[case(Some("- bullet point one"), 3)]
    #[case(Some("something edited away"), 2)]
    fn visible_count(#[case] previous: Option<&str>, #[case] expected: usize) {
        assert_eq!(resolve_visible_count(&three_sections(), previous), expected);
    }

    #[test]
    fn fallback_is_clamped_to_document() {
        let single = sections(&[&["Only"]]);
        assert_eq!(resolve_visible_count(&single, Some("unknown")), 1);
    }

    #[test]
    fn duplicate_terminal_lines_match_first() {
        let sections = sections(&[&["Intro"], &["---"], &["Middle"], &["---"], &["End"]]);
        assert_eq!(resolve_visible_count(&sections, Some("Middle\n---\n")), 3);
    }

    #[test]
    fn empty_document_is_invalid() {
        assert_eq!(render(&[], None, None), Err(RevealError::EmptyDocument));
    }

    #[test]
    fn prefix_lines_are_verbatim_then_blank_line() {
        let prefix = lines(&["<style>\n", "  h1 { font-size: 5rem; }", "</style>"]);

        let out = render(&three_sections(), None, Some(&prefix)).unwrap();

        assert_eq!(
            out,
            "<style>\n  h1 { font-size: 5rem; }\n</style>\n\n## A new Section\n"
        );
    }

    #[test]
    fn empty_prefix_adds_nothing() {
        let out = render(&three_sections(), None, Some(&[])).unwrap();
        assert_eq!(out, "## A new Section\n");
    }

    #[test]
    fn padding_is_appended_and_ignored_when_resuming() {
        let options = RevealOptions {
            append_space_rem: 10,
            ..RevealOptions::default()
        };
        let sections = three_sections();

        let first = render_with_options(&sections, None, None, &options).unwrap();
        assert_eq!(
            first,
            "## A new Section\n<div style=\"display:block; height:10rem;\"></div>\n"
        );

        let second = render_with_options(&sections, Some(&first), None, &options).unwrap();
        assert_eq!(
            second,
            "## A new Section\nA paragraph of text\n<div style=\"display:block; height:10rem;\"></div>\n"
        );
    }

    #[test]
    fn padding_from_an_earlier_height_is_ignored_too() {
        let previous = format!("## A new Section\n{}\n", padding::marker(3));
        let out = render(&three_sections(), Some(&previous), None).unwrap();
        assert_eq!(out, "## A new Section\nA paragraph of text\n");
    }

    #[test]
    fn duplicate_style_line_is_removed_before_splitting() {
        let markdown = lines(&[
            "<link rel=\"stylesheet\" href=\"styles.css\">\n",
            "# Title\n",
            "Body\n",
        ]);
        let prefix = lines(&["<link rel=\"stylesheet\" href=\"styles.css\">"]);

        let reveal =
            reveal_next(&markdown, None, Some(&prefix), &RevealOptions::default()).unwrap();

        assert_eq!(
            reveal.markdown,
            "<link rel=\"stylesheet\" href=\"styles.css\">\n\n# Title\n"
        );
        assert_eq!(reveal.progress, RevealProgress { shown: 1, total: 2 });
    }

    #[test]
    fn only_the_first_line_is_deduplicated() {
        let markdown = lines(&["# Title", "<br>", "Body"]);
        let prefix = lines(&["<br>"]);
        assert_eq!(
            strip_duplicate_prefix_line(&markdown, Some(&prefix)).len(),
            3
        );
    }

    #[test]
    fn reveal_next_walks_to_completion() {
        let markdown = lines(&["# One\n", "\n", "Two\n", "\n", "```\n", "three\n", "```\n"]);
        let total = split(&markdown).unwrap().len();
        let options = RevealOptions::default();

        let mut previous: Option<String> = None;
        let mut steps = vec![];
        loop {
            let reveal = reveal_next(&markdown, previous.as_deref(), None, &options).unwrap();
            steps.push(reveal.progress.shown);
            if previous.as_deref() == Some(reveal.markdown.as_str()) {
                break;
            }
            previous = Some(reveal.markdown);
        }

        assert_eq!(total, 3);
        assert_eq!(steps, vec![1, 2, 3, 3]);
        assert_eq!(
            previous.as_deref(),
            Some("# One\n\nTwo\n\n```\nthree\n```\n")
        );
    }

    #[test]
    fn second_code_block_resumes_from_the_first() {
        let markdown = lines(&[
            "Intro\n", "```\n", "a\n", "```\n", "Middle\n", "```\n", "b\n", "```\n", "End\n",
        ]);
        let options = RevealOptions::default();

        let mut previous: Option<String> = None;
        let mut steps = vec![];
        for _ in 0..8 {
            let reveal = reveal_next(&markdown, previous.as_deref(), None, &options).unwrap();
            steps.push(reveal.progress.shown);
            previous = Some(reveal.markdown);
        }

        // Both fenced sections end in "```", which always resolves to the first.
        assert_eq!(steps, vec![1, 2, 3, 4, 3, 4, 3, 4]);
        assert_eq!(
            split(&markdown).unwrap().duplicate_terminal_lines(),
            vec!["```"]
        );
    }

    #[test]
    fn reveal_next_reports_format_errors() {
        let markdown = lines(&["<div>", "never closed"]);
        let err = reveal_next(&markdown, None, None, &RevealOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Split(_)));
    }

    #[test]
    fn reveal_next_rejects_blank_documents() {
        let markdown = lines(&["\n", "\n"]);
        let err = reveal_next(&markdown, None, None, &RevealOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Reveal(RevealError::EmptyDocument)));
    }
}
