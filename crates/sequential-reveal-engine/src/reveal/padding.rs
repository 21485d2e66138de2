use std::sync::OnceLock;

use regex::Regex;

/// The spacer appended after a render so the next slide stays out of view.
pub fn marker(height_rem: u32) -> String {
    format!("<div style=\"display:block; height:{height_rem}rem;\"></div>")
}

/// Whether `line` is a spacer of any height.
pub fn is_marker(line: &str) -> bool {
    static PADDING: OnceLock<Regex> = OnceLock::new();
    let padding = PADDING.get_or_init(|| {
        Regex::new(r#"^<div style="display:block; height:\d+rem;"></div>$"#)
            .expect("Invalid padding marker regex")
    });
    padding.is_match(line.trim())
}
