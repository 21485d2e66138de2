use xi_rope::Rope;

/// Splits text into lines, keeping each line's newline.
///
/// Uses `lines_raw` so that `"a\r\n"` and a final line without a newline come
/// back byte-for-byte; concatenating the result reproduces `text`.
pub fn lines_from_text(text: &str) -> Vec<String> {
    let rope = Rope::from(text);
    rope.lines_raw(..)
        .map(|line| line.into_owned())
        .filter(|line| !line.is_empty())
        .collect()
}
