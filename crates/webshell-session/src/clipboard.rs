#![forbid(unsafe_code)]

//! Copy normalisation for line-numbered code blocks.
//!
//! Selecting across a line-numbered block picks up a tab-only or space-only
//! line between every code line. The copy handler strips them before the text
//! reaches the clipboard.

/// Classes marking a line-numbered code block or one of its lines.
pub const LINE_NUMBER_CLASSES: [&str; 2] = ["hljs-ln-line", "hljs-ln"];

/// Whether a selection anchored on an element with these classes should be
/// normalised.
pub fn is_line_numbered_anchor<'a>(classes: impl IntoIterator<Item = &'a str>) -> bool {
    classes
        .into_iter()
        .any(|class| LINE_NUMBER_CLASSES.contains(&class))
}

/// Collapse `"\n\t\n"` to `"\n"`, then `"\n \n"` to `"\n\n"`.
///
/// Each pass is a single left-to-right scan over non-overlapping matches.
#[must_use]
pub fn normalize_code_copy(selection: &str) -> String {
    selection.replace("\n\t\n", "\n").replace("\n \n", "\n\n")
}

/// The text to place on the clipboard, or `None` to leave the default copy
/// behavior alone.
pub fn copy_override<'a>(
    anchor_classes: impl IntoIterator<Item = &'a str>,
    selection: &str,
) -> Option<String> {
    is_line_numbered_anchor(anchor_classes).then(|| normalize_code_copy(selection))
}
