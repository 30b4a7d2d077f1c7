//! Utility functions for internal use.

/// Prefixes every line of `text` with `level` copies of `indentation_atom`.
pub fn indent_ext(text: &str, level: usize, indentation_atom: &str) -> String {
    let indent = indentation_atom.repeat(level);
    text.lines().map(|l| format!("{}{}", indent, l)).collect::<Vec<_>>().join("\n")
}

/// Number of characters (not bytes) in a string, for column layout.
pub fn display_width(text: &str) -> usize {
    text.chars().count()
}
