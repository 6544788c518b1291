//! Plain text rendering for outlines.

use crate::model::Outline;

/// Render an outline as an indented list, one heading per line.
///
/// The title comes first when present; each heading is indented by its level
/// and followed by its page number.
pub fn to_text(outline: &Outline) -> String {
    let mut output = String::new();

    if !outline.title.is_empty() {
        output.push_str(&outline.title);
        output.push('\n');
    }

    for entry in &outline.entries {
        let indent = "  ".repeat(entry.level.rank() as usize - 1);
        output.push_str(&format!(
            "{}{} {} (p. {})\n",
            indent, entry.level, entry.text, entry.page
        ));
    }

    output
}
