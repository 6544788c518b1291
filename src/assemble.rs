//! Final outline assembly.

use crate::model::{Heading, Outline, OutlineEntry};

/// Sort headings by level, page and position, and project them into an outline.
pub fn assemble_outline(title: impl Into<String>, mut headings: Vec<Heading>) -> Outline {
    headings.sort_by(Heading::outline_order);
    let entries = headings
        .into_iter()
        .map(|h| OutlineEntry::new(h.level, h.text, h.page))
        .collect();
    Outline::new(title, entries)
}
