//! Merging of headings split across consecutive lines.

use crate::analysis::text;
use crate::model::{sort_document_order, Heading};

/// Join consecutive same-level headings that are vertically adjacent.
///
/// A heading keeps absorbing the next one while both sit on the same page
/// at the same level, the gap from its lower edge is below `max_gap`, and
/// its text does not already end with terminal punctuation.
pub fn merge_split_headings(mut headings: Vec<Heading>, max_gap: f32) -> Vec<Heading> {
    sort_document_order(&mut headings);

    let mut merged: Vec<Heading> = Vec::with_capacity(headings.len());
    let mut iter = headings.into_iter().peekable();

    while let Some(mut current) = iter.next() {
        while let Some(next) = iter.next_if(|next| {
            next.page == current.page
                && next.level == current.level
                && (next.y0 - current.y1).abs() < max_gap
                && !text::ends_with_terminal(&current.text)
        }) {
            log::trace!("Merging {:?} into {:?}", next.text, current.text);
            current.text.push(' ');
            current.text.push_str(&next.text);
            current.y1 = next.y1;
            current.x1 = current.x1.max(next.x1);
        }
        current.text = current.text.trim().to_string();
        merged.push(current);
    }

    merged
}
