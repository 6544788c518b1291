//! Heading hierarchy repair.

use crate::analysis::text;
use crate::config::PostProcessConfig;
use crate::model::{sort_document_order, Heading, HeadingLevel};

/// Running state of the hierarchy fold.
#[derive(Debug, Clone, Default)]
struct HierarchyState {
    /// Rank of the previous heading, 0 before the first one
    last_rank: u8,
    /// Text of the most recent H1
    current_h1: Option<String>,
    /// Page of the most recent H1, 0 before the first one
    last_h1_page: u32,
    /// Page of the latest H2 after the most recent H1
    last_h2_page: Option<u32>,
}

impl HierarchyState {
    fn record(&mut self, heading: &Heading) {
        match heading.level {
            HeadingLevel::H1 => {
                self.current_h1 = Some(heading.text.clone());
                self.last_h1_page = heading.page;
                self.last_h2_page = None;
            }
            HeadingLevel::H2 => self.last_h2_page = Some(heading.page),
            HeadingLevel::H3 => {}
        }
        self.last_rank = heading.level.rank();
    }
}

/// Repair level jumps and promote headings that open new sections.
///
/// Headings are visited in document order: a level deeper than one below the
/// previous heading is pulled up, an H3 with no H2 above it on its page under
/// the current H1 becomes H2 when shaped like a section heading, and an H2 far
/// enough past the last H1 becomes H1.
pub fn repair_hierarchy(mut headings: Vec<Heading>, config: &PostProcessConfig) -> Vec<Heading> {
    sort_document_order(&mut headings);

    let mut state = HierarchyState::default();
    headings
        .into_iter()
        .map(|mut heading| {
            heading.level = next_level(&heading, &state, config);
            state.record(&heading);
            heading
        })
        .collect()
}

fn next_level(heading: &Heading, state: &HierarchyState, config: &PostProcessConfig) -> HeadingLevel {
    let text = heading.text.trim();
    let words = text::word_count(text);
    let uppercase = text::uppercase_count(text);
    let period = text::ends_with_period(text);
    let mut level = heading.level;

    if level.rank() > state.last_rank + 1 {
        level = match state.last_rank {
            2 => HeadingLevel::H3,
            _ => HeadingLevel::H2,
        };
    }

    if level == HeadingLevel::H3
        && state.current_h1.is_some()
        && state.last_h2_page != Some(heading.page)
        && words >= config.section_min_words
        && !period
        && uppercase >= config.promote_min_uppercase
    {
        level = HeadingLevel::H2;
    }

    if level == HeadingLevel::H2
        && heading.page > state.last_h1_page + config.promote_page_gap
        && words <= config.promote_max_words
        && !period
        && uppercase >= config.promote_min_uppercase
    {
        level = HeadingLevel::H1;
    }

    if level == HeadingLevel::H2
        && state.current_h1.is_some()
        && heading.page > state.last_h1_page + config.force_promote_page_gap
    {
        level = HeadingLevel::H1;
    }

    if level != heading.level {
        log::trace!("Heading {:?} moved from {} to {}", text, heading.level, level);
    }
    level
}
