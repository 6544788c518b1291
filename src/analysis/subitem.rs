//! Bullet, list item, indented and prose line rejection.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::SubitemConfig;
use crate::model::Fragment;

use super::patterns::HeadingPatterns;
use super::text;

static NUMBERED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+\.\s").expect("Invalid numbered item regex"));

static LETTERED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[a-z]\.\s").expect("Invalid lettered item regex"));

/// Why a fragment was rejected as a sub-item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubitemKind {
    Bullet,
    ListItem,
    Indented,
    Prose,
    Continuation,
}

/// Rejects fragments that read as list items or body text.
#[derive(Debug, Clone, Copy)]
pub struct SubitemFilter<'a> {
    config: &'a SubitemConfig,
    patterns: &'a HeadingPatterns,
}

impl<'a> SubitemFilter<'a> {
    /// Create a filter.
    pub fn new(config: &'a SubitemConfig, patterns: &'a HeadingPatterns) -> Self {
        Self { config, patterns }
    }

    /// The first sub-item rule a fragment trips, if any.
    ///
    /// `context` is every fragment on the same page, used for the
    /// indentation rule.
    pub fn classify(&self, fragment: &Fragment, context: &[Fragment]) -> Option<SubitemKind> {
        let text = fragment.text.as_str();

        if text
            .chars()
            .next()
            .is_some_and(|c| self.config.bullet_glyphs.contains(&c))
        {
            return Some(SubitemKind::Bullet);
        }

        if NUMBERED_ITEM.is_match(text) || LETTERED_ITEM.is_match(text) {
            return Some(SubitemKind::ListItem);
        }

        if self.is_indented(fragment, context) {
            return Some(SubitemKind::Indented);
        }

        let patterned = self.patterns.is_heading_pattern(text);
        if text::ends_with_period(text)
            && text::char_len(text) > self.config.prose_min_chars
            && !patterned
        {
            return Some(SubitemKind::Prose);
        }

        if text::starts_lowercase(text) && !patterned {
            return Some(SubitemKind::Continuation);
        }

        None
    }

    /// An earlier line close above starts further left.
    fn is_indented(&self, fragment: &Fragment, context: &[Fragment]) -> bool {
        let y0 = fragment.y0();
        let x0 = fragment.bbox.x0;
        context.iter().any(|other| {
            other.y0() < y0
                && (y0 - other.y0()) < self.config.indent_window
                && other.bbox.x0 < x0 - self.config.indent_offset
        })
    }
}
