//! Heading levels and the working heading record.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Heading level. A rank, not a visual style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    /// Numeric rank: 1 for H1 through 3 for H3.
    pub fn rank(self) -> u8 {
        match self {
            HeadingLevel::H1 => 1,
            HeadingLevel::H2 => 2,
            HeadingLevel::H3 => 3,
        }
    }

    /// Label used in output ("H1", "H2", "H3").
    pub fn as_str(self) -> &'static str {
        match self {
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A heading candidate as it moves through post-processing.
#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    /// Assigned level
    pub level: HeadingLevel,
    /// Heading text; grows when split headings merge
    pub text: String,
    /// Page number (1-indexed)
    pub page: u32,
    /// Score the heading was accepted with
    pub score: i32,
    /// Upper edge
    pub y0: f32,
    /// Lower edge; grows when split headings merge
    pub y1: f32,
    /// Right edge
    pub x1: f32,
    /// Parent heading text, set when a common section repeats under a distinct parent
    pub parent: Option<String>,
}

impl Heading {
    /// Create a heading.
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32, y0: f32, y1: f32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
            score: 0,
            y0,
            y1,
            x1: 0.0,
            parent: None,
        }
    }

    /// Set the score.
    pub fn with_score(mut self, score: i32) -> Self {
        self.score = score;
        self
    }

    /// Set the right edge.
    pub fn with_x1(mut self, x1: f32) -> Self {
        self.x1 = x1;
        self
    }

    /// Document order: page, then vertical position.
    pub fn document_order(a: &Heading, b: &Heading) -> Ordering {
        a.page
            .cmp(&b.page)
            .then_with(|| a.y0.partial_cmp(&b.y0).unwrap_or(Ordering::Equal))
    }

    /// Outline order: level rank, then document order.
    pub fn outline_order(a: &Heading, b: &Heading) -> Ordering {
        a.level
            .rank()
            .cmp(&b.level.rank())
            .then_with(|| Heading::document_order(a, b))
    }
}

/// Stable sort into document order.
pub fn sort_document_order(headings: &mut [Heading]) {
    headings.sort_by(Heading::document_order);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ranks() {
        let ranks: Vec<u8> = [HeadingLevel::H1, HeadingLevel::H2, HeadingLevel::H3]
            .iter()
            .map(|level| level.rank())
            .collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        assert!(HeadingLevel::H1 < HeadingLevel::H3);
    }

    #[test]
    fn test_level_serializes_as_label() {
        let json = serde_json::to_string(&HeadingLevel::H2).unwrap();
        assert_eq!(json, "\"H2\"");
        assert_eq!(HeadingLevel::H3.to_string(), "H3");
    }

    #[test]
    fn test_document_order_is_stable() {
        let mut headings = vec![
            Heading::new(HeadingLevel::H1, "B", 2, 100.0, 110.0),
            Heading::new(HeadingLevel::H2, "A1", 1, 300.0, 310.0),
            Heading::new(HeadingLevel::H1, "A0", 1, 100.0, 110.0),
            Heading::new(HeadingLevel::H3, "A0 twin", 1, 100.0, 110.0),
        ];
        sort_document_order(&mut headings);
        let texts: Vec<_> = headings.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(texts, vec!["A0", "A0 twin", "A1", "B"]);
    }
}
