//! The final outline artifact.

use serde::{Deserialize, Serialize};

use super::HeadingLevel;

/// Title plus ranked headings, in the shape written to disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    /// Document title; empty when page one has no text
    pub title: String,

    /// Headings ordered by level, page, then vertical position
    #[serde(rename = "outline")]
    pub entries: Vec<OutlineEntry>,
}

impl Outline {
    /// Create an outline.
    pub fn new(title: impl Into<String>, entries: Vec<OutlineEntry>) -> Self {
        Self {
            title: title.into(),
            entries,
        }
    }

    /// Number of headings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the outline has no headings.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the headings of one level.
    pub fn level(&self, level: HeadingLevel) -> impl Iterator<Item = &OutlineEntry> {
        self.entries.iter().filter(move |e| e.level == level)
    }

    /// Find a heading by exact text.
    pub fn find(&self, text: &str) -> Option<&OutlineEntry> {
        self.entries.iter().find(|e| e.text == text)
    }
}

/// One heading in the outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    pub level: HeadingLevel,
    pub text: String,
    pub page: u32,
}

impl OutlineEntry {
    /// Create an entry.
    pub fn new(level: HeadingLevel, text: impl Into<String>, page: u32) -> Self {
        Self {
            level,
            text: text.into(),
            page,
        }
    }
}
