//! Repeated header and footer detection.

use std::collections::{HashMap, HashSet};

use crate::config::BoilerplateConfig;
use crate::model::{Fragment, PageContent};

/// Texts repeated in the page margins of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Boilerplate {
    texts: HashSet<String>,
}

impl Boilerplate {
    /// Detect boilerplate over all pages of a document.
    ///
    /// A trimmed text in the header band (or the footer band) is boilerplate
    /// when it appears on more than half of the pages.
    pub fn detect(pages: &[PageContent], config: &BoilerplateConfig) -> Self {
        let page_count = pages.len();
        if page_count < config.min_pages as usize {
            return Self::default();
        }

        let mut top: HashMap<&str, HashSet<u32>> = HashMap::new();
        let mut bottom: HashMap<&str, HashSet<u32>> = HashMap::new();

        for page in pages {
            for frag in &page.fragments {
                let text = frag.text.trim();
                if text.is_empty() {
                    continue;
                }
                if frag.y0() < config.top_band {
                    top.entry(text).or_default().insert(page.number);
                } else if frag.y0() > config.bottom_band {
                    bottom.entry(text).or_default().insert(page.number);
                }
            }
        }

        let texts = top
            .into_iter()
            .chain(bottom)
            .filter(|(_, seen)| seen.len() * 2 > page_count)
            .map(|(text, _)| text.to_string())
            .collect();

        Self { texts }
    }

    /// Check whether a fragment repeats a boilerplate text.
    pub fn matches(&self, fragment: &Fragment) -> bool {
        self.contains(&fragment.text)
    }

    /// Check whether a text is boilerplate.
    pub fn contains(&self, text: &str) -> bool {
        self.texts.contains(text.trim())
    }

    /// Number of boilerplate texts.
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    /// Check if no boilerplate was found.
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Boilerplate texts in sorted order.
    pub fn texts(&self) -> Vec<&str> {
        let mut texts: Vec<&str> = self.texts.iter().map(String::as_str).collect();
        texts.sort_unstable();
        texts
    }
}
