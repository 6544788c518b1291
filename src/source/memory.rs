//! In-memory page source.

use crate::error::{Error, Result};
use crate::model::PageContent;

use super::PageSource;

/// Pages already held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pages: Vec<PageContent>,
}

impl MemorySource {
    /// Create a source from pages.
    ///
    /// Pages are renumbered from 1 in the order given.
    pub fn new(pages: Vec<PageContent>) -> Self {
        let mut source = Self::default();
        for page in pages {
            source.push_page(page);
        }
        source
    }

    /// Append a page, giving it the next page number.
    pub fn push_page(&mut self, mut page: PageContent) {
        let number = self.pages.len() as u32 + 1;
        page.number = number;
        for fragment in &mut page.fragments {
            fragment.page = number;
        }
        self.pages.push(page);
    }

    /// Builder-style variant of [`push_page`](Self::push_page).
    pub fn with_page(mut self, page: PageContent) -> Self {
        self.push_page(page);
        self
    }
}

impl PageSource for MemorySource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page(&self, number: u32) -> Result<PageContent> {
        number
            .checked_sub(1)
            .and_then(|i| self.pages.get(i as usize))
            .cloned()
            .ok_or(Error::PageOutOfRange(number, self.page_count()))
    }

    fn pages(&self) -> Result<Vec<PageContent>> {
        Ok(self.pages.clone())
    }
}
