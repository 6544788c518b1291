//! Page sources.
//!
//! The extractor consumes pages through [`PageSource`]; PDF decoding is one
//! implementation and in-memory pages are another.

mod memory;
mod options;
mod pdf;

pub use memory::MemorySource;
pub use options::{ErrorMode, PdfOptions};
pub use pdf::{detect_pdf_version, PdfSource};

use crate::error::Result;
use crate::model::PageContent;

/// A document as a sequence of positioned-text pages.
pub trait PageSource {
    /// Number of pages.
    fn page_count(&self) -> u32;

    /// Decode one page (1-indexed).
    fn page(&self, number: u32) -> Result<PageContent>;

    /// Decode every page in order.
    fn pages(&self) -> Result<Vec<PageContent>> {
        (1..=self.page_count()).map(|n| self.page(n)).collect()
    }
}
