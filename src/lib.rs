//! # pdf-outline
//!
//! Title and heading outline extraction for PDF documents.
//!
//! The library reads positioned text fragments from each page, picks the
//! document title from page one, and classifies headings into an `H1`/`H2`/`H3`
//! outline using font size clustering, layout and text shape heuristics.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdf_outline::{extract_outline_from_file, render};
//!
//! fn main() -> pdf_outline::Result<()> {
//!     let outline = extract_outline_from_file("document.pdf")?;
//!
//!     let json = render::to_json(&outline, render::JsonFormat::Pretty)?;
//!     println!("{}", json);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Dual scoring**: size-based for documents with varied fonts, layout and
//!   shape based for uniform-font documents
//! - **Exact size clustering**: deterministic 1-D k-means over font sizes
//! - **Boilerplate filtering**: repeated headers and footers never become headings
//! - **Post-processing**: split heading merge, duplicate removal, hierarchy repair
//! - **Configurable**: every threshold and vocabulary lives in [`OutlineConfig`]
//! - **Batch processing**: directories of PDFs on the Rayon pool

pub mod analysis;
pub mod assemble;
pub mod batch;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod postprocess;
pub mod render;
pub mod source;

// Re-export commonly used types
pub use analysis::{ScoringMode, ThresholdSet};
pub use batch::{process_directory, BatchItem, BatchOptions, BatchOutcome, BatchReport};
pub use config::{OutlineConfig, SpreadScope};
pub use engine::{DocumentAnalysis, OutlineExtractor};
pub use error::{Error, Result};
pub use model::{
    BoundingBox, Fragment, Heading, HeadingLevel, Outline, OutlineEntry, PageContent,
};
pub use render::JsonFormat;
pub use source::{detect_pdf_version, ErrorMode, MemorySource, PageSource, PdfOptions, PdfSource};

use std::path::Path;

/// Extract the outline of a PDF file with the default configuration.
///
/// # Example
///
/// ```no_run
/// use pdf_outline::extract_outline_from_file;
///
/// let outline = extract_outline_from_file("document.pdf").unwrap();
/// println!("{} ({} headings)", outline.title, outline.len());
/// ```
pub fn extract_outline_from_file<P: AsRef<Path>>(path: P) -> Result<Outline> {
    let source = PdfSource::open(path)?;
    OutlineExtractor::default().extract(&source)
}

/// Extract the outline of a PDF file with a custom configuration.
///
/// # Example
///
/// ```no_run
/// use pdf_outline::{extract_outline_with_config, OutlineConfig, SpreadScope};
///
/// let config = OutlineConfig::new()
///     .with_spread_scope(SpreadScope::Page)
///     .with_common_section("glossary");
/// let outline = extract_outline_with_config("document.pdf", config).unwrap();
/// ```
pub fn extract_outline_with_config<P: AsRef<Path>>(path: P, config: OutlineConfig) -> Result<Outline> {
    let source = PdfSource::open(path)?;
    OutlineExtractor::new(config)?.extract(&source)
}

/// Extract the outline of a PDF held in memory.
pub fn extract_outline_from_bytes(data: &[u8]) -> Result<Outline> {
    let source = PdfSource::from_bytes(data)?;
    OutlineExtractor::default().extract(&source)
}

/// Extract the outline of a PDF held in memory with a custom configuration.
pub fn extract_outline_from_bytes_with_config(data: &[u8], config: OutlineConfig) -> Result<Outline> {
    let source = PdfSource::from_bytes(data)?;
    OutlineExtractor::new(config)?.extract(&source)
}

/// Get the library version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
