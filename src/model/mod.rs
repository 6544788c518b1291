//! Data model for outline extraction.
//!
//! Fragments flow in from a page source, headings are the working records
//! of the classification and post-processing stages, and the outline is the
//! projected result.

mod fragment;
mod heading;
mod outline;

pub use fragment::{BoundingBox, Fragment, PageContent};
pub use heading::{sort_document_order, Heading, HeadingLevel};
pub use outline::{Outline, OutlineEntry};
