//! Heading post-processing.
//!
//! Raw headings from every page run through four stages in order: merging of
//! split headings, duplicate removal, hierarchy repair and a final validity
//! filter. Each stage sorts by page and vertical position first.

mod dedup;
mod filter;
mod hierarchy;
mod merge;

pub use dedup::remove_duplicates;
pub use filter::filter_invalid;
pub use hierarchy::repair_hierarchy;
pub use merge::merge_split_headings;

use crate::analysis::HeadingValidator;
use crate::config::PostProcessConfig;
use crate::model::Heading;

/// Runs the post-processing stages until the heading list stops changing.
#[derive(Debug, Clone, Copy)]
pub struct PostProcessor<'a> {
    config: &'a PostProcessConfig,
    validator: HeadingValidator<'a>,
}

impl<'a> PostProcessor<'a> {
    /// Create a post-processor.
    pub fn new(config: &'a PostProcessConfig, validator: HeadingValidator<'a>) -> Self {
        Self { config, validator }
    }

    /// Run the stages to a fixed point.
    ///
    /// Passes are bounded by `max_passes`; if the list is still changing
    /// after the last pass, that pass's output is returned.
    pub fn run(&self, headings: Vec<Heading>) -> Vec<Heading> {
        let max_passes = self.config.max_passes.max(1);
        let mut current = headings;

        for pass in 1..=max_passes {
            let next = self.run_once(current.clone());
            if next == current {
                log::debug!("Post-processing settled after {} pass(es)", pass);
                return next;
            }
            current = next;
        }

        log::warn!(
            "Post-processing did not settle after {} passes, keeping {} headings",
            max_passes,
            current.len()
        );
        current
    }

    /// Run each stage once.
    pub fn run_once(&self, headings: Vec<Heading>) -> Vec<Heading> {
        let before = headings.len();
        let headings = merge_split_headings(headings, self.config.merge_gap);
        let merged = headings.len();
        let headings = remove_duplicates(headings, self.config);
        let deduped = headings.len();
        let headings = repair_hierarchy(headings, self.config);
        let headings = filter_invalid(headings, &self.validator);

        log::trace!(
            "Post-processing pass: {} -> {} merged -> {} unique -> {} valid",
            before,
            merged,
            deduped,
            headings.len()
        );
        headings
    }
}
