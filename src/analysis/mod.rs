//! Heading detection heuristics.

mod boilerplate;
mod classifier;
mod clusterer;
mod patterns;
mod scorer;
mod subitem;
pub(crate) mod text;
mod title;

pub use boilerplate::Boilerplate;
pub use classifier::HeadingClassifier;
pub use clusterer::{cluster_font_sizes, ThresholdSet};
pub use patterns::{HeadingPatterns, HeadingValidator};
pub use scorer::{HeadingScorer, ScoringMode};
pub use subitem::{SubitemFilter, SubitemKind};
pub use title::select_title;
