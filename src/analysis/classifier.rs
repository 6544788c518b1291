//! Heading level assignment.

use crate::config::{ClassifierConfig, ShapeRule};
use crate::model::{Fragment, HeadingLevel};

use super::clusterer::ThresholdSet;
use super::patterns::{HeadingPatterns, HeadingValidator};
use super::scorer::ScoringMode;
use super::text;

/// Assigns a level to an accepted heading candidate.
#[derive(Debug, Clone, Copy)]
pub struct HeadingClassifier<'a> {
    config: &'a ClassifierConfig,
    patterns: &'a HeadingPatterns,
    validator: HeadingValidator<'a>,
}

impl<'a> HeadingClassifier<'a> {
    /// Create a classifier.
    pub fn new(
        config: &'a ClassifierConfig,
        patterns: &'a HeadingPatterns,
        validator: HeadingValidator<'a>,
    ) -> Self {
        Self {
            config,
            patterns,
            validator,
        }
    }

    /// Level for a fragment, or `None` when it is not a heading.
    pub fn classify(
        &self,
        fragment: &Fragment,
        mode: ScoringMode,
        thresholds: &ThresholdSet,
    ) -> Option<HeadingLevel> {
        let level = match mode {
            ScoringMode::Size => self.level_by_size(fragment, thresholds),
            ScoringMode::Content => self.level_by_shape(fragment),
        }?;

        if self.validator.is_valid_heading_text(&fragment.text) {
            Some(level)
        } else {
            log::trace!("Rejected invalid heading text {:?}", fragment.text);
            None
        }
    }

    fn level_by_size(&self, fragment: &Fragment, thresholds: &ThresholdSet) -> Option<HeadingLevel> {
        let size = fragment.size;
        let cfg = self.config;

        if cfg.h1_band.contains(thresholds.h1, size) {
            Some(HeadingLevel::H1)
        } else if cfg.h2_band.contains(thresholds.h2, size) {
            Some(HeadingLevel::H2)
        } else if cfg.h3_band.contains(thresholds.h3, size) {
            Some(HeadingLevel::H3)
        } else if self.patterns.is_heading_pattern(&fragment.text) {
            if size >= thresholds.h2 - cfg.pattern_h2_margin {
                Some(HeadingLevel::H2)
            } else {
                Some(HeadingLevel::H3)
            }
        } else {
            None
        }
    }

    fn level_by_shape(&self, fragment: &Fragment) -> Option<HeadingLevel> {
        let cfg = self.config;
        [
            (HeadingLevel::H1, &cfg.h1_shape),
            (HeadingLevel::H2, &cfg.h2_shape),
            (HeadingLevel::H3, &cfg.h3_shape),
        ]
        .into_iter()
        .find(|(_, rule)| fits_shape(fragment, rule))
        .map(|(level, _)| level)
    }
}

fn fits_shape(fragment: &Fragment, rule: &ShapeRule) -> bool {
    let words = fragment.word_count();
    (rule.min_words..=rule.max_words).contains(&words)
        && !text::ends_with_period(&fragment.text)
        && fragment.bbox.x0 < rule.max_x0
        && text::uppercase_count(&fragment.text) >= rule.min_uppercase
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValidityConfig;
    use crate::model::BoundingBox;

    fn frag(text: &str, size: f32, x0: f32) -> Fragment {
        Fragment::new(text, size, BoundingBox::new(x0, 100.0, x0 + 200.0, 100.0 + size))
    }

    fn with_classifier<F: FnOnce(HeadingClassifier<'_>)>(f: F) {
        let config = ClassifierConfig::default();
        let validity = ValidityConfig::default();
        let patterns = HeadingPatterns::default();
        let validator = HeadingValidator::new(&validity, &patterns);
        f(HeadingClassifier::new(&config, &patterns, validator));
    }

    #[test]
    fn test_size_bands() {
        let thresholds = ThresholdSet::new(18.0, 14.0, 11.0);
        with_classifier(|c| {
            let classify = |f: &Fragment| c.classify(f, ScoringMode::Size, &thresholds);
            assert_eq!(classify(&frag("Study Overview", 18.0, 72.0)), Some(HeadingLevel::H1));
            assert_eq!(classify(&frag("Study Overview", 20.0, 72.0)), Some(HeadingLevel::H1));
            assert_eq!(classify(&frag("Study Overview", 15.5, 72.0)), Some(HeadingLevel::H2));
            assert_eq!(classify(&frag("Study Overview", 11.5, 72.0)), Some(HeadingLevel::H3));
            assert_eq!(classify(&frag("Study Overview", 24.0, 72.0)), None);
        });
    }

    #[test]
    fn test_pattern_outside_bands() {
        let thresholds = ThresholdSet::new(30.0, 20.0, 16.0);
        with_classifier(|c| {
            let classify = |f: &Fragment| c.classify(f, ScoringMode::Size, &thresholds);
            assert_eq!(classify(&frag("2.1. Sampling", 19.0, 72.0)), Some(HeadingLevel::H2));
            assert_eq!(classify(&frag("2.1. Sampling", 13.0, 72.0)), Some(HeadingLevel::H3));
            assert_eq!(classify(&frag("Sampling Notes", 13.0, 72.0)), None);
        });
    }

    #[test]
    fn test_shape_rules() {
        let thresholds = ThresholdSet::new(11.0, 11.0, 11.0);
        with_classifier(|c| {
            let classify = |f: &Fragment| c.classify(f, ScoringMode::Content, &thresholds);
            assert_eq!(
                classify(&frag("Project Scope And Goals", 11.0, 72.0)),
                Some(HeadingLevel::H1)
            );
            assert_eq!(classify(&frag("Project Scope Notes", 11.0, 100.0)), Some(HeadingLevel::H2));
            assert_eq!(classify(&frag("Budget Notes", 11.0, 140.0)), Some(HeadingLevel::H3));
            assert_eq!(classify(&frag("Budget Notes", 11.0, 200.0)), None);
            assert_eq!(classify(&frag("Summary", 11.0, 72.0)), None);
        });
    }

    #[test]
    fn test_validity_gate() {
        let thresholds = ThresholdSet::new(18.0, 14.0, 11.0);
        with_classifier(|c| {
            assert_eq!(c.classify(&frag("Page 12", 18.0, 72.0), ScoringMode::Size, &thresholds), None);
            assert_eq!(c.classify(&frag("(iii)", 14.0, 72.0), ScoringMode::Size, &thresholds), None);
        });
    }
}
