//! Outline extraction engine.
//!
//! A document runs in three phases: a pre-pass over all pages (font size
//! clustering, boilerplate detection, scoring mode and title), per-page
//! heading classification, and post-processing of the concatenated heading
//! list into the final outline.

use std::cmp::Ordering;

use serde::Serialize;

use crate::analysis::{
    cluster_font_sizes, select_title, Boilerplate, HeadingClassifier, HeadingPatterns,
    HeadingScorer, HeadingValidator, ScoringMode, SubitemFilter, ThresholdSet,
};
use crate::assemble::assemble_outline;
use crate::config::{OutlineConfig, SpreadScope};
use crate::error::Result;
use crate::model::{Fragment, Heading, Outline, PageContent};
use crate::postprocess::PostProcessor;
use crate::source::PageSource;

/// Document-wide facts gathered before per-page classification.
#[derive(Debug, Clone)]
struct DocumentContext {
    thresholds: ThresholdSet,
    font_spread: f32,
    mode: ScoringMode,
    boilerplate: Boilerplate,
}

/// Everything the extractor learned about one document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentAnalysis {
    /// Number of pages read
    pub page_count: u32,
    /// Number of fragments across all pages
    pub fragment_count: usize,
    /// Font size thresholds for H1/H2/H3
    pub thresholds: ThresholdSet,
    /// Largest minus smallest font size in the document
    pub font_spread: f32,
    /// Document-level scoring mode
    pub mode: ScoringMode,
    /// Repeated header/footer texts, sorted
    pub boilerplate: Vec<String>,
    /// Headings accepted before post-processing
    pub raw_heading_count: usize,
    /// Final outline
    pub outline: Outline,
}

/// Extracts a title and heading outline from positioned-text pages.
///
/// # Example
///
/// ```
/// use pdf_outline::{BoundingBox, Fragment, MemorySource, OutlineExtractor, PageContent};
///
/// let title = Fragment::new("Field Guide", 24.0, BoundingBox::new(240.0, 60.0, 372.0, 84.0));
/// let page = PageContent::letter(1).with_fragment(title);
/// let source = MemorySource::new(vec![page]);
///
/// let extractor = OutlineExtractor::default();
/// let outline = extractor.extract(&source).unwrap();
/// assert_eq!(outline.title, "Field Guide");
/// ```
#[derive(Debug, Clone)]
pub struct OutlineExtractor {
    config: OutlineConfig,
    patterns: HeadingPatterns,
}

impl Default for OutlineExtractor {
    fn default() -> Self {
        Self {
            config: OutlineConfig::default(),
            patterns: HeadingPatterns::default(),
        }
    }
}

impl OutlineExtractor {
    /// Create an extractor, compiling the configured heading patterns.
    pub fn new(config: OutlineConfig) -> Result<Self> {
        let patterns = HeadingPatterns::new(&config.heading_patterns)?;
        log::debug!("Compiled {} heading patterns", patterns.len());
        Ok(Self { config, patterns })
    }

    /// Active configuration.
    pub fn config(&self) -> &OutlineConfig {
        &self.config
    }

    /// Extract the outline of a document.
    pub fn extract<S: PageSource + ?Sized>(&self, source: &S) -> Result<Outline> {
        Ok(self.analyze(source)?.outline)
    }

    /// Extract the outline from already decoded pages.
    pub fn extract_pages(&self, pages: &[PageContent]) -> Outline {
        self.analyze_pages(pages).outline
    }

    /// Extract the outline and report the intermediate document facts.
    pub fn analyze<S: PageSource + ?Sized>(&self, source: &S) -> Result<DocumentAnalysis> {
        let pages = source.pages()?;
        Ok(self.analyze_pages(&pages))
    }

    /// [`analyze`](Self::analyze) over already decoded pages.
    pub fn analyze_pages(&self, pages: &[PageContent]) -> DocumentAnalysis {
        let context = self.document_context(pages);

        let title = pages
            .first()
            .map(|page| select_title(page, &self.config.title))
            .unwrap_or_default();
        log::debug!("Title: {:?}", title);

        let mut headings = Vec::new();
        for page in pages {
            headings.extend(self.detect_page_headings(page, &context));
        }
        let raw_heading_count = headings.len();

        let validator = HeadingValidator::new(&self.config.validity, &self.patterns);
        let headings = PostProcessor::new(&self.config.postprocess, validator).run(headings);
        log::debug!(
            "Kept {} of {} raw headings after post-processing",
            headings.len(),
            raw_heading_count
        );

        DocumentAnalysis {
            page_count: pages.len() as u32,
            fragment_count: pages.iter().map(|p| p.fragments.len()).sum(),
            thresholds: context.thresholds,
            font_spread: context.font_spread,
            mode: context.mode,
            boilerplate: context
                .boilerplate
                .texts()
                .into_iter()
                .map(str::to_string)
                .collect(),
            raw_heading_count,
            outline: assemble_outline(title, headings),
        }
    }

    fn document_context(&self, pages: &[PageContent]) -> DocumentContext {
        let sizes: Vec<f32> = pages
            .iter()
            .flat_map(|p| p.fragments.iter().map(|f| f.size))
            .collect();

        let thresholds = cluster_font_sizes(&sizes, &self.config.fallback_font_sizes);
        let font_spread = font_spread(&sizes);
        let mode = ScoringMode::for_spread(font_spread, self.config.uniform_font_spread);
        let boilerplate = Boilerplate::detect(pages, &self.config.boilerplate);

        log::debug!(
            "Thresholds H1={:.2} H2={:.2} H3={:.2}, spread {:.2} ({:?} mode)",
            thresholds.h1,
            thresholds.h2,
            thresholds.h3,
            font_spread,
            mode
        );
        log::debug!("Detected {} boilerplate texts", boilerplate.len());

        DocumentContext {
            thresholds,
            font_spread,
            mode,
            boilerplate,
        }
    }

    /// Classify the fragments of one page into raw headings.
    fn detect_page_headings(&self, page: &PageContent, context: &DocumentContext) -> Vec<Heading> {
        let Some(page_max) = page.max_font_size() else {
            return Vec::new();
        };

        let mode = match self.config.spread_scope {
            SpreadScope::Document => context.mode,
            SpreadScope::Page => {
                let page_min = page.min_font_size().unwrap_or(page_max);
                ScoringMode::for_spread(page_max - page_min, self.config.uniform_font_spread)
            }
        };

        let validator = HeadingValidator::new(&self.config.validity, &self.patterns);
        let subitems = SubitemFilter::new(&self.config.subitem, &self.patterns);
        let scorer = HeadingScorer::new(&self.config.scoring, &self.patterns);
        let classifier = HeadingClassifier::new(&self.config.classifier, &self.patterns, validator);

        let mut ordered: Vec<&Fragment> = page.fragments.iter().collect();
        ordered.sort_by(|a, b| a.y0().partial_cmp(&b.y0()).unwrap_or(Ordering::Equal));

        let mut headings = Vec::new();
        for fragment in ordered {
            if context.boilerplate.matches(fragment) {
                log::trace!("Skipping boilerplate {:?}", fragment.text);
                continue;
            }
            if let Some(kind) = subitems.classify(fragment, &page.fragments) {
                log::trace!("Skipping {:?} ({:?})", fragment.text, kind);
                continue;
            }

            let score = scorer.score(fragment, mode, page_max);
            if score < scorer.threshold(mode) {
                continue;
            }

            if let Some(level) = classifier.classify(fragment, mode, &context.thresholds) {
                log::trace!(
                    "Page {}: {} {:?} (score {})",
                    page.number,
                    level,
                    fragment.text,
                    score
                );
                headings.push(
                    Heading::new(
                        level,
                        fragment.text.clone(),
                        page.number,
                        fragment.bbox.y0,
                        fragment.bbox.y1,
                    )
                    .with_score(score)
                    .with_x1(fragment.bbox.x1),
                );
            }
        }
        headings
    }
}

/// Largest minus smallest size, 0 when there are none.
fn font_spread(sizes: &[f32]) -> f32 {
    let max = sizes.iter().copied().reduce(f32::max);
    let min = sizes.iter().copied().reduce(f32::min);
    match (max, min) {
        (Some(max), Some(min)) => max - min,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundingBox, HeadingLevel};
    use crate::source::MemorySource;

    fn frag(text: &str, size: f32, x0: f32, y0: f32) -> Fragment {
        let x1 = x0 + text.chars().count() as f32 * size * 0.5;
        Fragment::new(text, size, BoundingBox::new(x0, y0, x1, y0 + size))
    }

    #[test]
    fn test_empty_document() {
        let extractor = OutlineExtractor::default();
        let analysis = extractor.analyze(&MemorySource::new(Vec::new())).unwrap();

        assert_eq!(analysis.outline.title, "");
        assert!(analysis.outline.entries.is_empty());
        assert_eq!(analysis.thresholds, ThresholdSet::new(12.0, 10.0, 8.0));
        assert_eq!(analysis.page_count, 0);
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let config = OutlineConfig::default().with_heading_pattern("(unclosed");
        assert!(OutlineExtractor::new(config).is_err());
    }

    #[test]
    fn test_single_page_levels() {
        let body = "The committee reviewed every submission in detail this year.";
        let page = PageContent::letter(1)
            .with_fragment(frag("Annual Review", 24.0, 230.0, 60.0).bold())
            .with_fragment(frag("Program Goals Overview", 18.0, 72.0, 150.0).bold())
            .with_fragment(frag(body, 11.0, 72.0, 180.0))
            .with_fragment(frag("Funding Sources", 14.0, 72.0, 260.0).bold())
            .with_fragment(frag(body, 11.0, 72.0, 290.0))
            .with_fragment(frag(body, 11.0, 72.0, 310.0))
            .with_fragment(frag(body, 11.0, 72.0, 330.0));

        let analysis = OutlineExtractor::default()
            .analyze(&MemorySource::new(vec![page]))
            .unwrap();
        assert_eq!(analysis.mode, ScoringMode::Size);
        assert_eq!(analysis.outline.title, "Annual Review");
        assert!(analysis.outline.entries.iter().all(|e| e.page == 1));
        assert_eq!(analysis.outline.level(HeadingLevel::H2).count(), 1);
        assert!(analysis.outline.find("Program Goals Overview").is_some());
        assert!(analysis.outline.find("Funding Sources").is_none());
    }

    #[test]
    fn test_font_spread() {
        assert_eq!(font_spread(&[]), 0.0);
        assert_eq!(font_spread(&[11.0, 24.0, 14.0]), 13.0);
    }
}
