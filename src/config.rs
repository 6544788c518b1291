//! Outline extraction configuration.
//!
//! Every threshold the heuristics use lives here, grouped by the stage that
//! consumes it. All sections implement `Default` with the tuned values and
//! deserialize with `#[serde(default)]`, so a configuration file only needs to
//! name the values it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default numbering / ALL-CAPS heading patterns.
pub const DEFAULT_HEADING_PATTERNS: &[&str] = &[
    r"^(\d+\.)+\s+",
    r"^[A-Z]\.\s+",
    r"(?i)^[IVXLCDM]+\.\s+",
    r"^[A-Z][A-Z\s\-]+$",
];

/// Default vocabulary of section names allowed to repeat under distinct parents.
pub const DEFAULT_COMMON_SECTIONS: &[&str] = &[
    "places to visit",
    "attractions",
    "things to do",
    "what to see",
    "restaurants",
    "hotels",
    "accommodation",
    "where to stay",
    "transportation",
    "how to get there",
    "getting around",
    "history",
    "culture",
    "traditions",
    "customs",
    "food",
    "cuisine",
    "local dishes",
    "dining",
    "shopping",
    "markets",
    "souvenirs",
    "nightlife",
    "entertainment",
    "activities",
    "tips",
    "advice",
    "recommendations",
    "best time to visit",
    "weather",
    "climate",
    "when to go",
    "safety",
    "security",
    "travel tips",
    "costs",
    "budget",
    "expenses",
    "prices",
];

/// Default phrases that mark a line as running prose rather than a heading.
pub const DEFAULT_PROSE_PHRASES: &[&str] = &[
    "this is",
    "there are",
    "it is",
    "they are",
    "we can",
    "you can",
    "the following",
    "as follows",
    "for example",
    "such as",
];

/// Default glyphs that open a bullet line.
pub const DEFAULT_BULLET_GLYPHS: &[char] = &['•', '●', '○', '◦', '▪', '■', '‣', '-', '*'];

/// Top-level configuration for outline extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineConfig {
    /// Font sizes used for clustering when a document has no text
    pub fallback_font_sizes: Vec<f32>,

    /// Font spread below which a document is treated as uniform-font
    pub uniform_font_spread: f32,

    /// Whether the spread is measured over the document or each page
    pub spread_scope: SpreadScope,

    /// Numbering / ALL-CAPS heading patterns (regular expressions)
    pub heading_patterns: Vec<String>,

    /// Repeated header/footer detection
    pub boilerplate: BoilerplateConfig,

    /// Title selection on page one
    pub title: TitleConfig,

    /// Bullet, list and continuation line rejection
    pub subitem: SubitemConfig,

    /// Heading score windows and cutoffs
    pub scoring: ScoringConfig,

    /// Level assignment bands and shape rules
    pub classifier: ClassifierConfig,

    /// Heading text validity rules
    pub validity: ValidityConfig,

    /// Merge, dedup and hierarchy repair
    pub postprocess: PostProcessConfig,
}

impl OutlineConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file.
    ///
    /// Missing fields keep their default values.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    /// Parse a configuration from a JSON string.
    pub fn from_json_str(data: &str) -> Result<Self> {
        serde_json::from_str(data).map_err(|e| Error::Config(e.to_string()))
    }

    /// Set the spread scope.
    pub fn with_spread_scope(mut self, scope: SpreadScope) -> Self {
        self.spread_scope = scope;
        self
    }

    /// Add a heading pattern to the default list.
    pub fn with_heading_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.heading_patterns.push(pattern.into());
        self
    }

    /// Add a common section name to the vocabulary.
    pub fn with_common_section(mut self, section: impl Into<String>) -> Self {
        self.postprocess
            .common_sections
            .push(section.into().to_lowercase());
        self
    }

    /// Replace the common section vocabulary.
    pub fn with_common_sections<I, S>(mut self, sections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.postprocess.common_sections = sections
            .into_iter()
            .map(|s| s.into().to_lowercase())
            .collect();
        self
    }

    /// Treat every repeated heading as a duplicate, ignoring the vocabulary.
    pub fn without_common_section_duplicates(mut self) -> Self {
        self.postprocess.allow_common_section_duplicates = false;
        self
    }

    /// Enable or disable multi-line title continuation.
    pub fn with_title_continuation(mut self, enabled: bool) -> Self {
        self.title.continuation = enabled;
        self
    }
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            fallback_font_sizes: vec![12.0, 10.0, 8.0],
            uniform_font_spread: 2.0,
            spread_scope: SpreadScope::Document,
            heading_patterns: DEFAULT_HEADING_PATTERNS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            boilerplate: BoilerplateConfig::default(),
            title: TitleConfig::default(),
            subitem: SubitemConfig::default(),
            scoring: ScoringConfig::default(),
            classifier: ClassifierConfig::default(),
            validity: ValidityConfig::default(),
            postprocess: PostProcessConfig::default(),
        }
    }
}

/// Where the font spread that selects the scoring mode is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpreadScope {
    /// Largest minus smallest size across the whole document
    #[default]
    Document,
    /// Largest minus smallest size on the page being classified
    Page,
}

/// Repeated header/footer detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoilerplateConfig {
    /// Fragments with `y0` below this are in the header band
    pub top_band: f32,
    /// Fragments with `y0` above this are in the footer band
    pub bottom_band: f32,
    /// Documents shorter than this have no boilerplate
    pub min_pages: u32,
}

impl Default for BoilerplateConfig {
    fn default() -> Self {
        Self {
            top_band: 100.0,
            bottom_band: 700.0,
            min_pages: 2,
        }
    }
}

/// Title selection on page one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleConfig {
    /// Primary title region as a fraction of page height
    pub primary_region: f32,
    /// Fallback title region as a fraction of page height
    pub fallback_region: f32,
    /// Maximum distance from the page's largest size
    pub size_tolerance: f32,
    /// Maximum distance of the midpoint from the page center
    pub center_tolerance: f32,
    /// Word limit for the preferred title candidates
    pub max_words: usize,
    /// Absorb following lines into a multi-line title
    pub continuation: bool,
    /// Size delta for continuation lines of Latin-script titles
    pub latin_size_tolerance: f32,
    /// Size delta for continuation lines of other scripts
    pub non_latin_size_tolerance: f32,
    /// Maximum vertical distance between title lines
    pub max_line_gap: f32,
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self {
            primary_region: 0.25,
            fallback_region: 0.5,
            size_tolerance: 1.0,
            center_tolerance: 100.0,
            max_words: 5,
            continuation: true,
            latin_size_tolerance: 1.0,
            non_latin_size_tolerance: 2.0,
            max_line_gap: 120.0,
        }
    }
}

/// Bullet, list and continuation line rejection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubitemConfig {
    /// Leading glyphs that mark a bullet line
    pub bullet_glyphs: Vec<char>,
    /// How far above a line an indentation anchor may be
    pub indent_window: f32,
    /// How much further left the anchor must start
    pub indent_offset: f32,
    /// Period-terminated lines longer than this are prose
    pub prose_min_chars: usize,
}

impl Default for SubitemConfig {
    fn default() -> Self {
        Self {
            bullet_glyphs: DEFAULT_BULLET_GLYPHS.to_vec(),
            indent_window: 200.0,
            indent_offset: 20.0,
            prose_min_chars: 50,
        }
    }
}

/// Heading score windows and acceptance cutoffs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Size delta for the strongest proximity bonus
    pub size_near: f32,
    /// Size delta for the medium proximity bonus
    pub size_close: f32,
    /// Size delta for the weak proximity bonus
    pub size_far: f32,
    /// Maximum midpoint distance from the page center to count as centered
    pub center_tolerance: f32,
    /// `x0` below this counts as anchored to the left margin
    pub left_margin: f32,
    /// Tighter left margin for the content-mode shape bonus
    pub shape_left_margin: f32,
    /// Title-pass bonus region as a fraction of page height
    pub title_region: f32,
    /// Content-mode upper region as a fraction of page height
    pub upper_region: f32,
    /// Content-mode middle region as a fraction of page height
    pub middle_region: f32,
    /// Texts longer than this are penalized
    pub long_text_chars: usize,
    /// Minimum size-based score for a heading
    pub size_threshold: i32,
    /// Minimum content-based score for a heading
    pub content_threshold: i32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            size_near: 0.5,
            size_close: 2.0,
            size_far: 4.0,
            center_tolerance: 80.0,
            left_margin: 100.0,
            shape_left_margin: 80.0,
            title_region: 0.25,
            upper_region: 0.3,
            middle_region: 0.6,
            long_text_chars: 100,
            size_threshold: 5,
            content_threshold: 6,
        }
    }
}

/// A tolerance band around a level threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    /// Allowed distance below the threshold
    pub below: f32,
    /// Allowed distance above the threshold
    pub above: f32,
}

impl Band {
    /// Create a band.
    pub const fn new(below: f32, above: f32) -> Self {
        Self { below, above }
    }

    /// Check whether `size` falls in the band around `threshold` (inclusive).
    pub fn contains(&self, threshold: f32, size: f32) -> bool {
        size >= threshold - self.below && size <= threshold + self.above
    }
}

/// Shape rule for uniform-font level assignment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeRule {
    /// Minimum word count
    pub min_words: usize,
    /// Maximum word count
    pub max_words: usize,
    /// `x0` must be below this
    pub max_x0: f32,
    /// Minimum number of uppercase letters
    pub min_uppercase: usize,
}

impl ShapeRule {
    /// Create a shape rule.
    pub const fn new(min_words: usize, max_words: usize, max_x0: f32, min_uppercase: usize) -> Self {
        Self {
            min_words,
            max_words,
            max_x0,
            min_uppercase,
        }
    }
}

/// Level assignment bands and shape rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Band around the H1 threshold
    pub h1_band: Band,
    /// Band around the H2 threshold
    pub h2_band: Band,
    /// Band around the H3 threshold
    pub h3_band: Band,
    /// Patterned fragments at least this close below H2 become H2, others H3
    pub pattern_h2_margin: f32,
    /// Uniform-font H1 shape
    pub h1_shape: ShapeRule,
    /// Uniform-font H2 shape
    pub h2_shape: ShapeRule,
    /// Uniform-font H3 shape
    pub h3_shape: ShapeRule,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            h1_band: Band::new(1.0, 2.0),
            h2_band: Band::new(1.0, 1.5),
            h3_band: Band::new(0.5, 1.0),
            pattern_h2_margin: 1.0,
            h1_shape: ShapeRule::new(4, 10, 80.0, 3),
            h2_shape: ShapeRule::new(3, 8, 120.0, 2),
            h3_shape: ShapeRule::new(2, 6, 150.0, 0),
        }
    }
}

/// Heading text validity rules, shared by classification and filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidityConfig {
    /// Minimum trimmed length in characters
    pub min_chars: usize,
    /// Maximum length in characters
    pub max_chars: usize,
    /// Maximum share of digits
    pub max_digit_ratio: f32,
    /// Maximum share of lowercase letters for non-patterned text
    pub max_lowercase_ratio: f32,
    /// Phrases that mark running prose
    pub prose_phrases: Vec<String>,
}

impl Default for ValidityConfig {
    fn default() -> Self {
        Self {
            min_chars: 3,
            max_chars: 150,
            max_digit_ratio: 0.5,
            max_lowercase_ratio: 0.8,
            prose_phrases: DEFAULT_PROSE_PHRASES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

/// Merge, dedup and hierarchy repair settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostProcessConfig {
    /// Maximum vertical gap between the halves of a split heading
    pub merge_gap: f32,
    /// Near-duplicates must differ in length by less than this
    pub near_duplicate_len_diff: usize,
    /// Allow common sections to repeat under distinct parents
    pub allow_common_section_duplicates: bool,
    /// Common section vocabulary, matched case-insensitively
    pub common_sections: Vec<String>,
    /// H2 headings this many pages past the last H1 may become H1
    pub promote_page_gap: u32,
    /// H2 headings this many pages past the current H1 always become H1
    pub force_promote_page_gap: u32,
    /// Word limit for H2 → H1 promotion
    pub promote_max_words: usize,
    /// Word minimum for H3 → H2 promotion
    pub section_min_words: usize,
    /// Uppercase letters required by the promotion shapes
    pub promote_min_uppercase: usize,
    /// Upper bound on pipeline passes while waiting for a fixed point
    pub max_passes: usize,
}

impl Default for PostProcessConfig {
    fn default() -> Self {
        Self {
            merge_gap: 30.0,
            near_duplicate_len_diff: 10,
            allow_common_section_duplicates: true,
            common_sections: DEFAULT_COMMON_SECTIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            promote_page_gap: 1,
            force_promote_page_gap: 2,
            promote_max_words: 8,
            section_min_words: 3,
            promote_min_uppercase: 2,
            max_passes: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OutlineConfig::default();
        assert_eq!(config.fallback_font_sizes, vec![12.0, 10.0, 8.0]);
        assert_eq!(config.spread_scope, SpreadScope::Document);
        assert_eq!(config.heading_patterns.len(), 4);
        assert_eq!(config.scoring.size_threshold, 5);
        assert_eq!(config.scoring.content_threshold, 6);
        assert!(config.postprocess.allow_common_section_duplicates);
    }

    #[test]
    fn test_config_builder() {
        let config = OutlineConfig::new()
            .with_spread_scope(SpreadScope::Page)
            .with_common_section("Excursions")
            .with_heading_pattern(r"^Chapter\s+\d+")
            .with_title_continuation(false);

        assert_eq!(config.spread_scope, SpreadScope::Page);
        assert!(config
            .postprocess
            .common_sections
            .contains(&"excursions".to_string()));
        assert_eq!(config.heading_patterns.len(), 5);
        assert!(!config.title.continuation);
    }

    #[test]
    fn test_replace_common_sections() {
        let config = OutlineConfig::new().with_common_sections(["Overview", "Summary"]);
        assert_eq!(
            config.postprocess.common_sections,
            vec!["overview".to_string(), "summary".to_string()]
        );

        let config = OutlineConfig::new().without_common_section_duplicates();
        assert!(!config.postprocess.allow_common_section_duplicates);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{
            "spread_scope": "page",
            "scoring": { "size_threshold": 7 },
            "postprocess": { "merge_gap": 12.5 }
        }"#;
        let config = OutlineConfig::from_json_str(json).unwrap();

        assert_eq!(config.spread_scope, SpreadScope::Page);
        assert_eq!(config.scoring.size_threshold, 7);
        assert_eq!(config.scoring.content_threshold, 6);
        assert_eq!(config.postprocess.merge_gap, 12.5);
        assert_eq!(config.postprocess.near_duplicate_len_diff, 10);
        assert_eq!(config.title, TitleConfig::default());
    }

    #[test]
    fn test_invalid_json() {
        let result = OutlineConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_band_contains() {
        let band = Band::new(1.0, 2.0);
        assert!(band.contains(18.0, 17.0));
        assert!(band.contains(18.0, 20.0));
        assert!(!band.contains(18.0, 16.9));
        assert!(!band.contains(18.0, 20.1));
    }
}
