//! Heading likelihood scores.
//!
//! Two scoring rules exist. Documents whose font sizes vary enough are scored
//! by size proximity and styling; uniform-font documents fall back to layout
//! and text shape alone.

use crate::config::ScoringConfig;
use crate::model::Fragment;

use super::patterns::HeadingPatterns;
use super::text;

// Size-based weights.
const SIZE_NEAR: i32 = 8;
const SIZE_CLOSE: i32 = 5;
const SIZE_FAR: i32 = 2;
const SIZE_OFF: i32 = -2;
const BOLD: i32 = 4;
const PATTERN: i32 = 5;
const CENTERED: i32 = 3;
const LEFT_ALIGNED: i32 = 2;
const MISALIGNED: i32 = -3;
const ALL_CAPS: i32 = 3;
const MIXED_CAPS: i32 = 1;
const NO_CAPS: i32 = -3;
const GOOD_LENGTH: i32 = 2;
const BAD_LENGTH: i32 = -4;
const TITLE_REGION: i32 = 2;
const PERIOD: i32 = -3;
const LONG_TEXT: i32 = -5;

// Content-based weights.
const UPPER_REGION: i32 = 3;
const MIDDLE_REGION: i32 = 1;
const CONTENT_CENTERED: i32 = 3;
const CONTENT_LEFT_ALIGNED: i32 = 2;
const CONTENT_MISALIGNED: i32 = -2;
const CONTENT_GOOD_LENGTH: i32 = 4;
const CONTENT_SINGLE_WORD: i32 = 2;
const CONTENT_TOO_LONG: i32 = -3;
const CONTENT_ALL_CAPS: i32 = 4;
const CONTENT_MIXED_CAPS: i32 = 2;
const CONTENT_NO_CAPS: i32 = -2;
const CONTENT_BOLD: i32 = 3;
const CONTENT_PATTERN: i32 = 5;
const CONTENT_PERIOD: i32 = -4;
const CONTENT_MANY_PERIODS: i32 = -3;
const CONTENT_LONG_TEXT: i32 = -3;
const CONTENT_HEADING_SHAPE: i32 = 2;

/// Which scoring rule applies to a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMode {
    /// Font sizes vary; score by size and styling
    Size,
    /// Uniform font; score by layout and text shape
    Content,
}

impl ScoringMode {
    /// Pick the mode from the font size spread.
    pub fn for_spread(spread: f32, uniform_font_spread: f32) -> Self {
        if spread < uniform_font_spread {
            ScoringMode::Content
        } else {
            ScoringMode::Size
        }
    }
}

/// Scores fragments as heading candidates.
#[derive(Debug, Clone, Copy)]
pub struct HeadingScorer<'a> {
    config: &'a ScoringConfig,
    patterns: &'a HeadingPatterns,
}

impl<'a> HeadingScorer<'a> {
    /// Create a scorer.
    pub fn new(config: &'a ScoringConfig, patterns: &'a HeadingPatterns) -> Self {
        Self { config, patterns }
    }

    /// Acceptance threshold for a mode.
    pub fn threshold(&self, mode: ScoringMode) -> i32 {
        match mode {
            ScoringMode::Size => self.config.size_threshold,
            ScoringMode::Content => self.config.content_threshold,
        }
    }

    /// Score a fragment under the given mode.
    pub fn score(&self, fragment: &Fragment, mode: ScoringMode, page_max: f32) -> i32 {
        match mode {
            ScoringMode::Size => self.size_score(fragment, page_max, false),
            ScoringMode::Content => self.content_score(fragment),
        }
    }

    /// Check whether a fragment scores high enough to be a heading.
    pub fn accepts(&self, fragment: &Fragment, mode: ScoringMode, page_max: f32) -> bool {
        self.score(fragment, mode, page_max) >= self.threshold(mode)
    }

    /// Size and styling score.
    ///
    /// `title_pass` adds a bonus for fragments in the title region.
    pub fn size_score(&self, fragment: &Fragment, page_max: f32, title_pass: bool) -> i32 {
        let cfg = self.config;
        let text = fragment.text.as_str();
        let words = text::word_count(text);
        let patterned = self.patterns.is_heading_pattern(text);
        let mut score = 0;

        let delta = (fragment.size - page_max).abs();
        score += if delta < cfg.size_near {
            SIZE_NEAR
        } else if delta < cfg.size_close {
            SIZE_CLOSE
        } else if delta < cfg.size_far {
            SIZE_FAR
        } else {
            SIZE_OFF
        };

        if fragment.bold {
            score += BOLD;
        }
        if patterned {
            score += PATTERN;
        }

        score += if self.is_centered(fragment) {
            CENTERED
        } else if fragment.bbox.x0 < cfg.left_margin {
            LEFT_ALIGNED
        } else {
            MISALIGNED
        };

        score += if text::is_all_caps(text) && words >= 2 {
            ALL_CAPS
        } else if text::uppercase_count(text) >= 2 {
            MIXED_CAPS
        } else {
            NO_CAPS
        };

        if (2..=8).contains(&words) {
            score += GOOD_LENGTH;
        } else if words < 2 || words > 12 {
            score += BAD_LENGTH;
        }

        if title_pass && fragment.y0() < fragment.page_height * cfg.title_region {
            score += TITLE_REGION;
        }
        if text::ends_with_period(text) && !patterned {
            score += PERIOD;
        }
        if text::char_len(text) > cfg.long_text_chars {
            score += LONG_TEXT;
        }

        log::trace!("Size score {} for {:?}", score, text);
        score
    }

    /// Layout and text shape score for uniform-font pages.
    pub fn content_score(&self, fragment: &Fragment) -> i32 {
        let cfg = self.config;
        let text = fragment.text.as_str();
        let words = text::word_count(text);
        let uppercase = text::uppercase_count(text);
        let patterned = self.patterns.is_heading_pattern(text);
        let mut score = 0;

        let y0 = fragment.y0();
        if y0 < fragment.page_height * cfg.upper_region {
            score += UPPER_REGION;
        } else if y0 < fragment.page_height * cfg.middle_region {
            score += MIDDLE_REGION;
        }

        score += if self.is_centered(fragment) {
            CONTENT_CENTERED
        } else if fragment.bbox.x0 < cfg.left_margin {
            CONTENT_LEFT_ALIGNED
        } else {
            CONTENT_MISALIGNED
        };

        if (2..=8).contains(&words) {
            score += CONTENT_GOOD_LENGTH;
        } else if words == 1 {
            score += CONTENT_SINGLE_WORD;
        } else if words > 12 {
            score += CONTENT_TOO_LONG;
        }

        score += if text::is_all_caps(text) && words >= 2 {
            CONTENT_ALL_CAPS
        } else if uppercase >= 2 {
            CONTENT_MIXED_CAPS
        } else {
            CONTENT_NO_CAPS
        };

        if fragment.bold {
            score += CONTENT_BOLD;
        }
        if patterned {
            score += CONTENT_PATTERN;
        }

        let period = text::ends_with_period(text);
        if period && !patterned {
            score += CONTENT_PERIOD;
        }
        if text.matches('.').count() > 1 {
            score += CONTENT_MANY_PERIODS;
        }
        if text::char_len(text) > cfg.long_text_chars {
            score += CONTENT_LONG_TEXT;
        }

        if (3..=8).contains(&words)
            && !period
            && fragment.bbox.x0 < cfg.shape_left_margin
            && uppercase >= 3
        {
            score += CONTENT_HEADING_SHAPE;
        }

        log::trace!("Content score {} for {:?}", score, text);
        score
    }

    fn is_centered(&self, fragment: &Fragment) -> bool {
        (fragment.bbox.center_x() - fragment.page_width / 2.0).abs() < self.config.center_tolerance
    }
}
