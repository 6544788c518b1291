//! Heading patterns and the shared heading-text validity check.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::{ValidityConfig, DEFAULT_HEADING_PATTERNS};
use crate::error::Result;

use super::text;

static ROMAN_NUMERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\(?[ivxlcdm]+\)?\.?$").expect("Invalid roman numeral regex"));

static BARE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\(?\d+\)?\.?$").expect("Invalid bare number regex"));

// Matched against lowercased text.
static PAGE_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(page\s+\d+|p\.\s*\d+|fig\.\s*\d+|table\s+\d+)$")
        .expect("Invalid page reference regex")
});

/// Compiled numbering / ALL-CAPS heading patterns.
#[derive(Debug, Clone)]
pub struct HeadingPatterns {
    patterns: Vec<Regex>,
}

impl HeadingPatterns {
    /// Compile a pattern list.
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| Regex::new(p.as_ref()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Check whether the text looks like a numbered or ALL-CAPS heading.
    pub fn is_heading_pattern(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(text))
    }

    /// Number of compiled patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Check if there are no patterns.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for HeadingPatterns {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_HEADING_PATTERNS
                .iter()
                .map(|p| Regex::new(p).expect("Invalid default heading pattern"))
                .collect(),
        }
    }
}

/// Validity rules applied to every heading candidate.
///
/// The same check gates classification and the final filter stage, so a
/// heading that survives classification can only be dropped later because
/// merging changed its text.
#[derive(Debug, Clone, Copy)]
pub struct HeadingValidator<'a> {
    config: &'a ValidityConfig,
    patterns: &'a HeadingPatterns,
}

impl<'a> HeadingValidator<'a> {
    /// Create a validator.
    pub fn new(config: &'a ValidityConfig, patterns: &'a HeadingPatterns) -> Self {
        Self { config, patterns }
    }

    /// Check whether the text can stand as a heading.
    pub fn is_valid_heading_text(&self, text: &str) -> bool {
        let text = text.trim();
        let len = text::char_len(text);
        if len < self.config.min_chars || len > self.config.max_chars {
            return false;
        }

        let lower = text.to_lowercase();
        if ROMAN_NUMERAL.is_match(&lower) || BARE_NUMBER.is_match(text) {
            return false;
        }
        if PAGE_REFERENCE.is_match(&lower) {
            return false;
        }

        if text::digit_count(text) as f32 > len as f32 * self.config.max_digit_ratio {
            return false;
        }
        if !text.chars().any(|c| c.is_alphanumeric()) {
            return false;
        }

        let patterned = self.patterns.is_heading_pattern(text);
        if text::ends_with_period(text) && !patterned {
            return false;
        }
        if text::lowercase_count(text) as f32 > len as f32 * self.config.max_lowercase_ratio
            && !patterned
        {
            return false;
        }

        !self
            .config
            .prose_phrases
            .iter()
            .any(|phrase| lower.contains(phrase.as_str()))
    }
}
