//! Final validity filter.

use crate::analysis::HeadingValidator;
use crate::model::{sort_document_order, Heading};

/// Drop headings whose (possibly merged) text is not a valid heading.
pub fn filter_invalid(mut headings: Vec<Heading>, validator: &HeadingValidator<'_>) -> Vec<Heading> {
    sort_document_order(&mut headings);
    headings.retain(|h| {
        let valid = validator.is_valid_heading_text(h.text.trim());
        if !valid {
            log::trace!("Filtered invalid heading {:?}", h.text);
        }
        valid
    });
    headings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::HeadingPatterns;
    use crate::config::ValidityConfig;
    use crate::model::HeadingLevel;

    #[test]
    fn test_filters_merged_prose() {
        let config = ValidityConfig::default();
        let patterns = HeadingPatterns::default();
        let validator = HeadingValidator::new(&config, &patterns);

        let headings = vec![
            Heading::new(HeadingLevel::H1, "Results Overview", 1, 100.0, 118.0),
            Heading::new(HeadingLevel::H2, "Scope As Follows Below", 1, 200.0, 214.0),
            Heading::new(HeadingLevel::H2, "Page 7", 1, 760.0, 770.0),
        ];
        let kept = filter_invalid(headings, &validator);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].text, "Results Overview");
    }
}
