//! Duplicate heading removal.

use std::collections::HashMap;

use crate::config::PostProcessConfig;
use crate::model::{sort_document_order, Heading, HeadingLevel};

/// Drop repeated headings.
///
/// Exact repeats (case-insensitive, trimmed) are dropped, except for common
/// section names that reappear under a different parent heading. A heading
/// that is not a common section is also dropped when it contains, or is
/// contained in, an earlier kept text of similar length.
pub fn remove_duplicates(mut headings: Vec<Heading>, config: &PostProcessConfig) -> Vec<Heading> {
    sort_document_order(&mut headings);

    let ancestors = ancestor_indices(&headings);
    let vocabulary: Vec<String> = if config.allow_common_section_duplicates {
        config
            .common_sections
            .iter()
            .map(|section| section.trim().to_lowercase())
            .filter(|section| !section.is_empty())
            .collect()
    } else {
        Vec::new()
    };

    // Normalized text -> (input index of its last kept occurrence, position in `kept`)
    let mut seen: HashMap<String, (usize, usize)> = HashMap::new();
    let mut seen_order: Vec<String> = Vec::new();
    let mut kept: Vec<Heading> = Vec::with_capacity(headings.len());

    for (index, heading) in headings.iter().enumerate() {
        let norm = heading.text.trim().to_lowercase();
        let common = vocabulary.iter().any(|section| norm.contains(section.as_str()));

        if let Some(&(previous, previous_pos)) = seen.get(&norm) {
            if !common {
                log::trace!("Dropping duplicate heading {:?}", heading.text);
                continue;
            }

            let parent = ancestors[index].map(|i| headings[i].text.as_str());
            let previous_parent = ancestors[previous].map(|i| headings[i].text.as_str());
            match (parent, previous_parent) {
                (Some(parent), Some(previous_parent)) if parent != previous_parent => {
                    kept[previous_pos].parent = Some(previous_parent.to_string());

                    let mut heading = heading.clone();
                    heading.parent = Some(parent.to_string());
                    seen.insert(norm, (index, kept.len()));
                    kept.push(heading);
                }
                _ => {
                    log::trace!(
                        "Dropping repeated section {:?} under the same parent",
                        heading.text
                    );
                }
            }
            continue;
        }

        if !common && is_near_duplicate(&norm, &seen_order, config.near_duplicate_len_diff) {
            log::trace!("Dropping near-duplicate heading {:?}", heading.text);
            continue;
        }

        seen.insert(norm.clone(), (index, kept.len()));
        seen_order.push(norm);
        kept.push(heading.clone());
    }

    kept
}

/// Nearest preceding H1/H2 of a strictly higher level, per heading.
fn ancestor_indices(headings: &[Heading]) -> Vec<Option<usize>> {
    let mut last_h1: Option<usize> = None;
    let mut last_h2: Option<usize> = None;
    let mut ancestors = Vec::with_capacity(headings.len());

    for (index, heading) in headings.iter().enumerate() {
        let ancestor = match heading.level {
            HeadingLevel::H1 => None,
            HeadingLevel::H2 => last_h1,
            HeadingLevel::H3 => match (last_h1, last_h2) {
                (Some(h1), Some(h2)) => Some(h1.max(h2)),
                (h1, h2) => h1.or(h2),
            },
        };
        ancestors.push(ancestor);

        match heading.level {
            HeadingLevel::H1 => last_h1 = Some(index),
            HeadingLevel::H2 => last_h2 = Some(index),
            HeadingLevel::H3 => {}
        }
    }

    ancestors
}

fn is_near_duplicate(norm: &str, seen: &[String], max_len_diff: usize) -> bool {
    let len = norm.chars().count();
    seen.iter().any(|existing| {
        (existing.contains(norm) || norm.contains(existing.as_str()))
            && existing.chars().count().abs_diff(len) < max_len_diff
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(level: HeadingLevel, text: &str, page: u32, y0: f32) -> Heading {
        Heading::new(level, text, page, y0, y0 + 14.0)
    }

    fn texts(headings: &[Heading]) -> Vec<&str> {
        headings.iter().map(|h| h.text.as_str()).collect()
    }

    #[test]
    fn test_common_section_under_distinct_parents() {
        let headings = vec![
            h(HeadingLevel::H1, "Paris", 1, 100.0),
            h(HeadingLevel::H2, "Attractions", 1, 200.0),
            h(HeadingLevel::H1, "Rome", 2, 100.0),
            h(HeadingLevel::H2, "Attractions", 2, 200.0),
        ];
        let kept = remove_duplicates(headings, &PostProcessConfig::default());

        assert_eq!(texts(&kept), vec!["Paris", "Attractions", "Rome", "Attractions"]);
        assert_eq!(kept[1].parent.as_deref(), Some("Paris"));
        assert_eq!(kept[3].parent.as_deref(), Some("Rome"));
    }

    #[test]
    fn test_common_section_under_same_parent() {
        let headings = vec![
            h(HeadingLevel::H1, "Paris", 1, 100.0),
            h(HeadingLevel::H2, "Attractions", 1, 200.0),
            h(HeadingLevel::H2, "Attractions", 2, 200.0),
        ];
        let kept = remove_duplicates(headings, &PostProcessConfig::default());
        assert_eq!(texts(&kept), vec!["Paris", "Attractions"]);
        assert!(kept[1].parent.is_none());
    }

    #[test]
    fn test_common_sections_disabled() {
        let headings = vec![
            h(HeadingLevel::H1, "Paris", 1, 100.0),
            h(HeadingLevel::H2, "Attractions", 1, 200.0),
            h(HeadingLevel::H1, "Rome", 2, 100.0),
            h(HeadingLevel::H2, "Attractions", 2, 200.0),
        ];
        let config = PostProcessConfig {
            allow_common_section_duplicates: false,
            ..PostProcessConfig::default()
        };
        let kept = remove_duplicates(headings, &config);
        assert_eq!(texts(&kept), vec!["Paris", "Attractions", "Rome"]);
    }

    #[test]
    fn test_mixed_case_vocabulary() {
        let headings = vec![
            h(HeadingLevel::H1, "Lisbon", 1, 100.0),
            h(HeadingLevel::H2, "Day Excursions Nearby", 1, 200.0),
            h(HeadingLevel::H1, "Porto", 2, 100.0),
            h(HeadingLevel::H2, "Day Excursions Nearby", 2, 200.0),
        ];
        let config = PostProcessConfig {
            common_sections: vec!["Excursions".to_string()],
            ..PostProcessConfig::default()
        };
        let kept = remove_duplicates(headings, &config);
        assert_eq!(kept.len(), 4);
        assert_eq!(kept[3].parent.as_deref(), Some("Porto"));
    }

    #[test]
    fn test_stale_parent_is_replaced() {
        let mut first = h(HeadingLevel::H2, "Attractions", 1, 200.0);
        first.parent = Some("Old Chapter".to_string());
        let headings = vec![
            h(HeadingLevel::H1, "Paris", 1, 100.0),
            first,
            h(HeadingLevel::H1, "Rome", 2, 100.0),
            h(HeadingLevel::H2, "Attractions", 2, 200.0),
        ];
        let kept = remove_duplicates(headings, &PostProcessConfig::default());
        assert_eq!(kept[1].parent.as_deref(), Some("Paris"));
    }

    #[test]
    fn test_exact_and_near_duplicates() {
        let headings = vec![
            h(HeadingLevel::H1, "Project Overview", 1, 100.0),
            h(HeadingLevel::H1, "PROJECT OVERVIEW ", 2, 100.0),
            h(HeadingLevel::H2, "Project Overview Notes", 2, 200.0),
            h(HeadingLevel::H2, "Project Overview And Long Term Plans", 3, 200.0),
        ];
        let kept = remove_duplicates(headings, &PostProcessConfig::default());
        assert_eq!(
            texts(&kept),
            vec!["Project Overview", "Project Overview And Long Term Plans"]
        );
    }

    #[test]
    fn test_ancestors() {
        let headings = vec![
            h(HeadingLevel::H2, "Loose", 1, 50.0),
            h(HeadingLevel::H1, "One", 1, 100.0),
            h(HeadingLevel::H2, "Two", 1, 200.0),
            h(HeadingLevel::H3, "Three", 1, 300.0),
            h(HeadingLevel::H2, "Four", 1, 400.0),
        ];
        assert_eq!(
            ancestor_indices(&headings),
            vec![None, None, Some(1), Some(2), Some(1)]
        );
    }
}
