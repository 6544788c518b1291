//! Document title selection from the first page.

use std::cmp::Ordering;

use crate::config::TitleConfig;
use crate::model::{Fragment, PageContent};

use super::text;

/// Pick the document title from page one.
///
/// Returns an empty string when the page has no text.
pub fn select_title(page: &PageContent, config: &TitleConfig) -> String {
    let fragments = &page.fragments;
    let Some(chosen) = choose_title_fragment(page, config) else {
        return String::new();
    };

    let lead = &fragments[chosen];
    if !config.continuation {
        return lead.text.clone();
    }

    let mut order: Vec<usize> = (0..fragments.len()).collect();
    order.sort_by(|&a, &b| reading_order(&fragments[a], &fragments[b]));

    let tolerance = if text::is_latin(&lead.text) {
        config.latin_size_tolerance
    } else {
        config.non_latin_size_tolerance
    };

    let region_end = page.height * config.fallback_region;
    let mut lines = vec![lead.text.as_str()];
    let mut last_y = lead.y0();
    let start = order.iter().position(|&i| i == chosen).map_or(order.len(), |p| p + 1);

    for &i in &order[start..] {
        let next = &fragments[i];
        let same_font = matches!((&lead.font, &next.font), (Some(a), Some(b)) if a == b);
        if same_font
            && next.y0() < region_end
            && (next.size - lead.size).abs() < tolerance
            && (next.y0() - last_y).abs() < config.max_line_gap
        {
            lines.push(next.text.as_str());
            last_y = next.y0();
        } else {
            break;
        }
    }

    log::trace!("Title assembled from {} line(s)", lines.len());
    lines.join(" ")
}

/// Index of the fragment that starts the title.
fn choose_title_fragment(page: &PageContent, config: &TitleConfig) -> Option<usize> {
    let fragments = &page.fragments;
    let page_max = page.max_font_size()?;

    let near_max = |f: &Fragment| (f.size - page_max).abs() <= config.size_tolerance;
    let in_region = |fraction: f32| -> Vec<usize> {
        (0..fragments.len())
            .filter(|&i| {
                let f = &fragments[i];
                f.y0() < page.height * fraction && near_max(f)
            })
            .collect()
    };

    let mut region = in_region(config.primary_region);
    if region.is_empty() {
        region = in_region(config.fallback_region);
    }

    let short = |i: &usize| fragments[*i].word_count() <= config.max_words;
    let centered = |i: &usize| {
        let f = &fragments[*i];
        (f.bbox.center_x() - page.width / 2.0).abs() < config.center_tolerance
    };

    earliest(fragments, region.iter().copied().filter(|i| centered(i) && short(i)))
        .or_else(|| earliest(fragments, region.iter().copied().filter(short)))
        .or_else(|| earliest(fragments, region.iter().copied()))
        .or_else(|| {
            let largest = (0..fragments.len()).filter(|&i| fragments[i].size == page_max);
            earliest(fragments, largest)
        })
        .or(Some(0))
}

/// Topmost candidate; decoder order breaks ties.
fn earliest(fragments: &[Fragment], candidates: impl Iterator<Item = usize>) -> Option<usize> {
    candidates.min_by(|&a, &b| {
        fragments[a]
            .y0()
            .partial_cmp(&fragments[b].y0())
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    })
}

fn reading_order(a: &Fragment, b: &Fragment) -> Ordering {
    a.y0()
        .partial_cmp(&b.y0())
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.bbox.x0.partial_cmp(&b.bbox.x0).unwrap_or(Ordering::Equal))
}
