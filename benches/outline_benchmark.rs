//! Benchmarks for outline extraction performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks run the analysis pipeline over synthetic in-memory pages.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pdf_outline::analysis::cluster_font_sizes;
use pdf_outline::{BoundingBox, Fragment, OutlineExtractor, PageContent};

fn line(text: String, size: f32, bold: bool, y0: f32) -> Fragment {
    let x1 = 72.0 + text.chars().count() as f32 * size * 0.5;
    Fragment::new(text, size, BoundingBox::new(72.0, y0, x1, y0 + size)).with_bold(bold)
}

/// Creates synthetic pages with two sections, a subsection each and body text.
fn create_test_pages(page_count: u32) -> Vec<PageContent> {
    (1..=page_count)
        .map(|number| {
            let mut page = PageContent::letter(number);
            for half in 0..2u32 {
                let base = 100.0 + half as f32 * 320.0;
                page.add_fragment(line(
                    format!("Section {} Overview Notes", number * 2 + half),
                    18.0,
                    true,
                    base,
                ));
                for k in 0..8 {
                    let text = format!("Body line {} on page {} covers the results.", k, number);
                    page.add_fragment(line(
                        text,
                        11.0,
                        false,
                        base + 40.0 + k as f32 * 18.0,
                    ));
                }
                page.add_fragment(line(
                    format!("Detail Topic {}", half),
                    14.0,
                    true,
                    base + 200.0,
                ));
            }
            page
        })
        .collect()
}

/// Benchmark font-size clustering.
fn bench_clustering(c: &mut Criterion) {
    let sizes: Vec<f32> = create_test_pages(50)
        .iter()
        .flat_map(|p| p.fragments.iter().map(|f| f.size))
        .collect();

    c.bench_function("cluster_font_sizes", |b| {
        b.iter(|| cluster_font_sizes(black_box(&sizes), &[12.0, 10.0, 8.0]));
    });
}

/// Benchmark the full pipeline at various sizes.
fn bench_outline_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("outline_extraction");
    let extractor = OutlineExtractor::default();

    for page_count in [1, 10, 50].iter() {
        let pages = create_test_pages(*page_count);

        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| extractor.extract_pages(black_box(&pages)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_clustering, bench_outline_extraction);
criterion_main!(benches);
