//! Shared fixtures for integration tests.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use pdf_outline::{BoundingBox, Fragment, PageContent};

pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;

/// One line of text placed by its top edge in top-down coordinates.
#[derive(Debug, Clone)]
pub struct Line {
    pub text: String,
    pub size: f32,
    pub bold: bool,
    pub x0: f32,
    pub y0: f32,
}

impl Line {
    pub fn new(text: impl Into<String>, size: f32, bold: bool, x0: f32, y0: f32) -> Self {
        Self {
            text: text.into(),
            size,
            bold,
            x0,
            y0,
        }
    }

    fn font(&self) -> &'static str {
        if self.bold {
            "Helvetica-Bold"
        } else {
            "Helvetica"
        }
    }

    /// Fragment as a PDF decoder would report it.
    pub fn fragment(&self) -> Fragment {
        let x1 = self.x0 + self.text.chars().count() as f32 * self.size * 0.5;
        Fragment::new(
            &self.text,
            self.size,
            BoundingBox::new(self.x0, self.y0, x1, self.y0 + self.size),
        )
        .with_bold(self.bold)
        .with_font(self.font())
    }
}

/// Letter-size page holding the given lines.
pub fn memory_page(number: u32, lines: &[Line]) -> PageContent {
    let mut page = PageContent::letter(number);
    for line in lines {
        page.add_fragment(line.fragment());
    }
    page
}

pub const TITLE: &str = "Annual Research Report";

pub const SECTIONS: [(&str, &str); 6] = [
    ("Introduction And Scope", "Key Background Notes"),
    ("Study Design Goals", "Prior Work Review"),
    ("Research Methods Used", "Data Sources Used"),
    ("Field Work Plan", "Survey Tools"),
    ("Results And Findings", "Main Data Tables"),
    ("Closing Notes And Ideas", "Open Issues List"),
];

fn body(page: u32, index: usize, y0: f32) -> Line {
    Line::new(
        format!(
            "Paragraph {} on page {} describes the survey work in plain detail.",
            index, page
        ),
        11.0,
        false,
        72.0,
        y0,
    )
}

/// A three-page report: a centered 24pt title on page one, two 18pt bold
/// sections per page, each followed by a 14pt bold subsection, with 11pt
/// prose in between.
pub fn report_lines() -> Vec<Vec<Line>> {
    let mut pages = Vec::new();
    let mut body_index = 0;

    for page_index in 0..3u32 {
        let number = page_index + 1;
        let mut lines = Vec::new();

        if number == 1 {
            let width = TITLE.chars().count() as f32 * 12.0;
            lines.push(Line::new(TITLE, 24.0, true, (PAGE_WIDTH - width) / 2.0, 80.0));
        }

        for half in 0..2usize {
            let (h1, h2) = SECTIONS[page_index as usize * 2 + half];
            let base = 150.0 + half as f32 * 300.0;

            lines.push(Line::new(h1, 18.0, true, 72.0, base));
            for k in 0..4 {
                body_index += 1;
                lines.push(body(number, body_index, base + 40.0 + k as f32 * 20.0));
            }

            lines.push(Line::new(h2, 14.0, true, 72.0, base + 140.0));
            for k in 0..3 {
                body_index += 1;
                lines.push(body(number, body_index, base + 170.0 + k as f32 * 20.0));
            }
        }

        pages.push(lines);
    }

    pages
}

/// The report as in-memory pages.
pub fn report_pages() -> Vec<PageContent> {
    report_lines()
        .iter()
        .enumerate()
        .map(|(i, lines)| memory_page(i as u32 + 1, lines))
        .collect()
}

/// Build a PDF whose pages show the given lines with Helvetica fonts.
pub fn build_pdf(pages: &[Vec<Line>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for lines in pages {
        let mut operations = Vec::new();
        for line in lines {
            let font = if line.bold { "F2" } else { "F1" };
            let baseline = PAGE_HEIGHT - line.y0 - line.size * 0.8;
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec![font.into(), line.size.into()]));
            operations.push(Operation::new("Td", vec![line.x0.into(), baseline.into()]));
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(line.text.as_str())],
            ));
            operations.push(Operation::new("ET", vec![]));
        }

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("save pdf");
    buf
}
