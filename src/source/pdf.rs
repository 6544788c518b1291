//! PDF page source backed by lopdf.
//!
//! Content streams are interpreted just far enough to recover positioned text:
//! text state operators track the font and text matrix, show operators emit
//! spans, and spans sharing a baseline and font run are joined into one
//! fragment per run.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use lopdf::{Document as LopdfDocument, Object, ObjectId};
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};
use crate::model::{BoundingBox, Fragment, PageContent};

use super::options::{ErrorMode, PdfOptions};
use super::PageSource;

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Letter size, used when a page has no usable MediaBox.
const DEFAULT_PAGE_SIZE: (f32, f32) = (612.0, 792.0);

/// Parent chain depth limit when resolving inherited page attributes.
const MAX_INHERIT_DEPTH: usize = 32;

/// TJ adjustments beyond this (thousandths of text space) read as a word break.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// Check the `%PDF-x.y` header and return the version.
pub fn detect_pdf_version(data: &[u8]) -> Result<String> {
    if data.len() < PDF_MAGIC.len() + VERSION_LEN || !data.starts_with(PDF_MAGIC) {
        return Err(Error::UnknownFormat);
    }

    let version_bytes = &data[PDF_MAGIC.len()..PDF_MAGIC.len() + VERSION_LEN];
    let version = String::from_utf8_lossy(version_bytes).to_string();

    let chars: Vec<char> = version.chars().collect();
    let valid = chars.len() == 3
        && chars[0].is_ascii_digit()
        && chars[1] == '.'
        && chars[2].is_ascii_digit();
    if !valid {
        return Err(Error::UnsupportedVersion(version));
    }
    Ok(version)
}

/// A PDF document read as positioned-text pages.
pub struct PdfSource {
    doc: LopdfDocument,
    pages: BTreeMap<u32, ObjectId>,
    version: String,
    options: PdfOptions,
}

impl PdfSource {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, PdfOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: PdfOptions) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Read a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, PdfOptions::default())
    }

    /// Read a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: PdfOptions) -> Result<Self> {
        let version = detect_pdf_version(data)?;

        let doc = LopdfDocument::load_mem(data).map_err(|e| match e {
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::from(e),
        })?;
        if doc.is_encrypted() {
            // lopdf has already applied the empty user password by now
            log::debug!("Document is encrypted with an empty user password");
        }

        let pages = doc.get_pages();
        log::debug!("Loaded PDF {} with {} pages", version, pages.len());

        Ok(Self {
            doc,
            pages,
            version,
            options,
        })
    }

    /// PDF version from the file header.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Check if the document carries an encryption dictionary.
    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    fn page_id(&self, number: u32) -> Result<ObjectId> {
        self.pages
            .get(&number)
            .copied()
            .ok_or(Error::PageOutOfRange(number, self.pages.len() as u32))
    }

    /// Page origin and size from the (possibly inherited) MediaBox.
    fn media_box(&self, page_id: ObjectId) -> (f32, f32, f32, f32) {
        let mut current = self.doc.get_dictionary(page_id).ok();
        for _ in 0..MAX_INHERIT_DEPTH {
            let Some(dict) = current else { break };

            if let Ok(media_box) = dict.get(b"MediaBox") {
                let media_box = match media_box {
                    Object::Reference(r) => self.doc.get_object(*r).unwrap_or(media_box),
                    other => other,
                };
                if let Ok(array) = media_box.as_array() {
                    let values: Vec<f32> = array.iter().filter_map(get_number).collect();
                    if values.len() >= 4 {
                        let (llx, lly) = (values[0].min(values[2]), values[1].min(values[3]));
                        let width = (values[2] - values[0]).abs();
                        let height = (values[3] - values[1]).abs();
                        if width > 0.0 && height > 0.0 {
                            return (llx, lly, width, height);
                        }
                    }
                }
                break;
            }

            current = dict
                .get(b"Parent")
                .ok()
                .and_then(|p| p.as_reference().ok())
                .and_then(|r| self.doc.get_dictionary(r).ok());
        }

        (0.0, 0.0, DEFAULT_PAGE_SIZE.0, DEFAULT_PAGE_SIZE.1)
    }

    /// Get page content stream.
    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let contents = match page_dict.get(b"Contents") {
            Ok(contents) => contents,
            // A page without content has no text.
            Err(_) => return Ok(Vec::new()),
        };

        match contents {
            Object::Reference(r) => match self.doc.get_object(*r) {
                Ok(Object::Stream(s)) => Ok(s
                    .decompressed_content()
                    .unwrap_or_else(|_| s.content.clone())),
                Ok(Object::Array(arr)) => Ok(self.concat_streams(arr)),
                _ => Err(Error::PdfParse("Invalid content stream".to_string())),
            },
            Object::Array(arr) => Ok(self.concat_streams(arr)),
            Object::Stream(s) => Ok(s
                .decompressed_content()
                .unwrap_or_else(|_| s.content.clone())),
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }

    fn concat_streams(&self, refs: &[Object]) -> Vec<u8> {
        let mut content = Vec::new();
        for obj in refs {
            if let Object::Reference(r) = obj {
                if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                    if let Ok(data) = s.decompressed_content() {
                        content.extend_from_slice(&data);
                    } else {
                        content.extend_from_slice(&s.content);
                    }
                    content.push(b' ');
                }
            }
        }
        content
    }

    /// Decode one page into fragments.
    fn decode_page(&self, number: u32, page_id: ObjectId, page: &mut PageContent) -> Result<()> {
        let (llx, lly, _, height) = self.media_box(page_id);

        let lopdf_fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut fonts = HashMap::new();
        for (name, font) in &lopdf_fonts {
            let base_font = font
                .get(b"BaseFont")
                .ok()
                .and_then(|o| o.as_name().ok())
                .map(|n| String::from_utf8_lossy(n).to_string())
                .unwrap_or_else(|| String::from_utf8_lossy(name).to_string());
            fonts.insert(name.clone(), base_font);
        }

        let content = self.page_content(page_id)?;
        let spans = self.parse_content_stream(&content, &fonts, &lopdf_fonts)?;
        let span_count = spans.len();

        for run in group_spans_into_runs(spans) {
            let text: String = run.text.nfc().collect();
            let top = run.y + run.size * 0.8;
            let bottom = run.y - run.size * 0.2;
            let bbox = BoundingBox::new(
                run.x0 - llx,
                height - (top - lly),
                run.x1 - llx,
                height - (bottom - lly),
            );
            let fragment = Fragment::new(text, run.size, bbox)
                .with_bold(run.bold)
                .with_font(run.font);
            page.add_fragment(fragment);
        }

        log::trace!(
            "Page {}: {} spans -> {} fragments",
            number,
            span_count,
            page.fragments.len()
        );
        Ok(())
    }

    /// Interpret a content stream into text spans.
    fn parse_content_stream(
        &self,
        content: &[u8],
        fonts: &HashMap<Vec<u8>, String>,
        lopdf_fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
    ) -> Result<Vec<TextSpan>> {
        let content =
            lopdf::content::Content::decode(content).map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut spans = Vec::new();
        let mut current_font = String::new();
        let mut current_font_name: Vec<u8> = Vec::new();
        let mut current_font_size: f32 = 12.0;
        let mut leading: f32 = 12.0;
        let mut text_matrix = TextMatrix::default();
        let mut in_text_block = false;

        for op in content.operations {
            match op.operator.as_str() {
                "BT" => {
                    in_text_block = true;
                    text_matrix = TextMatrix::default();
                }
                "ET" => {
                    in_text_block = false;
                }
                "Tf" => {
                    if op.operands.len() >= 2 {
                        if let Object::Name(font_name) = &op.operands[0] {
                            current_font_name = font_name.clone();
                            current_font = fonts
                                .get(font_name.as_slice())
                                .cloned()
                                .unwrap_or_else(|| String::from_utf8_lossy(font_name).to_string());
                        }
                        current_font_size = get_number(&op.operands[1]).unwrap_or(12.0);
                    }
                }
                "TL" => {
                    if let Some(value) = op.operands.first().and_then(get_number) {
                        leading = value;
                    }
                }
                "Td" | "TD" => {
                    if op.operands.len() >= 2 {
                        let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                        let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                        if op.operator == "TD" {
                            leading = -ty;
                        }
                        text_matrix.translate(tx, ty);
                    }
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        text_matrix.set(
                            get_number(&op.operands[0]).unwrap_or(1.0),
                            get_number(&op.operands[1]).unwrap_or(0.0),
                            get_number(&op.operands[2]).unwrap_or(0.0),
                            get_number(&op.operands[3]).unwrap_or(1.0),
                            get_number(&op.operands[4]).unwrap_or(0.0),
                            get_number(&op.operands[5]).unwrap_or(0.0),
                        );
                    }
                }
                "T*" => {
                    text_matrix.next_line(leading);
                }
                "Tj" | "TJ" | "'" | "\"" => {
                    if matches!(op.operator.as_str(), "'" | "\"") {
                        text_matrix.next_line(leading);
                    }
                    if !in_text_block {
                        continue;
                    }

                    let encoding = lopdf_fonts
                        .get(&current_font_name)
                        .and_then(|f| f.get_font_encoding(&self.doc).ok());
                    let decode = |bytes: &[u8]| -> String {
                        encoding
                            .as_ref()
                            .and_then(|enc| LopdfDocument::decode_text(enc, bytes).ok())
                            .unwrap_or_else(|| decode_text_simple(bytes))
                    };

                    let text = match op.operator.as_str() {
                        "TJ" => match op.operands.first() {
                            Some(Object::Array(arr)) => decode_tj_array(arr, &decode),
                            _ => String::new(),
                        },
                        "\"" => match op.operands.get(2) {
                            Some(Object::String(bytes, _)) => decode(bytes),
                            _ => String::new(),
                        },
                        _ => match op.operands.first() {
                            Some(Object::String(bytes, _)) => decode(bytes),
                            _ => String::new(),
                        },
                    };

                    if !text.trim().is_empty() {
                        let (x, y) = text_matrix.position();
                        let effective_size = current_font_size * text_matrix.scale();
                        spans.push(TextSpan::new(text, x, y, effective_size, current_font.clone()));
                    }
                }
                _ => {}
            }
        }

        Ok(spans)
    }
}

impl PageSource for PdfSource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page(&self, number: u32) -> Result<PageContent> {
        let page_id = self.page_id(number)?;
        let (_, _, width, height) = self.media_box(page_id);
        let mut page = PageContent::new(number, width, height);

        match self.decode_page(number, page_id, &mut page) {
            Ok(()) => Ok(page),
            Err(e) => {
                if self.options.error_mode == ErrorMode::Strict {
                    return Err(e);
                }
                log::warn!("Failed to extract text from page {}: {}", number, e);
                Ok(PageContent::new(number, width, height))
            }
        }
    }
}

/// Decode a TJ array, turning wide negative adjustments into spaces.
fn decode_tj_array(items: &[Object], decode: &dyn Fn(&[u8]) -> String) -> String {
    let mut combined = String::new();
    for item in items {
        match item {
            Object::String(bytes, _) => combined.push_str(&decode(bytes)),
            other => {
                let Some(adjustment) = get_number(other).map(|n| -n) else {
                    continue;
                };
                if adjustment > TJ_SPACE_THRESHOLD
                    && !combined.is_empty()
                    && !combined.ends_with(' ')
                    && !combined.ends_with('\u{00A0}')
                    && !combined.chars().last().is_some_and(is_spaceless_script_char)
                {
                    combined.push(' ');
                }
            }
        }
    }
    combined
}

/// A shown string with its position and font.
#[derive(Debug, Clone)]
struct TextSpan {
    text: String,
    /// Left edge
    x: f32,
    /// Baseline
    y: f32,
    /// Estimated advance width
    width: f32,
    size: f32,
    font: String,
    bold: bool,
}

impl TextSpan {
    fn new(text: String, x: f32, y: f32, size: f32, font: String) -> Self {
        let lower = font.to_lowercase();
        let bold = lower.contains("bold") || lower.contains("black") || lower.contains("heavy");
        let width = text.chars().count() as f32 * size * 0.5;
        Self {
            text,
            x,
            y,
            width,
            size,
            font,
            bold,
        }
    }
}

/// Consecutive spans on one baseline sharing a font and size.
#[derive(Debug, Clone)]
struct TextRun {
    text: String,
    x0: f32,
    x1: f32,
    y: f32,
    size: f32,
    font: String,
    bold: bool,
}

impl TextRun {
    fn start(span: TextSpan) -> Self {
        Self {
            x0: span.x,
            x1: span.x + span.width,
            y: span.y,
            size: span.size,
            bold: span.bold,
            text: span.text,
            font: span.font,
        }
    }

    fn continues_with(&self, span: &TextSpan) -> bool {
        span.font == self.font && (span.size - self.size).abs() < 0.01
    }

    /// Append a span, inserting a space when the horizontal gap calls for one.
    fn push(&mut self, span: TextSpan) {
        let gap = span.x - self.x1;
        let space_threshold = span.size * 0.5 * 0.2;

        let prev_cjk = self.text.chars().last().is_some_and(is_spaceless_script_char);
        let curr_cjk = span.text.chars().next().is_some_and(is_spaceless_script_char);
        let has_space = self.text.ends_with(char::is_whitespace)
            || span.text.starts_with(char::is_whitespace);

        if gap > space_threshold && !(prev_cjk && curr_cjk) && !has_space {
            self.text.push(' ');
        }
        self.text.push_str(&span.text);
        self.x1 = self.x1.max(span.x + span.width);
    }
}

/// Group spans into lines by baseline, then split each line into font runs.
fn group_spans_into_runs(mut spans: Vec<TextSpan>) -> Vec<TextRun> {
    // PDF Y grows upward: sort top to bottom, then left to right.
    spans.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal))
    });

    let mut lines: Vec<Vec<TextSpan>> = Vec::new();
    for span in spans {
        let tolerance = span.size * 0.3;
        match lines.last_mut() {
            Some(line) if (line[0].y - span.y).abs() <= tolerance => line.push(span),
            _ => lines.push(vec![span]),
        }
    }

    let mut runs = Vec::new();
    for mut line in lines {
        line.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal));

        let mut current: Option<TextRun> = None;
        for span in line {
            match current.as_mut() {
                Some(run) if run.continues_with(&span) => run.push(span),
                _ => {
                    if let Some(done) = current.replace(TextRun::start(span)) {
                        runs.push(done);
                    }
                }
            }
        }
        runs.extend(current);
    }
    runs
}

/// Text matrix for tracking position in content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32, // X translation
    f: f32, // Y translation
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self, leading: f32) {
        self.translate(0.0, -leading);
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    /// Vertical scale factor.
    fn scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// Helper to extract number from PDF object.
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Check if character is from a script that doesn't use word spaces.
/// Chinese and Japanese don't use spaces between words, but Korean does.
fn is_spaceless_script_char(c: char) -> bool {
    let code = c as u32;

    // CJK Unified Ideographs and Extension A
    (0x4E00..=0x9FFF).contains(&code)
    || (0x3400..=0x4DBF).contains(&code)
    // CJK Unified Ideographs Extension B-F
    || (0x20000..=0x2EBEF).contains(&code)
    // Hiragana and Katakana
    || (0x3040..=0x30FF).contains(&code)
    // CJK Symbols and Punctuation
    || (0x3000..=0x303F).contains(&code)
}

/// Simple text decoding fallback when no encoding is available.
fn decode_text_simple(bytes: &[u8]) -> String {
    // UTF-16BE with BOM
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_pdf_version() {
        assert_eq!(detect_pdf_version(b"%PDF-1.7\n%\xE2\xE3").unwrap(), "1.7");
        assert!(matches!(detect_pdf_version(b"PK\x03\x04 zip"), Err(Error::UnknownFormat)));
        assert!(matches!(detect_pdf_version(b"%PDF"), Err(Error::UnknownFormat)));
        assert!(matches!(
            detect_pdf_version(b"%PDF-x.y\n"),
            Err(Error::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_decode_text_simple() {
        assert_eq!(decode_text_simple(b"Hello"), "Hello");
        assert_eq!(decode_text_simple(&[0x48, 0x65, 0x6C, 0x6C, 0xE9]), "Hellé");
        assert_eq!(decode_text_simple(&[0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69]), "Hi");
    }

    #[test]
    fn test_tj_array_spacing() {
        let items = vec![
            Object::string_literal("Data"),
            Object::Integer(-250),
            Object::string_literal("Sources"),
            Object::Real(-40.0),
            Object::string_literal("!"),
        ];
        let text = decode_tj_array(&items, &|b: &[u8]| decode_text_simple(b));
        assert_eq!(text, "Data Sources!");
    }

    #[test]
    fn test_text_span_bold_detection() {
        let span = TextSpan::new("A".into(), 0.0, 0.0, 12.0, "Helvetica-Bold".into());
        assert!(span.bold);
        let span = TextSpan::new("A".into(), 0.0, 0.0, 12.0, "Arial-Black".into());
        assert!(span.bold);
        let span = TextSpan::new("A".into(), 0.0, 0.0, 12.0, "Times-Roman".into());
        assert!(!span.bold);
    }

    #[test]
    fn test_runs_split_by_font_and_line() {
        let spans = vec![
            TextSpan::new("Methods".into(), 130.0, 700.0, 12.0, "Helvetica-Bold".into()),
            TextSpan::new("2.".into(), 72.0, 700.0, 12.0, "Helvetica-Bold".into()),
            TextSpan::new("body text".into(), 200.0, 700.0, 12.0, "Helvetica".into()),
            TextSpan::new("Next line".into(), 72.0, 680.0, 12.0, "Helvetica".into()),
        ];
        let runs = group_spans_into_runs(spans);

        let texts: Vec<_> = runs.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["2. Methods", "body text", "Next line"]);
        assert!(runs[0].bold);
        assert_eq!(runs[0].x0, 72.0);
    }

    #[test]
    fn test_cjk_runs_have_no_spaces() {
        let spans = vec![
            TextSpan::new("数据".into(), 100.0, 700.0, 12.0, "SimSun".into()),
            TextSpan::new("分析".into(), 130.0, 700.0, 12.0, "SimSun".into()),
        ];
        let runs = group_spans_into_runs(spans);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "数据分析");
    }

    #[test]
    fn test_text_matrix() {
        let mut tm = TextMatrix::default();
        tm.set(2.0, 0.0, 0.0, 2.0, 100.0, 700.0);
        tm.translate(10.0, -5.0);
        assert_eq!(tm.position(), (120.0, 690.0));
        assert_eq!(tm.scale(), 2.0);

        tm.next_line(12.0);
        assert_eq!(tm.position(), (120.0, 666.0));
    }
}
