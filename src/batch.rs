//! Directory batch driver.
//!
//! Every PDF in an input directory becomes `<stem>.json` in an output
//! directory. Documents are independent, so they run on the rayon pool
//! unless sequential processing is requested. A failing document is logged
//! and reported; it never stops the batch.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::config::OutlineConfig;
use crate::engine::OutlineExtractor;
use crate::error::Result;
use crate::render::{to_json, JsonFormat};
use crate::source::{PdfOptions, PdfSource};

/// Options for a batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Process documents in parallel
    pub parallel: bool,
    /// Extraction configuration shared by every document
    pub config: OutlineConfig,
    /// PDF decoding options
    pub pdf: PdfOptions,
    /// Output JSON format
    pub format: JsonFormat,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            config: OutlineConfig::default(),
            pdf: PdfOptions::default(),
            format: JsonFormat::Pretty,
        }
    }
}

impl BatchOptions {
    /// Create batch options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process documents one at a time.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set the extraction configuration.
    pub fn with_config(mut self, config: OutlineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the PDF decoding options.
    pub fn with_pdf_options(mut self, pdf: PdfOptions) -> Self {
        self.pdf = pdf;
        self
    }

    /// Set the output JSON format.
    pub fn with_format(mut self, format: JsonFormat) -> Self {
        self.format = format;
        self
    }
}

/// What happened to one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Outline written with this many headings
    Written { headings: usize },
    /// Extraction or writing failed
    Failed { message: String },
}

/// One processed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    /// Source PDF
    pub input: PathBuf,
    /// Target JSON file
    pub output: PathBuf,
    pub outcome: BatchOutcome,
}

impl BatchItem {
    /// Check whether the outline was written.
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, BatchOutcome::Written { .. })
    }
}

/// Per-document results of a batch run, in input file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub items: Vec<BatchItem>,
}

impl BatchReport {
    /// Number of documents processed.
    pub fn total(&self) -> usize {
        self.items.len()
    }

    /// Number of outlines written.
    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|i| i.is_success()).count()
    }

    /// Number of failed documents.
    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    /// Iterate over the failed documents.
    pub fn failures(&self) -> impl Iterator<Item = &BatchItem> {
        self.items.iter().filter(|i| !i.is_success())
    }
}

/// List the PDF files directly inside a directory, sorted by path.
///
/// The `.pdf` extension matches case-insensitively.
pub fn find_pdf_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
        if is_pdf && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Extract outlines for every PDF in `input_dir` into `output_dir`.
pub fn process_directory<P, Q>(
    input_dir: P,
    output_dir: Q,
    options: &BatchOptions,
) -> Result<BatchReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    process_directory_with(input_dir, output_dir, options, |_| {})
}

/// Like [`process_directory`], calling `on_item` as each document finishes.
pub fn process_directory_with<P, Q, F>(
    input_dir: P,
    output_dir: Q,
    options: &BatchOptions,
    on_item: F,
) -> Result<BatchReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    F: Fn(&BatchItem) + Sync,
{
    let output_dir = output_dir.as_ref();
    let extractor = OutlineExtractor::new(options.config.clone())?;
    let files = find_pdf_files(input_dir)?;
    std::fs::create_dir_all(output_dir)?;

    log::info!(
        "Processing {} PDF file(s) into {}",
        files.len(),
        output_dir.display()
    );

    let run = |input: &PathBuf| {
        let item = process_file(&extractor, input, output_dir, options);
        on_item(&item);
        item
    };

    let items: Vec<BatchItem> = if options.parallel {
        files.par_iter().map(run).collect()
    } else {
        files.iter().map(run).collect()
    };

    let report = BatchReport { items };
    log::info!(
        "Batch finished: {} written, {} failed",
        report.succeeded(),
        report.failed()
    );
    Ok(report)
}

/// Extract one document and write its JSON next to its siblings.
fn process_file(
    extractor: &OutlineExtractor,
    input: &Path,
    output_dir: &Path,
    options: &BatchOptions,
) -> BatchItem {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    let output = output_dir.join(format!("{}.json", stem));

    let outcome = match write_outline(extractor, input, &output, options) {
        Ok(headings) => {
            log::info!(
                "Processed {} -> {} ({} headings)",
                input.display(),
                output.display(),
                headings
            );
            BatchOutcome::Written { headings }
        }
        Err(e) => {
            log::error!("Failed to process {}: {}", input.display(), e);
            BatchOutcome::Failed {
                message: e.to_string(),
            }
        }
    };

    BatchItem {
        input: input.to_path_buf(),
        output,
        outcome,
    }
}

fn write_outline(
    extractor: &OutlineExtractor,
    input: &Path,
    output: &Path,
    options: &BatchOptions,
) -> Result<usize> {
    let source = PdfSource::open_with_options(input, options.pdf.clone())?;
    let outline = extractor.extract(&source)?;
    let json = to_json(&outline, options.format)?;
    std::fs::write(output, json)?;
    Ok(outline.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_pdf_files_filters_extensions() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.pdf", "a.PDF", "notes.txt", "c.pdf.bak"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("nested.pdf")).unwrap();

        let files = find_pdf_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.PDF", "b.pdf"]);
    }

    #[test]
    fn test_report_counts() {
        let report = BatchReport {
            items: vec![
                BatchItem {
                    input: "a.pdf".into(),
                    output: "a.json".into(),
                    outcome: BatchOutcome::Written { headings: 3 },
                },
                BatchItem {
                    input: "b.pdf".into(),
                    output: "b.json".into(),
                    outcome: BatchOutcome::Failed {
                        message: "Unknown file format".into(),
                    },
                },
            ],
        };
        assert_eq!(report.total(), 2);
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.failures().count(), 1);
    }
}
