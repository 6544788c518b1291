//! pdf-outline CLI - PDF title and heading outline extraction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdf_outline::batch::{find_pdf_files, process_directory_with};
use pdf_outline::{
    render, BatchOptions, BatchOutcome, JsonFormat, OutlineConfig, OutlineExtractor, PageSource,
    PdfOptions, PdfSource,
};

#[derive(Parser)]
#[command(name = "pdf-outline")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract the title and heading outline of PDF documents", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output file (stdout if not specified)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long, value_name = "FILE", env = "PDF_OUTLINE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the outline of one PDF
    Extract {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: OutputFormat,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// JSON configuration file
        #[arg(short, long, value_name = "FILE", env = "PDF_OUTLINE_CONFIG")]
        config: Option<PathBuf>,

        /// Fail on the first page that cannot be decoded
        #[arg(long)]
        strict: bool,
    },

    /// Extract outlines for every PDF in a directory
    Batch {
        /// Input directory
        #[arg(value_name = "INPUT", default_value = "input")]
        input: PathBuf,

        /// Output directory
        #[arg(value_name = "OUTPUT", default_value = "output")]
        output: PathBuf,

        /// Process one document at a time
        #[arg(long)]
        sequential: bool,

        /// JSON configuration file
        #[arg(short, long, value_name = "FILE", env = "PDF_OUTLINE_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Show how a document is analyzed
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// JSON configuration file
        #[arg(short, long, value_name = "FILE", env = "PDF_OUTLINE_CONFIG")]
        config: Option<PathBuf>,

        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Outline JSON
    Json,
    /// Indented plain text
    Text,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Extract {
            input,
            output,
            format,
            compact,
            config,
            strict,
        }) => cmd_extract(
            &input,
            output.as_deref(),
            format,
            compact,
            config.as_deref(),
            strict,
        ),
        Some(Commands::Batch {
            input,
            output,
            sequential,
            config,
        }) => cmd_batch(&input, &output, sequential, config.as_deref()),
        Some(Commands::Info {
            input,
            config,
            json,
        }) => cmd_info(&input, config.as_deref(), json),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: extract if input is provided
            if let Some(input) = cli.input {
                cmd_extract(
                    &input,
                    cli.output.as_deref(),
                    OutputFormat::Json,
                    false,
                    cli.config.as_deref(),
                    false,
                )
            } else {
                println!("{}", "Usage: pdf-outline <FILE> [OUTPUT]".yellow());
                println!("       pdf-outline --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<OutlineConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(OutlineConfig::from_json_file(path)?),
        None => Ok(OutlineConfig::default()),
    }
}

fn cmd_extract(
    input: &Path,
    output: Option<&Path>,
    format: OutputFormat,
    compact: bool,
    config: Option<&Path>,
    strict: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let extractor = OutlineExtractor::new(load_config(config)?)?;

    let options = if strict {
        PdfOptions::new().strict()
    } else {
        PdfOptions::new().lenient()
    };
    let source = PdfSource::open_with_options(input, options)?;
    let outline = extractor.extract(&source)?;

    let rendered = match format {
        OutputFormat::Json => {
            let json_format = if compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            };
            render::to_json(&outline, json_format)?
        }
        OutputFormat::Text => render::to_text(&outline),
    };

    if let Some(path) = output {
        fs::write(path, &rendered)?;
        println!(
            "{} {} ({} headings)",
            "Saved to".green(),
            path.display(),
            outline.len()
        );
    } else {
        println!("{}", rendered);
    }

    Ok(())
}

fn cmd_batch(
    input: &Path,
    output: &Path,
    sequential: bool,
    config: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = BatchOptions::new().with_config(load_config(config)?);
    if sequential {
        options = options.sequential();
    }

    let total = find_pdf_files(input)?.len();
    if total == 0 {
        println!("{} {}", "No PDF files found in".yellow(), input.display());
        return Ok(());
    }

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let report = process_directory_with(input, output, &options, |item| {
        let name = item
            .input
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        pb.set_message(name);
        pb.inc(1);
    })?;

    pb.finish_and_clear();

    println!(
        "{} {} written, {} failed",
        "Done!".green().bold(),
        report.succeeded(),
        report.failed()
    );
    for item in report.failures() {
        if let BatchOutcome::Failed { message } = &item.outcome {
            println!("  {} {}: {}", "✗".red(), item.input.display(), message);
        }
    }

    Ok(())
}

fn cmd_info(
    input: &Path,
    config: Option<&Path>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let extractor = OutlineExtractor::new(load_config(config)?)?;

    // Lenient so a single broken page still shows the rest of the analysis
    let source = PdfSource::open_with_options(input, PdfOptions::new().lenient())?;
    let analysis = extractor.analyze(&source)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), source.version());
    println!("{}: {}", "Pages".bold(), source.page_count());
    println!(
        "{}: {}",
        "Encrypted".bold(),
        if source.is_encrypted() { "Yes" } else { "No" }
    );
    println!("{}: {}", "Fragments".bold(), analysis.fragment_count);

    let title = &analysis.outline.title;
    if !title.is_empty() {
        println!("{}: {}", "Title".bold(), title);
    }

    println!();
    println!("{}", "Heading Analysis".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!(
        "{}: H1 {:.1} / H2 {:.1} / H3 {:.1}",
        "Thresholds".bold(),
        analysis.thresholds.h1,
        analysis.thresholds.h2,
        analysis.thresholds.h3
    );
    println!(
        "{}: {:?} (spread {:.1})",
        "Mode".bold(),
        analysis.mode,
        analysis.font_spread
    );
    println!(
        "{}: {} raw, {} kept",
        "Headings".bold(),
        analysis.raw_heading_count,
        analysis.outline.len()
    );

    if !analysis.boilerplate.is_empty() {
        println!("{}:", "Boilerplate".bold());
        for text in &analysis.boilerplate {
            println!("  {} {}", "─".dimmed(), text);
        }
    }

    Ok(())
}

fn cmd_version() {
    println!(
        "{} {}",
        "pdf-outline".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("PDF title and heading outline extraction tool");
    println!();
    println!("Library: pdf-outline {}", pdf_outline::version());
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdf_outline::SpreadScope;

    #[test]
    fn test_load_default_config() {
        let config = load_config(None).unwrap();
        assert_eq!(config.spread_scope, SpreadScope::Document);
    }

    #[test]
    fn test_load_partial_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("outline.json");
        fs::write(&path, r#"{"spread_scope": "page", "title": {"max_words": 8}}"#).unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.spread_scope, SpreadScope::Page);
        assert_eq!(config.title.max_words, 8);
        assert_eq!(
            config.fallback_font_sizes,
            OutlineConfig::default().fallback_font_sizes
        );
    }

    #[test]
    fn test_load_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(load_config(Some(&path)).is_err());
        assert!(load_config(Some(&dir.path().join("missing.json"))).is_err());
    }

    #[test]
    fn test_cli_parses_bare_file() {
        let cli = Cli::try_parse_from(["pdf-outline", "report.pdf"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.input, Some(PathBuf::from("report.pdf")));
    }

    #[test]
    fn test_bare_file_accepts_config() {
        let cli =
            Cli::try_parse_from(["pdf-outline", "report.pdf", "--config", "outline.json"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, Some(PathBuf::from("outline.json")));
    }
}
