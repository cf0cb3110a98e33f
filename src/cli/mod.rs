//! # CLI Module
//!
//! Command-line interface for the book ripper.
//!
//! ## Usage
//! ```bash
//! # Split scans into pages and build merged.pdf
//! book-rip ~/Scans/book ~/Books/book-pages
//!
//! # Keep the cropped spreads for inspection
//! book-rip ~/Scans/book ~/Books/book-pages --debug
//!
//! # Also print the recognized text (needs the `ocr` feature)
//! book-rip ~/Scans/book ~/Books/book-pages --ocr
//!
//! # Only top-level JPEG scans
//! book-rip ~/Scans/book ~/Books/book-pages --max-depth 1 --extension jpg
//! ```
//!
//! With `--ocr`, the input and output checks run before the models load, so
//! a bad path is reported ahead of a missing model.

use book_ripper::core::ocr::TextRecognizer;
use book_ripper::core::pipeline::{preflight, Pipeline, PipelineResult};
use book_ripper::core::scanner::ScanConfig;
use book_ripper::error::{BookRipError, Result, ValidationError};
use book_ripper::events::{
    AssembleEvent, Event, EventChannel, PipelineEvent, SplitEvent, SpreadOutcome,
};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::thread;

const HELP_WORDS: &[&str] = &["help", "--help", "-h"];

/// Book Ripper - split scanned spreads into pages and a merged PDF
#[derive(Parser, Debug)]
#[command(name = "book-rip")]
#[command(author, version, about, long_about = None, disable_help_flag = true)]
pub struct Cli {
    /// Directory of scanned double-page spreads
    input_directory: PathBuf,

    /// Directory that receives the pages and merged.pdf
    output_directory: PathBuf,

    /// Also write each cropped spread as <name>.xdebug.png
    #[arg(long)]
    debug: bool,

    /// Include hidden files
    #[arg(long)]
    include_hidden: bool,

    /// Follow symbolic links while walking the input
    #[arg(long)]
    follow_symlinks: bool,

    /// Maximum directory depth to walk (1 = input directory only)
    #[arg(long, value_name = "N")]
    max_depth: Option<usize>,

    /// Image extension to accept, replacing the defaults (repeatable)
    #[arg(long = "extension", value_name = "EXT")]
    extensions: Vec<String>,

    /// Run text recognition on the pages and print the text
    #[arg(long)]
    ocr: bool,

    /// Directory holding text-detection.rten and text-recognition.rten
    #[arg(long, value_name = "DIR", requires = "ocr")]
    ocr_models: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "pretty")]
    output: OutputFormat,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// Minimal output (page paths only)
    Minimal,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let args: Vec<OsString> = std::env::args_os().collect();

    if args.iter().skip(1).any(|a| HELP_WORDS.iter().any(|h| a == *h)) {
        return Err(usage_error());
    }

    let cli = match Cli::try_parse_from(&args) {
        Ok(cli) => cli,
        Err(e) if e.kind() == ErrorKind::DisplayVersion => e.exit(),
        Err(_) => return Err(usage_error()),
    };

    run_rip(cli)
}

fn usage_error() -> BookRipError {
    ValidationError::Usage {
        message: Cli::command().render_help().to_string(),
    }
    .into()
}

fn run_rip(cli: Cli) -> Result<()> {
    let term = Term::stderr();
    let pretty = matches!(cli.output, OutputFormat::Pretty);

    if pretty {
        term.write_line(&format!(
            "{} {}",
            style("Book Ripper").bold().cyan(),
            style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        term.write_line("").ok();
    }

    let scan_config = ScanConfig {
        follow_symlinks: cli.follow_symlinks,
        include_hidden: cli.include_hidden,
        max_depth: cli.max_depth,
        extensions: (!cli.extensions.is_empty()).then(|| cli.extensions.clone()),
    };

    let mut builder = Pipeline::builder()
        .input(&cli.input_directory)
        .output(&cli.output_directory)
        .debug(cli.debug)
        .scan_config(scan_config.clone());
    if cli.ocr {
        // Models load before anything is written; paths are checked first.
        preflight(&cli.input_directory, &cli.output_directory, &scan_config)?;
        builder = builder.recognizer(build_recognizer(cli.ocr_models.clone())?);
    }
    let pipeline = builder.build();

    let (sender, receiver) = EventChannel::new();

    let progress = if pretty {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        Some(pb)
    } else {
        None
    };

    let verbose = cli.verbose;

    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            let Some(ref pb) = progress else {
                continue;
            };
            match event {
                Event::Pipeline(PipelineEvent::PhaseChanged { phase }) => {
                    pb.set_message(format!("{}", phase));
                }
                Event::Split(SplitEvent::Started { total_images }) => {
                    pb.set_length(total_images as u64);
                }
                Event::Split(SplitEvent::SpreadProcessed {
                    path,
                    outcome,
                    completed,
                    ..
                }) => {
                    pb.set_position(completed as u64);
                    if verbose {
                        pb.println(format!(
                            "  {} {}",
                            outcome_marker(outcome),
                            path.file_name().unwrap_or_default().to_string_lossy()
                        ));
                    }
                }
                Event::Split(SplitEvent::Progress(p)) => {
                    pb.set_message(format!("{} spreads split", p.spreads_split));
                }
                Event::Assemble(AssembleEvent::Started { total_pages }) => {
                    pb.set_length(total_pages as u64);
                    pb.set_position(0);
                }
                Event::Assemble(AssembleEvent::PageAdded { page_number, .. }) => {
                    pb.set_position(page_number as u64);
                }
                Event::Pipeline(PipelineEvent::Completed { .. })
                | Event::Pipeline(PipelineEvent::Error { .. }) => {
                    pb.finish_and_clear();
                }
                _ => {}
            }
        }
    });

    let result = pipeline.run_with_events(&sender);

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();

    let result = result?;

    match cli.output {
        OutputFormat::Pretty => print_pretty_results(&term, &result, cli.verbose),
        OutputFormat::Json => print_json_results(&result),
        OutputFormat::Minimal => print_minimal_results(&result),
    }

    if let (Some(text), false) = (&result.text, matches!(cli.output, OutputFormat::Json)) {
        println!("{}", text);
    }

    Ok(())
}

#[cfg(feature = "ocr")]
fn build_recognizer(model_dir: Option<PathBuf>) -> Result<Box<dyn TextRecognizer>> {
    use book_ripper::core::ocr::{OcrConfig, OcrsRecognizer};

    let config = model_dir.map(OcrConfig::from_dir).unwrap_or_default();
    Ok(Box::new(OcrsRecognizer::new(&config)?))
}

#[cfg(not(feature = "ocr"))]
fn build_recognizer(_model_dir: Option<PathBuf>) -> Result<Box<dyn TextRecognizer>> {
    Err(BookRipError::Config(
        "this build has no OCR support; rebuild with `--features ocr`".to_string(),
    ))
}

fn outcome_marker(outcome: SpreadOutcome) -> String {
    match outcome {
        SpreadOutcome::Cover => style("cover    ").yellow().to_string(),
        SpreadOutcome::Duplicate => style("duplicate").dim().to_string(),
        SpreadOutcome::Split => style("split    ").green().to_string(),
    }
}

fn print_pretty_results(term: &Term, result: &PipelineResult, verbose: bool) {
    let split = &result.split;

    term.write_line(&format!("{} Rip Complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} images processed in {:.1}s",
        style(split.images_seen).cyan(),
        result.duration_ms as f64 / 1000.0
    ))
    .ok();

    if let Some(ref cover) = split.cover {
        term.write_line(&format!(
            "  {} cover: {}",
            style("○").dim(),
            display_path(cover)
        ))
        .ok();
    }

    term.write_line(&format!(
        "  {} spreads split into {} pages",
        style(split.spreads_split).cyan(),
        style(split.pages.len()).cyan()
    ))
    .ok();

    term.write_line(&format!(
        "  {} duplicate scans skipped",
        style(split.duplicates_skipped).cyan()
    ))
    .ok();

    if !split.debug_images.is_empty() {
        term.write_line(&format!(
            "  {} debug spreads written",
            style(split.debug_images.len()).dim()
        ))
        .ok();
    }

    match result.pdf {
        Some(ref pdf) => term
            .write_line(&format!(
                "  {} {}",
                style("PDF:").bold(),
                style(display_path(pdf)).yellow()
            ))
            .ok(),
        None => term
            .write_line(&format!(
                "  {}",
                style("No pages to merge, PDF not written").dim()
            ))
            .ok(),
    };

    if verbose {
        term.write_line("").ok();
        for page in &split.pages {
            term.write_line(&format!("    {}", display_path(page))).ok();
        }
    }

    term.write_line("").ok();
}

fn print_json_results(result: &PipelineResult) {
    let output = serde_json::json!({
        "images_seen": result.split.images_seen,
        "cover": result.split.cover,
        "cover_fingerprint": result.split.cover_fingerprint,
        "spreads_split": result.split.spreads_split,
        "duplicates_skipped": result.split.duplicates_skipped,
        "unique_fingerprints": result.split.unique_fingerprints,
        "pages": result.split.pages,
        "debug_images": result.split.debug_images,
        "pdf": result.pdf,
        "text": result.text,
        "duration_ms": result.duration_ms,
    });

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

fn print_minimal_results(result: &PipelineResult) {
    for page in &result.split.pages {
        println!("{}", page.display());
    }
}

fn display_path(path: &Path) -> String {
    dirs::home_dir()
        .and_then(|home| path.strip_prefix(home).ok().map(|rest| format!("~/{}", rest.display())))
        .unwrap_or_else(|| path.display().to_string())
}
