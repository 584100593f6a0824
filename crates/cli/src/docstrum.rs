//! docstrum - Segment a page's words into text lines and blocks
//!
//! Reads one or more JSON pages of positioned words and writes the
//! resulting blocks as plain text or JSON.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use docstrum_core::layout::{AngleBounds, DocstrumParams, Parallelism, TextBlock, Word, get_blocks};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Output type for the segmented page.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputType {
    /// Plain text, blocks separated by a blank line (default)
    #[default]
    Text,
    /// JSON object per input file, one per line
    Json,
}

/// Segment the words of a page into text lines and text blocks.
#[derive(Parser, Debug)]
#[command(name = "docstrum")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// One or more JSON pages of words
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    // === Segmentation options ===
    /// Within-line angle bounds in degrees, as "LO,HI"
    #[arg(long = "within-line", value_parser = parse_angle_bounds, allow_hyphen_values = true)]
    within_line: Option<AngleBounds>,

    /// Between-line angle bounds in degrees, as "LO,HI"
    #[arg(long = "between-line", value_parser = parse_angle_bounds, allow_hyphen_values = true)]
    between_line: Option<AngleBounds>,

    /// Scale applied to the estimated line spacing to bound block membership
    #[arg(long = "between-line-multiplier", default_value = "1.3")]
    between_line_multiplier: f64,

    /// Bound on worker threads (0 = no bound; default: available cores)
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    // === Output options ===
    /// Path to file where output is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,

    /// Type of output to generate
    #[arg(short = 't', long = "output-type", value_enum, default_value = "text")]
    output_type: OutputType,
}

/// Input document: the words of one page.
#[derive(Debug, Deserialize)]
struct PageInput {
    words: Vec<Word>,
}

#[derive(Debug, Serialize)]
struct PageOutput<'a> {
    blocks: &'a [TextBlock],
}

/// Parse "LO,HI" into angle bounds.
fn parse_angle_bounds(s: &str) -> std::result::Result<AngleBounds, String> {
    let (lo, hi) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LO,HI, got {s:?}"))?;
    let lo: f64 = lo
        .trim()
        .parse()
        .map_err(|_| format!("invalid float value: {}", lo.trim()))?;
    let hi: f64 = hi
        .trim()
        .parse()
        .map_err(|_| format!("invalid float value: {}", hi.trim()))?;
    AngleBounds::new(lo, hi).map_err(|e| e.to_string())
}

/// Build DocstrumParams from command line arguments.
fn build_params(args: &Args) -> Result<DocstrumParams> {
    let defaults = DocstrumParams::default();
    let parallelism = args
        .threads
        .map_or(Parallelism::Available, Parallelism::from_thread_count);
    let params = DocstrumParams::new(
        args.within_line.unwrap_or(defaults.within_line_bounds),
        args.between_line.unwrap_or(defaults.between_line_bounds),
        args.between_line_multiplier,
        parallelism,
    )?;
    Ok(params)
}

fn read_page(path: &Path) -> Result<Vec<Word>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let page: PageInput = serde_json::from_str(&data)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(page.words)
}

/// Blocks as text: lines joined by newlines, blocks by a blank line.
fn render_text(blocks: &[TextBlock]) -> String {
    blocks
        .iter()
        .map(TextBlock::text)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn write_blocks<W: Write>(out: &mut W, blocks: &[TextBlock], output_type: OutputType) -> Result<()> {
    match output_type {
        OutputType::Text => {
            let text = render_text(blocks);
            if !text.is_empty() {
                writeln!(out, "{text}")?;
            }
            // Page break between input files
            writeln!(out)?;
        }
        OutputType::Json => {
            serde_json::to_writer(&mut *out, &PageOutput { blocks })?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn process_file<W: Write>(
    path: &Path,
    out: &mut W,
    params: &DocstrumParams,
    output_type: OutputType,
) -> Result<()> {
    let words = read_page(path)?;
    debug!(file = %path.display(), words = words.len(), "read page");
    let blocks = get_blocks(&words, params)
        .with_context(|| format!("failed to segment {}", path.display()))?;
    info!(file = %path.display(), blocks = blocks.len(), "segmented page");
    write_blocks(out, &blocks, output_type)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let params = build_params(&args)?;

    // Open output file or use stdout
    let mut output: Box<dyn Write> = if args.outfile == "-" {
        Box::new(BufWriter::new(io::stdout()))
    } else {
        let file = File::create(&args.outfile)
            .with_context(|| format!("failed to create output file {}", args.outfile))?;
        Box::new(BufWriter::new(file))
    };

    for path in &args.files {
        process_file(path, &mut output, &params, args.output_type)?;
    }

    output.flush()?;
    Ok(())
}
