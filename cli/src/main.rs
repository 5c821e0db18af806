//! pdfoutline CLI - PDF title and heading outline extraction

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfoutline::batch::{list_pdfs, process_directory_with};
use pdfoutline::render::{to_json, write_json, JsonFormat};
use pdfoutline::{
    BatchOptions, BatchReport, FileResult, OutlineBuilder, OutlineConfig, ParseOptions, PdfOutline,
};

const DEFAULT_INPUT_DIR: &str = "app/input";
const DEFAULT_OUTPUT_DIR: &str = "app/output";

#[derive(Parser)]
#[command(name = "pdfoutline")]
#[command(version)]
#[command(about = "Extract PDF titles and heading outlines to JSON", long_about = None)]
struct Cli {
    /// Directory of input PDFs
    #[arg(value_name = "INPUT_DIR")]
    input: Option<PathBuf>,

    /// Directory for JSON outlines
    #[arg(value_name = "OUTPUT_DIR")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract outlines for every PDF in a directory
    Batch {
        /// Directory of input PDFs
        #[arg(value_name = "INPUT_DIR")]
        input: PathBuf,

        /// Directory for JSON outlines
        #[arg(value_name = "OUTPUT_DIR")]
        output: PathBuf,

        /// Classifier rules as JSON
        #[arg(long, value_name = "FILE", env = "PDFOUTLINE_CONFIG")]
        config: Option<PathBuf>,

        /// Skip unreadable pages instead of failing the file
        #[arg(long)]
        lenient: bool,
    },

    /// Extract the outline of a single PDF
    File {
        /// Input PDF file
        #[arg(value_name = "PDF")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Classifier rules as JSON
        #[arg(long, value_name = "FILE", env = "PDFOUTLINE_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Show every line with its measurements and classification
    Lines {
        /// Input PDF file
        #[arg(value_name = "PDF")]
        input: PathBuf,

        /// Print the lines as JSON
        #[arg(long)]
        json: bool,

        /// Classifier rules as JSON
        #[arg(long, value_name = "FILE", env = "PDFOUTLINE_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Batch {
            input,
            output,
            config,
            lenient,
        }) => cmd_batch(&input, &output, config.as_deref(), lenient),
        Some(Commands::File {
            input,
            output,
            compact,
            config,
        }) => cmd_file(&input, output.as_deref(), compact, config.as_deref()),
        Some(Commands::Lines {
            input,
            json,
            config,
        }) => cmd_lines(&input, json, config.as_deref()),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            let input = cli.input.unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_DIR));
            let output = cli
                .output
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
            cmd_batch(&input, &output, None, false)
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<OutlineConfig, Box<dyn std::error::Error>> {
    match path {
        Some(p) => Ok(OutlineConfig::from_json_file(p)?),
        None => Ok(OutlineConfig::default()),
    }
}

fn cmd_batch(
    input: &Path,
    output: &Path,
    config: Option<&Path>,
    lenient: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = BatchOptions::new().with_config(load_config(config)?);
    if lenient {
        options = options.lenient();
    }

    let report = run_batch(input, output, &options)?;

    if report.is_empty() {
        println!("{} {}", "No PDF files found in".yellow(), input.display());
        return Ok(());
    }

    println!();
    for outcome in &report.outcomes {
        let name = outcome
            .input
            .file_name()
            .unwrap_or_default()
            .to_string_lossy();
        match &outcome.result {
            FileResult::Written {
                output,
                title,
                headings,
            } => println!(
                "  {} {} -> {} ({} headings{})",
                "✓".green(),
                name,
                output.display(),
                headings,
                if title.is_empty() {
                    String::new()
                } else {
                    format!(", title \"{}\"", title)
                }
            ),
            FileResult::Failed { reason } => {
                println!("  {} {}: {}", "✗".red(), name, reason.dimmed())
            }
        }
    }

    println!(
        "\n{} {} written, {} failed",
        "Done!".green().bold(),
        report.succeeded(),
        report.failed()
    );

    Ok(())
}

/// Process a directory with a progress bar, one tick per file.
fn run_batch(
    input: &Path,
    output: &Path,
    options: &BatchOptions,
) -> Result<BatchReport, Box<dyn std::error::Error>> {
    let total = list_pdfs(input)?.len();
    log::debug!("Found {} PDF files in {}", total, input.display());

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let report = process_directory_with(input, output, options, |outcome| {
        pb.set_message(
            outcome
                .input
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .into_owned(),
        );
        pb.inc(1);
    })?;
    pb.finish_and_clear();

    Ok(report)
}

fn cmd_file(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
    config: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let outline = PdfOutline::new()
        .with_config(load_config(config)?)
        .extract(input)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    if let Some(path) = output {
        fs::write(path, to_json(&outline, format)?)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        let mut stdout = io::stdout().lock();
        write_json(&outline, format, &mut stdout)?;
        writeln!(stdout)?;
    }

    Ok(())
}

fn cmd_lines(
    input: &Path,
    json: bool,
    config: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config)?;
    let elements = PdfOutline::new()
        .with_config(config.clone())
        .with_parse_options(ParseOptions::new().lenient())
        .elements(input)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&elements)?);
        return Ok(());
    }

    let builder = OutlineBuilder::with_config(&config)?;
    let classifier = builder.heading_classifier();

    println!("{}", "Lines".cyan().bold());
    println!("{}", "─".repeat(72).dimmed());
    for element in &elements {
        let level = classifier
            .classify(&element.text, &element.font)
            .map(|l| l.as_str().green().bold().to_string())
            .unwrap_or_else(|| "--".dimmed().to_string());
        println!(
            "{:>3} {:>6.2} {} {} {} {}",
            element.page,
            element.font.size,
            if element.font.is_bold { "B" } else { "." },
            if element.is_centered { "C" } else { "." },
            level,
            element.text
        );
    }
    println!("{}", "─".repeat(72).dimmed());
    println!(
        "{}: {}",
        "Title".bold(),
        builder.build_from_elements(&elements).title
    );

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfoutline".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF title and heading outline extraction tool");
    println!();
    println!("License: MIT");
}
