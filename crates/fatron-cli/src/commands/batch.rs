//! Batch processing command for multiple invoice PDFs.
//!
//! Each document is an independent pipeline run; a failure in one never
//! affects the others.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error};

use fatron_core::{InvoicePipeline, ProcessedInvoice};

use super::output::{format_invoice, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV of bucket totals per file
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct BatchEntry {
    path: PathBuf,
    invoice: Option<ProcessedInvoice>,
    error: Option<String>,
}

pub async fn run(args: BatchArgs) -> anyhow::Result<()> {
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let pipeline = InvoicePipeline::new();
    let mut entries = Vec::with_capacity(files.len());

    for path in files {
        let entry = match process_single_file(&path, &pipeline, &args) {
            Ok(invoice) => BatchEntry {
                path,
                invoice: Some(invoice),
                error: None,
            },
            Err(e) => {
                error!("Failed to process {}: {}", path.display(), e);
                if !args.continue_on_error {
                    pb.finish_and_clear();
                    return Err(e);
                }
                BatchEntry {
                    path,
                    invoice: None,
                    error: Some(e.to_string()),
                }
            }
        };
        entries.push(entry);
        pb.inc(1);
    }

    pb.finish_and_clear();

    let succeeded = entries.iter().filter(|e| e.invoice.is_some()).count();
    let failed = entries.len() - succeeded;
    println!(
        "{} Processed {} files: {} ok, {} failed",
        style("✓").green(),
        entries.len(),
        succeeded,
        failed
    );
    for entry in entries.iter().filter(|e| e.error.is_some()) {
        eprintln!(
            "  {} {}: {}",
            style("✗").red(),
            entry.path.display(),
            entry.error.as_deref().unwrap_or_default()
        );
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("summary.csv");
        write_summary(&entries, &summary_path)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    Ok(())
}

fn process_single_file(
    path: &PathBuf,
    pipeline: &InvoicePipeline,
    args: &BatchArgs,
) -> anyhow::Result<ProcessedInvoice> {
    debug!("Processing {}", path.display());

    let data = fs::read(path)?;
    let invoice = pipeline.process(&data)?;

    if let Some(ref output_dir) = args.output_dir {
        let extension = match args.format {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        };
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("invoice");
        let out_path = output_dir.join(format!("{}.{}", stem, extension));
        fs::write(&out_path, format_invoice(&invoice, args.format)?)?;
    }

    Ok(invoice)
}

/// One summary row per aggregator bucket per successfully processed file.
fn write_summary(entries: &[BatchEntry], path: &PathBuf) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "Ficheiro",
        "Descrição TRON",
        "Código TRON",
        "Total declarado (€)",
    ])?;

    for entry in entries {
        let Some(invoice) = &entry.invoice else {
            continue;
        };
        for bucket in &invoice.buckets {
            writer.write_record([
                entry.path.display().to_string(),
                bucket.description.clone(),
                bucket.code.clone(),
                bucket.total.to_string(),
            ])?;
        }
    }

    writer.flush()?;
    Ok(())
}
