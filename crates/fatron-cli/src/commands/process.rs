//! Process command - extract data from a single invoice PDF.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use fatron_core::InvoicePipeline;

use super::output::{format_invoice, write_xlsx, OutputFormat};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input invoice PDF
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Also write the aggregator table as an XLSX workbook
    #[arg(long)]
    xlsx: Option<PathBuf>,

    /// Show extraction counters
    #[arg(long)]
    show_stats: bool,
}

pub async fn run(args: ProcessArgs) -> anyhow::Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let data = fs::read(&args.input)?;
    let invoice = InvoicePipeline::new().process(&data)?;

    for warning in &invoice.warnings {
        eprintln!("{} {}", style("!").yellow(), warning);
    }

    let output = format_invoice(&invoice, args.format)?;
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if let Some(xlsx_path) = &args.xlsx {
        write_xlsx(&invoice, xlsx_path)?;
        println!(
            "{} Aggregator sheet written to {}",
            style("✓").green(),
            xlsx_path.display()
        );
    }

    if args.show_stats {
        println!();
        println!(
            "{} {} lines scanned, {} items matched, {} subtotals matched ({} ms)",
            style("ℹ").blue(),
            invoice.stats.lines_scanned,
            invoice.stats.items_matched,
            invoice.stats.subtotals_matched,
            invoice.processing_time_ms
        );
    }

    Ok(())
}
