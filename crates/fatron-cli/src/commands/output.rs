//! Output formatting shared by the process and batch commands.

use std::path::Path;

use console::style;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::Workbook;

use fatron_core::{ProcessedInvoice, Table, ToTable, AGGREGATOR_SHEET_NAME};

/// Output format for extraction results.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON document with all five result structures
    Json,
    /// CSV of the aggregator table
    Csv,
    /// Plain text tables
    Text,
}

/// Format a processed invoice for the selected output.
pub fn format_invoice(invoice: &ProcessedInvoice, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(invoice)?),
        OutputFormat::Csv => {
            let table = invoice.buckets.as_slice().to_table();
            let mut writer = csv::Writer::from_writer(Vec::new());
            writer.write_record(&table.columns)?;
            for row in &table.rows {
                writer.write_record(row)?;
            }
            Ok(String::from_utf8(writer.into_inner()?)?)
        }
        OutputFormat::Text => {
            let tables = [
                invoice.client.to_table(),
                invoice.metadata.to_table(),
                invoice.items.as_slice().to_table(),
                invoice.subtotals.as_slice().to_table(),
                invoice.buckets.as_slice().to_table(),
            ];
            let mut out = String::new();
            for table in &tables {
                if !out.is_empty() {
                    out.push('\n');
                }
                out.push_str(&render_table(table));
            }
            Ok(out)
        }
    }
}

/// Render a rectangular table as fixed-width text.
pub fn render_table(table: &Table) -> String {
    let mut widths: Vec<usize> = table.columns.iter().map(|c| c.chars().count()).collect();
    for row in &table.rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = format!("{}\n", style(&table.title).bold());
    let header: Vec<String> = table
        .columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| format!("{:<width$}", c, width = w))
        .collect();
    out.push_str(&header.join("  "));
    out.push('\n');
    out.push_str(&"-".repeat(widths.iter().sum::<usize>() + 2 * (widths.len() - 1)));
    out.push('\n');

    for row in &table.rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = w))
            .collect();
        out.push_str(&cells.join("  "));
        out.push('\n');
    }
    out
}

/// Write the aggregator table as a single-sheet XLSX workbook.
pub fn write_xlsx(invoice: &ProcessedInvoice, path: &Path) -> anyhow::Result<()> {
    let table = invoice.buckets.as_slice().to_table();

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(AGGREGATOR_SHEET_NAME)?;

    for (col, name) in table.columns.iter().enumerate() {
        worksheet.write_string(0, col as u16, name)?;
    }
    for (i, bucket) in invoice.buckets.iter().enumerate() {
        let row = (i + 1) as u32;
        worksheet.write_string(row, 0, &bucket.description)?;
        worksheet.write_string(row, 1, &bucket.code)?;
        worksheet.write_number(row, 2, bucket.total.to_f64().unwrap_or(0.0))?;
    }

    workbook.save(path)?;
    Ok(())
}
