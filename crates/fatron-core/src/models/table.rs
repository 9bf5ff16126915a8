//! Rectangular table rendering of result structures.
//!
//! Every result structure of a pipeline run can be rendered as an ordered
//! set of column names plus rows of scalar string cells, so display and
//! export sinks never need to know the underlying types.

use super::invoice::{
    AggregatedBucket, ClientInfo, DeclaredSubtotal, InvoiceMetadata, LineItem, TemplateVariant,
};
use crate::invoice::rules::amounts::format_eur_amount;
use rust_decimal::Decimal;

/// Fixed sheet name for the aggregator spreadsheet export.
pub const AGGREGATOR_SHEET_NAME: &str = "Agregadores TRON";

/// A rectangular table: ordered column names and rows of scalar cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Table title.
    pub title: String,
    /// Ordered column names.
    pub columns: Vec<String>,
    /// Rows of cells; every row has exactly `columns.len()` cells.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(title: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            title: title.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }
}

/// Conversion into a rectangular table.
pub trait ToTable {
    fn to_table(&self) -> Table;
}

fn cell(value: &Option<Decimal>) -> String {
    value.map(format_eur_amount).unwrap_or_default()
}

impl ToTable for ClientInfo {
    fn to_table(&self) -> Table {
        let mut table = Table::new("Cliente", &["Nome", "NIF"]);
        table.rows.push(vec![self.name.clone(), self.tax_id.clone()]);
        table
    }
}

impl ToTable for InvoiceMetadata {
    fn to_table(&self) -> Table {
        let mut table = Table::new(
            "Fatura",
            &["Apólice", "Nº Fatura", "Data", "Sinistro/Processo", "Modelo"],
        );
        table.rows.push(vec![
            self.policy_number.clone(),
            self.invoice_number.clone(),
            self.issue_date
                .map(|d| d.format("%d/%m/%Y").to_string())
                .unwrap_or_default(),
            self.claim_number.clone(),
            match self.variant {
                TemplateVariant::Old => "antigo".to_string(),
                TemplateVariant::New => "novo".to_string(),
            },
        ]);
        table
    }
}

impl ToTable for [LineItem] {
    fn to_table(&self) -> Table {
        let mut table = Table::new(
            "Linhas",
            &[
                "Data",
                "Código",
                "Descrição",
                "Qtd",
                "Val.Unitário",
                "Val.Total(s/IVA)",
                "Desconto",
                "IVA",
                "Val.Total(c/IVA)",
            ],
        );
        for item in self {
            table.rows.push(vec![
                item.date.format("%d/%m/%Y").to_string(),
                item.code.clone(),
                item.description.clone(),
                cell(&item.quantity),
                cell(&item.unit_value),
                cell(&item.total_before_tax),
                cell(&item.discount),
                cell(&item.tax),
                cell(&item.total_after_tax),
            ]);
        }
        table
    }
}

impl ToTable for [DeclaredSubtotal] {
    fn to_table(&self) -> Table {
        let mut table = Table::new("Subtotais declarados", &["Secção", "Qtd", "Total (€)"]);
        for sub in self {
            table.rows.push(vec![
                sub.section.clone(),
                cell(&sub.declared_quantity),
                format_eur_amount(sub.declared_total),
            ]);
        }
        table
    }
}

impl ToTable for [AggregatedBucket] {
    fn to_table(&self) -> Table {
        let mut table = Table::new(
            AGGREGATOR_SHEET_NAME,
            &["Descrição TRON", "Código TRON", "Total declarado (€)"],
        );
        for bucket in self {
            table.rows.push(vec![
                bucket.description.clone(),
                bucket.code.clone(),
                format_eur_amount(bucket.total),
            ]);
        }
        table
    }
}
