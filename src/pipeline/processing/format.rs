use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::common::constants::{DEFAULT_LABOR_COST, DEFAULT_LABOR_RATE, DEFAULT_MARKUP};
use crate::domain::PartRecord;

/// The three fixed downstream schemas consumed by the field-service tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum TemplateKind {
    /// Part + labor bundle: product, part, and labor lines in one row.
    Bundle,
    /// Part-only row, no labor fields.
    SinglePart,
    /// Minimal supplier catalog row.
    SupplierLoader,
}

/// Run-level pricing configuration. The 1.5x markup and the labor figures
/// are business defaults the caller may override, not derived values.
#[derive(Debug, Clone)]
pub struct PricingConfig {
    pub supplier_name: String,
    pub markup: f64,
    pub labor_rate: f64,
    pub labor_cost: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            supplier_name: String::new(),
            markup: DEFAULT_MARKUP,
            labor_rate: DEFAULT_LABOR_RATE,
            labor_cost: DEFAULT_LABOR_COST,
        }
    }
}

/// Part + Labor Bundle row: sell price folds the labor estimate into the
/// product line while the part and labor lines stay itemized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleRow {
    #[serde(rename = "Folder 1")]
    pub folder_1: String,
    #[serde(rename = "Folder 2")]
    pub folder_2: String,
    #[serde(rename = "Folder 3")]
    pub folder_3: String,
    #[serde(rename = "Item Name")]
    pub item_name: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Part Number")]
    pub part_number: String,
    #[serde(rename = "Manufacturer")]
    pub manufacturer: String,
    #[serde(rename = "Supplier")]
    pub supplier: String,
    #[serde(rename = "Part Cost")]
    pub part_cost: f64,
    #[serde(rename = "Part Price")]
    pub part_price: f64,
    #[serde(rename = "Labor Hours")]
    pub labor_hours: f64,
    #[serde(rename = "Labor Cost")]
    pub labor_cost: f64,
    #[serde(rename = "Standard Price")]
    pub standard_price: f64,
}

/// Single Part row: product + part only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SinglePartRow {
    #[serde(rename = "Folder 1")]
    pub folder_1: String,
    #[serde(rename = "Folder 2")]
    pub folder_2: String,
    #[serde(rename = "Folder 3")]
    pub folder_3: String,
    #[serde(rename = "Item Name")]
    pub item_name: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Part Number")]
    pub part_number: String,
    #[serde(rename = "Manufacturer")]
    pub manufacturer: String,
    #[serde(rename = "Supplier")]
    pub supplier: String,
    #[serde(rename = "Part Cost")]
    pub part_cost: f64,
    #[serde(rename = "Part Price")]
    pub part_price: f64,
}

/// Supplier Loader row: minimal catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierLoaderRow {
    #[serde(rename = "Supplier")]
    pub supplier: String,
    #[serde(rename = "Part Number")]
    pub part_number: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Cost")]
    pub cost: f64,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Manufacturer")]
    pub manufacturer: String,
}

/// One formatted output row. Rows have no identity of their own; they are
/// deterministic projections of a part record plus pricing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutputRow {
    Bundle(BundleRow),
    SinglePart(SinglePartRow),
    SupplierLoader(SupplierLoaderRow),
}

/// Pure projection of accepted part records into the selected template.
/// Records missing fields format with empty defaults; formatting never fails.
pub struct TemplateFormatter;

impl TemplateFormatter {
    pub fn format(record: &PartRecord, template: TemplateKind, pricing: &PricingConfig) -> OutputRow {
        match template {
            TemplateKind::Bundle => OutputRow::Bundle(BundleRow {
                folder_1: record.folder_1.clone(),
                folder_2: record.folder_2.clone(),
                folder_3: record.folder_3.clone(),
                item_name: record.standard_name.clone(),
                description: record.description.clone(),
                part_number: record.part_number.clone(),
                manufacturer: record.manufacturer.clone(),
                supplier: pricing.supplier_name.clone(),
                part_cost: round_cents(record.cost),
                part_price: round_cents(record.cost * pricing.markup),
                labor_hours: record.labor_hours,
                labor_cost: round_cents(record.labor_hours * pricing.labor_cost),
                standard_price: round_cents(
                    record.cost * pricing.markup + record.labor_hours * pricing.labor_rate,
                ),
            }),
            TemplateKind::SinglePart => OutputRow::SinglePart(SinglePartRow {
                folder_1: record.folder_1.clone(),
                folder_2: record.folder_2.clone(),
                folder_3: record.folder_3.clone(),
                item_name: record.standard_name.clone(),
                description: record.description.clone(),
                part_number: record.part_number.clone(),
                manufacturer: record.manufacturer.clone(),
                supplier: pricing.supplier_name.clone(),
                part_cost: round_cents(record.cost),
                part_price: round_cents(record.cost * pricing.markup),
            }),
            TemplateKind::SupplierLoader => OutputRow::SupplierLoader(SupplierLoaderRow {
                supplier: pricing.supplier_name.clone(),
                part_number: record.part_number.clone(),
                description: record.description.clone(),
                cost: round_cents(record.cost),
                category: record.folder_2.clone(),
                manufacturer: record.manufacturer.clone(),
            }),
        }
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
