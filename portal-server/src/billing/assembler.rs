//! Billing document assembler
//!
//! Pure mapping from quotation content to a flat ordered list of
//! billing lines. Section order is fixed: Mobilization, Field, Lab,
//! Reporting. Empty sections render a placeholder line instead of
//! being omitted, and the VAT line appears only when the percentage
//! is positive.

use rust_decimal::Decimal;
use serde::Serialize;
use shared::models::{ActivityKind, Quotation, ServiceSection};

use crate::money::{grand_total, line_total, to_f64, vat_amount};

/// Billing section, in render order
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BillingSection {
    Mobilization,
    Field,
    Lab,
    Reporting,
}

impl BillingSection {
    /// Fixed render order
    pub const ORDER: [BillingSection; 4] = [
        BillingSection::Mobilization,
        BillingSection::Field,
        BillingSection::Lab,
        BillingSection::Reporting,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BillingSection::Mobilization => "Mobilization",
            BillingSection::Field => "Field Tests",
            BillingSection::Lab => "Laboratory Tests",
            BillingSection::Reporting => "Reporting",
        }
    }
}

/// One billable line
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BillingItem {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub unit_price: f64,
    pub quantity: f64,
    pub line_total: f64,
}

/// A line in the flat billing document
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BillingLine {
    SectionHeader { section: BillingSection },
    Item(BillingItem),
    /// Placeholder emitted for a section with no items
    EmptySection { section: BillingSection },
    SectionSubtotal { section: BillingSection, amount: f64 },
    Vat { percentage: f64, amount: f64 },
    GrandTotal { amount: f64 },
}

/// Assembled billing document, ready for rendering
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BillingDocument {
    pub currency: String,
    pub lines: Vec<BillingLine>,
    pub subtotal: f64,
    pub vat_percentage: f64,
    pub vat_amount: f64,
    pub grand_total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advance_percentage: Option<f64>,
}

/// Assemble the billing document for a quotation
pub fn assemble(quotation: &Quotation) -> BillingDocument {
    let mut lines = Vec::new();
    let mut subtotal = Decimal::ZERO;

    for section in BillingSection::ORDER {
        lines.push(BillingLine::SectionHeader { section });

        let items = section_items(quotation, section);
        if items.is_empty() {
            lines.push(BillingLine::EmptySection { section });
        }

        let mut section_total = Decimal::ZERO;
        for item in items {
            let total = line_total(Some(item.unit_price), Some(item.quantity));
            section_total += total;
            lines.push(BillingLine::Item(item));
        }

        subtotal += section_total;
        lines.push(BillingLine::SectionSubtotal {
            section,
            amount: to_f64(section_total),
        });
    }

    let vat = vat_amount(subtotal, quotation.vat_percentage);
    if quotation.vat_percentage > 0.0 {
        lines.push(BillingLine::Vat {
            percentage: quotation.vat_percentage,
            amount: to_f64(vat),
        });
    }

    let total = grand_total(subtotal, vat);
    lines.push(BillingLine::GrandTotal {
        amount: to_f64(total),
    });

    BillingDocument {
        currency: quotation.currency.clone(),
        lines,
        subtotal: to_f64(subtotal),
        vat_percentage: quotation.vat_percentage,
        vat_amount: to_f64(vat),
        grand_total: to_f64(total),
        payment_notes: quotation.payment_notes.clone(),
        advance_percentage: quotation.advance_percentage,
    }
}

/// Collect the billable items belonging to one section, in input order
fn section_items(quotation: &Quotation, section: BillingSection) -> Vec<BillingItem> {
    match section {
        BillingSection::Field | BillingSection::Lab => {
            let wanted = if section == BillingSection::Lab {
                ServiceSection::Lab
            } else {
                ServiceSection::Field
            };
            quotation
                .items
                .iter()
                .filter(|item| item.section == wanted)
                .map(|item| {
                    // Append the single selected test method to the line text
                    let description = match item.selected_method() {
                        Some(method) => format!("{} ({})", item.description, method.name),
                        None => item.description.clone(),
                    };
                    BillingItem {
                        description,
                        unit: item.unit.clone(),
                        unit_price: item.unit_price.unwrap_or(0.0),
                        quantity: item.quantity.unwrap_or(0.0),
                        line_total: to_f64(line_total(item.unit_price, item.quantity)),
                    }
                })
                .collect()
        }
        BillingSection::Mobilization | BillingSection::Reporting => {
            let wanted = if section == BillingSection::Mobilization {
                ActivityKind::Mobilization
            } else {
                ActivityKind::Reporting
            };
            quotation
                .other_items
                .iter()
                .filter(|item| item.kind == wanted)
                .map(|item| BillingItem {
                    description: item.description.clone(),
                    unit: item.unit.clone(),
                    unit_price: item.unit_price.unwrap_or(0.0),
                    quantity: item.quantity.unwrap_or(0.0),
                    line_total: to_f64(line_total(item.unit_price, item.quantity)),
                })
                .collect()
        }
    }
}
