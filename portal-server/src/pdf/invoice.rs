//! Invoice document builder

use shared::models::Quotation;

use super::{format_amount, PdfDocument, PdfNode};
use crate::billing::{BillingDocument, BillingLine};

/// Build the invoice document tree from an assembled billing document
pub fn invoice_document(
    quotation: &Quotation,
    billing: &BillingDocument,
    invoice_number: &str,
) -> PdfDocument {
    let mut nodes = Vec::new();

    let mut header = vec![
        ("Invoice No".to_string(), invoice_number.to_string()),
        (
            "Quotation No".to_string(),
            quotation.quotation_number.clone(),
        ),
        ("Date".to_string(), quotation.date.to_string()),
        ("Currency".to_string(), billing.currency.clone()),
    ];
    if let Some(acquisition) = &quotation.acquisition_number {
        header.push(("Acquisition No".to_string(), acquisition.clone()));
    }
    nodes.push(PdfNode::KeyValues { pairs: header });
    nodes.push(PdfNode::Spacer);

    let columns = vec![
        "Description".to_string(),
        "Unit".to_string(),
        "Unit Price".to_string(),
        "Qty".to_string(),
        "Total".to_string(),
    ];

    let mut rows: Vec<Vec<String>> = Vec::new();
    for line in &billing.lines {
        match line {
            BillingLine::SectionHeader { section } => {
                if !rows.is_empty() {
                    nodes.push(PdfNode::Table {
                        columns: columns.clone(),
                        rows: std::mem::take(&mut rows),
                    });
                }
                nodes.push(PdfNode::Heading {
                    text: section.label().to_string(),
                });
            }
            BillingLine::Item(item) => {
                rows.push(vec![
                    item.description.clone(),
                    item.unit.clone().unwrap_or_default(),
                    format_amount(item.unit_price),
                    format!("{}", item.quantity),
                    format_amount(item.line_total),
                ]);
            }
            BillingLine::EmptySection { .. } => {
                rows.push(vec![
                    "No items".to_string(),
                    String::new(),
                    String::new(),
                    String::new(),
                    String::new(),
                ]);
            }
            BillingLine::SectionSubtotal { amount, .. } => {
                rows.push(vec![
                    "Subtotal".to_string(),
                    String::new(),
                    String::new(),
                    String::new(),
                    format_amount(*amount),
                ]);
            }
            BillingLine::Vat { .. } | BillingLine::GrandTotal { .. } => {}
        }
    }
    if !rows.is_empty() {
        nodes.push(PdfNode::Table {
            columns,
            rows,
        });
    }

    nodes.push(PdfNode::Spacer);
    let mut totals = vec![(
        "Subtotal".to_string(),
        format_amount(billing.subtotal),
    )];
    if billing.vat_percentage > 0.0 {
        totals.push((
            format!("VAT ({}%)", billing.vat_percentage),
            format_amount(billing.vat_amount),
        ));
    }
    totals.push((
        "Grand Total".to_string(),
        format_amount(billing.grand_total),
    ));
    nodes.push(PdfNode::KeyValues { pairs: totals });

    if let Some(pct) = billing.advance_percentage {
        nodes.push(PdfNode::Paragraph {
            text: format!("Advance payment required: {}% of the grand total", pct),
        });
    }
    if let Some(notes) = &billing.payment_notes {
        nodes.push(PdfNode::Paragraph {
            text: notes.clone(),
        });
    }

    PdfDocument {
        title: format!("Invoice {}", invoice_number),
        nodes,
    }
}
