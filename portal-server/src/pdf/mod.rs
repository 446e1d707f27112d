//! PDF document assembly
//!
//! Billing output is turned into a tree of typed drawing primitives
//! and handed to a [`PdfRenderer`], which is treated as a black box
//! that returns bytes. [`PlainTextRenderer`] is the reference
//! implementation used at runtime and in tests.

mod invoice;
mod receipt;

pub use invoice::invoice_document;
pub use receipt::receipt_document;

use serde::Serialize;

/// A drawing primitive in the document tree
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum PdfNode {
    Heading { text: String },
    Paragraph { text: String },
    /// Label/value pairs rendered as a two-column block
    KeyValues { pairs: Vec<(String, String)> },
    Table {
        columns: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    Spacer,
}

/// A complete document tree
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PdfDocument {
    pub title: String,
    pub nodes: Vec<PdfNode>,
}

/// Rendering failure reported by the engine
#[derive(Debug, thiserror::Error)]
#[error("render failed: {0}")]
pub struct RenderError(pub String);

/// Black-box rendering engine: accepts a tree of typed drawing
/// primitives, returns bytes
pub trait PdfRenderer: Send + Sync {
    fn render(&self, doc: &PdfDocument) -> Result<Vec<u8>, RenderError>;
}

/// Reference renderer that flattens the tree to plain text
///
/// Stands in for the real engine; the document assembly and the
/// upload/reference flow do not depend on the output format.
#[derive(Debug, Clone, Default)]
pub struct PlainTextRenderer;

impl PdfRenderer for PlainTextRenderer {
    fn render(&self, doc: &PdfDocument) -> Result<Vec<u8>, RenderError> {
        let mut out = String::new();
        out.push_str(&doc.title);
        out.push('\n');
        for node in &doc.nodes {
            match node {
                PdfNode::Heading { text } => {
                    out.push_str("\n== ");
                    out.push_str(text);
                    out.push_str(" ==\n");
                }
                PdfNode::Paragraph { text } => {
                    out.push_str(text);
                    out.push('\n');
                }
                PdfNode::KeyValues { pairs } => {
                    for (label, value) in pairs {
                        out.push_str(&format!("{}: {}\n", label, value));
                    }
                }
                PdfNode::Table { columns, rows } => {
                    out.push_str(&columns.join(" | "));
                    out.push('\n');
                    for row in rows {
                        out.push_str(&row.join(" | "));
                        out.push('\n');
                    }
                }
                PdfNode::Spacer => out.push('\n'),
            }
        }
        Ok(out.into_bytes())
    }
}

/// Format a monetary amount with thousands separators for display
pub(crate) fn format_amount(amount: f64) -> String {
    let negative = amount < 0.0;
    let rounded = format!("{:.2}", amount.abs());
    let (whole, frac) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));

    let mut grouped = String::new();
    for (i, c) in whole.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let whole: String = grouped.chars().rev().collect();

    if negative {
        format!("-{}.{}", whole, frac)
    } else {
        format!("{}.{}", whole, frac)
    }
}
