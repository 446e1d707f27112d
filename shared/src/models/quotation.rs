//! Quotation model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{FileRef, Payment};
use crate::types::Timestamp;

/// Quotation lifecycle status
///
/// Wire strings are the user-facing vocabulary and must not change:
/// `draft | sent | accepted | rejected | revisions_requested |
/// invoiced | partially_paid | fully_paid`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuotationStatus {
    #[default]
    Draft,
    Sent,
    Accepted,
    Rejected,
    RevisionsRequested,
    Invoiced,
    PartiallyPaid,
    FullyPaid,
}

impl QuotationStatus {
    /// Payments may only be recorded once an invoice exists and the
    /// balance is still open
    pub fn accepts_payments(self) -> bool {
        matches!(self, QuotationStatus::Invoiced | QuotationStatus::PartiallyPaid)
    }
}

/// Billing section a service line belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ServiceSection {
    Lab,
    Field,
}

/// Kind of non-service activity line
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Mobilization,
    Reporting,
}

/// A test method offered for a service line, at most one of which is
/// marked selected
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TestMethodOption {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub selected: bool,
}

/// A lab or field test service line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceItem {
    /// Element key for targeted updates
    pub key: String,
    pub service_id: String,
    pub description: String,
    pub section: ServiceSection,
    #[serde(default)]
    pub test_methods: Vec<TestMethodOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
}

impl ServiceItem {
    /// The single test method marked selected, if any
    pub fn selected_method(&self) -> Option<&TestMethodOption> {
        self.test_methods.iter().find(|m| m.selected)
    }
}

/// A mobilization or reporting activity line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityItem {
    /// Element key for targeted updates
    pub key: String,
    pub kind: ActivityKind,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
}

/// Any money-bearing line item
///
/// Missing unit price or quantity contributes zero to totals.
pub trait PricedLine {
    fn unit_price(&self) -> Option<f64>;
    fn quantity(&self) -> Option<f64>;
}

impl PricedLine for ServiceItem {
    fn unit_price(&self) -> Option<f64> {
        self.unit_price
    }
    fn quantity(&self) -> Option<f64> {
        self.quantity
    }
}

impl PricedLine for ActivityItem {
    fn unit_price(&self) -> Option<f64> {
        self.unit_price
    }
    fn quantity(&self) -> Option<f64> {
        self.quantity
    }
}

/// Invoice generated when a quotation is accepted
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvoiceRecord {
    pub number: String,
    pub file: FileRef,
    pub issued_at: Timestamp,
}

/// Quotation document
///
/// Revisions are full quotation documents embedded newest-first; the
/// effective quotation is `revisions[0]` when any exist, else the
/// parent itself. `version` is the optimistic-concurrency tag
/// checked by the document store on every write.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quotation {
    pub id: String,
    pub quotation_number: String,
    #[serde(default)]
    pub revision_number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acquisition_number: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub status: QuotationStatus,
    pub currency: String,
    #[serde(default)]
    pub vat_percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advance_percentage: Option<f64>,
    #[serde(default)]
    pub items: Vec<ServiceItem>,
    #[serde(default)]
    pub other_items: Vec<ActivityItem>,
    #[serde(default)]
    pub subtotal: f64,
    #[serde(default)]
    pub grand_total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_notes: Option<String>,
    /// Newest-first
    #[serde(default)]
    pub revisions: Vec<Quotation>,
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice: Option<InvoiceRecord>,
    #[serde(default)]
    pub version: u64,
}

impl Quotation {
    /// Find a payment by its element key
    pub fn find_payment_mut(&mut self, key: &str) -> Option<&mut Payment> {
        self.payments.iter_mut().find(|p| p.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_vocabulary_is_verbatim() {
        let cases = [
            (QuotationStatus::Draft, "\"draft\""),
            (QuotationStatus::Sent, "\"sent\""),
            (QuotationStatus::Accepted, "\"accepted\""),
            (QuotationStatus::Rejected, "\"rejected\""),
            (QuotationStatus::RevisionsRequested, "\"revisions_requested\""),
            (QuotationStatus::Invoiced, "\"invoiced\""),
            (QuotationStatus::PartiallyPaid, "\"partially_paid\""),
            (QuotationStatus::FullyPaid, "\"fully_paid\""),
        ];
        for (status, wire) in cases {
            assert_eq!(serde_json::to_string(&status).unwrap(), wire);
        }
    }

    #[test]
    fn test_selected_method_picks_the_marked_one() {
        let item = ServiceItem {
            key: "k1".to_string(),
            service_id: "svc-1".to_string(),
            description: "Soil compaction".to_string(),
            section: ServiceSection::Lab,
            test_methods: vec![
                TestMethodOption {
                    id: "tm-1".to_string(),
                    name: "ASTM D698".to_string(),
                    selected: false,
                },
                TestMethodOption {
                    id: "tm-2".to_string(),
                    name: "ASTM D1557".to_string(),
                    selected: true,
                },
            ],
            unit: None,
            unit_price: Some(25000.0),
            quantity: Some(3.0),
        };
        assert_eq!(item.selected_method().unwrap().id, "tm-2");
    }
}
