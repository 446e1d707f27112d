//! Quotation lifecycle core
//!
//! Pure derivations (resolver, ledger) plus the action handlers that
//! drive status transitions. All writes go through the document
//! store's version-checked put.

pub mod actions;
pub mod ledger;
pub mod resolver;

use shared::models::QuotationStatus;
use shared::types::Role;

use crate::files::FileError;
use crate::money::AmountError;
use crate::pdf::RenderError;
use crate::store::StoreError;

/// Errors from quotation lifecycle operations
#[derive(Debug, thiserror::Error)]
pub enum QuotationError {
    #[error("payment not found: {0}")]
    PaymentNotFound(String),

    #[error("resubmission not found: {0}")]
    ResubmissionNotFound(String),

    #[error("cannot {action} a quotation with status {status:?}")]
    InvalidStatus {
        action: &'static str,
        status: QuotationStatus,
    },

    #[error("role {0:?} is not allowed to perform this action")]
    Forbidden(Role),

    #[error("notes are required for this decision")]
    MissingNotes,

    #[error("a rejection reason is required")]
    MissingReason,

    #[error("a payment amount is required")]
    MissingAmount,

    #[error("the quotation has no advance percentage configured")]
    MissingAdvancePercentage,

    #[error("an advance payment already exists for this quotation")]
    AdvanceAlreadyExists,

    #[error("payment amount ({amount:.2}) exceeds remaining balance ({remaining:.2})")]
    ExceedsRemaining { amount: f64, remaining: f64 },

    #[error("there is nothing left to pay on this quotation")]
    NothingToPay,

    #[error("payment is not in a rejected state")]
    NotRejected,

    #[error("payment has already been decided")]
    AlreadyDecided,

    #[error(transparent)]
    Amount(#[from] AmountError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to render document: {0}")]
    Render(#[from] RenderError),

    #[error("failed to store file: {0}")]
    File(#[from] FileError),
}

#[cfg(test)]
pub mod test_support {
    use chrono::NaiveDate;
    use shared::models::{
        ActivityItem, ActivityKind, Payment, PaymentMode, PaymentType, Quotation, QuotationStatus,
        Resubmission, ReviewStatus, ServiceItem, ServiceSection, TestMethodOption,
    };

    /// A sent quotation with one lab item and one mobilization item:
    /// subtotal 100000, 18% VAT, grand total 118000, 60% advance.
    pub fn quotation_fixture() -> Quotation {
        Quotation {
            id: "q-1".to_string(),
            quotation_number: "QTN-2024-001".to_string(),
            revision_number: 0,
            acquisition_number: Some("ACQ-17".to_string()),
            date: NaiveDate::from_ymd_opt(2024, 3, 11).unwrap(),
            status: QuotationStatus::Sent,
            currency: "TZS".to_string(),
            vat_percentage: 18.0,
            advance_percentage: Some(60.0),
            items: vec![ServiceItem {
                key: "item-1".to_string(),
                service_id: "svc-cbr".to_string(),
                description: "CBR test".to_string(),
                section: ServiceSection::Lab,
                test_methods: vec![TestMethodOption {
                    id: "tm-1".to_string(),
                    name: "BS 1377".to_string(),
                    selected: true,
                }],
                unit: Some("sample".to_string()),
                unit_price: Some(30000.0),
                quantity: Some(2.0),
            }],
            other_items: vec![ActivityItem {
                key: "other-1".to_string(),
                kind: ActivityKind::Mobilization,
                description: "Equipment mobilization".to_string(),
                unit: Some("trip".to_string()),
                unit_price: Some(40000.0),
                quantity: Some(1.0),
            }],
            subtotal: 100000.0,
            grand_total: 118000.0,
            rejection_notes: None,
            payment_notes: Some("60% advance before mobilization".to_string()),
            revisions: vec![],
            payments: vec![],
            invoice: None,
            version: 0,
        }
    }

    pub fn payment_fixture(key: &str, amount: f64, status: ReviewStatus) -> Payment {
        Payment {
            key: key.to_string(),
            payment_type: PaymentType::Other,
            amount,
            currency: "TZS".to_string(),
            mode: PaymentMode::Bank,
            proof_file: None,
            status,
            internal_notes: None,
            decided_at: None,
            decided_by: None,
            receipt_file: None,
            resubmissions: vec![],
            submitted_at: 1_700_000_000_000,
        }
    }

    pub fn resubmission_fixture(key: &str, amount: f64, status: ReviewStatus) -> Resubmission {
        Resubmission {
            key: key.to_string(),
            amount,
            mode: PaymentMode::Bank,
            proof_file: None,
            status,
            internal_notes: None,
            decided_at: None,
            decided_by: None,
            receipt_file: None,
            submitted_at: 1_700_000_100_000,
        }
    }
}
