//! Payment and resubmission models

use serde::{Deserialize, Serialize};

use super::FileRef;
use crate::types::Timestamp;

/// Payment type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    /// Advance payment (at most one per quotation)
    Advance,
    /// Full settlement of the remaining balance
    Full,
    /// Any other partial amount
    Other,
}

/// Stored payment mode
///
/// The payment form submits `mobile_money | bank_transfer | cash`,
/// which map to the stored values `mobile | bank | cash`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    Mobile,
    Bank,
    Cash,
}

impl PaymentMode {
    /// Parse the form vocabulary into the stored mode
    pub fn from_form(value: &str) -> Option<Self> {
        match value {
            "mobile_money" => Some(PaymentMode::Mobile),
            "bank_transfer" => Some(PaymentMode::Bank),
            "cash" => Some(PaymentMode::Cash),
            _ => None,
        }
    }

    /// The form value this mode was submitted as
    pub fn form_value(self) -> &'static str {
        match self {
            PaymentMode::Mobile => "mobile_money",
            PaymentMode::Bank => "bank_transfer",
            PaymentMode::Cash => "cash",
        }
    }
}

/// Internal review status of a payment or resubmission
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// A follow-up submission for a rejected payment
///
/// Same shape as a payment minus the type (implicitly "other").
/// An approved resubmission supersedes the parent payment's amount
/// in total-paid calculations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resubmission {
    /// Element key for targeted updates
    pub key: String,
    pub amount: f64,
    pub mode: PaymentMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof_file: Option<FileRef>,
    #[serde(default)]
    pub status: ReviewStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decided_by: Option<String>,
    /// Populated only on approval
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_file: Option<FileRef>,
    pub submitted_at: Timestamp,
}

/// A payment recorded against a quotation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    /// Element key for targeted updates
    pub key: String,
    pub payment_type: PaymentType,
    pub amount: f64,
    pub currency: String,
    pub mode: PaymentMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proof_file: Option<FileRef>,
    #[serde(default)]
    pub status: ReviewStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decided_by: Option<String>,
    /// Populated only on approval
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt_file: Option<FileRef>,
    /// Ordered oldest-first
    #[serde(default)]
    pub resubmissions: Vec<Resubmission>,
    pub submitted_at: Timestamp,
}

impl Payment {
    /// Find a resubmission by its element key
    pub fn find_resubmission_mut(&mut self, key: &str) -> Option<&mut Resubmission> {
        self.resubmissions.iter_mut().find(|r| r.key == key)
    }
}
