//! Payment ledger aggregator
//!
//! Computes the total approved amount and remaining balance for a
//! quotation's payments. A resubmission, once approved, fully replaces
//! the original disputed amount for ledger purposes; approved
//! resubmissions never stack against the original payment.

use rust_decimal::Decimal;
use serde::Serialize;
use shared::models::{Payment, PaymentType, Quotation, QuotationStatus, ReviewStatus};

use crate::money::{is_settled, remaining, to_decimal, to_f64};

/// Derived ledger totals for display and validation
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct LedgerTotals {
    pub total_approved: f64,
    pub remaining: f64,
}

/// The amount a single payment contributes to the approved total
///
/// The last approved resubmission wins; otherwise the payment's own
/// amount if approved; otherwise zero.
pub fn approved_amount(payment: &Payment) -> Decimal {
    let last_approved = payment
        .resubmissions
        .iter()
        .filter(|r| r.status == ReviewStatus::Approved)
        .next_back();

    match last_approved {
        Some(resubmission) => to_decimal(resubmission.amount),
        None if payment.status == ReviewStatus::Approved => to_decimal(payment.amount),
        None => Decimal::ZERO,
    }
}

/// Aggregate approved payments against an invoice grand total
pub fn aggregate(payments: &[Payment], grand_total: f64) -> LedgerTotals {
    let total_approved: Decimal = payments.iter().map(approved_amount).sum();
    LedgerTotals {
        total_approved: to_f64(total_approved),
        remaining: to_f64(remaining(to_decimal(grand_total), total_approved)),
    }
}

/// Latest review state of a payment: its last resubmission's status
/// when any exist, else its own
pub fn latest_state(payment: &Payment) -> ReviewStatus {
    payment
        .resubmissions
        .last()
        .map(|r| r.status)
        .unwrap_or(payment.status)
}

/// Whether an advance payment already exists on this quotation
pub fn has_advance(payments: &[Payment]) -> bool {
    payments
        .iter()
        .any(|p| p.payment_type == PaymentType::Advance)
}

/// Payment types the client may select right now
///
/// Advance exclusivity is enforced here, at the point of payment-type
/// selection, not only at storage.
pub fn available_payment_types(quotation: &Quotation) -> Vec<PaymentType> {
    let mut types = Vec::with_capacity(3);
    if !has_advance(&quotation.payments) {
        types.push(PaymentType::Advance);
    }
    types.push(PaymentType::Full);
    types.push(PaymentType::Other);
    types
}

/// Quotation status implied by the ledger after a payment approval
pub fn settlement_status(grand_total: f64, totals: LedgerTotals) -> Option<QuotationStatus> {
    if totals.total_approved <= 0.0 {
        return None;
    }
    if is_settled(to_decimal(totals.total_approved), to_decimal(grand_total)) {
        Some(QuotationStatus::FullyPaid)
    } else {
        Some(QuotationStatus::PartiallyPaid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quotations::test_support::{
        payment_fixture, quotation_fixture, resubmission_fixture,
    };

    #[test]
    fn test_approved_resubmission_overrides_original() {
        // payment 1000 approved + resubmission 1500 approved
        // contributes exactly 1500, not 2500
        let mut payment = payment_fixture("p-1", 1000.0, ReviewStatus::Approved);
        payment
            .resubmissions
            .push(resubmission_fixture("r-1", 1500.0, ReviewStatus::Approved));

        assert_eq!(to_f64(approved_amount(&payment)), 1500.0);

        let totals = aggregate(&[payment], 10000.0);
        assert_eq!(totals.total_approved, 1500.0);
        assert_eq!(totals.remaining, 8500.0);
    }

    #[test]
    fn test_last_approved_resubmission_wins() {
        let mut payment = payment_fixture("p-1", 1000.0, ReviewStatus::Rejected);
        payment
            .resubmissions
            .push(resubmission_fixture("r-1", 1200.0, ReviewStatus::Approved));
        payment
            .resubmissions
            .push(resubmission_fixture("r-2", 900.0, ReviewStatus::Rejected));
        payment
            .resubmissions
            .push(resubmission_fixture("r-3", 1100.0, ReviewStatus::Approved));

        assert_eq!(to_f64(approved_amount(&payment)), 1100.0);
    }

    #[test]
    fn test_pending_payment_contributes_zero() {
        let payment = payment_fixture("p-1", 500.0, ReviewStatus::Pending);
        assert_eq!(to_f64(approved_amount(&payment)), 0.0);

        let totals = aggregate(&[payment], 1000.0);
        assert_eq!(totals.total_approved, 0.0);
        assert_eq!(totals.remaining, 1000.0);
    }

    #[test]
    fn test_rejected_payment_with_pending_resubmission_contributes_zero() {
        let mut payment = payment_fixture("p-1", 500.0, ReviewStatus::Rejected);
        payment
            .resubmissions
            .push(resubmission_fixture("r-1", 500.0, ReviewStatus::Pending));
        assert_eq!(to_f64(approved_amount(&payment)), 0.0);
    }

    #[test]
    fn test_advance_scenario_remaining() {
        // grandTotal=118000, approved 70800 (60% advance) -> 47200
        let payment = payment_fixture("p-1", 70800.0, ReviewStatus::Approved);
        let totals = aggregate(&[payment], 118000.0);
        assert_eq!(totals.total_approved, 70800.0);
        assert_eq!(totals.remaining, 47200.0);
    }

    #[test]
    fn test_latest_state_follows_last_resubmission() {
        let mut payment = payment_fixture("p-1", 500.0, ReviewStatus::Rejected);
        assert_eq!(latest_state(&payment), ReviewStatus::Rejected);

        payment
            .resubmissions
            .push(resubmission_fixture("r-1", 500.0, ReviewStatus::Pending));
        assert_eq!(latest_state(&payment), ReviewStatus::Pending);
    }

    #[test]
    fn test_advance_excluded_once_one_exists() {
        let mut quotation = quotation_fixture();
        assert!(available_payment_types(&quotation).contains(&PaymentType::Advance));

        let mut advance = payment_fixture("p-1", 70800.0, ReviewStatus::Pending);
        advance.payment_type = PaymentType::Advance;
        quotation.payments.push(advance);

        let types = available_payment_types(&quotation);
        assert!(!types.contains(&PaymentType::Advance));
        assert!(types.contains(&PaymentType::Full));
        assert!(types.contains(&PaymentType::Other));
    }

    #[test]
    fn test_settlement_status() {
        assert_eq!(
            settlement_status(
                1000.0,
                LedgerTotals {
                    total_approved: 0.0,
                    remaining: 1000.0
                }
            ),
            None
        );
        assert_eq!(
            settlement_status(
                1000.0,
                LedgerTotals {
                    total_approved: 400.0,
                    remaining: 600.0
                }
            ),
            Some(QuotationStatus::PartiallyPaid)
        );
        assert_eq!(
            settlement_status(
                1000.0,
                LedgerTotals {
                    total_approved: 1000.0,
                    remaining: 0.0
                }
            ),
            Some(QuotationStatus::FullyPaid)
        );
    }
}
