//! MakePayment action
//!
//! Records a pending payment against an invoiced quotation. Amount
//! rules are enforced server-side against the approved ledger: the
//! client-submitted figure is never trusted for advance or full
//! payments, and "other" amounts are re-checked against the remaining
//! balance at commit time.

use async_trait::async_trait;
use serde::Deserialize;
use shared::models::{FileRef, Payment, PaymentMode, PaymentType, Quotation, ReviewStatus};
use uuid::Uuid;

use super::{ActionContext, QuotationAction};
use crate::money::{self, to_decimal, to_f64, MONEY_TOLERANCE};
use crate::quotations::{ledger, resolver, QuotationError};

/// Client payment submission
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentRequest {
    pub payment_type: PaymentType,
    /// Only honored for type "other"; advance and full amounts are
    /// fixed server-side
    pub amount: Option<f64>,
    pub mode: PaymentMode,
    pub proof_file: Option<FileRef>,
}

#[derive(Debug, Clone)]
pub struct MakePayment {
    pub quotation_id: String,
    pub request: PaymentRequest,
}

#[async_trait]
impl QuotationAction for MakePayment {
    type Output = Quotation;

    async fn execute(&self, ctx: &ActionContext<'_>) -> Result<Quotation, QuotationError> {
        if !ctx.principal.role.is_client() {
            return Err(QuotationError::Forbidden(ctx.principal.role));
        }

        let mut doc = ctx.store.get(&self.quotation_id).await?;
        let expected = doc.version;

        let effective = resolver::effective_mut(&mut doc);
        if !effective.status.accepts_payments() {
            return Err(QuotationError::InvalidStatus {
                action: "pay",
                status: effective.status,
            });
        }

        let totals = ledger::aggregate(&effective.payments, effective.grand_total);

        let amount = match self.request.payment_type {
            PaymentType::Advance => {
                if ledger::has_advance(&effective.payments) {
                    return Err(QuotationError::AdvanceAlreadyExists);
                }
                let pct = effective
                    .advance_percentage
                    .ok_or(QuotationError::MissingAdvancePercentage)?;
                to_f64(money::advance_amount(effective.grand_total, pct))
            }
            PaymentType::Full => {
                if totals.remaining <= 0.0 {
                    return Err(QuotationError::NothingToPay);
                }
                totals.remaining
            }
            PaymentType::Other => {
                let amount = self.request.amount.ok_or(QuotationError::MissingAmount)?;
                money::validate_amount(amount, "payment amount")?;
                if to_decimal(amount) > to_decimal(totals.remaining) + MONEY_TOLERANCE {
                    return Err(QuotationError::ExceedsRemaining {
                        amount,
                        remaining: totals.remaining,
                    });
                }
                amount
            }
        };

        effective.payments.push(Payment {
            key: Uuid::new_v4().to_string(),
            payment_type: self.request.payment_type,
            amount,
            currency: effective.currency.clone(),
            mode: self.request.mode,
            proof_file: self.request.proof_file.clone(),
            status: ReviewStatus::Pending,
            internal_notes: None,
            decided_at: None,
            decided_by: None,
            receipt_file: None,
            resubmissions: Vec::new(),
            submitted_at: ctx.now,
        });

        tracing::info!(
            quotation_id = %self.quotation_id,
            payment_type = ?self.request.payment_type,
            amount,
            operator = %ctx.principal.id,
            "Payment submitted"
        );
        Ok(ctx.store.put(doc, expected).await?)
    }
}
