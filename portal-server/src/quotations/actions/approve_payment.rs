//! ApprovePayment action
//!
//! Internal review approval of a pending payment or resubmission:
//! renders the receipt PDF, uploads it, marks the addressed entity
//! approved and rolls the quotation status forward to partially or
//! fully paid based on the recomputed ledger.

use async_trait::async_trait;
use shared::models::{Quotation, ReviewStatus};

use super::{ActionContext, QuotationAction};
use crate::money::{to_decimal, MONEY_TOLERANCE};
use crate::pdf;
use crate::quotations::{ledger, resolver, QuotationError};

#[derive(Debug, Clone)]
pub struct ApprovePayment {
    pub quotation_id: String,
    pub payment_key: String,
    pub resubmission_key: Option<String>,
    pub notes: Option<String>,
}

#[async_trait]
impl QuotationAction for ApprovePayment {
    type Output = Quotation;

    async fn execute(&self, ctx: &ActionContext<'_>) -> Result<Quotation, QuotationError> {
        if !ctx.principal.role.is_admin() {
            return Err(QuotationError::Forbidden(ctx.principal.role));
        }

        let mut doc = ctx.store.get(&self.quotation_id).await?;
        let expected = doc.version;

        let effective = resolver::effective_mut(&mut doc);

        // Render the receipt from a read-only view before mutating
        let payment_index = effective
            .payments
            .iter()
            .position(|p| p.key == self.payment_key)
            .ok_or_else(|| QuotationError::PaymentNotFound(self.payment_key.clone()))?;
        let payment = &effective.payments[payment_index];
        let resubmission_index = match &self.resubmission_key {
            Some(key) => Some(
                payment
                    .resubmissions
                    .iter()
                    .position(|r| r.key == *key)
                    .ok_or_else(|| QuotationError::ResubmissionNotFound(key.clone()))?,
            ),
            None => None,
        };
        let resubmission = resubmission_index.map(|i| &payment.resubmissions[i]);

        let target_status = resubmission.map(|r| r.status).unwrap_or(payment.status);
        if target_status != ReviewStatus::Pending {
            return Err(QuotationError::AlreadyDecided);
        }

        // Re-check the balance at decision time. A pending entity
        // contributes nothing to the ledger until approved, so other
        // approvals since submission may already cover the total.
        let amount = resubmission.map(|r| r.amount).unwrap_or(payment.amount);
        let totals = ledger::aggregate(&effective.payments, effective.grand_total);
        if to_decimal(amount) > to_decimal(totals.remaining) + MONEY_TOLERANCE {
            return Err(QuotationError::ExceedsRemaining {
                amount,
                remaining: totals.remaining,
            });
        }

        // Receipt numbers are tied to the addressed entity so two
        // approvals on the same quotation never collide
        let receipt_number = match resubmission_index {
            Some(i) => format!(
                "RCP-{}-{}-R{}",
                effective.quotation_number,
                payment_index + 1,
                i + 1
            ),
            None => format!("RCP-{}-{}", effective.quotation_number, payment_index + 1),
        };
        let pdf_doc = pdf::receipt_document(effective, payment, resubmission, &receipt_number);
        let bytes = ctx.renderer.render(&pdf_doc)?;
        let file = ctx
            .files
            .store(&format!("{}.pdf", receipt_number), bytes)
            .await?;
        let file_id = file.file_id.clone();

        // Apply the decision to the addressed entity
        {
            let payment = effective
                .find_payment_mut(&self.payment_key)
                .ok_or_else(|| QuotationError::PaymentNotFound(self.payment_key.clone()))?;
            match &self.resubmission_key {
                Some(key) => {
                    let resubmission = payment
                        .find_resubmission_mut(key)
                        .ok_or_else(|| QuotationError::ResubmissionNotFound(key.clone()))?;
                    resubmission.status = ReviewStatus::Approved;
                    resubmission.internal_notes = self.notes.clone();
                    resubmission.decided_at = Some(ctx.now);
                    resubmission.decided_by = Some(ctx.principal.id.clone());
                    resubmission.receipt_file = Some(file);
                }
                None => {
                    payment.status = ReviewStatus::Approved;
                    payment.internal_notes = self.notes.clone();
                    payment.decided_at = Some(ctx.now);
                    payment.decided_by = Some(ctx.principal.id.clone());
                    payment.receipt_file = Some(file);
                }
            }
        }

        // Roll the quotation status forward from the recomputed ledger
        let totals = ledger::aggregate(&effective.payments, effective.grand_total);
        if let Some(status) = ledger::settlement_status(effective.grand_total, totals) {
            effective.status = status;
        }

        match ctx.store.put(doc, expected).await {
            Ok(saved) => {
                tracing::info!(
                    quotation_id = %self.quotation_id,
                    payment_key = %self.payment_key,
                    resubmission = self.resubmission_key.is_some(),
                    operator = %ctx.principal.id,
                    "Payment approved"
                );
                Ok(saved)
            }
            Err(err) => {
                ctx.orphans.record(file_id);
                Err(err.into())
            }
        }
    }
}
