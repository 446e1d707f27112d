//! MakeResubmission action
//!
//! The client answers a rejected payment with new proof. The amount
//! stays locked to the original payment, only the mode and proof can
//! change, and each resubmission supersedes the previous one in the
//! ledger once approved.

use async_trait::async_trait;
use serde::Deserialize;
use shared::models::{FileRef, PaymentMode, Quotation, Resubmission, ReviewStatus};
use uuid::Uuid;

use super::{ActionContext, QuotationAction};
use crate::quotations::{ledger, resolver, QuotationError};

/// Client resubmission of a rejected payment
#[derive(Debug, Clone, Deserialize)]
pub struct ResubmissionRequest {
    pub mode: PaymentMode,
    pub proof_file: Option<FileRef>,
}

#[derive(Debug, Clone)]
pub struct MakeResubmission {
    pub quotation_id: String,
    pub payment_key: String,
    pub request: ResubmissionRequest,
}

#[async_trait]
impl QuotationAction for MakeResubmission {
    type Output = Quotation;

    async fn execute(&self, ctx: &ActionContext<'_>) -> Result<Quotation, QuotationError> {
        if !ctx.principal.role.is_client() {
            return Err(QuotationError::Forbidden(ctx.principal.role));
        }

        let mut doc = ctx.store.get(&self.quotation_id).await?;
        let expected = doc.version;

        let effective = resolver::effective_mut(&mut doc);
        let payment = effective
            .find_payment_mut(&self.payment_key)
            .ok_or_else(|| QuotationError::PaymentNotFound(self.payment_key.clone()))?;

        // Only the most recent decision matters: a pending or approved
        // resubmission blocks another attempt
        if ledger::latest_state(payment) != ReviewStatus::Rejected {
            return Err(QuotationError::NotRejected);
        }

        payment.resubmissions.push(Resubmission {
            key: Uuid::new_v4().to_string(),
            amount: payment.amount,
            mode: self.request.mode,
            proof_file: self.request.proof_file.clone(),
            status: ReviewStatus::Pending,
            internal_notes: None,
            decided_at: None,
            decided_by: None,
            receipt_file: None,
            submitted_at: ctx.now,
        });

        tracing::info!(
            quotation_id = %self.quotation_id,
            payment_key = %self.payment_key,
            operator = %ctx.principal.id,
            "Payment resubmitted"
        );
        Ok(ctx.store.put(doc, expected).await?)
    }
}
