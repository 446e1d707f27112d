//! RejectPayment action
//!
//! Internal review rejection of a pending payment or resubmission.
//! The reason is mandatory and lands in the internal notes so the
//! client sees why the proof was not accepted.

use async_trait::async_trait;
use shared::models::{Quotation, ReviewStatus};

use super::{ActionContext, QuotationAction};
use crate::quotations::{resolver, QuotationError};

#[derive(Debug, Clone)]
pub struct RejectPayment {
    pub quotation_id: String,
    pub payment_key: String,
    pub resubmission_key: Option<String>,
    pub reason: String,
}

#[async_trait]
impl QuotationAction for RejectPayment {
    type Output = Quotation;

    async fn execute(&self, ctx: &ActionContext<'_>) -> Result<Quotation, QuotationError> {
        if !ctx.principal.role.is_admin() {
            return Err(QuotationError::Forbidden(ctx.principal.role));
        }

        let reason = self.reason.trim();
        if reason.is_empty() {
            return Err(QuotationError::MissingReason);
        }

        let mut doc = ctx.store.get(&self.quotation_id).await?;
        let expected = doc.version;

        let effective = resolver::effective_mut(&mut doc);
        let payment = effective
            .find_payment_mut(&self.payment_key)
            .ok_or_else(|| QuotationError::PaymentNotFound(self.payment_key.clone()))?;

        match &self.resubmission_key {
            Some(key) => {
                let resubmission = payment
                    .find_resubmission_mut(key)
                    .ok_or_else(|| QuotationError::ResubmissionNotFound(key.clone()))?;
                if resubmission.status != ReviewStatus::Pending {
                    return Err(QuotationError::AlreadyDecided);
                }
                resubmission.status = ReviewStatus::Rejected;
                resubmission.internal_notes = Some(reason.to_string());
                resubmission.decided_at = Some(ctx.now);
                resubmission.decided_by = Some(ctx.principal.id.clone());
            }
            None => {
                if payment.status != ReviewStatus::Pending {
                    return Err(QuotationError::AlreadyDecided);
                }
                payment.status = ReviewStatus::Rejected;
                payment.internal_notes = Some(reason.to_string());
                payment.decided_at = Some(ctx.now);
                payment.decided_by = Some(ctx.principal.id.clone());
            }
        }

        tracing::info!(
            quotation_id = %self.quotation_id,
            payment_key = %self.payment_key,
            resubmission = self.resubmission_key.is_some(),
            operator = %ctx.principal.id,
            "Payment rejected"
        );
        Ok(ctx.store.put(doc, expected).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quotations::actions::test_context::{admin, client, TestHarness};
    use crate::quotations::test_support::{
        payment_fixture, quotation_fixture, resubmission_fixture,
    };
    use crate::store::QuotationStore;
    use shared::models::QuotationStatus;

    fn invoiced_with_pending() -> Quotation {
        let mut doc = quotation_fixture();
        doc.status = QuotationStatus::Invoiced;
        doc.payments
            .push(payment_fixture("p-1", 70800.0, ReviewStatus::Pending));
        doc
    }

    #[tokio::test]
    async fn test_reject_records_reason_and_decision() {
        let harness = TestHarness::new();
        harness.store.insert(invoiced_with_pending()).await.unwrap();

        let principal = admin();
        let action = RejectPayment {
            quotation_id: "q-1".to_string(),
            payment_key: "p-1".to_string(),
            resubmission_key: None,
            reason: "Reference number does not match".to_string(),
        };
        let saved = action.execute(&harness.ctx(&principal)).await.unwrap();

        let payment = &saved.payments[0];
        assert_eq!(payment.status, ReviewStatus::Rejected);
        assert_eq!(
            payment.internal_notes.as_deref(),
            Some("Reference number does not match")
        );
        assert_eq!(payment.decided_by.as_deref(), Some("staff-1"));
        assert!(payment.decided_at.is_some());
        // Rejection contributes nothing, status stays invoiced
        assert_eq!(saved.status, QuotationStatus::Invoiced);
    }

    #[tokio::test]
    async fn test_reject_requires_reason() {
        let harness = TestHarness::new();
        harness.store.insert(invoiced_with_pending()).await.unwrap();

        let principal = admin();
        let action = RejectPayment {
            quotation_id: "q-1".to_string(),
            payment_key: "p-1".to_string(),
            resubmission_key: None,
            reason: "  ".to_string(),
        };
        let result = action.execute(&harness.ctx(&principal)).await;
        assert!(matches!(result, Err(QuotationError::MissingReason)));
    }

    #[tokio::test]
    async fn test_reject_resubmission_by_key() {
        let harness = TestHarness::new();
        let mut doc = quotation_fixture();
        doc.status = QuotationStatus::Invoiced;
        let mut payment = payment_fixture("p-1", 1000.0, ReviewStatus::Rejected);
        payment
            .resubmissions
            .push(resubmission_fixture("r-1", 1000.0, ReviewStatus::Pending));
        doc.payments.push(payment);
        harness.store.insert(doc).await.unwrap();

        let principal = admin();
        let action = RejectPayment {
            quotation_id: "q-1".to_string(),
            payment_key: "p-1".to_string(),
            resubmission_key: Some("r-1".to_string()),
            reason: "Proof is illegible".to_string(),
        };
        let saved = action.execute(&harness.ctx(&principal)).await.unwrap();

        let resubmission = &saved.payments[0].resubmissions[0];
        assert_eq!(resubmission.status, ReviewStatus::Rejected);
        assert_eq!(
            resubmission.internal_notes.as_deref(),
            Some("Proof is illegible")
        );
    }

    #[tokio::test]
    async fn test_reject_already_decided_fails() {
        let harness = TestHarness::new();
        let mut doc = quotation_fixture();
        doc.status = QuotationStatus::Invoiced;
        doc.payments
            .push(payment_fixture("p-1", 1000.0, ReviewStatus::Rejected));
        harness.store.insert(doc).await.unwrap();

        let principal = admin();
        let action = RejectPayment {
            quotation_id: "q-1".to_string(),
            payment_key: "p-1".to_string(),
            resubmission_key: None,
            reason: "Duplicate decision".to_string(),
        };
        let result = action.execute(&harness.ctx(&principal)).await;
        assert!(matches!(result, Err(QuotationError::AlreadyDecided)));
    }

    #[tokio::test]
    async fn test_reject_requires_admin() {
        let harness = TestHarness::new();
        harness.store.insert(invoiced_with_pending()).await.unwrap();

        let principal = client();
        let action = RejectPayment {
            quotation_id: "q-1".to_string(),
            payment_key: "p-1".to_string(),
            resubmission_key: None,
            reason: "No".to_string(),
        };
        let result = action.execute(&harness.ctx(&principal)).await;
        assert!(matches!(result, Err(QuotationError::Forbidden(_))));
    }
}
