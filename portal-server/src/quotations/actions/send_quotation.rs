//! SendQuotation action
//!
//! Moves the effective quotation from draft to sent, making it
//! visible and actionable for the client.

use async_trait::async_trait;
use shared::models::{Quotation, QuotationStatus};

use super::{ActionContext, QuotationAction};
use crate::quotations::{resolver, QuotationError};

#[derive(Debug, Clone)]
pub struct SendQuotation {
    pub quotation_id: String,
}

#[async_trait]
impl QuotationAction for SendQuotation {
    type Output = Quotation;

    async fn execute(&self, ctx: &ActionContext<'_>) -> Result<Quotation, QuotationError> {
        if !ctx.principal.role.is_admin() {
            return Err(QuotationError::Forbidden(ctx.principal.role));
        }

        let mut doc = ctx.store.get(&self.quotation_id).await?;
        let expected = doc.version;

        let effective = resolver::effective_mut(&mut doc);
        if effective.status != QuotationStatus::Draft {
            return Err(QuotationError::InvalidStatus {
                action: "send",
                status: effective.status,
            });
        }
        effective.status = QuotationStatus::Sent;

        tracing::info!(
            quotation_id = %self.quotation_id,
            operator = %ctx.principal.id,
            "Quotation sent"
        );
        Ok(ctx.store.put(doc, expected).await?)
    }
}
