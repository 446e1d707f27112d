//! CreateRevision action
//!
//! Clones the effective quotation into a fresh draft revision after
//! the client sent it back for changes. The new document is prepended
//! to the parent's revision list, so the resolver picks it up as the
//! effective quotation.

use async_trait::async_trait;
use chrono::DateTime;
use shared::models::{Quotation, QuotationStatus};
use uuid::Uuid;

use super::{ActionContext, QuotationAction};
use crate::money;
use crate::quotations::{resolver, QuotationError};

#[derive(Debug, Clone)]
pub struct CreateRevision {
    pub quotation_id: String,
}

#[async_trait]
impl QuotationAction for CreateRevision {
    type Output = Quotation;

    async fn execute(&self, ctx: &ActionContext<'_>) -> Result<Quotation, QuotationError> {
        if !ctx.principal.role.is_admin() {
            return Err(QuotationError::Forbidden(ctx.principal.role));
        }

        let mut doc = ctx.store.get(&self.quotation_id).await?;
        let expected = doc.version;

        let effective = resolver::effective(&doc);
        if !matches!(
            effective.status,
            QuotationStatus::Rejected | QuotationStatus::RevisionsRequested
        ) {
            return Err(QuotationError::InvalidStatus {
                action: "revise",
                status: effective.status,
            });
        }

        let mut revision = effective.clone();
        revision.id = Uuid::new_v4().to_string();
        revision.revision_number = effective.revision_number + 1;
        revision.date = DateTime::from_timestamp_millis(ctx.now)
            .map(|dt| dt.date_naive())
            .unwrap_or(effective.date);
        revision.status = QuotationStatus::Draft;
        revision.rejection_notes = None;
        revision.payments = Vec::new();
        revision.invoice = None;
        revision.revisions = Vec::new();
        revision.version = 0;
        money::recalculate_totals(&mut revision);

        // Front of the list = newest revision
        doc.revisions.insert(0, revision);

        tracing::info!(
            quotation_id = %self.quotation_id,
            revision = doc.revisions[0].revision_number,
            operator = %ctx.principal.id,
            "Revision created"
        );
        Ok(ctx.store.put(doc, expected).await?)
    }
}
